//! TOML deserialization types (DTO layer).
//!
//! These types exist solely for serde deserialization.
//! They are converted to domain model types via the loader.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Raw TOML representation of the rule sections.
///
/// The `[engine]` table in the same file is read by [`crate::Config`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RulesConfigDto {
    /// Rules for static and instance method calls.
    #[serde(rename = "disallowed-method-calls", default)]
    pub method_calls: Vec<DisallowedCallDto>,

    /// Rules for function calls.
    #[serde(rename = "disallowed-function-calls", default)]
    pub function_calls: Vec<DisallowedCallDto>,
}

/// A string or an array of strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    /// A single value.
    One(String),
    /// Several values.
    Many(Vec<String>),
}

impl OneOrMany {
    /// Flattens into a list.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s],
            Self::Many(v) => v,
        }
    }
}

impl Default for OneOrMany {
    fn default() -> Self {
        Self::Many(Vec::new())
    }
}

/// Literal values keyed by 1-based argument position (`{ 1 = "y" }`).
pub type ParamsDto = BTreeMap<String, toml::Value>;

/// TOML representation of one disallowed call directive.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DisallowedCallDto {
    /// Method pattern(s).
    #[serde(default)]
    pub method: Option<OneOrMany>,
    /// Function pattern(s).
    #[serde(default)]
    pub function: Option<OneOrMany>,
    /// Violation message.
    #[serde(default)]
    pub message: String,
    /// Patterns the rule does not apply to.
    #[serde(default)]
    pub exclude: OneOrMany,
    /// Paths the call is allowed in.
    #[serde(default)]
    pub allow_in: Vec<String>,
    /// Paths the call is disallowed in.
    #[serde(default, alias = "disallow-in")]
    pub allow_except_in: Vec<String>,
    /// Callers the call is allowed in.
    #[serde(default, alias = "allow-in-methods", alias = "allow-in-functions")]
    pub allow_in_callers: Vec<String>,
    /// Callers the call is disallowed in.
    #[serde(
        default,
        alias = "allow-except-in-methods",
        alias = "allow-except-in-functions",
        alias = "disallow-in-callers"
    )]
    pub allow_except_in_callers: Vec<String>,
    /// Values required in allowed paths.
    #[serde(default)]
    pub allow_params_in_allowed: ParamsDto,
    /// Values that cancel the exemption in allowed paths.
    #[serde(default)]
    pub allow_except_params_in_allowed: ParamsDto,
    /// Values that exempt the call anywhere.
    #[serde(default)]
    pub allow_params_anywhere: ParamsDto,
    /// Values that are always forbidden.
    #[serde(default, alias = "disallow-params")]
    pub allow_except_params: ParamsDto,
    /// Supplementary hint.
    #[serde(default)]
    pub error_tip: Option<String>,
    /// Custom error identifier.
    #[serde(default)]
    pub error_identifier: Option<String>,
    /// Severity (default: "error").
    #[serde(default = "default_severity_str")]
    pub severity: String,
}

fn default_severity_str() -> String {
    "error".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto: RulesConfigDto = toml::from_str("").unwrap();
        assert!(dto.method_calls.is_empty());
        assert!(dto.function_calls.is_empty());
    }

    #[test]
    fn deserialize_full_rule() {
        let toml_str = r#"
[engine]
root = "."

[[disallowed-method-calls]]
method = 'Waldo\Quux\Blade::run*()'
message = "I've seen tests you people wouldn't believe"
exclude = 'Waldo\Quux\Blade::runway()'
allow-in = ["../src/disallowed-allow/*.php", "../src/*-allow/*.*"]
allow-params-in-allowed = { 1 = 42, 2 = true, 3 = "909" }

[[disallowed-function-calls]]
function = ["exec()", "shell_exec()"]
disallow-in = ["src/web/**"]
disallow-params = { 1 = "y" }
allow-in-functions = ['App\boot()']
error-tip = "use the process builder"
severity = "warning"
"#;
        let dto: RulesConfigDto = toml::from_str(toml_str).unwrap();

        let blade = &dto.method_calls[0];
        assert!(matches!(&blade.method, Some(OneOrMany::One(m)) if m == "Waldo\\Quux\\Blade::run*()"));
        assert_eq!(blade.exclude.clone().into_vec(), vec!["Waldo\\Quux\\Blade::runway()"]);
        assert_eq!(blade.allow_in.len(), 2);
        assert_eq!(blade.allow_params_in_allowed.len(), 3);
        assert_eq!(blade.severity, "error");

        let exec = &dto.function_calls[0];
        assert_eq!(exec.function.clone().map(OneOrMany::into_vec).unwrap().len(), 2);
        assert_eq!(exec.allow_except_in, vec!["src/web/**"]);
        assert_eq!(exec.allow_in_callers, vec!["App\\boot()"]);
        assert!(exec.allow_except_params.contains_key("1"));
        assert_eq!(exec.error_tip.as_deref(), Some("use the process builder"));
    }

    #[test]
    fn unknown_rule_key_is_rejected() {
        let result: Result<RulesConfigDto, _> =
            toml::from_str("[[disallowed-function-calls]]\nfunction = \"exec()\"\nallowIn = []\n");
        assert!(result.is_err());
    }
}
