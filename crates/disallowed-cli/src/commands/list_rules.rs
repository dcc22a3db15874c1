//! List rules command implementation.

use anyhow::Result;
use disallowed_core::{DisallowedCall, RuleKind};

use crate::config_resolver::ConfigSource;

/// Runs the list-rules command.
pub fn run(source: &ConfigSource) -> Result<()> {
    let setup = super::load(source, None)?;

    if setup.rules.is_empty() {
        println!("No rules configured.");
        println!("\nCreate a configuration with:");
        println!("  disallowed init");
        return Ok(());
    }

    println!("Configured rules (root: {}):\n", setup.config.engine.root.display());
    println!("{:<10} {:<8} {:<45} Message", "Kind", "Severity", "Calls");
    println!("{}", "-".repeat(90));

    for kind in [RuleKind::Method, RuleKind::Function] {
        for rule in setup.rules.of_kind(kind) {
            println!(
                "{:<10} {:<8} {:<45} {}",
                kind.to_string(),
                rule.severity().to_string(),
                calls(rule),
                rule.message()
            );
            for line in exemptions(rule) {
                println!("{:<20}{line}", "");
            }
        }
    }

    Ok(())
}

fn calls(rule: &DisallowedCall) -> String {
    rule.calls()
        .iter()
        .map(|p| p.display_call())
        .collect::<Vec<_>>()
        .join(", ")
}

fn exemptions(rule: &DisallowedCall) -> Vec<String> {
    let mut lines = Vec::new();
    let mut list = |label: &str, items: Vec<String>| {
        if !items.is_empty() {
            lines.push(format!("{label}: {}", items.join(", ")));
        }
    };
    list("exclude", rule.excludes().iter().map(ToString::to_string).collect());
    list("allow-in", rule.allow_in().iter().map(|g| g.as_str().to_string()).collect());
    list(
        "allow-except-in",
        rule.allow_except_in().iter().map(|g| g.as_str().to_string()).collect(),
    );
    list(
        "allow-in-callers",
        rule.allow_in_callers().iter().map(ToString::to_string).collect(),
    );
    list(
        "allow-except-in-callers",
        rule.allow_except_in_callers().iter().map(ToString::to_string).collect(),
    );
    for (label, params) in [
        ("allow-params-in-allowed", rule.allow_params_in_allowed()),
        ("allow-except-params-in-allowed", rule.allow_except_params_in_allowed()),
        ("allow-params-anywhere", rule.allow_params_anywhere()),
        ("allow-except-params", rule.allow_except_params()),
    ] {
        list(label, params.iter().map(|(p, v)| format!("#{p} = {v}")).collect());
    }
    if let Some(tip) = rule.error_tip() {
        lines.push(format!("tip: {tip}"));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use disallowed_core::{ArgValue, FilePath, ParamConstraints, PathGlob, SymbolPattern};

    #[test]
    fn exemption_lines() {
        let rule = DisallowedCall::builder(RuleKind::Method)
            .call(SymbolPattern::new("Waldo\\Quux\\Blade::run*()").unwrap())
            .exclude(SymbolPattern::new("Waldo\\Quux\\Blade::runway()").unwrap())
            .allow_in(PathGlob::new("../src/*-allow/*.*", &FilePath::new("/p/tests").unwrap()).unwrap())
            .allow_params_in_allowed(
                ParamConstraints::new()
                    .with(1, ArgValue::Int(42))
                    .unwrap()
                    .with(3, ArgValue::Str("909".into()))
                    .unwrap(),
            )
            .error_tip("careful")
            .build()
            .unwrap();

        assert_eq!(calls(&rule), "Waldo\\Quux\\Blade::run*()");
        assert_eq!(
            exemptions(&rule),
            vec![
                "exclude: Waldo\\Quux\\Blade::runway".to_string(),
                "allow-in: ../src/*-allow/*.*".to_string(),
                "allow-params-in-allowed: #1 = 42, #3 = '909'".to_string(),
                "tip: careful".to_string(),
            ]
        );
    }
}
