//! Turns a matched, non-exempt call into a [`Diagnostic`].

use crate::call_site::CallSite;
use crate::rule::DisallowedCall;
use crate::symbol::{Symbol, SymbolKind, SymbolPattern};
use crate::types::{Diagnostic, Location};

/// Identifier for disallowed function calls.
pub const FUNCTION_IDENTIFIER: &str = "disallowed.function";
/// Identifier for disallowed instance method calls.
pub const METHOD_IDENTIFIER: &str = "disallowed.method";
/// Identifier for disallowed static method calls.
pub const STATIC_CALL_IDENTIFIER: &str = "disallowed.staticCall";

/// A rule matched against one candidate symbol of a call site.
#[derive(Debug, Clone)]
pub struct MatchResult<'a> {
    /// The matched rule.
    pub rule: &'a DisallowedCall,
    /// The rule pattern that matched.
    pub pattern: &'a SymbolPattern,
    /// The call site.
    pub call_site: &'a CallSite,
    /// The candidate symbol the rule matched.
    pub declared: &'a Symbol,
    /// `(as Invoked::name())` when the call went through another symbol.
    pub alias_note: Option<String>,
}

/// Builds diagnostics from match results.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleErrors;

impl RuleErrors {
    /// Builds the diagnostic for a match.
    #[must_use]
    pub fn build(result: &MatchResult<'_>) -> Diagnostic {
        let rule = result.rule;
        let identifier = rule
            .error_identifier()
            .map_or_else(|| default_identifier(result.call_site.kind()), str::to_string);
        let location = Location::new(result.call_site.file(), result.call_site.line());

        let diagnostic = Diagnostic::new(
            identifier,
            rule.name(),
            rule.severity(),
            location,
            Self::message(result),
        );
        match rule.error_tip() {
            Some(tip) => diagnostic.with_tip(tip),
            None => diagnostic,
        }
    }

    /// Formats `Calling X() [(as Y())] is forbidden, message [X() matches P()]`.
    #[must_use]
    pub fn message(result: &MatchResult<'_>) -> String {
        let declared = result.declared.display_call();
        let mut message = format!("Calling {declared}");
        if let Some(note) = &result.alias_note {
            message.push(' ');
            message.push_str(note);
        }
        message.push_str(" is forbidden");
        match result.rule.message() {
            "" => message.push('.'),
            text => {
                message.push_str(", ");
                message.push_str(text);
            }
        }
        let pattern = result.pattern.display_call();
        if pattern != declared {
            message.push_str(&format!(" [{declared} matches {pattern}]"));
        }
        message
    }
}

/// Returns the identifier used when a rule sets none.
#[must_use]
pub fn default_identifier(kind: SymbolKind) -> String {
    match kind {
        SymbolKind::Function => FUNCTION_IDENTIFIER,
        SymbolKind::InstanceMethod => METHOD_IDENTIFIER,
        SymbolKind::StaticMethod => STATIC_CALL_IDENTIFIER,
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::alias_note;
    use crate::rule::RuleKind;
    use crate::types::Severity;

    fn pattern(p: &str) -> SymbolPattern {
        SymbolPattern::new(p).unwrap()
    }

    fn method_rule(p: &str, message: &str) -> DisallowedCall {
        DisallowedCall::builder(RuleKind::Method)
            .call(pattern(p))
            .message(message)
            .build()
            .unwrap()
    }

    fn build(rule: &DisallowedCall, call: &CallSite, declared: &Symbol) -> Diagnostic {
        let result = MatchResult {
            rule,
            pattern: rule.matching_pattern(declared).unwrap(),
            call_site: call,
            declared,
            alias_note: alias_note(call.invoked(), declared),
        };
        RuleErrors::build(&result)
    }

    #[test]
    fn exact_match_has_no_suffix() {
        let rule = method_rule("PhpOption\\None::getIterator()", "no PhpOption");
        let call = CallSite::new(
            Symbol::method("PhpOption\\None::getIterator").unwrap(),
            "src/disallowed/methodCalls.php",
            46,
        );
        let d = build(&rule, &call, call.declaring());
        assert_eq!(d.message, "Calling PhpOption\\None::getIterator() is forbidden, no PhpOption");
        assert_eq!(d.identifier, METHOD_IDENTIFIER);
        assert_eq!(d.rule, "PhpOption\\None::getIterator");
        assert_eq!(d.line(), 46);
        assert_eq!(d.severity, Severity::Error);
        assert!(d.tip.is_none());
    }

    #[test]
    fn wildcard_and_alias_message() {
        let rule = method_rule("Inheritance\\Base::x*()", "Base::x*() methods are dangerous");
        let call = CallSite::new(Symbol::method("Inheritance\\Sub::x").unwrap(), "a.php", 22)
            .declared_as(Symbol::method("Inheritance\\Base::x").unwrap());
        let d = build(&rule, &call, call.declaring());
        insta::assert_snapshot!(d.message, @r"Calling Inheritance\Base::x() (as Inheritance\Sub::x()) is forbidden, Base::x*() methods are dangerous [Inheritance\Base::x() matches Inheritance\Base::x*()]");
    }

    #[test]
    fn case_difference_adds_suffix() {
        let rule = method_rule("Waldo\\Quux\\Blade::Trinity()", "holy trinity");
        let call = CallSite::new(
            Symbol::method("Waldo\\Quux\\Blade::trinity").unwrap(),
            "a.php",
            64,
        );
        let d = build(&rule, &call, call.declaring());
        insta::assert_snapshot!(d.message, @r"Calling Waldo\Quux\Blade::trinity() is forbidden, holy trinity [Waldo\Quux\Blade::trinity() matches Waldo\Quux\Blade::Trinity()]");
    }

    #[test]
    fn empty_message_ends_with_period() {
        let rule = DisallowedCall::builder(RuleKind::Function)
            .call(pattern("exec()"))
            .build()
            .unwrap();
        let call = CallSite::new(Symbol::function("exec").unwrap(), "a.php", 1);
        let d = build(&rule, &call, call.declaring());
        assert_eq!(d.message, "Calling exec() is forbidden.");
        assert_eq!(d.identifier, FUNCTION_IDENTIFIER);
    }

    #[test]
    fn tip_identifier_and_severity_come_from_rule() {
        let rule = DisallowedCall::builder(RuleKind::Method)
            .call(pattern("DateTime::format()"))
            .message("why too kay")
            .error_tip("2038 is approaching fast")
            .error_identifier("time.y2038")
            .severity(Severity::Warning)
            .build()
            .unwrap();
        let call = CallSite::new(Symbol::static_method("DateTime::format").unwrap(), "a.php", 55);
        let d = build(&rule, &call, call.declaring());
        assert_eq!(d.message, "Calling DateTime::format() is forbidden, why too kay");
        assert_eq!(d.tip.as_deref(), Some("2038 is approaching fast"));
        assert_eq!(d.identifier, "time.y2038");
        assert_eq!(d.severity, Severity::Warning);
    }

    #[test]
    fn default_identifier_by_kind() {
        assert_eq!(default_identifier(SymbolKind::StaticMethod), STATIC_CALL_IDENTIFIER);
        assert_eq!(default_identifier(SymbolKind::InstanceMethod), METHOD_IDENTIFIER);
    }
}
