//! Exemption policy: decides whether a matched call is allowed anyway.
//!
//! Steps are evaluated in order and the first applicable one decides:
//!
//! 0. a forbidden parameter value (`allow_except_params`) always disallows
//! 1. `allow_in` paths, then `allow_in_callers`: on a hit the call is exempt
//!    iff the "in allowed" parameter conditions hold
//! 2. `allow_except_in` paths, then `allow_except_in_callers`: disallowed on
//!    a hit, exempt otherwise
//! 3. `allow_except_params`: exempt when every configured argument is a
//!    known literal other than the forbidden one
//! 4. `allow_params_anywhere`: exempt when every configured argument holds
//!    the configured literal
//! 5. otherwise disallowed
//!
//! Unknown argument values never exempt a call.

use std::path::Path;

use crate::call_site::CallSite;
use crate::params::ForbiddenCheck;
use crate::path::{any_matches, FilePath};
use crate::rule::DisallowedCall;
use crate::symbol::SymbolPattern;

/// Why a call was exempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExemptReason {
    /// The file matches an `allow_in` glob.
    AllowedPath,
    /// The caller matches an `allow_in_callers` pattern.
    AllowedCaller,
    /// `allow_except_in` is set and the file is outside it.
    OutsideDisallowedPaths,
    /// `allow_except_in_callers` is set and the caller is outside it.
    OutsideDisallowedCallers,
    /// None of the forbidden parameter values were passed.
    ParamsNotForbidden,
    /// The parameters match `allow_params_anywhere`.
    ParamsAllowedAnywhere,
}

/// Why a call was not exempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisallowReason {
    /// An `allow_except_params` value was passed.
    ForbiddenParam {
        /// 1-based position.
        position: usize,
    },
    /// In an allowed path or caller, but the parameter conditions failed.
    ParamsNotAllowed,
    /// The file matches an `allow_except_in` glob.
    DisallowedPath,
    /// The caller matches an `allow_except_in_callers` pattern.
    DisallowedCaller,
    /// An argument needed to decide could not be resolved.
    UnknownParam {
        /// 1-based position.
        position: usize,
    },
    /// No exemption is configured or applies.
    NoExemption,
}

/// Outcome of the exemption policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exemption {
    /// The call is allowed.
    Exempt(ExemptReason),
    /// The call is reported.
    Disallowed(DisallowReason),
}

impl Exemption {
    /// Returns true if exempt.
    #[must_use]
    pub fn is_exempt(self) -> bool {
        matches!(self, Self::Exempt(_))
    }
}

/// Exemption policy bound to a project root.
#[derive(Debug, Clone)]
pub struct Allowed {
    paths: FilePath,
}

impl Allowed {
    /// Creates a policy resolving call-site files against `paths`.
    #[must_use]
    pub fn new(paths: FilePath) -> Self {
        Self { paths }
    }

    /// Evaluates the exemptions of `rule` for `call`.
    #[must_use]
    pub fn check(&self, rule: &DisallowedCall, call: &CallSite) -> Exemption {
        let file = self.paths.resolve_path(call.file());
        let outcome = check(rule, call, &file);
        tracing::trace!(rule = rule.name(), file = %file.display(), ?outcome, "exemption");
        outcome
    }
}

/// Evaluates exemptions for a rule against a call site.
///
/// `file` is the call site's path already resolved against the project root.
#[must_use]
pub fn check(rule: &DisallowedCall, call: &CallSite, file: &Path) -> Exemption {
    let args = call.args();

    let forbidden = rule.allow_except_params();
    let forbidden_check = (!forbidden.is_empty()).then(|| forbidden.find_forbidden(args));
    if let Some(ForbiddenCheck::Hit { position }) = forbidden_check {
        return Exemption::Disallowed(DisallowReason::ForbiddenParam { position });
    }

    if any_matches(rule.allow_in(), file) {
        return params_in_allowed(rule, call, ExemptReason::AllowedPath);
    }
    if caller_matches(rule.allow_in_callers(), call) {
        return params_in_allowed(rule, call, ExemptReason::AllowedCaller);
    }

    if !rule.allow_except_in().is_empty() {
        return if any_matches(rule.allow_except_in(), file) {
            Exemption::Disallowed(DisallowReason::DisallowedPath)
        } else {
            Exemption::Exempt(ExemptReason::OutsideDisallowedPaths)
        };
    }
    if !rule.allow_except_in_callers().is_empty() {
        return if caller_matches(rule.allow_except_in_callers(), call) {
            Exemption::Disallowed(DisallowReason::DisallowedCaller)
        } else {
            Exemption::Exempt(ExemptReason::OutsideDisallowedCallers)
        };
    }

    match forbidden_check {
        Some(ForbiddenCheck::Unknown { position }) => {
            return Exemption::Disallowed(DisallowReason::UnknownParam { position });
        }
        Some(ForbiddenCheck::Clear) => {
            return Exemption::Exempt(ExemptReason::ParamsNotForbidden);
        }
        Some(ForbiddenCheck::Hit { .. }) | None => {}
    }

    let anywhere = rule.allow_params_anywhere();
    if !anywhere.is_empty() && anywhere.all_equal(args) {
        return Exemption::Exempt(ExemptReason::ParamsAllowedAnywhere);
    }

    Exemption::Disallowed(DisallowReason::NoExemption)
}

fn params_in_allowed(rule: &DisallowedCall, call: &CallSite, reason: ExemptReason) -> Exemption {
    let args = call.args();

    let except = rule.allow_except_params_in_allowed();
    if !except.is_empty() {
        match except.find_forbidden(args) {
            ForbiddenCheck::Hit { .. } => {
                return Exemption::Disallowed(DisallowReason::ParamsNotAllowed);
            }
            ForbiddenCheck::Unknown { position } => {
                return Exemption::Disallowed(DisallowReason::UnknownParam { position });
            }
            ForbiddenCheck::Clear => {}
        }
    }

    let required = rule.allow_params_in_allowed();
    if !required.is_empty() && !required.all_equal(args) {
        return Exemption::Disallowed(DisallowReason::ParamsNotAllowed);
    }

    Exemption::Exempt(reason)
}

fn caller_matches(patterns: &[SymbolPattern], call: &CallSite) -> bool {
    call.caller()
        .is_some_and(|caller| patterns.iter().any(|p| p.matches(caller)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{ArgValue, ParamConstraints};
    use crate::path::{FilePath, PathGlob};
    use crate::rule::{DisallowedCallBuilder, RuleKind};
    use crate::symbol::Symbol;
    use std::path::PathBuf;

    const ALLOWED_FILE: &str = "/project/src/disallowed-allow/methodCalls.php";
    const DISALLOWED_FILE: &str = "/project/src/disallowed/methodCalls.php";

    fn paths() -> FilePath {
        FilePath::new("/project/tests").unwrap()
    }

    fn rule() -> DisallowedCallBuilder {
        DisallowedCall::builder(RuleKind::Method)
            .call(SymbolPattern::new("Foo::bar()").unwrap())
            .message("no")
    }

    fn allow_in(builder: DisallowedCallBuilder) -> DisallowedCallBuilder {
        builder
            .allow_in(PathGlob::new("../src/disallowed-allow/*.php", &paths()).unwrap())
            .allow_in(PathGlob::new("../src/*-allow/*.*", &paths()).unwrap())
    }

    fn call(file: &str, args: Vec<ArgValue>) -> (CallSite, PathBuf) {
        let site = CallSite::new(Symbol::method("Foo::bar").unwrap(), file, 1).with_args(args);
        (site, PathBuf::from(file))
    }

    fn params(pairs: &[(usize, ArgValue)]) -> ParamConstraints {
        pairs
            .iter()
            .fold(ParamConstraints::new(), |c, (p, v)| c.with(*p, v.clone()).unwrap())
    }

    fn eval(rule: &DisallowedCall, file: &str, args: Vec<ArgValue>) -> Exemption {
        let (site, file) = call(file, args);
        check(rule, &site, &file)
    }

    #[test]
    fn allowed_resolves_relative_files() {
        let rule = allow_in(rule()).build().unwrap();
        let allowed = Allowed::new(FilePath::new("/project").unwrap());
        let site = CallSite::new(
            Symbol::method("Foo::bar").unwrap(),
            "src/disallowed-allow/methodCalls.php",
            10,
        );
        assert_eq!(
            allowed.check(&rule, &site),
            Exemption::Exempt(ExemptReason::AllowedPath)
        );
    }

    #[test]
    fn no_exemptions_configured() {
        let rule = rule().build().unwrap();
        assert_eq!(
            eval(&rule, ALLOWED_FILE, vec![]),
            Exemption::Disallowed(DisallowReason::NoExemption)
        );
    }

    #[test]
    fn allow_in_path() {
        let rule = allow_in(rule()).build().unwrap();
        assert_eq!(
            eval(&rule, ALLOWED_FILE, vec![]),
            Exemption::Exempt(ExemptReason::AllowedPath)
        );
        assert!(!eval(&rule, DISALLOWED_FILE, vec![]).is_exempt());
    }

    #[test]
    fn allow_except_in_disallows_only_listed_paths() {
        let rule = rule()
            .allow_except_in(PathGlob::new("../src/disallowed/*.php", &paths()).unwrap())
            .build()
            .unwrap();
        assert_eq!(
            eval(&rule, DISALLOWED_FILE, vec![]),
            Exemption::Disallowed(DisallowReason::DisallowedPath)
        );
        assert_eq!(
            eval(&rule, ALLOWED_FILE, vec![]),
            Exemption::Exempt(ExemptReason::OutsideDisallowedPaths)
        );
    }

    #[test]
    fn allow_params_in_allowed_requires_all_values() {
        let rule = allow_in(rule())
            .allow_params_in_allowed(params(&[
                (1, ArgValue::Int(42)),
                (2, ArgValue::Bool(true)),
                (3, ArgValue::Str("909".into())),
            ]))
            .build()
            .unwrap();

        let good = vec![ArgValue::Int(42), ArgValue::Bool(true), ArgValue::Str("909".into())];
        assert!(eval(&rule, ALLOWED_FILE, good.clone()).is_exempt());
        assert!(!eval(&rule, DISALLOWED_FILE, good).is_exempt());

        let wrong_type = vec![ArgValue::Int(42), ArgValue::Bool(true), ArgValue::Int(909)];
        assert_eq!(
            eval(&rule, ALLOWED_FILE, wrong_type),
            Exemption::Disallowed(DisallowReason::ParamsNotAllowed)
        );
    }

    #[test]
    fn unknown_argument_fails_closed() {
        let rule = allow_in(rule())
            .allow_params_in_allowed(params(&[(2, ArgValue::Bool(true))]))
            .build()
            .unwrap();
        assert!(!eval(&rule, ALLOWED_FILE, vec![ArgValue::Int(1), ArgValue::Unknown]).is_exempt());
    }

    #[test]
    fn allow_except_params_overrides_allowed_path() {
        let rule = allow_in(rule())
            .allow_except_params(params(&[(1, ArgValue::Str("y".into()))]))
            .build()
            .unwrap();

        assert_eq!(
            eval(&rule, ALLOWED_FILE, vec![ArgValue::Str("y".into())]),
            Exemption::Disallowed(DisallowReason::ForbiddenParam { position: 1 })
        );
        assert_eq!(
            eval(&rule, DISALLOWED_FILE, vec![ArgValue::Str("y".into())]),
            Exemption::Disallowed(DisallowReason::ForbiddenParam { position: 1 })
        );
        assert_eq!(
            eval(&rule, DISALLOWED_FILE, vec![ArgValue::Str("Y".into())]),
            Exemption::Exempt(ExemptReason::ParamsNotForbidden)
        );
        assert!(eval(&rule, ALLOWED_FILE, vec![ArgValue::Str("Y".into())]).is_exempt());
    }

    #[test]
    fn allow_except_params_without_paths() {
        let rule = rule()
            .allow_except_params(params(&[(1, ArgValue::Str("y".into()))]))
            .build()
            .unwrap();
        assert!(eval(&rule, DISALLOWED_FILE, vec![]).is_exempt());
        assert_eq!(
            eval(&rule, DISALLOWED_FILE, vec![ArgValue::Unknown]),
            Exemption::Disallowed(DisallowReason::UnknownParam { position: 1 })
        );
    }

    #[test]
    fn allow_except_params_in_allowed() {
        let rule = allow_in(rule())
            .allow_except_params_in_allowed(params(&[(1, ArgValue::Bool(false))]))
            .build()
            .unwrap();
        assert!(eval(&rule, ALLOWED_FILE, vec![ArgValue::Bool(true)]).is_exempt());
        assert_eq!(
            eval(&rule, ALLOWED_FILE, vec![ArgValue::Bool(false)]),
            Exemption::Disallowed(DisallowReason::ParamsNotAllowed)
        );
        assert!(!eval(&rule, ALLOWED_FILE, vec![ArgValue::Unknown]).is_exempt());
    }

    #[test]
    fn allow_params_anywhere() {
        let rule = rule()
            .allow_params_anywhere(params(&[(1, ArgValue::Null)]))
            .build()
            .unwrap();
        assert_eq!(
            eval(&rule, DISALLOWED_FILE, vec![ArgValue::Null]),
            Exemption::Exempt(ExemptReason::ParamsAllowedAnywhere)
        );
        assert!(!eval(&rule, DISALLOWED_FILE, vec![ArgValue::Int(0)]).is_exempt());
    }

    #[test]
    fn caller_exemptions() {
        let allowed = rule()
            .allow_in_caller(SymbolPattern::new("App\\Boot::*").unwrap())
            .build()
            .unwrap();
        let (site, file) = call(DISALLOWED_FILE, vec![]);
        let inside = site
            .clone()
            .called_from(Symbol::method("App\\Boot::init").unwrap());
        assert_eq!(
            check(&allowed, &inside, &file),
            Exemption::Exempt(ExemptReason::AllowedCaller)
        );
        assert!(!check(&allowed, &site, &file).is_exempt());

        let disallowed = rule()
            .allow_except_in_caller(SymbolPattern::new("App\\Hot::loop()").unwrap())
            .build()
            .unwrap();
        let hot = site.clone().called_from(Symbol::method("App\\Hot::loop").unwrap());
        assert_eq!(
            check(&disallowed, &hot, &file),
            Exemption::Disallowed(DisallowReason::DisallowedCaller)
        );
        assert_eq!(
            check(&disallowed, &site, &file),
            Exemption::Exempt(ExemptReason::OutsideDisallowedCallers)
        );
    }
}
