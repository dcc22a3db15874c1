//! A single configured disallow directive.

use std::fmt;

use crate::error::ModelError;
use crate::params::ParamConstraints;
use crate::path::PathGlob;
use crate::symbol::{Symbol, SymbolKind, SymbolPattern};
use crate::types::Severity;

/// Which call sites a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    /// Function calls.
    Function,
    /// Static and instance method calls.
    Method,
}

impl RuleKind {
    /// Returns true if call sites of `kind` are checked by rules of this kind.
    #[must_use]
    pub fn applies_to(self, kind: SymbolKind) -> bool {
        match self {
            Self::Function => kind == SymbolKind::Function,
            Self::Method => kind.is_method(),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Function => write!(f, "function"),
            Self::Method => write!(f, "method"),
        }
    }
}

/// One disallowed call directive.
///
/// Immutable once built; shared read-only for the whole analysis run.
#[derive(Debug, Clone)]
pub struct DisallowedCall {
    kind: RuleKind,
    calls: Vec<SymbolPattern>,
    excludes: Vec<SymbolPattern>,
    message: String,
    allow_in: Vec<PathGlob>,
    allow_except_in: Vec<PathGlob>,
    allow_in_callers: Vec<SymbolPattern>,
    allow_except_in_callers: Vec<SymbolPattern>,
    allow_params_in_allowed: ParamConstraints,
    allow_except_params_in_allowed: ParamConstraints,
    allow_params_anywhere: ParamConstraints,
    allow_except_params: ParamConstraints,
    error_tip: Option<String>,
    error_identifier: Option<String>,
    severity: Severity,
}

impl DisallowedCall {
    /// Starts building a rule for one call pattern.
    #[must_use]
    pub fn builder(kind: RuleKind) -> DisallowedCallBuilder {
        DisallowedCallBuilder::new(kind)
    }

    /// Returns the rule kind.
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Returns the call patterns.
    #[must_use]
    pub fn calls(&self) -> &[SymbolPattern] {
        &self.calls
    }

    /// Returns the rule name used in reports: the first call pattern.
    #[must_use]
    pub fn name(&self) -> &str {
        self.calls.first().map_or("", SymbolPattern::as_str)
    }

    /// Returns the exclusion patterns.
    #[must_use]
    pub fn excludes(&self) -> &[SymbolPattern] {
        &self.excludes
    }

    /// Returns the violation message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the paths the call is allowed in.
    #[must_use]
    pub fn allow_in(&self) -> &[PathGlob] {
        &self.allow_in
    }

    /// Returns the paths the call is disallowed in (allowed everywhere else).
    #[must_use]
    pub fn allow_except_in(&self) -> &[PathGlob] {
        &self.allow_except_in
    }

    /// Returns the callers the call is allowed in.
    #[must_use]
    pub fn allow_in_callers(&self) -> &[SymbolPattern] {
        &self.allow_in_callers
    }

    /// Returns the callers the call is disallowed in.
    #[must_use]
    pub fn allow_except_in_callers(&self) -> &[SymbolPattern] {
        &self.allow_except_in_callers
    }

    /// Values required, in allowed paths, for the exemption to hold.
    #[must_use]
    pub fn allow_params_in_allowed(&self) -> &ParamConstraints {
        &self.allow_params_in_allowed
    }

    /// Values that, in allowed paths, cancel the exemption.
    #[must_use]
    pub fn allow_except_params_in_allowed(&self) -> &ParamConstraints {
        &self.allow_except_params_in_allowed
    }

    /// Values that exempt the call anywhere.
    #[must_use]
    pub fn allow_params_anywhere(&self) -> &ParamConstraints {
        &self.allow_params_anywhere
    }

    /// Values that are always forbidden.
    #[must_use]
    pub fn allow_except_params(&self) -> &ParamConstraints {
        &self.allow_except_params
    }

    /// Returns the supplementary hint.
    #[must_use]
    pub fn error_tip(&self) -> Option<&str> {
        self.error_tip.as_deref()
    }

    /// Returns the custom error identifier.
    #[must_use]
    pub fn error_identifier(&self) -> Option<&str> {
        self.error_identifier.as_deref()
    }

    /// Returns the severity.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns the call pattern matching `symbol`, unless an exclusion also
    /// matches it.
    #[must_use]
    pub fn matching_pattern(&self, symbol: &Symbol) -> Option<&SymbolPattern> {
        let pattern = self.calls.iter().find(|p| p.matches(symbol))?;
        if self.is_excluded(symbol) {
            tracing::trace!(rule = self.name(), %symbol, "excluded");
            return None;
        }
        Some(pattern)
    }

    /// Tests whether an exclusion pattern matches `symbol`.
    #[must_use]
    pub fn is_excluded(&self, symbol: &Symbol) -> bool {
        self.excludes.iter().any(|p| p.matches(symbol))
    }
}

/// Builder for [`DisallowedCall`].
#[derive(Debug, Clone)]
pub struct DisallowedCallBuilder {
    kind: RuleKind,
    calls: Vec<SymbolPattern>,
    excludes: Vec<SymbolPattern>,
    message: String,
    allow_in: Vec<PathGlob>,
    allow_except_in: Vec<PathGlob>,
    allow_in_callers: Vec<SymbolPattern>,
    allow_except_in_callers: Vec<SymbolPattern>,
    allow_params_in_allowed: ParamConstraints,
    allow_except_params_in_allowed: ParamConstraints,
    allow_params_anywhere: ParamConstraints,
    allow_except_params: ParamConstraints,
    error_tip: Option<String>,
    error_identifier: Option<String>,
    severity: Severity,
}

impl DisallowedCallBuilder {
    fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            calls: Vec::new(),
            excludes: Vec::new(),
            message: String::new(),
            allow_in: Vec::new(),
            allow_except_in: Vec::new(),
            allow_in_callers: Vec::new(),
            allow_except_in_callers: Vec::new(),
            allow_params_in_allowed: ParamConstraints::new(),
            allow_except_params_in_allowed: ParamConstraints::new(),
            allow_params_anywhere: ParamConstraints::new(),
            allow_except_params: ParamConstraints::new(),
            error_tip: None,
            error_identifier: None,
            severity: Severity::Error,
        }
    }

    /// Adds a call pattern.
    #[must_use]
    pub fn call(mut self, pattern: SymbolPattern) -> Self {
        self.calls.push(pattern);
        self
    }

    /// Adds an exclusion pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: SymbolPattern) -> Self {
        self.excludes.push(pattern);
        self
    }

    /// Sets the violation message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Adds an allowed path glob.
    #[must_use]
    pub fn allow_in(mut self, glob: PathGlob) -> Self {
        self.allow_in.push(glob);
        self
    }

    /// Adds a disallowed path glob.
    #[must_use]
    pub fn allow_except_in(mut self, glob: PathGlob) -> Self {
        self.allow_except_in.push(glob);
        self
    }

    /// Adds an allowed caller pattern.
    #[must_use]
    pub fn allow_in_caller(mut self, pattern: SymbolPattern) -> Self {
        self.allow_in_callers.push(pattern);
        self
    }

    /// Adds a disallowed caller pattern.
    #[must_use]
    pub fn allow_except_in_caller(mut self, pattern: SymbolPattern) -> Self {
        self.allow_except_in_callers.push(pattern);
        self
    }

    /// Sets the values required for an exemption in allowed paths.
    #[must_use]
    pub fn allow_params_in_allowed(mut self, params: ParamConstraints) -> Self {
        self.allow_params_in_allowed = params;
        self
    }

    /// Sets the values that cancel an exemption in allowed paths.
    #[must_use]
    pub fn allow_except_params_in_allowed(mut self, params: ParamConstraints) -> Self {
        self.allow_except_params_in_allowed = params;
        self
    }

    /// Sets the values that exempt the call anywhere.
    #[must_use]
    pub fn allow_params_anywhere(mut self, params: ParamConstraints) -> Self {
        self.allow_params_anywhere = params;
        self
    }

    /// Sets the values that are always forbidden.
    #[must_use]
    pub fn allow_except_params(mut self, params: ParamConstraints) -> Self {
        self.allow_except_params = params;
        self
    }

    /// Sets the supplementary hint.
    #[must_use]
    pub fn error_tip(mut self, tip: impl Into<String>) -> Self {
        self.error_tip = Some(tip.into());
        self
    }

    /// Overrides the error identifier.
    #[must_use]
    pub fn error_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.error_identifier = Some(identifier.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Validates and builds the rule.
    ///
    /// # Errors
    ///
    /// Returns an error if no call pattern was given, or if a position is
    /// both required and forbidden with the same value in allowed paths.
    pub fn build(self) -> Result<DisallowedCall, ModelError> {
        if self.calls.is_empty() {
            return Err(ModelError::NoCalls);
        }
        for (position, value) in self.allow_params_in_allowed.iter() {
            if self
                .allow_except_params_in_allowed
                .get(position)
                .is_some_and(|v| v.literal_eq(value))
            {
                return Err(ModelError::ConflictingParams { position });
            }
        }
        Ok(DisallowedCall {
            kind: self.kind,
            calls: self.calls,
            excludes: self.excludes,
            message: self.message,
            allow_in: self.allow_in,
            allow_except_in: self.allow_except_in,
            allow_in_callers: self.allow_in_callers,
            allow_except_in_callers: self.allow_except_in_callers,
            allow_params_in_allowed: self.allow_params_in_allowed,
            allow_except_params_in_allowed: self.allow_except_params_in_allowed,
            allow_params_anywhere: self.allow_params_anywhere,
            allow_except_params: self.allow_except_params,
            error_tip: self.error_tip,
            error_identifier: self.error_identifier,
            severity: self.severity,
        })
    }
}
