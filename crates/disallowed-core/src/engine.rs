//! Evaluates call sites against a rule set.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, trace};

use crate::alias::{alias_note, candidates};
use crate::allowed::{Allowed, Exemption};
use crate::call_site::CallSite;
use crate::config::Config;
use crate::path::FilePath;
use crate::rule_errors::{MatchResult, RuleErrors};
use crate::ruleset::RuleSet;
use crate::types::{Diagnostic, Report};

/// Errors building an [`Engine`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// The working directory could not be determined for a relative root.
    #[error("cannot resolve project root: {0}")]
    Io(#[from] std::io::Error),
}

/// Builder for configuring an [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    root: Option<PathBuf>,
    rule_set: Option<Arc<RuleSet>>,
    config: Option<Config>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the project root call-site paths are resolved against.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the rules.
    #[must_use]
    pub fn rule_set(mut self, rule_set: impl Into<Arc<RuleSet>>) -> Self {
        self.rule_set = Some(rule_set.into());
        self
    }

    /// Sets the engine configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the engine.
    ///
    /// The root is taken from [`EngineBuilder::root`], then the config, then
    /// defaults to `.`. A relative root is anchored by [`FilePath::new`], the
    /// same way rules loaded with a relative root are.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read.
    pub fn build(self) -> Result<Engine, EngineError> {
        let root = self
            .root
            .or_else(|| self.config.as_ref().map(|c| c.engine.root.clone()))
            .unwrap_or_else(|| PathBuf::from("."));

        let paths = FilePath::new(&root)?;
        Ok(Engine {
            allowed: Allowed::new(paths.clone()),
            paths,
            rule_set: self.rule_set.unwrap_or_default(),
            config: self.config.unwrap_or_default(),
        })
    }
}

/// The policy engine.
///
/// Immutable once built; evaluations share no mutable state, so one engine
/// can serve any number of threads.
///
/// Use [`Engine::builder()`] to construct an instance.
#[derive(Debug, Clone)]
pub struct Engine {
    paths: FilePath,
    allowed: Allowed,
    rule_set: Arc<RuleSet>,
    config: Config,
}

impl Engine {
    /// Creates a new builder for configuring an engine.
    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.paths.root()
    }

    /// Returns the rules.
    #[must_use]
    pub fn rule_set(&self) -> &RuleSet {
        &self.rule_set
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Evaluates one call site.
    ///
    /// Every rule is tried against the candidate declared symbols in order
    /// and reports at most once, for the first candidate it matches.
    #[must_use]
    pub fn evaluate(&self, call: &CallSite) -> Vec<Diagnostic> {
        let mut reported = vec![false; self.rule_set.len()];
        let mut diagnostics = Vec::new();

        for declared in candidates(call) {
            for found in self.rule_set.matches_for(call.kind(), declared) {
                if reported[found.index] {
                    continue;
                }
                reported[found.index] = true;

                let outcome = self.allowed.check(found.rule, call);
                debug!(
                    rule = found.rule.name(),
                    symbol = %declared,
                    line = call.line(),
                    ?outcome,
                    "matched"
                );
                if let Exemption::Exempt(_) = outcome {
                    continue;
                }

                let result = MatchResult {
                    rule: found.rule,
                    pattern: found.pattern,
                    call_site: call,
                    declared,
                    alias_note: alias_note(call.invoked(), declared),
                };
                diagnostics.push(RuleErrors::build(&result));
            }
        }

        if diagnostics.is_empty() {
            trace!(symbol = %call.invoked(), "no diagnostics");
        }
        diagnostics
    }

    /// Evaluates call sites in order and collects the diagnostics.
    #[must_use]
    pub fn evaluate_all(&self, calls: &[CallSite]) -> Report {
        info!("Evaluating {} call sites against {} rules", calls.len(), self.rule_set.len());

        let mut report = Report::new();
        for call in calls {
            report.diagnostics.extend(self.evaluate(call));
            report.call_sites_checked += 1;
        }

        info!(
            "Evaluation complete: {} diagnostics in {} call sites",
            report.diagnostics.len(),
            report.call_sites_checked
        );
        report
    }
}
