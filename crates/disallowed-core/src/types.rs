//! Core types for diagnostics and evaluation reports.

use miette::Diagnostic as MietteDiagnostic;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail the run.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl Severity {
    /// Parses `error`, `warning` or `info`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "error" => Some(Self::Error),
            "warning" => Some(Self::Warning),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location of a call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as reported by the analyzer.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
}

impl Location {
    /// Creates a new location.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// A finished finding for one disallowed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Error identifier (e.g., "disallowed.method").
    pub identifier: String,
    /// Name of the rule that matched: its first call pattern.
    pub rule: String,
    /// Severity of this diagnostic.
    pub severity: Severity,
    /// Where the call is.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Secondary hint, rendered separately from the message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic without a tip.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            tip: None,
        }
    }

    /// Adds a tip to this diagnostic.
    #[must_use]
    pub fn with_tip(mut self, tip: impl Into<String>) -> Self {
        self.tip = Some(tip.into());
        self
    }

    /// Returns the line number.
    #[must_use]
    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.severity,
            self.identifier,
            self.message
        )?;
        if let Some(tip) = &self.tip {
            write!(f, " (tip: {tip})")?;
        }
        Ok(())
    }
}

/// Converts a [`Diagnostic`] to a miette diagnostic for rich display.
#[derive(Debug, thiserror::Error, MietteDiagnostic)]
#[error("{message}")]
pub struct RenderedDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
}

impl From<&Diagnostic> for RenderedDiagnostic {
    fn from(d: &Diagnostic) -> Self {
        Self {
            message: format!(
                "[{}] {}:{}: {}",
                d.identifier,
                d.location.file.display(),
                d.location.line,
                d.message
            ),
            help: d.tip.clone(),
        }
    }
}

/// Result of evaluating a batch of call sites.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Report {
    /// All diagnostics, in call-site order.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of call sites evaluated.
    pub call_sites_checked: usize,
}

impl Report {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any diagnostics meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_diagnostics_at(&self, severity: Severity) -> bool {
        self.diagnostics.iter().any(|d| d.severity >= severity)
    }

    /// Counts diagnostics by severity: `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.diagnostics.iter().filter(|d| d.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats the one-line summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let (errors, warnings, infos) = self.count_by_severity();
        format!(
            "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} call site(s)",
            self.call_sites_checked
        )
    }
}
