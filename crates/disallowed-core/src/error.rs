//! Errors raised while building rules from configuration.
//!
//! Every error here is reported before the first call site is evaluated;
//! evaluation itself cannot fail.

use crate::symbol::{PatternError, SymbolError};

/// Errors in domain model construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A symbol pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A symbol name failed to parse.
    #[error(transparent)]
    Symbol(#[from] SymbolError),

    /// Path glob is empty.
    #[error("path glob must not be empty")]
    EmptyGlob,

    /// Path glob has invalid syntax.
    #[error("invalid path glob `{pattern}`: {reason}")]
    InvalidGlob {
        /// The invalid pattern.
        pattern: String,
        /// Why it's invalid.
        reason: String,
    },

    /// A rule has no call pattern at all.
    #[error("rule must name at least one function or method")]
    NoCalls,

    /// Both `function` and `method` were given.
    #[error("exactly one of `function` or `method` must be set")]
    AmbiguousCallKey,

    /// Parameter positions are 1-based integers.
    #[error("invalid parameter position `{position}`: expected an integer >= 1")]
    InvalidParamPosition {
        /// The rejected key.
        position: String,
    },

    /// Parameter values must be scalar literals.
    #[error("parameter {position}: unsupported value `{value}`, expected a string, integer, float or boolean")]
    UnsupportedParamValue {
        /// 1-based position.
        position: usize,
        /// The rejected value, rendered.
        value: String,
    },

    /// The same position is both required and forbidden with the same value.
    #[error("parameter {position} is both allowed and forbidden with the same value")]
    ConflictingParams {
        /// 1-based position.
        position: usize,
    },
}
