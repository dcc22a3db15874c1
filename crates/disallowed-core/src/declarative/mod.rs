//! Disallowed-call rules driven by TOML configuration.
//!
//! # Architecture
//!
//! ```text
//! TOML text
//!   ↓ serde (DTO layer)
//! config_dto types
//!   ↓ validate + convert, globs anchored at the project root
//! RuleSet (immutable, shared by the engine)
//! ```

pub mod config_dto;
pub mod loader;

use crate::path::FilePath;
use crate::ruleset::RuleSet;

/// Errors from parsing TOML and loading rules.
#[derive(Debug, thiserror::Error)]
pub enum LoadRulesError {
    /// TOML deserialization failed.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Domain model validation failed.
    #[error("{0}")]
    Load(#[from] loader::LoadError),
}

/// Parses TOML content and builds the rule set.
///
/// Returns an empty set if no rule sections are present.
///
/// # Errors
///
/// Returns an error if TOML parsing or model validation fails.
pub fn load_rules_from_toml(content: &str, paths: &FilePath) -> Result<RuleSet, LoadRulesError> {
    let dto: config_dto::RulesConfigDto = toml::from_str(content)?;
    let rules = loader::load(dto, paths)?;
    tracing::debug!("Loaded {} disallowed-call rules", rules.len());
    Ok(rules)
}
