//! Engine-level configuration (`[engine]` table).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::types::Severity;

/// Top-level configuration.
///
/// Lives in the same TOML file as the rule sections, which are read
/// separately by [`crate::declarative`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Engine configuration.
    #[serde(default)]
    pub engine: EngineConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// A relative `root` is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut config = Self::parse(&content)?;
        if config.engine.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.engine.root = dir.join(&config.engine.root);
            }
        }
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Engine-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct EngineConfig {
    /// Project root that path globs and call-site paths are anchored at.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Lowest severity that fails a run (default: error).
    #[serde(default)]
    pub fail_on: Severity,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            fail_on: Severity::Error,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
