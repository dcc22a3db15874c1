//! Subcommand implementations.

pub mod check;
pub mod init;
pub mod list_rules;
pub mod output;

use anyhow::{Context, Result};
use disallowed_core::{declarative, Config, FilePath, RuleSet};
use std::path::PathBuf;

use crate::config_resolver::ConfigSource;

/// Configuration and rules loaded for one run.
pub struct Setup {
    /// Engine configuration, with an absolute root.
    pub config: Config,
    /// Validated rules.
    pub rules: RuleSet,
}

/// Loads the configuration and its rules.
///
/// `root` overrides `[engine] root`. A relative root is resolved against the
/// current directory.
pub fn load(source: &ConfigSource, root: Option<PathBuf>) -> Result<Setup> {
    let (mut config, content) = match source {
        ConfigSource::Default => {
            tracing::warn!("No configuration file found, no rules are active");
            (Config::default(), String::new())
        }
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            let config = Config::from_file(p)
                .with_context(|| format!("Failed to load config: {}", p.display()))?;
            let content = std::fs::read_to_string(p)
                .with_context(|| format!("Failed to read config: {}", p.display()))?;
            (config, content)
        }
    };

    if let Some(root) = root {
        config.engine.root = root;
    }
    let paths = FilePath::new(&config.engine.root).context("Failed to read current directory")?;
    config.engine.root = paths.root().to_path_buf();

    let rules =
        declarative::load_rules_from_toml(&content, &paths).context("Failed to load rules")?;

    Ok(Setup { config, rules })
}
