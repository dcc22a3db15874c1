//! Locates the configuration file.
//!
//! Priority order:
//!
//! 1. `--config` flag, trusted as-is
//! 2. `disallowed.toml` or `.disallowed.toml` in the project directory or
//!    the nearest ancestor that has one
//! 3. `config.toml` in the global directory (`$DISALLOWED_CONFIG_DIR`,
//!    else `~/.disallowed/`)
//! 4. nothing found: built-in defaults, no rules

use std::fmt;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`.
    Explicit(PathBuf),
    /// Found in the project directory or one of its ancestors.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// No config found.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Returns `true` if the config came from the global directory.
    #[must_use]
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global(_))
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(p) => write!(f, "{} (--config)", p.display()),
            Self::Project(p) => write!(f, "{}", p.display()),
            Self::Global(p) => write!(f, "{} (global)", p.display()),
            Self::Default => f.write_str("built-in defaults"),
        }
    }
}

/// Project-level config file names, checked in order within one directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["disallowed.toml", ".disallowed.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    let source = resolve_inner(project_dir, explicit, global_config_dir());
    tracing::debug!("Configuration: {source}");
    source
}

/// Takes `global_dir` as a parameter so tests need not touch the environment.
fn resolve_inner(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = find_in_ancestors(project_dir) {
        return ConfigSource::Project(found);
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
        .map_or(ConfigSource::Default, ConfigSource::Global)
}

fn find_in_ancestors(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Returns the global config directory.
///
/// `$DISALLOWED_CONFIG_DIR` wins over `~/.disallowed/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("DISALLOWED_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".disallowed"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, "").unwrap();
    }

    #[test]
    fn explicit_wins_and_is_not_checked() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("disallowed.toml"));

        let result = resolve_inner(project.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(
            result,
            ConfigSource::Explicit(PathBuf::from("/nonexistent.toml"))
        );
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join("disallowed.toml"));
        touch(&project.path().join(".disallowed.toml"));

        let result = resolve_inner(project.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(project.path().join("disallowed.toml"))
        );
    }

    #[test]
    fn dot_prefix_found() {
        let project = TempDir::new().unwrap();
        touch(&project.path().join(".disallowed.toml"));

        let result = resolve_inner(project.path(), None, None);
        assert_eq!(
            result,
            ConfigSource::Project(project.path().join(".disallowed.toml"))
        );
    }

    #[test]
    fn nearest_ancestor_config_found() {
        let project = TempDir::new().unwrap();
        let nested = project.path().join("src/Controller");
        fs::create_dir_all(&nested).unwrap();
        touch(&project.path().join("disallowed.toml"));

        let result = resolve_inner(&nested, None, None);
        assert_eq!(
            result,
            ConfigSource::Project(project.path().join("disallowed.toml"))
        );
    }

    #[test]
    fn global_fallback_and_project_precedence() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        touch(&global.path().join("config.toml"));

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert!(result.is_global());
        assert_eq!(result.path(), Some(global.path().join("config.toml").as_path()));

        touch(&project.path().join("disallowed.toml"));
        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_means_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();

        let result = resolve_inner(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
        assert_eq!(result.to_string(), "built-in defaults");
    }
}
