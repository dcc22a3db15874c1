//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# disallowed configuration

[engine]
# Project root; path globs and call-site paths are relative to it.
# Relative to this file's directory.
root = "."

# Lowest severity that makes `disallowed check` exit with status 1.
fail-on = "error"

# Method rules match static and instance calls, including calls made
# through subclasses, interface implementations and trait users.
# [[disallowed-method-calls]]
# method = 'PhpOption\Option::get()'
# message = "do not unwrap options"
# allow-in = ["tests/**"]

# Function rules match plain function calls.
[[disallowed-function-calls]]
function = ["exec()", "shell_exec()", "passthru()", "system()"]
message = "use the process abstraction instead"
# allow-in = ["bin/*.php"]
# allow-except-in = ["src/web/**"]
# allow-in-callers = ['App\Console\Runner::run()']
# allow-params-anywhere = { 2 = true }
# allow-except-params = { 1 = "rm -rf /" }
# error-tip = "see docs/processes.md"
# severity = "warning"
"#;

/// Config file written by `init`.
pub const CONFIG_FILE_NAME: &str = "disallowed.toml";

/// Runs the init command.
pub fn run(project: &Path, force: bool) -> Result<()> {
    let config_path = project.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;

    println!("Created {}", config_path.display());
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE_NAME} to configure rules");
    println!("  2. Run: disallowed check calls.json");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use disallowed_core::{declarative, Config, FilePath};
    use tempfile::TempDir;

    #[test]
    fn default_config_loads() {
        let config = Config::parse(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.engine.fail_on, disallowed_core::Severity::Error);
        let rules = declarative::load_rules_from_toml(DEFAULT_CONFIG, &FilePath::new("/p").unwrap()).unwrap();
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let tmp = TempDir::new().unwrap();
        run(tmp.path(), false).unwrap();
        assert!(run(tmp.path(), false).is_err());
        assert!(run(tmp.path(), true).is_ok());
    }
}
