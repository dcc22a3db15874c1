//! Check command implementation.

use anyhow::{Context, Result};
use disallowed_core::{parse_call_sites, CallSite, Engine, Severity};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    source: &ConfigSource,
    calls: Option<&Path>,
    format: OutputFormat,
    root: Option<PathBuf>,
    fail_on: Option<Severity>,
) -> Result<()> {
    let setup = super::load(source, root)?;
    let fail_on = fail_on.unwrap_or(setup.config.engine.fail_on);

    let engine = Engine::builder()
        .config(setup.config)
        .rule_set(setup.rules)
        .build()
        .context("Failed to build engine")?;

    let call_sites = read_call_sites(calls)?;

    tracing::info!(
        "Checking {} call sites under {} with {} rules",
        call_sites.len(),
        engine.root().display(),
        engine.rule_set().len()
    );

    let report = engine.evaluate_all(&call_sites);

    super::output::print(&report, format)?;

    if report.has_diagnostics_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn read_call_sites(calls: Option<&Path>) -> Result<Vec<CallSite>> {
    let content = match calls {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read call sites: {}", path.display()))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read call sites from stdin")?;
            buf
        }
    };
    parse_call_sites(&content).context("Failed to parse call sites")
}
