//! disallowed CLI tool.
//!
//! Usage:
//! ```bash
//! disallowed check [OPTIONS] [CALLS]
//! disallowed list-rules
//! disallowed init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Reports calls to disallowed functions and methods
#[derive(Parser)]
#[command(name = "disallowed")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project directory searched for a configuration file
    #[arg(short, long, global = true, default_value = ".")]
    project: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate resolved call sites against the configured rules
    Check {
        /// JSON call-site file (array or JSON lines); reads stdin if omitted or `-`
        calls: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Project root overriding `[engine] root`
        #[arg(long)]
        root: Option<PathBuf>,

        /// Lowest severity that fails the run, overriding `[engine] fail-on`
        #[arg(long)]
        fail_on: Option<FailOn>,
    },

    /// List configured rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for diagnostics.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-diagnostic compact format.
    Compact,
    /// Rich terminal rendering.
    Fancy,
}

/// Severity threshold accepted on the command line.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum FailOn {
    /// Fail on any diagnostic.
    Info,
    /// Fail on warnings and errors.
    Warning,
    /// Fail on errors only.
    Error,
}

impl From<FailOn> for disallowed_core::Severity {
    fn from(value: FailOn) -> Self {
        match value {
            FailOn::Info => Self::Info,
            FailOn::Warning => Self::Warning,
            FailOn::Error => Self::Error,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let project = if cli.project.is_absolute() {
        cli.project
    } else {
        std::env::current_dir()?.join(&cli.project)
    };
    let source = config_resolver::resolve(&project, cli.config.as_deref());

    match cli.command {
        Commands::Check {
            calls,
            format,
            root,
            fail_on,
        } => commands::check::run(
            &source,
            calls.as_deref(),
            format,
            root,
            fail_on.map(Into::into),
        ),
        Commands::ListRules => commands::list_rules::run(&source),
        Commands::Init { force } => commands::init::run(&project, force),
    }
}
