//! Shared output formatting for evaluation reports.

use anyhow::Result;
use disallowed_core::{Diagnostic, RenderedDiagnostic, Report, Severity};
use serde::Serialize;

use crate::OutputFormat;

/// Print a report in the specified format.
pub fn print(report: &Report, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(report),
        OutputFormat::Json => return print_json(report),
        OutputFormat::Compact => print_compact(report),
        OutputFormat::Fancy => print_fancy(report),
    }
    Ok(())
}

fn print_text(report: &Report) {
    let (errors, warnings, _) = report.count_by_severity();

    for diagnostic in &report.diagnostics {
        let severity_indicator = match diagnostic.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        println!(
            "{} at {}:{}",
            diagnostic.identifier,
            diagnostic.location.file.display(),
            diagnostic.location.line,
        );
        println!("  {}: {}", severity_indicator, diagnostic.message);
        if let Some(tip) = &diagnostic.tip {
            println!("  = tip: {tip}");
        }
        println!();
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{summary_color}{}\x1b[0m", report.summary());
}

#[derive(Serialize)]
struct JsonReport<'a> {
    diagnostics: &'a [Diagnostic],
    call_sites_checked: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
}

fn json(report: &Report) -> Result<String> {
    let (errors, warnings, infos) = report.count_by_severity();
    let out = JsonReport {
        diagnostics: &report.diagnostics,
        call_sites_checked: report.call_sites_checked,
        errors,
        warnings,
        infos,
    };
    Ok(serde_json::to_string_pretty(&out)?)
}

fn print_json(report: &Report) -> Result<()> {
    println!("{}", json(report)?);
    Ok(())
}

fn print_compact(report: &Report) {
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
}

fn print_fancy(report: &Report) {
    for diagnostic in &report.diagnostics {
        let rendered = miette::Report::new(RenderedDiagnostic::from(diagnostic));
        println!("{rendered:?}");
    }
    println!("{}", report.summary());
}
