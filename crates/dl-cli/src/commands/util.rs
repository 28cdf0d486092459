//! Shared utilities for CLI commands.

use std::fs;

use anyhow::{Context, Result};
use dl_core::Report;

use crate::Config;
use crate::cli::LogArgs;

/// Reads the log named in `args` and builds its report.
pub fn load_report(args: &LogArgs, config: &Config) -> Result<Report> {
    let text = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read {}", args.file.display()))?;

    let report = Report::from_text(
        &text,
        &config.log_config(),
        args.mode(),
        args.malformed_policy(),
    )
    .with_context(|| format!("failed to build report from {}", args.file.display()))?;

    tracing::debug!(
        rows = report.rows.len(),
        skipped = report.skipped.len(),
        total = %report.total,
        "built report"
    );
    for raw in &report.skipped {
        eprintln!("Skipped malformed entry: {raw}");
    }
    Ok(report)
}
