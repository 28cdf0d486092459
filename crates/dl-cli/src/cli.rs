//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use dl_core::{MalformedPolicy, ReportMode};

/// Daily activity log reporter.
///
/// Reads a plain-text daily log, classifies each entry and accounts the
/// time spent between entries.
#[derive(Debug, Parser)]
#[command(name = "dl", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print the report as a table or JSON.
    Report {
        #[command(flatten)]
        log: LogArgs,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write the report to an Excel spreadsheet.
    Export {
        #[command(flatten)]
        log: LogArgs,

        /// Spreadsheet to write.
        #[arg(short, long, default_value = "output.xlsx")]
        output: PathBuf,
    },

    /// Export the report and mail it as an attachment.
    Email {
        #[command(flatten)]
        log: LogArgs,

        /// Spreadsheet to write and attach.
        #[arg(short, long, default_value = "output.xlsx")]
        output: PathBuf,

        /// Send without asking for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Which log to read and how much of it to report.
#[derive(Debug, Args)]
pub struct LogArgs {
    /// The daily log file.
    pub file: PathBuf,

    /// Report every section instead of only the first one.
    #[arg(long)]
    pub full: bool,

    /// Leave out entries that cannot be parsed instead of failing.
    #[arg(long)]
    pub skip_malformed: bool,
}

impl LogArgs {
    pub const fn mode(&self) -> ReportMode {
        if self.full {
            ReportMode::Full
        } else {
            ReportMode::Daily
        }
    }

    pub const fn malformed_policy(&self) -> MalformedPolicy {
        if self.skip_malformed {
            MalformedPolicy::Skip
        } else {
            MalformedPolicy::Abort
        }
    }
}
