//! Report command for printing a daily log.
//!
//! Renders the report as a terminal table followed by the total, or as
//! pretty-printed JSON.

use anyhow::Result;
use dl_core::{Report, ReportRow};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::Config;
use crate::cli::LogArgs;
use crate::commands::util::load_report;

#[derive(Tabled)]
struct TableRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Day")]
    weekday: String,
    #[tabled(rename = "Persons")]
    persons: String,
    #[tabled(rename = "Time")]
    time_range: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Hours")]
    duration: String,
    #[tabled(rename = "Total")]
    running_total: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&ReportRow> for TableRow {
    fn from(row: &ReportRow) -> Self {
        let [
            date,
            weekday,
            persons,
            time_range,
            category,
            priority,
            description,
            duration,
            running_total,
            status,
        ] = row.cells();
        Self {
            date,
            weekday,
            persons,
            time_range,
            category,
            priority,
            description,
            duration,
            running_total,
            status,
        }
    }
}

/// Formats the human-readable report output.
pub fn format_report(report: &Report) -> String {
    if report.is_empty() {
        return "No entries found in this log.\n".to_string();
    }

    let mut table = Table::new(report.rows.iter().map(TableRow::from));
    table.with(Style::modern());

    format!("{table}\nTotal: {} hours\n", report.total)
}

/// Formats the report as JSON.
pub fn format_report_json(report: &Report) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Runs the report command.
pub fn run(args: &LogArgs, config: &Config, json: bool) -> Result<()> {
    let report = load_report(args, config)?;

    if json {
        println!("{}", format_report_json(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}
