//! The report handed to renderers, exporters and the mailer.

use serde::Serialize;

use crate::aggregate::{AggregatedEntry, Hours, aggregate_section};
use crate::config::LogConfig;
use crate::entry::{LogEntry, parse_entry};
use crate::error::LogError;
use crate::section::{RawSection, split_text};

/// Which sections of the log go into a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportMode {
    /// Only the first section of the file, normally the latest day.
    #[default]
    Daily,
    /// Every section, in file order, sharing one running total.
    Full,
}

/// What to do with an entry that cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Fail the whole report.
    #[default]
    Abort,
    /// Leave the entry out and remember its raw text.
    Skip,
}

/// One rendered line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub date: String,
    pub weekday: String,
    pub persons: String,
    pub time_range: String,
    pub category: String,
    pub priority: String,
    pub description: String,
    pub duration: Hours,
    pub running_total: Hours,
    pub status: &'static str,
}

impl ReportRow {
    /// Cell texts in [`Report::HEADERS`] order.
    pub fn cells(&self) -> [String; 10] {
        [
            self.date.clone(),
            self.weekday.clone(),
            self.persons.clone(),
            self.time_range.clone(),
            self.category.clone(),
            self.priority.clone(),
            self.description.clone(),
            self.duration.to_string(),
            self.running_total.to_string(),
            self.status.to_string(),
        ]
    }
}

impl From<&AggregatedEntry> for ReportRow {
    fn from(row: &AggregatedEntry) -> Self {
        let entry = &row.entry;
        Self {
            date: entry.date.clone(),
            weekday: entry.weekday.clone(),
            persons: entry.persons.to_string(),
            time_range: row.time_range(),
            category: entry.category.clone(),
            priority: entry.priority.clone(),
            description: entry.description.clone(),
            duration: row.duration,
            running_total: row.running_total,
            status: entry.status,
        }
    }
}

/// Timed, classified rows of one or more sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// Running total after the last row.
    pub total: Hours,
    /// Raw text of entries left out under [`MalformedPolicy::Skip`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl Report {
    /// Column headers, in the order of [`ReportRow::cells`].
    pub const HEADERS: [&'static str; 10] = [
        "Date",
        "Day",
        "Persons",
        "Time",
        "Category",
        "Priority",
        "Description",
        "Hours",
        "Total",
        "Status",
    ];

    /// Builds a report from already split sections.
    pub fn build(
        sections: &[RawSection],
        config: &LogConfig,
        mode: ReportMode,
        on_malformed: MalformedPolicy,
    ) -> Result<Self, LogError> {
        let selected = match mode {
            ReportMode::Daily => &sections[..sections.len().min(1)],
            ReportMode::Full => sections,
        };

        let mut report = Self::default();
        for section in selected {
            let entries = parse_section(section, config, on_malformed, &mut report.skipped)?;
            let aggregate = aggregate_section(entries, report.total, config.negative_durations);
            report.rows.extend(aggregate.rows.iter().map(ReportRow::from));
            report.total = aggregate.total;
            tracing::debug!(
                section = %section.title,
                rows = aggregate.rows.len(),
                total = %report.total,
                "aggregated section"
            );
        }
        Ok(report)
    }

    /// Splits `text` into sections and builds a report from them.
    pub fn from_text(
        text: &str,
        config: &LogConfig,
        mode: ReportMode,
        on_malformed: MalformedPolicy,
    ) -> Result<Self, LogError> {
        let sections = split_text(text)?;
        Self::build(&sections, config, mode, on_malformed)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mail subject naming the day of the first row, e.g.
    /// `Flash's Daily Task Log for Sun 8/May/22`.
    pub fn email_subject(&self, user_name: &str) -> Option<String> {
        self.rows.first().map(|row| {
            format!(
                "{user_name}'s Daily Task Log for {} {}",
                row.weekday, row.date
            )
        })
    }
}

fn parse_section(
    section: &RawSection,
    config: &LogConfig,
    on_malformed: MalformedPolicy,
    skipped: &mut Vec<String>,
) -> Result<Vec<LogEntry>, LogError> {
    let mut entries = Vec::with_capacity(section.entries.len());
    for raw in &section.entries {
        match parse_entry(raw, &section.title, config) {
            Ok(entry) => entries.push(entry),
            Err(LogError::MalformedEntry { raw, reason }) if on_malformed == MalformedPolicy::Skip => {
                tracing::warn!(section = %section.title, %raw, %reason, "skipping malformed entry");
                skipped.push(raw);
            }
            Err(err) => return Err(err),
        }
    }
    Ok(entries)
}
