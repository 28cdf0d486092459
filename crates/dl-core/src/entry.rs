//! Parsing of a single log entry.
//!
//! An entry reads `H:MM, description[, persons]`. The description may
//! carry a `main: * detail * detail` summary that is laid out as a
//! one-line summary followed by indented bullets.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

use crate::classify::{Persons, classify_category, classify_priority, extract_participants};
use crate::config::LogConfig;
use crate::error::LogError;

/// Status given to every parsed entry.
pub const STATUS_DONE: &str = "DONE";

/// Date layouts accepted in section titles, tried in order.
const DATE_FORMATS: [&str; 4] = ["%d/%b/%y", "%d/%b/%Y", "%Y-%m-%d", "%d/%m/%Y"];

static START_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").unwrap());

/// A parsed entry, before end times and durations are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Title of the owning section.
    pub date: String,
    /// Abbreviated weekday of `date`, e.g. "Mon".
    pub weekday: String,
    pub start_time: NaiveTime,
    pub description: String,
    pub persons: Persons,
    pub category: String,
    pub priority: String,
    pub status: &'static str,
}

/// Parses one raw (possibly multi-line) entry belonging to the section `date`.
pub fn parse_entry(raw: &str, date: &str, config: &LogConfig) -> Result<LogEntry, LogError> {
    let fields: Vec<&str> = raw.split(',').collect();
    let (time_field, description) = match fields.as_slice() {
        [time, description] | [time, description, _] => (*time, *description),
        _ => {
            return Err(LogError::malformed(
                raw,
                format!("expected 2 or 3 comma-separated fields, found {}", fields.len()),
            ));
        }
    };

    let start_time = parse_start_time(time_field).ok_or_else(|| {
        LogError::malformed(raw, format!("invalid start time {:?}", time_field.trim()))
    })?;
    let weekday = section_weekday(date)?;
    let description = format_description(description);

    Ok(LogEntry {
        date: date.to_string(),
        weekday,
        start_time,
        persons: extract_participants(raw, config),
        category: classify_category(&description, config),
        priority: classify_priority(&description, config),
        description,
        status: STATUS_DONE,
    })
}

/// Parses `H:MM` or `HH:MM` on a 24-hour clock.
pub fn parse_start_time(field: &str) -> Option<NaiveTime> {
    let caps = START_TIME_RE.captures(field.trim())?;
    let hour = caps[1].parse().ok()?;
    let minute = caps[2].parse().ok()?;
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// Reads a section title as a calendar date.
pub fn parse_section_date(title: &str) -> Result<NaiveDate, LogError> {
    let title = title.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(title, format).ok())
        .ok_or_else(|| LogError::InvalidDate {
            title: title.to_string(),
        })
}

/// Abbreviated weekday name of a section title, e.g. "Wed" for "27/Apr/22".
pub fn section_weekday(title: &str) -> Result<String, LogError> {
    Ok(parse_section_date(title)?.format("%a").to_string())
}

/// Lays out `main: * a * b` as `main` followed by indented bullet lines.
///
/// Descriptions without a colon are only trimmed.
pub fn format_description(description: &str) -> String {
    let description = description.trim();
    let Some((main, detail)) = description.split_once(':') else {
        return description.to_string();
    };

    let mut formatted = main.trim().to_string();
    for item in detail.split('*').map(str::trim).filter(|item| !item.is_empty()) {
        formatted.push_str("\n  * ");
        formatted.push_str(item);
    }
    formatted
}
