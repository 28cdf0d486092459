//! Core domain logic for the daily log reporter.
//!
//! This crate turns the text of a daily activity log into a timed report:
//! - Sections: splitting the file into dated blocks of raw entries
//! - Entries: parsing `H:MM, description[, persons]` records
//! - Classification: ordered keyword rules for category and priority
//! - Aggregation: end-time chaining, durations and running totals

mod aggregate;
pub mod classify;
mod config;
pub mod entry;
mod error;
mod report;
pub mod section;

pub use aggregate::{AggregatedEntry, Hours, SectionAggregate, aggregate_section};
pub use classify::Persons;
pub use config::{
    BREAK_CATEGORY, DEFAULT_CATEGORY, DEFAULT_PRIORITY, LogConfig, NegativeDurationPolicy, Rule,
    default_category_rules, default_priority_rules,
};
pub use entry::{LogEntry, parse_entry};
pub use error::LogError;
pub use report::{MalformedPolicy, Report, ReportMode, ReportRow};
pub use section::{RawSection, split_sections, split_text};
