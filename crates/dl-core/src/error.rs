//! Errors raised while turning log text into a report.

use thiserror::Error;

/// Errors produced by the log pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogError {
    /// A continuation line appeared before any entry in its section.
    #[error("line {line_number}: continuation line with no preceding entry: {line:?}")]
    Structural { line_number: usize, line: String },

    /// An entry could not be parsed into a record.
    #[error("malformed entry {raw:?}: {reason}")]
    MalformedEntry { raw: String, reason: String },

    /// A section title could not be read as a date.
    #[error("section title is not a recognised date: {title:?}")]
    InvalidDate { title: String },
}

impl LogError {
    pub(crate) fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}
