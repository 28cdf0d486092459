//! Chaining parsed entries into timed rows.
//!
//! Each entry ends where the next entry of its section starts, in document
//! order. Breaks take part in the chaining and are dropped afterwards, and
//! the running total is threaded through explicitly so that several
//! sections can share one total.

use std::fmt;
use std::ops::{Add, AddAssign};

use chrono::NaiveTime;
use serde::{Serialize, Serializer};

use crate::config::{BREAK_CATEGORY, NegativeDurationPolicy};
use crate::entry::LogEntry;

const SECONDS_PER_HUNDREDTH: i64 = 36;

/// A number of hours with two decimals, stored as hundredths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Hours(i64);

impl Hours {
    pub const ZERO: Self = Self(0);

    /// Rounds a number of seconds to hundredths of an hour, half away from zero.
    pub const fn from_seconds(seconds: i64) -> Self {
        let whole = seconds / SECONDS_PER_HUNDREDTH;
        let rest = seconds % SECONDS_PER_HUNDREDTH;
        if rest.abs() * 2 >= SECONDS_PER_HUNDREDTH {
            Self(whole + rest.signum())
        } else {
            Self(whole)
        }
    }

    pub const fn from_hundredths(hundredths: i64) -> Self {
        Self(hundredths)
    }

    /// Elapsed hours from `start` to `end`; negative when `end` is earlier.
    pub fn between(start: NaiveTime, end: NaiveTime) -> Self {
        Self::from_seconds(end.signed_duration_since(start).num_seconds())
    }

    pub const fn hundredths(self) -> i64 {
        self.0
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Add for Hours {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Hours {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl fmt::Display for Hours {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_f64())
    }
}

impl Serialize for Hours {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

/// A parsed entry with its end time, duration and the total so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedEntry {
    pub entry: LogEntry,
    /// Start of the next entry in the section; `None` for the last one.
    pub end_time: Option<NaiveTime>,
    pub duration: Hours,
    /// Sum of durations of every row emitted so far, this one included.
    pub running_total: Hours,
}

impl AggregatedEntry {
    /// Renders `H:MM - H:MM`, or `H:MM - ?` while the end is unknown.
    pub fn time_range(&self) -> String {
        let start = format_clock(self.entry.start_time);
        match self.end_time {
            Some(end) => format!("{start} - {}", format_clock(end)),
            None => format!("{start} - ?"),
        }
    }
}

fn format_clock(time: NaiveTime) -> String {
    time.format("%-H:%M").to_string()
}

/// Rows kept from one section and the running total after them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionAggregate {
    pub rows: Vec<AggregatedEntry>,
    pub total: Hours,
}

/// Chains one section's entries, drops breaks and accumulates durations.
///
/// `carried` is the running total reached by earlier sections of the same
/// report; pass [`Hours::ZERO`] to start fresh.
pub fn aggregate_section(
    entries: Vec<LogEntry>,
    carried: Hours,
    policy: NegativeDurationPolicy,
) -> SectionAggregate {
    let end_times: Vec<Option<NaiveTime>> = entries
        .iter()
        .skip(1)
        .map(|next| Some(next.start_time))
        .chain([None])
        .collect();

    let mut total = carried;
    let mut rows = Vec::with_capacity(entries.len());

    for (entry, end_time) in entries.into_iter().zip(end_times) {
        if entry.category == BREAK_CATEGORY {
            continue;
        }

        let duration = end_time.map_or(Hours::ZERO, |end| {
            entry_duration(&entry, end, policy)
        });
        total += duration;

        rows.push(AggregatedEntry {
            entry,
            end_time,
            duration,
            running_total: total,
        });
    }

    SectionAggregate { rows, total }
}

fn entry_duration(entry: &LogEntry, end: NaiveTime, policy: NegativeDurationPolicy) -> Hours {
    let duration = Hours::between(entry.start_time, end);
    if !duration.is_negative() {
        return duration;
    }

    tracing::warn!(
        date = %entry.date,
        start = %entry.start_time,
        end = %end,
        ?policy,
        "entry ends before it starts; log is out of order"
    );
    match policy {
        NegativeDurationPolicy::Propagate => duration,
        NegativeDurationPolicy::Clamp => Hours::ZERO,
    }
}
