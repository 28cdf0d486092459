//! Classification tables and pipeline settings.

use serde::{Deserialize, Serialize};

/// Category assigned when no category rule matches.
pub const DEFAULT_CATEGORY: &str = "Tasks";

/// Priority assigned when no priority rule matches.
pub const DEFAULT_PRIORITY: &str = "Medium";

/// Category whose entries are chained but never reported.
pub const BREAK_CATEGORY: &str = "Break";

/// A keyword and the label it assigns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub keyword: String,
    pub label: String,
}

impl Rule {
    pub fn new(keyword: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            label: label.into(),
        }
    }
}

/// How durations of out-of-order entries are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NegativeDurationPolicy {
    /// Keep the negative value and log a warning.
    #[default]
    Propagate,
    /// Report zero hours instead.
    Clamp,
}

/// Everything the pipeline needs to know about the log's author and team.
///
/// Rule order is significant: the first rule whose keyword matches wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Always listed among the persons of every entry.
    pub user_name: String,

    /// Names recognised as participants when they appear in an entry.
    #[serde(default)]
    pub team_roster: Vec<String>,

    #[serde(default = "default_category_rules")]
    pub category_rules: Vec<Rule>,

    #[serde(default = "default_priority_rules")]
    pub priority_rules: Vec<Rule>,

    #[serde(default)]
    pub negative_durations: NegativeDurationPolicy,
}

impl LogConfig {
    /// Creates a configuration with the built-in rule tables and an empty roster.
    pub fn new(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            team_roster: Vec::new(),
            category_rules: default_category_rules(),
            priority_rules: default_priority_rules(),
            negative_durations: NegativeDurationPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_roster<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.team_roster = names.into_iter().map(Into::into).collect();
        self
    }
}

/// The category table used when none is configured.
pub fn default_category_rules() -> Vec<Rule> {
    [
        ("investigat", "Investigation"),
        ("meet", "Communication"),
        ("communicat", "Communication"),
        ("discus", "Discussion"),
        ("pair", "Pairing"),
        ("daily", "Daily Works"),
        ("break", BREAK_CATEGORY),
    ]
    .into_iter()
    .map(|(keyword, label)| Rule::new(keyword, label))
    .collect()
}

/// The priority table used when none is configured.
pub fn default_priority_rules() -> Vec<Rule> {
    [("ai recom", "High"), ("report", "Low"), ("break", "Low")]
        .into_iter()
        .map(|(keyword, label)| Rule::new(keyword, label))
        .collect()
}
