//! Keyword and roster based classification of entry text.
//!
//! Matching is case-insensitive substring containment, so a keyword can
//! match inside a longer word ("investigat" matches "investigation").
//! Rule tables are scanned in declared order and the first hit wins.

use std::collections::BTreeSet;
use std::fmt;

use crate::config::{DEFAULT_CATEGORY, DEFAULT_PRIORITY, LogConfig, Rule};

/// Returns the label of the first rule whose keyword occurs in `text`.
pub fn first_match<'a>(rules: &'a [Rule], text: &str) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    rules
        .iter()
        .find(|rule| haystack.contains(&rule.keyword.to_lowercase()))
        .map(|rule| rule.label.as_str())
}

/// Category of a description, falling back to [`DEFAULT_CATEGORY`].
pub fn classify_category(description: &str, config: &LogConfig) -> String {
    first_match(&config.category_rules, description)
        .unwrap_or(DEFAULT_CATEGORY)
        .to_string()
}

/// Priority of a description, falling back to [`DEFAULT_PRIORITY`].
pub fn classify_priority(description: &str, config: &LogConfig) -> String {
    first_match(&config.priority_rules, description)
        .unwrap_or(DEFAULT_PRIORITY)
        .to_string()
}

/// People involved in an entry, kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Persons(BTreeSet<String>);

impl Persons {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for Persons {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(name)?;
        }
        Ok(())
    }
}

fn is_name_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, ',' | ':' | ';' | '*' | '(' | ')' | '.')
}

/// Collects the configured user plus every roster name appearing in `raw`.
///
/// Roster names must match a token exactly, including case.
pub fn extract_participants(raw: &str, config: &LogConfig) -> Persons {
    let mut names = BTreeSet::new();
    names.insert(config.user_name.clone());
    for token in raw.split(is_name_separator).filter(|t| !t.is_empty()) {
        if config.team_roster.iter().any(|name| name == token) {
            names.insert(token.to_string());
        }
    }
    Persons(names)
}
