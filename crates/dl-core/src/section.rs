//! Splitting a log file into dated sections of raw entries.

use crate::error::LogError;

/// Marker that opens a section, e.g. `# 27/Apr/22`.
pub const SECTION_MARKER: char = '#';

/// A titled block of raw entries in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSection {
    pub title: String,
    pub entries: Vec<String>,
}

impl RawSection {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
        }
    }
}

/// Whether a line opens a new entry: the text before its first colon is a number.
pub fn starts_with_time(line: &str) -> bool {
    line.split_once(':').is_some_and(|(hour, _)| {
        let hour = hour.trim();
        !hour.is_empty() && hour.chars().all(|c| c.is_ascii_digit())
    })
}

/// Groups lines into sections, folding continuation lines into the entry above.
///
/// Lines before the first section marker are ignored. A blank line is a
/// continuation like any other: it must follow an entry, and it is kept
/// only when more continuation text follows it within the same entry.
pub fn split_sections<I, S>(lines: I) -> Result<Vec<RawSection>, LogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut sections: Vec<RawSection> = Vec::new();
    // Blank lines seen since the last text of the current entry
    let mut pending_blanks: usize = 0;

    for (index, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim_end();

        if let Some(title) = line.strip_prefix(SECTION_MARKER) {
            sections.push(RawSection::new(title.trim()));
            pending_blanks = 0;
            continue;
        }

        let Some(section) = sections.last_mut() else {
            tracing::debug!(line_number = index + 1, "skipping line before first section");
            continue;
        };

        if starts_with_time(line) {
            section.entries.push(line.trim_start().to_string());
            pending_blanks = 0;
        } else if let Some(previous) = section.entries.last_mut() {
            if line.is_empty() {
                pending_blanks += 1;
                continue;
            }
            previous.push_str(&"\n".repeat(pending_blanks + 1));
            previous.push_str(line);
            pending_blanks = 0;
        } else {
            return Err(LogError::Structural {
                line_number: index + 1,
                line: line.to_string(),
            });
        }
    }

    tracing::debug!(sections = sections.len(), "split log into sections");
    Ok(sections)
}

/// Splits a whole log text into sections.
pub fn split_text(text: &str) -> Result<Vec<RawSection>, LogError> {
    split_sections(text.lines())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_lines() -> Vec<&'static str> {
        vec![
            "# 27/Apr/22\n",
            "8:00, foo",
            "8:30, bar",
            "9:00, break\n",
            "# 26/Apr/22\n",
            "8:00, daily warms up: * email * zulip * planning\n",
            "8:30, #8280 AI Recommend by email is broken: * setup up debug tools\n",
            "9:19, Wrong Ask Formatting Emails Issue: communicate with Helen\n",
            "# 25/Apr/22\n",
            "8:00, daily warms up",
            "  * email",
            "  * zulip",
            "8:30, tasks",
        ]
    }

    #[test]
    fn test_section_titles_in_file_order() {
        let sections = split_sections(sample_lines()).unwrap();
        let titles: Vec<_> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["27/Apr/22", "26/Apr/22", "25/Apr/22"]);
    }

    #[test]
    fn test_entries_per_section() {
        let sections = split_sections(sample_lines()).unwrap();
        assert_eq!(sections[0].entries, ["8:00, foo", "8:30, bar", "9:00, break"]);
        assert_eq!(
            sections[1].entries,
            [
                "8:00, daily warms up: * email * zulip * planning",
                "8:30, #8280 AI Recommend by email is broken: * setup up debug tools",
                "9:19, Wrong Ask Formatting Emails Issue: communicate with Helen",
            ]
        );
    }

    #[test]
    fn test_continuation_lines_merge() {
        let sections = split_sections(sample_lines()).unwrap();
        assert_eq!(
            sections[2].entries,
            ["8:00, daily warms up\n  * email\n  * zulip", "8:30, tasks"]
        );
    }

    #[test]
    fn test_starts_with_time() {
        assert!(starts_with_time("8:00, task"));
        assert!(starts_with_time(" 12:30, task"));
        assert!(!starts_with_time("  * task"));
        assert!(!starts_with_time("note: 8:00"));
        assert!(!starts_with_time(": nothing"));
        assert!(!starts_with_time("no colon at all"));
    }

    #[test]
    fn test_continuation_without_entry_is_structural() {
        let err = split_sections(["# 27/Apr/22", "  * orphan"]).unwrap_err();
        assert_eq!(
            err,
            LogError::Structural {
                line_number: 2,
                line: "  * orphan".to_string()
            }
        );
    }

    #[test]
    fn test_new_section_resets_entries() {
        let err = split_sections(["# 27/Apr/22", "8:00, foo", "# 26/Apr/22", "stray"]).unwrap_err();
        assert!(matches!(err, LogError::Structural { line_number: 4, .. }));
    }

    #[test]
    fn test_preamble_ignored() {
        let text = "My log\n  * not an entry\n\n# 27/Apr/22\n8:00, foo\n\n8:30, bar\r\n\n";
        let sections = split_text(text).unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].entries, ["8:00, foo", "8:30, bar"]);
    }

    #[test]
    fn test_blank_line_inside_entry_is_kept() {
        let sections = split_text("# 27/Apr/22\n8:00, a\n\n  * b\n\n\n# 26/Apr/22\n9:00, c\n").unwrap();
        assert_eq!(sections[0].entries, ["8:00, a\n\n  * b"]);
        assert_eq!(sections[1].entries, ["9:00, c"]);
    }

    #[test]
    fn test_blank_line_after_title_is_structural() {
        let err = split_text("# 27/Apr/22\n\n8:00, a\n").unwrap_err();
        assert_eq!(
            err,
            LogError::Structural {
                line_number: 2,
                line: String::new()
            }
        );
    }

    #[test]
    fn test_empty_section() {
        let sections = split_text("#27/Apr/22\n# 26/Apr/22\n8:00, foo").unwrap();
        assert_eq!(sections[0].title, "27/Apr/22");
        assert!(sections[0].entries.is_empty());
        assert_eq!(sections[1].entries.len(), 1);
    }

    #[test]
    fn test_repeated_title_kept_separate() {
        let sections = split_text("# 27/Apr/22\n8:00, foo\n# 27/Apr/22\n9:00, bar").unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[1].entries, ["9:00, bar"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_text("").unwrap().is_empty());
    }
}
