//! Topic/note tree domain model.
//!
//! # Responsibility
//! - Define the persisted shape of the notebook (`NoteTree` -> `Topic` -> `Note`).
//! - Own timestamp formatting and the read-side fallbacks for missing fields.
//!
//! # Invariants
//! - Topic names are stored lower-cased and are unique within a tree.
//! - Topic order and note order are insertion order.
//! - A note timestamp is assigned once by the repository, never by callers.

use chrono::{DateTime, Local};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Body placeholder used when a note is created without text.
pub const DEFAULT_NOTE_TEXT: &str = "No text";
/// Read-side placeholder for notes whose timestamp went missing on disk.
pub const MISSING_TIMESTAMP: &str = "No timestamp";
/// `DD.MM.YYYY HH:MM` in chrono syntax.
pub const TIMESTAMP_FORMAT: &str = "%d.%m.%Y %H:%M";

static TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{2}\.\d{2}\.\d{4} \d{2}:\d{2}$").expect("valid timestamp regex")
});

/// Whole notebook, in the order it is persisted and returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteTree {
    #[serde(default)]
    pub topics: Vec<Topic>,
}

impl NoteTree {
    /// Creates an empty tree (root with no topics).
    pub fn new() -> Self {
        Self::default()
    }

    /// Finds a topic by its already-normalized key.
    pub fn topic(&self, key: &str) -> Option<&Topic> {
        self.topics.iter().find(|topic| topic.name == key)
    }

    /// Returns the index of a topic by its already-normalized key.
    pub fn topic_position(&self, key: &str) -> Option<usize> {
        self.topics.iter().position(|topic| topic.name == key)
    }

    /// Total note count across all topics.
    pub fn note_count(&self) -> usize {
        self.topics.iter().map(|topic| topic.notes.len()).sum()
    }
}

/// Named collection of notes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    /// Lower-cased lookup key.
    pub name: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Topic {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            notes: Vec::new(),
        }
    }
}

/// One timestamped note.
///
/// `text` and `timestamp` are optional only so that hand-edited files still
/// load; notes created through the repository always carry both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Note {
    /// Creates a note stamped with `timestamp`.
    pub fn new(title: impl Into<String>, text: impl Into<String>, timestamp: String) -> Self {
        Self {
            title: title.into(),
            text: Some(text.into()),
            timestamp: Some(timestamp),
        }
    }

    /// Projects this note into its read shape, degrading missing fields.
    pub fn view(&self) -> NoteView {
        NoteView {
            timestamp: non_blank(self.timestamp.as_deref())
                .unwrap_or(MISSING_TIMESTAMP)
                .to_string(),
            title: self.title.clone(),
            text: non_blank(self.text.as_deref())
                .unwrap_or(DEFAULT_NOTE_TEXT)
                .to_string(),
        }
    }
}

/// Read model returned by `get_notes`, in `(timestamp, title, text)` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteView {
    pub timestamp: String,
    pub title: String,
    pub text: String,
}

impl NoteView {
    /// Flattens into the triple carried over the wire.
    pub fn into_tuple(self) -> (String, String, String) {
        (self.timestamp, self.title, self.text)
    }
}

/// Formats `at` as `DD.MM.YYYY HH:MM`.
pub fn format_timestamp(at: DateTime<Local>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Current local time as a note timestamp.
pub fn current_timestamp() -> String {
    format_timestamp(Local::now())
}

/// Returns whether `value` has the `DD.MM.YYYY HH:MM` shape.
pub fn is_well_formed_timestamp(value: &str) -> bool {
    TIMESTAMP_RE.is_match(value)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::{
        format_timestamp, is_well_formed_timestamp, Note, NoteTree, Topic, DEFAULT_NOTE_TEXT,
        MISSING_TIMESTAMP,
    };
    use chrono::{Local, TimeZone};

    #[test]
    fn format_timestamp_uses_day_month_year_order() {
        let at = Local
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 0)
            .single()
            .expect("unambiguous local time");
        assert_eq!(format_timestamp(at), "07.03.2024 09:05");
    }

    #[test]
    fn well_formed_timestamp_rejects_other_shapes() {
        assert!(is_well_formed_timestamp("31.12.2023 23:59"));
        assert!(!is_well_formed_timestamp("2023-12-31 23:59"));
        assert!(!is_well_formed_timestamp("31.12.2023"));
        assert!(!is_well_formed_timestamp(""));
    }

    #[test]
    fn view_degrades_missing_fields() {
        let note = Note {
            title: "bare".to_string(),
            text: None,
            timestamp: Some("   ".to_string()),
        };
        let view = note.view();
        assert_eq!(view.text, DEFAULT_NOTE_TEXT);
        assert_eq!(view.timestamp, MISSING_TIMESTAMP);
    }

    #[test]
    fn view_trims_stored_text() {
        let note = Note::new("t", "  body\n", "01.01.2024 00:00".to_string());
        assert_eq!(note.view().text, "body");
    }

    #[test]
    fn tree_deserializes_notes_without_optional_fields() {
        let raw = r#"{"topics":[{"name":"cats","notes":[{"title":"a"}]}]}"#;
        let tree: NoteTree = serde_json::from_str(raw).expect("partial tree should parse");
        let topic = tree.topic("cats").expect("topic should exist");
        assert_eq!(topic.notes[0].text, None);
        assert_eq!(topic.notes[0].timestamp, None);
        assert_eq!(tree.note_count(), 1);
    }

    #[test]
    fn topic_lookup_is_exact_on_normalized_key() {
        let tree = NoteTree {
            topics: vec![Topic::new("cats")],
        };
        assert!(tree.topic("cats").is_some());
        assert!(tree.topic("Cats").is_none());
        assert_eq!(tree.topic_position("cats"), Some(0));
    }
}
