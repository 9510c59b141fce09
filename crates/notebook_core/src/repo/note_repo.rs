//! In-memory note repository backed by a whole-file store.
//!
//! # Responsibility
//! - Own the loaded `NoteTree` and apply add/lookup use-cases to it.
//! - Persist the full tree after every successful mutation.
//!
//! # Invariants
//! - Topic keys are normalized to lowercase before matching or storage.
//! - New topics and notes are appended; existing order never changes.
//! - A mutation whose save fails is rolled back before the error returns.

use crate::model::note::{current_timestamp, Note, NoteTree, NoteView, Topic, DEFAULT_NOTE_TEXT};
use crate::store::{FileStore, StoreResult};
use log::{error, info};

/// Outcome of a successful `add_note`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedNote {
    /// Normalized topic key the note was filed under.
    pub topic: String,
    /// Whether this call created the topic.
    pub created_topic: bool,
    /// Stored note, including URL prefix and timestamp.
    pub note: Note,
}

impl AddedNote {
    /// Human-readable confirmation embedding stored text and topic.
    pub fn confirmation(&self) -> String {
        let text = self.note.text.as_deref().unwrap_or(DEFAULT_NOTE_TEXT);
        format!("Note '{text}' added to topic '{}'.", self.topic)
    }
}

/// Tagged read result for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesLookup {
    /// Notes in insertion order.
    Notes(Vec<NoteView>),
    /// No topic with this key exists.
    TopicNotFound { topic: String },
    /// Topic exists but holds no notes.
    Empty { topic: String },
}

/// Repository over one notebook tree and its backing file.
pub struct NoteRepository {
    store: FileStore,
    tree: NoteTree,
}

impl NoteRepository {
    /// Loads the tree from `store`, recovering to an empty tree when needed.
    pub fn open(mut store: FileStore) -> StoreResult<Self> {
        let tree = store.load()?;
        Ok(Self { store, tree })
    }

    /// Files a note under `topic`, creating the topic on first use.
    ///
    /// Empty `text` becomes the placeholder; a `source_url` is prepended to
    /// the text followed by a newline.
    ///
    /// # Errors
    /// - Returns the store error when persistence fails; the tree is left as
    ///   it was before the call.
    pub fn add_note(
        &mut self,
        topic: &str,
        title: &str,
        text: &str,
        source_url: Option<&str>,
    ) -> StoreResult<AddedNote> {
        let key = normalize_topic(topic);
        let body = compose_text(text, source_url);

        let (index, created_topic) = match self.tree.topic_position(&key) {
            Some(index) => (index, false),
            None => {
                self.tree.topics.push(Topic::new(key.clone()));
                (self.tree.topics.len() - 1, true)
            }
        };

        let note = Note::new(title, body, current_timestamp());
        self.tree.topics[index].notes.push(note.clone());

        if let Err(err) = self.store.save(&self.tree) {
            self.rollback_add(index, created_topic);
            error!(
                "event=note_add module=repo status=error error_code=persist_failed topic={} error={}",
                key, err
            );
            return Err(err);
        }

        info!(
            "event=note_add module=repo status=ok topic={} created_topic={}",
            key, created_topic
        );
        Ok(AddedNote {
            topic: key,
            created_topic,
            note,
        })
    }

    /// Returns all notes for `topic` in insertion order.
    pub fn get_notes(&self, topic: &str) -> NotesLookup {
        let key = normalize_topic(topic);
        match self.tree.topic(&key) {
            None => {
                info!("event=notes_get module=repo status=not_found topic={key}");
                NotesLookup::TopicNotFound { topic: key }
            }
            Some(found) if found.notes.is_empty() => {
                info!("event=notes_get module=repo status=empty topic={key}");
                NotesLookup::Empty { topic: key }
            }
            Some(found) => {
                info!(
                    "event=notes_get module=repo status=ok topic={} notes={}",
                    key,
                    found.notes.len()
                );
                NotesLookup::Notes(found.notes.iter().map(Note::view).collect())
            }
        }
    }

    /// Topic keys in insertion order.
    pub fn topic_names(&self) -> Vec<String> {
        self.tree.topics.iter().map(|topic| topic.name.clone()).collect()
    }

    /// Read-only view of the loaded tree.
    pub fn tree(&self) -> &NoteTree {
        &self.tree
    }

    /// Writes the current tree once more; used at shutdown.
    pub fn flush(&self) -> StoreResult<()> {
        self.store.save(&self.tree)
    }

    fn rollback_add(&mut self, index: usize, created_topic: bool) {
        if created_topic {
            self.tree.topics.remove(index);
        } else {
            self.tree.topics[index].notes.pop();
        }
    }
}

/// Normalizes a topic name into its storage key.
pub fn normalize_topic(topic: &str) -> String {
    topic.to_lowercase()
}

fn compose_text(text: &str, source_url: Option<&str>) -> String {
    let body = if text.is_empty() { DEFAULT_NOTE_TEXT } else { text };
    match source_url {
        Some(url) => format!("{url}\n{body}"),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::{compose_text, normalize_topic};

    #[test]
    fn compose_text_defaults_empty_body() {
        assert_eq!(compose_text("", None), "No text");
    }

    #[test]
    fn compose_text_prefixes_source_url() {
        assert_eq!(
            compose_text("summary", Some("https://example.org/?curid=1")),
            "https://example.org/?curid=1\nsummary"
        );
        assert_eq!(
            compose_text("", Some("https://example.org/?curid=1")),
            "https://example.org/?curid=1\nNo text"
        );
    }

    #[test]
    fn normalize_topic_lowercases_unicode() {
        assert_eq!(normalize_topic("ÄPFEL Cats"), "äpfel cats");
    }
}
