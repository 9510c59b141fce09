//! Notebook request facade.
//!
//! # Responsibility
//! - Expose the three request use-cases: add, get, fetch-and-cache.
//! - Validate request input before touching the repository.
//! - Serialize all tree access behind one exclusion boundary.
//!
//! # Invariants
//! - `read tree -> mutate -> persist` runs under a single lock acquisition.
//! - The external lookup runs outside the lock; only its write is locked.
//! - Fetch-and-cache writes a note only on a lookup hit.

use crate::lookup::{Article, LookupError, LookupGateway, LookupOutcome};
use crate::model::note::DEFAULT_NOTE_TEXT;
use crate::repo::note_repo::{AddedNote, NoteRepository, NotesLookup};
use crate::store::{FileStore, StoreError, StoreResult};
use log::{error, info, warn};
use parking_lot::Mutex;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type NotebookResult<T> = Result<T, NotebookError>;

/// Service error for notebook use-cases.
#[derive(Debug)]
pub enum NotebookError {
    /// Required request field was empty.
    Validation { field: &'static str },
    /// Persistence-layer failure; the in-memory tree was rolled back.
    Store(StoreError),
    /// External lookup could not be performed.
    Lookup(LookupError),
}

impl Display for NotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field } => write!(f, "{field} is required"),
            Self::Store(err) => write!(f, "{err}"),
            Self::Lookup(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NotebookError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation { .. } => None,
            Self::Store(err) => Some(err),
            Self::Lookup(err) => Some(err),
        }
    }
}

impl From<StoreError> for NotebookError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<LookupError> for NotebookError {
    fn from(value: LookupError) -> Self {
        Self::Lookup(value)
    }
}

/// Result of `fetch_and_cache`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Article found and filed as a note.
    Cached { article: Article, added: AddedNote },
    /// Lookup resolved no page; nothing was written.
    NotFound { topic: String },
}

/// Composite confirmation for an article filed by `fetch_and_cache`.
pub fn cached_confirmation(article: &Article) -> String {
    let text = if article.summary.is_empty() {
        DEFAULT_NOTE_TEXT
    } else {
        article.summary.as_str()
    };
    format!(
        "Found page {} with url: {}\nText:{}\n\nAdded note to database!",
        article.title, article.reference_url, text
    )
}

/// Facade composing the repository and a lookup gateway.
pub struct NotebookService<G: LookupGateway> {
    repo: Mutex<NoteRepository>,
    gateway: G,
}

impl<G: LookupGateway> NotebookService<G> {
    /// Wraps an opened repository.
    pub fn new(repo: NoteRepository, gateway: G) -> Self {
        Self {
            repo: Mutex::new(repo),
            gateway,
        }
    }

    /// Opens the repository from `store` and wraps it.
    pub fn open(store: FileStore, gateway: G) -> StoreResult<Self> {
        Ok(Self::new(NoteRepository::open(store)?, gateway))
    }

    /// Adds a note after checking that topic, title and text are non-empty.
    pub fn add_note(&self, topic: &str, title: &str, text: &str) -> NotebookResult<AddedNote> {
        require("topic", topic)?;
        require("title", title)?;
        require("text", text)?;

        let added = self.repo.lock().add_note(topic, title, text, None)?;
        Ok(added)
    }

    /// Returns notes for `topic` as a tagged result.
    pub fn get_notes(&self, topic: &str) -> NotesLookup {
        self.repo.lock().get_notes(topic)
    }

    /// Looks up `topic` externally and files the summary as a note on a hit.
    ///
    /// # Errors
    /// - `Validation` when `topic` is empty.
    /// - `Lookup` when the gateway could not answer.
    /// - `Store` when the hit could not be persisted.
    pub fn fetch_and_cache(&self, topic: &str) -> NotebookResult<FetchOutcome> {
        require("topic", topic)?;

        let article = match self.gateway.lookup(topic) {
            Ok(LookupOutcome::Found(article)) => article,
            Ok(LookupOutcome::NotFound) => {
                info!("event=fetch_and_cache module=service status=not_found");
                return Ok(FetchOutcome::NotFound {
                    topic: topic.to_string(),
                });
            }
            Err(err) => {
                warn!(
                    "event=fetch_and_cache module=service status=error error_code=lookup_failed error={}",
                    err
                );
                return Err(err.into());
            }
        };

        let added = self.repo.lock().add_note(
            topic,
            article.title.as_str(),
            article.summary.as_str(),
            Some(article.reference_url.as_str()),
        );
        match added {
            Ok(added) => {
                info!(
                    "event=fetch_and_cache module=service status=ok topic={} page_id={}",
                    added.topic, article.page_id
                );
                Ok(FetchOutcome::Cached { article, added })
            }
            Err(err) => {
                error!(
                    "event=fetch_and_cache module=service status=error error_code=persist_failed error={}",
                    err
                );
                Err(err.into())
            }
        }
    }

    /// Gateway used for fetch-and-cache.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Topic keys in insertion order.
    pub fn topic_names(&self) -> Vec<String> {
        self.repo.lock().topic_names()
    }

    /// Flushes the tree one last time.
    pub fn close(self) -> StoreResult<()> {
        self.repo.into_inner().flush()
    }
}

fn require(field: &'static str, value: &str) -> NotebookResult<()> {
    if value.trim().is_empty() {
        return Err(NotebookError::Validation { field });
    }
    Ok(())
}
