//! Core domain logic for the notebook service.
//! This crate is the single source of truth for note storage invariants.

pub mod config;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod repo;
pub mod service;
pub mod store;

pub use config::{ConfigError, LogConfig, LookupConfig, NotebookConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use lookup::{
    Article, LookupError, LookupGateway, LookupOutcome, LookupResult, WikipediaGateway,
};
pub use model::note::{Note, NoteTree, NoteView, Topic, DEFAULT_NOTE_TEXT, MISSING_TIMESTAMP};
pub use repo::note_repo::{normalize_topic, AddedNote, NoteRepository, NotesLookup};
pub use service::notebook_service::{
    cached_confirmation, FetchOutcome, NotebookError, NotebookResult, NotebookService,
};
pub use store::{FileStore, StoreError, StoreResult};
