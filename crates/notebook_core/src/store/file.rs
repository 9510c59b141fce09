//! JSON file backend for the notebook tree.
//!
//! # Responsibility
//! - Parse the backing file into a `NoteTree`, recovering from absence or
//!   corruption with an empty tree.
//! - Serialize the full tree through a sibling temp file and atomic rename.
//!
//! # Invariants
//! - Unreadable-but-present files are never overwritten: `load` serves an
//!   empty tree and every later `save` through the same store is refused.
//! - Bytes that are not a valid JSON tree (including invalid UTF-8) count as
//!   corruption and are replaced by a fresh empty store.
//! - `save` either replaces the whole file or leaves the previous one intact.

use super::{StoreError, StoreResult};
use crate::model::note::{is_well_formed_timestamp, NoteTree};
use log::{error, info, warn};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

/// Whole-file JSON store for one notebook.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    /// Set when `load` found a file it could not read; blocks saves.
    read_only: bool,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            read_only: false,
        }
    }

    /// Backing file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether saves are refused because the backing file was unreadable.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Loads the tree, falling back to a fresh empty store when needed.
    ///
    /// # Side effects
    /// - Writes an empty store when the file is missing or unparsable.
    /// - Marks the store read-only when the file exists but cannot be read.
    /// - Emits `store_load` logging events with duration and status.
    ///
    /// # Errors
    /// - Returns an error only when the fresh empty store cannot be written.
    pub fn load(&mut self) -> StoreResult<NoteTree> {
        let started_at = Instant::now();
        info!("event=store_load module=store status=start");

        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=store_load module=store status=missing path={}",
                    self.path.display()
                );
                return self.recreate_empty(started_at);
            }
            Err(err) => {
                error!(
                    "event=store_load module=store status=error duration_ms={} error_code=store_read_failed path={} error={}",
                    started_at.elapsed().as_millis(),
                    self.path.display(),
                    err
                );
                self.read_only = true;
                return Ok(NoteTree::new());
            }
        };

        match serde_json::from_slice::<NoteTree>(&raw) {
            Ok(tree) => {
                warn_on_malformed_timestamps(&tree);
                info!(
                    "event=store_load module=store status=ok duration_ms={} topics={} notes={}",
                    started_at.elapsed().as_millis(),
                    tree.topics.len(),
                    tree.note_count()
                );
                Ok(tree)
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=corrupt path={} error={}",
                    self.path.display(),
                    err
                );
                self.recreate_empty(started_at)
            }
        }
    }

    /// Serializes `tree` and atomically replaces the backing file.
    ///
    /// # Errors
    /// - `ReadOnly` when `load` could not read the existing file.
    /// - Otherwise when the parent directory, temp file, write or rename
    ///   fails. The previous file content survives any failure.
    pub fn save(&self, tree: &NoteTree) -> StoreResult<()> {
        let started_at = Instant::now();
        let written = if self.read_only {
            Err(StoreError::ReadOnly {
                path: self.path.clone(),
            })
        } else {
            self.write_atomically(tree)
        };
        match written {
            Ok(()) => {
                info!(
                    "event=store_save module=store status=ok duration_ms={} topics={} notes={}",
                    started_at.elapsed().as_millis(),
                    tree.topics.len(),
                    tree.note_count()
                );
                Ok(())
            }
            Err(err) => {
                error!(
                    "event=store_save module=store status=error duration_ms={} error_code=store_write_failed error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    fn recreate_empty(&self, started_at: Instant) -> StoreResult<NoteTree> {
        let tree = NoteTree::new();
        self.save(&tree)?;
        info!(
            "event=store_load module=store status=created duration_ms={} path={}",
            started_at.elapsed().as_millis(),
            self.path.display()
        );
        Ok(tree)
    }

    fn write_atomically(&self, tree: &NoteTree) -> StoreResult<()> {
        let parent = self.parent_dir();
        fs::create_dir_all(&parent).map_err(|source| StoreError::Io {
            path: parent.clone(),
            source,
        })?;

        let encoded = serde_json::to_vec_pretty(tree)?;
        let mut temp = NamedTempFile::new_in(&parent).map_err(|source| StoreError::Io {
            path: parent.clone(),
            source,
        })?;
        temp.write_all(&encoded)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|source| StoreError::Io {
                path: temp.path().to_path_buf(),
                source,
            })?;

        temp.persist(&self.path)
            .map_err(|err| StoreError::Persist {
                path: self.path.clone(),
                source: err.error,
            })?;
        Ok(())
    }

    fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

fn warn_on_malformed_timestamps(tree: &NoteTree) {
    for topic in &tree.topics {
        for note in &topic.notes {
            let well_formed = note
                .timestamp
                .as_deref()
                .map(|value| is_well_formed_timestamp(value.trim()))
                .unwrap_or(false);
            if !well_formed {
                warn!(
                    "event=store_load module=store status=degraded topic={} reason=malformed_timestamp",
                    topic.name
                );
            }
        }
    }
}
