//! Durable storage for the notebook tree.
//!
//! # Responsibility
//! - Load the whole tree from one backing file at startup.
//! - Rewrite the whole file after every mutation.
//!
//! # Invariants
//! - A missing or unparsable file yields an empty tree that is persisted
//!   immediately, so later loads see a well-formed store.
//! - A present but unreadable file yields an empty tree and is never
//!   overwritten; saves through that store fail with `ReadOnly`.
//! - Saves replace the file as a whole; readers never observe a partial write.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod file;

pub use file::FileStore;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug)]
pub enum StoreError {
    /// Filesystem failure while reading, writing or creating directories.
    Io { path: PathBuf, source: std::io::Error },
    /// Tree could not be encoded.
    Serialize(serde_json::Error),
    /// Temp file could not be moved over the target.
    Persist { path: PathBuf, source: std::io::Error },
    /// Backing file could not be read at load, so it is not overwritten.
    ReadOnly { path: PathBuf },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "store I/O failed at `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to encode note tree: {err}"),
            Self::Persist { path, source } => {
                write!(f, "failed to replace store file `{}`: {source}", path.display())
            }
            Self::ReadOnly { path } => write!(
                f,
                "store file `{}` could not be read at load; refusing to overwrite it",
                path.display()
            ),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Persist { source, .. } => Some(source),
            Self::ReadOnly { .. } => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}
