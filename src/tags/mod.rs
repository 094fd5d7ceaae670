//! Tag storage
//!
//! The interpreter never touches media files directly. It reads and writes a
//! file's tags through a [`TagStore`], which must apply a write completely or
//! report failure; callers never assume partial application.
//!
//! - [`Metaflac`]: FLAC Vorbis comments through the `metaflac` tool
//! - [`MemoryStore`]: in-process map, for dry runs and tests

mod memory;
mod metaflac;

pub use memory::MemoryStore;
pub use metaflac::{DEFAULT_PROGRAM, Metaflac, sanitize_key, sanitize_value};

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use thiserror::Error;

/// Tag keys and values in write order
pub type TagMap = IndexMap<String, String>;

/// Errors reported by tag stores
#[derive(Debug, Error)]
pub enum TagStoreError {
    /// Tags could not be read from the file
    #[error("Failed to read tags from {}: {reason}", path.display())]
    Read { path: PathBuf, reason: String },

    /// Tags could not be written to the file
    #[error("Failed to write tags to {}: {reason}", path.display())]
    Write { path: PathBuf, reason: String },
}

impl TagStoreError {
    pub fn read(path: &Path, reason: impl Into<String>) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn write(path: &Path, reason: impl Into<String>) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Path of the file the error is about
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }
}

/// Reads and writes the tags of one file at a time
pub trait TagStore: Send + Sync {
    /// Read every tag of a file.
    ///
    /// # Errors
    /// Returns `TagStoreError::Read` if the file is unreadable or malformed.
    fn read_tags(&self, path: &Path) -> Result<TagMap, TagStoreError>;

    /// Replace every tag of a file with `tags`.
    ///
    /// # Errors
    /// Returns `TagStoreError::Write` if the tags could not be committed.
    fn write_tags(&self, path: &Path, tags: &TagMap) -> Result<(), TagStoreError>;
}
