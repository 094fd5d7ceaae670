//! mfbatch - batch tagging of media files from an editable script
//!
//! A batchfile lists media files interleaved with commands that build up a
//! tag environment. Running it previews each file's tags, asks the operator
//! what to do, and writes the tags through a [`tags::TagStore`].

use thiserror::Error;

pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod logging;
pub mod output;
pub mod tags;
pub mod ui;

#[cfg(test)]
pub mod testing;

/// Error enum, contains all failure states of the program
#[derive(Debug, Error)]
pub enum MfbatchError {
    /// Batchfile interpretation error
    #[error("{0}")]
    Batch(#[from] batch::BatchError),
    /// Tag store error outside of a batchfile run
    #[error("{0}")]
    TagStore(#[from] tags::TagStoreError),
    /// Represents a configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),
    /// Represents an I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<ui::InputError> for MfbatchError {
    fn from(err: ui::InputError) -> Self {
        Self::Io(err.into())
    }
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, MfbatchError>;
