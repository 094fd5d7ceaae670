//! Interpreter error types
//!
//! Every failure the batchfile interpreter can surface. Errors carry the line
//! number of the offending logical line when one exists; commands typed at the
//! interactive prompt have no line and report `None`.
//!
//! No error is retried. Command and argument errors mean the batchfile needs
//! fixing, tag store errors mean the affected file's state is unknown.

use std::fmt;

use thiserror::Error;

use super::env::EnvError;
use crate::tags::TagStoreError;

/// Line position of a command, if it came from the batchfile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineRef(pub Option<usize>);

impl fmt::Display for LineRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(line) => write!(f, "line {line}"),
            None => f.write_str("prompt"),
        }
    }
}

/// Errors raised while interpreting a batchfile
#[derive(Debug, Error)]
pub enum BatchError {
    /// The command name is not registered
    #[error("Unrecognized command '{command}' ({line})")]
    UnrecognizedCommand { command: String, line: LineRef },

    /// A registered command was called with bad arguments
    #[error("Invalid arguments for '{command}' ({line}): {reason}")]
    CommandArgument {
        command: String,
        line: LineRef,
        reason: String,
    },

    /// A pattern rule's source key was absent when the rule was evaluated
    #[error("Cannot derive '{key}' for {path}: source key '{source_key}' is not set")]
    MissingSourceKey {
        key: String,
        source_key: String,
        path: String,
    },

    /// An incrementing key no longer holds a value matching its format
    #[error("Cannot increment '{key}': value '{value}' is not an integer")]
    InvalidIncrementValue { key: String, value: String },

    /// Reading tags from a file failed
    #[error("{0}")]
    TagRead(TagStoreError),

    /// Writing tags to a file failed
    #[error("{0}")]
    TagWrite(TagStoreError),

    /// Reading the batchfile or talking to the terminal failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Line number carried by command errors
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::UnrecognizedCommand { line, .. } | Self::CommandArgument { line, .. } => line.0,
            _ => None,
        }
    }

    pub(crate) fn from_env(err: EnvError, path: &str) -> Self {
        match err {
            EnvError::MissingSourceKey { key, source_key } => Self::MissingSourceKey {
                key,
                source_key,
                path: path.to_string(),
            },
            EnvError::InvalidIncrementValue { key, value } => {
                Self::InvalidIncrementValue { key, value }
            }
            EnvError::KeyNotFound { key } => Self::CommandArgument {
                command: "unset".to_string(),
                line: LineRef(None),
                reason: format!("key '{key}' is not set"),
            },
        }
    }
}

/// Result type for interpreter operations
pub type Result<T> = std::result::Result<T, BatchError>;
