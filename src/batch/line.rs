//! Logical line classification
//!
//! The first character decides what a line is: `#` starts a comment, `:`
//! starts a command and anything else names a file. Command lines are split
//! with shell quoting rules so values may contain spaces.

use super::error::{BatchError, LineRef};

/// Leader of a command line
pub const COMMAND_LEADER: char = ':';
/// Leader of a comment line
pub const COMMENT_LEADER: char = '#';

/// A classified logical line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line<'a> {
    Blank,
    Comment(&'a str),
    /// Command name followed by its arguments
    Command(Vec<String>),
    /// File path, verbatim
    File(&'a str),
}

impl<'a> Line<'a> {
    /// Classify one logical line.
    ///
    /// # Errors
    /// Returns `BatchError::CommandArgument` if a command line has unbalanced
    /// quotes, and `BatchError::UnrecognizedCommand` if it names no command.
    pub fn classify(text: &'a str, line: Option<usize>) -> Result<Self, BatchError> {
        if text.trim().is_empty() {
            return Ok(Self::Blank);
        }
        if let Some(comment) = text.strip_prefix(COMMENT_LEADER) {
            return Ok(Self::Comment(comment));
        }
        if let Some(command) = text.strip_prefix(COMMAND_LEADER) {
            return tokenize(command.trim_start_matches(COMMAND_LEADER), line).map(Self::Command);
        }
        Ok(Self::File(text))
    }
}

/// Split a command line into words with shell quoting
///
/// # Errors
/// See [`Line::classify`].
pub fn tokenize(command: &str, line: Option<usize>) -> Result<Vec<String>, BatchError> {
    let words = shell_words::split(command).map_err(|e| BatchError::CommandArgument {
        command: command.split_whitespace().next().unwrap_or_default().to_string(),
        line: LineRef(line),
        reason: e.to_string(),
    })?;
    if words.is_empty() {
        return Err(BatchError::UnrecognizedCommand {
            command: String::new(),
            line: LineRef(line),
        });
    }
    Ok(words)
}
