//! Batchfile interpreter
//!
//! A batchfile is a line-oriented script: commands (`:set`, `:set-pattern`,
//! ...) build up a tag environment and every other line names a file that
//! receives the current environment's tags.
//!
//! - `reader`: physical lines joined into logical lines
//! - `line`: classification of a logical line
//! - `env`: the tag environment and its per-key modifiers
//! - `commands`: the command registry and built-in commands
//! - `format`: increment rendering formats
//! - `pattern`: regex rules for derived keys
//! - `interpreter`: the per-file preview, decide and commit cycle

mod commands;
mod env;
mod error;
mod format;
mod interpreter;
mod line;
mod pattern;
mod reader;

pub use commands::{CommandRegistry, CommandSpec, Handler, Origin};
pub use env::{
    ABSPATH_KEY, EnvError, Entry, Environment, FILENAME_KEY, FOLDER_KEY, INTERNAL_PREFIX,
    Modifier, Prior, SPECIAL_KEYS, is_internal,
};
pub use error::{BatchError, LineRef, Result};
pub use format::{DEFAULT_FORMAT, FormatError, IncrementFormat};
pub use interpreter::{DECISION_PROMPT, Flow, Interpreter, RunOptions, RunSummary};
pub use line::{COMMAND_LEADER, COMMENT_LEADER, Line, tokenize};
pub use pattern::{PatternError, PatternRule};
pub use reader::{CONTINUATION, LogicalLines, logical_lines};

#[cfg(test)]
mod tests;
