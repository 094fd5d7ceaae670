//! User input abstraction layer
//!
//! The interpreter asks the operator what to do with each previewed file
//! through [`UserInput`]. The terminal implementation uses `dialoguer` when
//! stdin is a TTY and plain line reads otherwise, so batch runs can also be
//! driven from a pipe.

use std::io::{self, BufRead, IsTerminal, Write};

/// Trait for user input operations
///
/// # Examples
///
/// ```no_run
/// use mfbatch::ui::input::{UserInput, DialoguerInput};
///
/// let mut input = DialoguerInput::new();
/// if let Some(answer) = input.prompt_line("Write? [Y/n/q/:]").unwrap() {
///     println!("answered {answer:?}");
/// }
/// ```
pub trait UserInput {
    /// Prompt for one line of text.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(String))` - The line, possibly empty
    /// * `Ok(None)` - Input is exhausted
    /// * `Err(_)` - Input operation failed
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Result type for user input operations
pub type Result<T> = std::result::Result<T, InputError>;

/// Errors that can occur during user input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// IO error during input
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl From<InputError> for io::Error {
    fn from(err: InputError) -> Self {
        match err {
            InputError::Io(e) => e,
        }
    }
}

/// Terminal user input
///
/// Uses `dialoguer` prompts on a terminal and falls back to reading lines
/// from stdin when it is redirected.
pub struct DialoguerInput {
    theme: dialoguer::theme::ColorfulTheme,
}

impl DialoguerInput {
    /// Create a new dialoguer-based input handler
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: dialoguer::theme::ColorfulTheme::default(),
        }
    }
}

impl Default for DialoguerInput {
    fn default() -> Self {
        Self::new()
    }
}

impl UserInput for DialoguerInput {
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !io::stdin().is_terminal() {
            print!("{prompt} > ");
            io::stdout().flush()?;
            let mut line = String::new();
            if io::stdin().lock().read_line(&mut line)? == 0 {
                return Ok(None);
            }
            return Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()));
        }

        dialoguer::Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map(Some)
            .map_err(|e| InputError::Io(io::Error::other(e)))
    }
}
