//! Scripted user input for testing

use std::collections::VecDeque;

use super::input::{Result, UserInput};

/// Input that answers prompts from a predetermined list
///
/// Once the answers run out every prompt reports exhausted input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    answers: VecDeque<String>,
    /// Prompts shown so far
    pub prompts: Vec<String>,
}

impl ScriptedInput {
    /// Create scripted input answering with `answers` in order
    #[must_use]
    pub fn new<S: Into<String>>(answers: impl IntoIterator<Item = S>) -> Self {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            prompts: Vec::new(),
        }
    }

    /// Answers not consumed yet
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl UserInput for ScriptedInput {
    fn prompt_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.answers.pop_front())
    }
}
