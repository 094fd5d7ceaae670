//! Batchfile interpreter
//!
//! Runs logical lines against an [`Environment`]. Commands mutate the
//! environment; every file line goes through the same cycle:
//!
//! ```text
//! prepare ─► derive ─► preview ─► decide ─┬─► commit ─► increment, revert once, clear
//!    ▲                                    ├─► skip   ─► revert once, clear
//!    └──────────── inline command ◄───────┤
//!                                         └─► quit   ─► revert once, clear, stop
//! ```
//!
//! Only a committed file advances incrementing keys. Inline commands typed at
//! the prompt loop back to `prepare` without recursion, however many are
//! issued.

use std::io::{self, BufRead, Write};
use std::path::Path;

use colored::Colorize;

use super::commands::{CommandRegistry, Origin};
use super::env::{Environment, is_internal};
use super::error::{BatchError, Result};
use super::line::{COMMAND_LEADER, Line, tokenize};
use super::reader::logical_lines;
use crate::output;
use crate::tags::TagStore;
use crate::ui::UserInput;

/// Prompt shown for every previewed file
pub const DECISION_PROMPT: &str = "Write? [Y/n/q/:]";

/// How a run behaves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Report intended writes instead of writing
    pub dry_run: bool,
    /// Ask before each file
    pub interactive: bool,
    /// Suppress previews and progress in non-interactive runs
    pub quiet: bool,
    /// Preview width, the terminal width when `None`
    pub width: Option<usize>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            interactive: true,
            quiet: false,
            width: None,
        }
    }
}

/// Counts reported at the end of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub skipped: usize,
    /// The operator ended the session before the last line
    pub quit: bool,
    pub dry_run: bool,
}

impl RunSummary {
    pub fn print(&self) {
        println!("\n{}", "=== Batch Summary ===".bold());
        let label = if self.dry_run { "✓ Would write:" } else { "✓ Written:" };
        println!("  {} {}", label.green(), self.written);
        if self.skipped > 0 {
            println!("  {} {}", "⊘ Skipped:".yellow(), self.skipped);
        }
        if self.quit {
            println!("  {}", "Session ended before the end of the batchfile".yellow());
        }
    }
}

/// Whether to keep reading lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Operator answer at the decision prompt
#[derive(Debug, Clone, PartialEq, Eq)]
enum Answer {
    Write,
    Skip,
    Quit,
    Command(String),
}

impl Answer {
    /// Empty or `y…` writes, `:…` is a command, `q…` quits, anything else
    /// skips. Exhausted input quits.
    fn parse(answer: Option<&str>) -> Self {
        let Some(answer) = answer else {
            return Self::Quit;
        };
        let answer = answer.trim();
        if answer.starts_with(COMMAND_LEADER) {
            return Self::Command(answer.to_string());
        }
        match answer.chars().next() {
            None | Some('y' | 'Y') => Self::Write,
            Some('q' | 'Q') => Self::Quit,
            _ => Self::Skip,
        }
    }
}

/// Final decision for one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Write,
    Skip,
    Quit,
}

/// Executes a batchfile against a tag store
pub struct Interpreter<'a> {
    env: Environment,
    registry: CommandRegistry,
    store: &'a dyn TagStore,
    input: &'a mut dyn UserInput,
    out: &'a mut dyn Write,
    options: RunOptions,
    summary: RunSummary,
}

impl<'a> Interpreter<'a> {
    /// Create an interpreter with the built-in commands and an empty environment
    pub fn new(
        store: &'a dyn TagStore,
        input: &'a mut dyn UserInput,
        out: &'a mut dyn Write,
        options: RunOptions,
    ) -> Self {
        Self {
            env: Environment::new(),
            registry: CommandRegistry::standard(),
            store,
            input,
            out,
            options,
            summary: RunSummary {
                dry_run: options.dry_run,
                ..RunSummary::default()
            },
        }
    }

    /// Replace the command registry
    #[must_use]
    pub fn with_registry(mut self, registry: CommandRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub const fn env(&self) -> &Environment {
        &self.env
    }

    pub const fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    #[must_use]
    pub const fn summary(&self) -> RunSummary {
        self.summary
    }

    /// Run every logical line of a batchfile.
    ///
    /// # Errors
    /// Returns the first `BatchError`; lines after it are not run.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<RunSummary> {
        for item in logical_lines(reader) {
            let (line, text) = item?;
            if self.execute_line(&text, line)? == Flow::Stop {
                break;
            }
        }
        Ok(self.summary)
    }

    /// Run one logical line.
    ///
    /// # Errors
    /// Returns command errors, derivation and increment errors, and tag write
    /// failures.
    pub fn execute_line(&mut self, text: &str, line: usize) -> Result<Flow> {
        match Line::classify(text, Some(line))? {
            Line::Blank | Line::Comment(_) => Ok(Flow::Continue),
            Line::Command(words) => {
                self.registry
                    .execute(&mut self.env, &words, Origin::Batchfile(line))?;
                Ok(Flow::Continue)
            }
            Line::File(path) => self.process_file(path),
        }
    }

    fn process_file(&mut self, path: &str) -> Result<Flow> {
        tracing::debug!(path, "processing file");
        let verdict = match self.decide(path) {
            Ok(verdict) => verdict,
            Err(e) => {
                self.abandon_file();
                return Err(e);
            }
        };

        match verdict {
            Verdict::Write => {
                if let Err(e) = self.commit(path) {
                    self.abandon_file();
                    return Err(e);
                }
                self.summary.written += 1;
                self.finish_file(path)?;
                Ok(Flow::Continue)
            }
            Verdict::Skip => {
                self.abandon_file();
                self.summary.skipped += 1;
                writeln!(self.out, "{} {path}", "⊘ Skipped:".yellow())?;
                Ok(Flow::Continue)
            }
            Verdict::Quit => {
                self.abandon_file();
                self.summary.quit = true;
                tracing::debug!(path, "session ended at prompt");
                Ok(Flow::Stop)
            }
        }
    }

    /// Preview the file and ask until the operator settles on a verdict
    fn decide(&mut self, path: &str) -> Result<Verdict> {
        loop {
            self.env.prepare_file(Path::new(path));
            self.env
                .derive()
                .map_err(|e| BatchError::from_env(e, path))?;

            if self.options.interactive || !self.options.quiet {
                self.show_preview(path)?;
            }
            if !self.options.interactive {
                return Ok(Verdict::Write);
            }

            let answer = self
                .input
                .prompt_line(DECISION_PROMPT)
                .map_err(io::Error::from)?;
            match Answer::parse(answer.as_deref()) {
                Answer::Write => return Ok(Verdict::Write),
                Answer::Skip => return Ok(Verdict::Skip),
                Answer::Quit => return Ok(Verdict::Quit),
                Answer::Command(command) => {
                    if let Err(e) = self.run_prompt_command(&command) {
                        writeln!(self.out, "{} {e}", "✗".red())?;
                    }
                }
            }
        }
    }

    fn run_prompt_command(&mut self, command: &str) -> Result<()> {
        let words = tokenize(command.trim_start_matches(COMMAND_LEADER), None)?;
        self.registry.execute(&mut self.env, &words, Origin::Prompt)
    }

    fn show_preview(&mut self, path: &str) -> Result<()> {
        let width = self.options.width.unwrap_or_else(output::terminal_width);
        let visible = self.env.iter().filter(|(k, _)| !is_internal(k));
        for line in output::preview(path, visible, width, self.options.dry_run) {
            writeln!(self.out, "{line}")?;
        }
        Ok(())
    }

    fn commit(&mut self, path: &str) -> Result<()> {
        let tags = self.env.external_tags();
        if self.options.dry_run {
            writeln!(
                self.out,
                "{}",
                format!("DRY RUN would write {} tag(s) to {path}", tags.len()).yellow()
            )?;
            return Ok(());
        }

        self.store
            .write_tags(Path::new(path), &tags)
            .map_err(BatchError::TagWrite)?;
        tracing::info!(path, tags = tags.len(), "wrote tags");
        if !self.options.quiet {
            writeln!(self.out, "{} {path}", "✓ Wrote:".green())?;
        }
        Ok(())
    }

    /// Roll state forward after a committed file
    fn finish_file(&mut self, path: &str) -> Result<()> {
        self.env.revert_once();
        let advanced = self.env.advance_increments();
        self.env.clear_special_keys();
        advanced.map_err(|e| BatchError::from_env(e, path))
    }

    /// Drop per-file state without advancing increments
    fn abandon_file(&mut self) {
        self.env.revert_once();
        self.env.clear_special_keys();
    }
}
