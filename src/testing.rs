//! Testing utilities for mfbatch
//!
//! Helpers for running batchfile text against an in-memory tag store with
//! scripted prompt answers, capturing everything the interpreter prints.
//!
//! Only available when compiled with `cfg(test)`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{self, Environment, Interpreter, RunOptions, RunSummary};
use crate::tags::{MemoryStore, TagMap};
use crate::ui::ScriptedInput;

/// Everything observable about one interpreter run
pub struct BatchRun {
    pub outcome: batch::Result<RunSummary>,
    pub env: Environment,
    pub output: String,
    pub prompts: Vec<String>,
}

impl BatchRun {
    /// Summary of a successful run
    ///
    /// # Panics
    /// Panics if the run failed.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        match &self.outcome {
            Ok(summary) => *summary,
            Err(e) => panic!("batch run failed: {e}"),
        }
    }
}

/// Options for a run that writes every file without asking
#[must_use]
pub const fn unattended() -> RunOptions {
    RunOptions {
        dry_run: false,
        interactive: false,
        quiet: true,
        width: Some(80),
    }
}

/// Options for a run that asks before each file
#[must_use]
pub const fn prompted() -> RunOptions {
    RunOptions {
        dry_run: false,
        interactive: true,
        quiet: false,
        width: Some(80),
    }
}

/// Run batchfile text against `store`, answering prompts with `answers`
pub fn run_batch(
    source: &str,
    store: &MemoryStore,
    answers: &[&str],
    options: RunOptions,
) -> BatchRun {
    let mut input = ScriptedInput::new(answers.iter().copied());
    let mut output = Vec::new();
    let (outcome, env) = {
        let mut interpreter = Interpreter::new(store, &mut input, &mut output, options);
        let outcome = interpreter.run(source.as_bytes());
        let env = std::mem::take(interpreter.env_mut());
        (outcome, env)
    };
    BatchRun {
        outcome,
        env,
        output: String::from_utf8_lossy(&output).into_owned(),
        prompts: input.prompts,
    }
}

/// Tags written to `path`, the last write winning
#[must_use]
pub fn written(store: &MemoryStore, path: &str) -> Option<TagMap> {
    store
        .writes()
        .into_iter()
        .rev()
        .find(|(p, _)| p == Path::new(path))
        .map(|(_, tags)| tags)
}

/// Build a tag map from pairs
#[must_use]
pub fn tag_map(pairs: &[(&str, &str)]) -> TagMap {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// Directory removed on drop, created under the system temp dir
pub struct TempDir {
    dir: tempfile::TempDir,
}

impl TempDir {
    /// Create a fresh directory
    ///
    /// # Panics
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new(name: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("mfbatch_{name}_"))
            .tempdir()
            .expect("Failed to create temp dir");
        Self { dir }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create an empty file, and its parent folders, below the directory
    ///
    /// # Panics
    /// Panics if the file cannot be created.
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(&path, b"").expect("Failed to create file");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_batch_captures_output() {
        let store = MemoryStore::new();
        let run = run_batch(":set A 1\n./a.flac\n", &store, &[], prompted());
        assert_eq!(run.summary().written, 0);
        assert!(run.summary().quit);
        assert!(run.output.contains("./a.flac"));
        assert_eq!(run.prompts.len(), 1);
    }

    #[test]
    fn test_temp_dir_removed_on_drop() {
        let path = {
            let dir = TempDir::new("drop");
            let file = dir.touch("x/y.flac");
            assert!(file.exists());
            dir.path().to_path_buf()
        };
        assert!(!path.exists());
    }
}
