//! Write command - run a batchfile against the tagged files

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use crate::batch::{Interpreter, RunOptions, RunSummary};
use crate::tags::TagStore;
use crate::ui::{DialoguerInput, UserInput};
use crate::{MfbatchError, Result};

/// Run batchfile text with explicit input and output
///
/// # Errors
/// Returns the interpreter's error for the first line that fails.
pub fn run<R: BufRead>(
    reader: R,
    store: &dyn TagStore,
    input: &mut dyn UserInput,
    out: &mut dyn Write,
    options: RunOptions,
) -> Result<RunSummary> {
    let mut interpreter = Interpreter::new(store, input, out, options);
    Ok(interpreter.run(reader)?)
}

/// Execute the write command
///
/// Prompts on the terminal for each file unless `options.interactive` is
/// off, and prints a summary unless quiet.
///
/// # Errors
/// Returns an error if the batchfile cannot be opened or the run fails.
pub fn execute(batchfile: &Path, store: &dyn TagStore, options: RunOptions) -> Result<RunSummary> {
    let file = File::open(batchfile).map_err(|e| {
        MfbatchError::InvalidInput(format!(
            "Cannot open batchfile {}: {e}",
            batchfile.display()
        ))
    })?;

    tracing::debug!(batchfile = %batchfile.display(), ?options, "running batchfile");
    let mut input = DialoguerInput::new();
    let mut stdout = io::stdout();
    let summary = run(BufReader::new(file), store, &mut input, &mut stdout, options)?;

    if !options.quiet {
        summary.print();
    }
    Ok(summary)
}
