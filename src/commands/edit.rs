//! Edit command - open the batchfile in the user's editor

use std::env;
use std::path::Path;
use std::process::Command;

use crate::{MfbatchError, Result};

const FALLBACK_EDITORS: [&str; 3] = ["vim", "vi", "nano"];

/// Pick the editor command.
///
/// Checks the configured editor, then `$EDITOR`, then `$VISUAL`, then falls
/// back to common editors found on `PATH`.
///
/// # Errors
/// Returns `MfbatchError::InvalidInput` if no editor can be found.
pub fn get_editor(configured: Option<&str>) -> Result<String> {
    let from_env = |name: &str| env::var(name).ok().filter(|v| !v.trim().is_empty());

    if let Some(editor) = configured.filter(|e| !e.trim().is_empty()) {
        return Ok(editor.to_string());
    }
    if let Some(editor) = from_env("EDITOR").or_else(|| from_env("VISUAL")) {
        return Ok(editor);
    }

    for fallback in FALLBACK_EDITORS {
        if Command::new("which")
            .arg(fallback)
            .output()
            .is_ok_and(|o| o.status.success())
        {
            return Ok(fallback.to_string());
        }
    }

    Err(MfbatchError::InvalidInput(
        "No editor found. Set $EDITOR or `mfbatch config set editor=...`".to_string(),
    ))
}

/// Split an editor command into program and arguments, then append `path`
///
/// # Errors
/// Returns `MfbatchError::InvalidInput` for an empty or badly quoted command.
pub fn editor_command(editor: &str, path: &Path) -> Result<Command> {
    let words = shell_words::split(editor)
        .map_err(|e| MfbatchError::InvalidInput(format!("Invalid editor command '{editor}': {e}")))?;
    let (program, args) = words
        .split_first()
        .ok_or_else(|| MfbatchError::InvalidInput("Editor command is empty".to_string()))?;

    let mut command = Command::new(program);
    command.args(args).arg(path);
    Ok(command)
}

/// Execute the edit command, waiting for the editor to exit
///
/// # Errors
/// Returns an error if the editor cannot be started or exits unsuccessfully.
pub fn execute(batchfile: &Path, configured: Option<&str>) -> Result<()> {
    let editor = get_editor(configured)?;
    tracing::debug!(editor = %editor, batchfile = %batchfile.display(), "launching editor");

    let status = editor_command(&editor, batchfile)?.status().map_err(|e| {
        MfbatchError::InvalidInput(format!("Failed to launch editor '{editor}': {e}"))
    })?;

    if !status.success() {
        return Err(MfbatchError::InvalidInput(format!(
            "Editor '{editor}' exited with {status}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_editor_wins() {
        assert_eq!(get_editor(Some("micro")).unwrap(), "micro");
    }

    #[test]
    fn test_editor_command_splits_arguments() {
        let command = editor_command("code --wait", Path::new("MFBATCH_LIST")).unwrap();
        assert_eq!(command.get_program(), "code");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, vec!["--wait", "MFBATCH_LIST"]);
    }

    #[test]
    fn test_editor_command_rejects_empty_and_bad_quotes() {
        assert!(editor_command("", Path::new("x")).is_err());
        assert!(editor_command("vim '", Path::new("x")).is_err());
    }

    #[test]
    fn test_failing_editor_is_an_error() {
        assert!(execute(Path::new("MFBATCH_LIST"), Some("false")).is_err());
    }
}
