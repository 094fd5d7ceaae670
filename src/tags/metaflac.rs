//! FLAC tag store backed by the `metaflac` command-line tool

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;

use super::{TagMap, TagStore, TagStoreError};
use crate::batch::is_internal;

/// Program name used when no path is configured
pub const DEFAULT_PROGRAM: &str = "metaflac";

static COMMENT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s+comment\[\d+\]: ([^=]+)=(.*)$").expect("comment pattern is valid")
});

/// Tag store that shells out to `metaflac`
#[derive(Debug, Clone)]
pub struct Metaflac {
    program: PathBuf,
}

impl Metaflac {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program this store runs
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Default for Metaflac {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl TagStore for Metaflac {
    fn read_tags(&self, path: &Path) -> Result<TagMap, TagStoreError> {
        let output = Command::new(&self.program)
            .arg("--list")
            .arg("--block-type=VORBIS_COMMENT")
            .arg(path)
            .output()
            .map_err(|e| {
                TagStoreError::read(path, format!("cannot run {}: {e}", self.program.display()))
            })?;

        if !output.status.success() {
            return Err(TagStoreError::read(
                path,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }

        Ok(parse_list_output(&String::from_utf8_lossy(&output.stdout)))
    }

    fn write_tags(&self, path: &Path, tags: &TagMap) -> Result<(), TagStoreError> {
        let body = import_body(tags);

        // a single invocation so the file is rewritten once, with all edits applied
        let mut child = Command::new(&self.program)
            .arg("--remove-all-tags")
            .arg("--import-tags-from=-")
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                TagStoreError::write(path, format!("cannot run {}: {e}", self.program.display()))
            })?;

        if let Some(mut stdin) = child.stdin.take()
            && let Err(e) = stdin.write_all(body.as_bytes())
        {
            drop(stdin);
            // reap the child before reporting, it may still be running
            let _ = child.kill();
            let _ = child.wait();
            return Err(TagStoreError::write(path, e.to_string()));
        }

        let output = child
            .wait_with_output()
            .map_err(|e| TagStoreError::write(path, e.to_string()))?;
        if !output.status.success() {
            return Err(TagStoreError::write(
                path,
                String::from_utf8_lossy(&output.stderr).trim().to_string(),
            ));
        }
        Ok(())
    }
}

/// Parse the VORBIS_COMMENT entries out of `metaflac --list` output
pub(crate) fn parse_list_output(listing: &str) -> TagMap {
    listing
        .lines()
        .filter_map(|line| COMMENT_LINE.captures(line))
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect()
}

/// Build the `KEY=VALUE` lines fed to `--import-tags-from`
pub(crate) fn import_body(tags: &TagMap) -> String {
    tags.iter()
        .filter(|(k, _)| !is_internal(k))
        .map(|(k, v)| format!("{}={}\n", sanitize_key(k), sanitize_value(v)))
        .collect()
}

/// Make a key valid as a Vorbis comment field name.
///
/// Keys are upper-cased; characters outside 0x20..=0x7D, and `=`, become `_`.
#[must_use]
pub fn sanitize_key(key: &str) -> String {
    key.to_uppercase()
        .chars()
        .map(|c| match c {
            '=' => '_',
            ' '..='}' => c,
            _ => '_',
        })
        .collect()
}

/// Make a value importable: newlines are replaced with spaces
#[must_use]
pub fn sanitize_value(value: &str) -> String {
    value.replace('\n', " ")
}
