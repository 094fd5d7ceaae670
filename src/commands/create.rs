//! Create command - write a batchfile from the tags of files on disk
//!
//! Files are found by extension below the current directory and listed in
//! sorted order. Each file's tags become `:set` lines, emitted only when a
//! value differs from the file before it, and `:unset` lines for keys the
//! file no longer has. Running the result unchanged rewrites every file with
//! the tags it already carries.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use colored::Colorize;
use glob::MatchOptions;
use rayon::prelude::*;

use crate::batch::{
    BatchError, COMMAND_LEADER, COMMENT_LEADER, CONTINUATION, CommandRegistry, is_internal,
};
use crate::tags::{TagMap, TagStore};
use crate::{MfbatchError, Result};

/// First line of every generated batchfile
pub const HEADER: &str = "# mfbatch";

/// Find files below `root` whose extension is one of `extensions`, sorted.
///
/// Extensions match case-insensitively. Paths keep `root` as their prefix,
/// so a root of `.` yields `./album/01.flac`.
///
/// # Errors
/// Returns `MfbatchError::InvalidInput` for an extension that is not a
/// valid glob, and `MfbatchError::Io` for unreadable directories.
pub fn discover(root: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    let options = MatchOptions {
        case_sensitive: false,
        ..MatchOptions::new()
    };

    let mut files = Vec::new();
    for extension in extensions {
        let extension = extension.trim_start_matches('.');
        let pattern = root.join("**").join(format!("*.{extension}"));
        let pattern = pattern.to_string_lossy();
        let paths = glob::glob_with(&pattern, options).map_err(|e| {
            MfbatchError::InvalidInput(format!("Invalid extension '{extension}': {e}"))
        })?;
        for entry in paths {
            let path = entry.map_err(glob::GlobError::into_error)?;
            if path.is_file() {
                files.push(with_root_prefix(root, path));
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn with_root_prefix(root: &Path, path: PathBuf) -> PathBuf {
    if path.starts_with(root) {
        path
    } else {
        root.join(path)
    }
}

/// Read the tags of every file, in parallel, keeping the order of `files`.
///
/// # Errors
/// Returns `BatchError::TagRead` for the first file that cannot be read.
pub fn read_all(store: &dyn TagStore, files: &[PathBuf]) -> Result<Vec<(PathBuf, TagMap)>> {
    files
        .par_iter()
        .map(|path| {
            store
                .read_tags(path)
                .map(|tags| (path.clone(), tags))
                .map_err(|e| MfbatchError::Batch(BatchError::TagRead(e)))
        })
        .collect()
}

/// Comment block opening a batchfile: a timestamp and the command reference
#[must_use]
pub fn header(registry: &CommandRegistry, created: &str) -> String {
    let mut text = format!("{HEADER}\n{COMMENT_LEADER} created {created}\n{COMMENT_LEADER}\n");
    text.push_str(&format!("{COMMENT_LEADER} Commands:\n"));
    for spec in registry.iter() {
        let synopsis = format!("{COMMAND_LEADER}{}", spec.synopsis());
        text.push_str(&format!("{COMMENT_LEADER}   {synopsis:<40} {}\n", spec.summary));
    }
    text.push('\n');
    text
}

/// Whether a path survives a trip through a batchfile line unchanged
fn representable(path: &str) -> bool {
    !path.trim().is_empty()
        && !path.starts_with([COMMENT_LEADER, COMMAND_LEADER])
        && !path.ends_with(CONTINUATION)
        && !path.contains(['\n', '\r'])
}

/// Write the batchfile body for `files` in order.
///
/// Returns the number of files listed; files whose path cannot be written as
/// a batchfile line are left out with a warning.
///
/// # Errors
/// Returns any error from `out`.
pub fn write_entries<W: Write>(out: &mut W, files: &[(PathBuf, TagMap)]) -> io::Result<usize> {
    let mut current = TagMap::new();
    let mut listed = 0;

    for (path, tags) in files {
        let path = path.to_string_lossy();
        if !representable(&path) {
            tracing::warn!(path = %path, "path cannot be listed in a batchfile, leaving it out");
            continue;
        }

        for (key, value) in tags {
            if is_internal(key) {
                tracing::warn!(
                    key = %key,
                    path = %path,
                    "tag key is reserved for internal use and will not be written back"
                );
            }
            if current.get(key) != Some(value) {
                writeln!(
                    out,
                    "{COMMAND_LEADER}set {} {}",
                    shell_words::quote(key),
                    shell_words::quote(value)
                )?;
                current.insert(key.clone(), value.clone());
            }
        }

        let gone: Vec<String> = current
            .keys()
            .filter(|key| !tags.contains_key(*key))
            .cloned()
            .collect();
        for key in gone {
            writeln!(out, "{COMMAND_LEADER}unset {}", shell_words::quote(&key))?;
            current.shift_remove(&key);
        }

        writeln!(out, "{path}\n")?;
        listed += 1;
    }
    Ok(listed)
}

/// Execute the create command
///
/// Scans the current directory for files with the given extensions and
/// writes a batchfile to `batchfile`.
///
/// # Errors
/// Returns an error if discovery, a tag read or writing the batchfile fails.
pub fn execute(
    batchfile: &Path,
    store: &dyn TagStore,
    extensions: &[String],
    quiet: bool,
) -> Result<usize> {
    let files = discover(Path::new("."), extensions)?;
    if !quiet {
        println!("Scanning {} file(s)...", files.len());
    }
    let tagged = read_all(store, &files)?;

    let created = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let mut out = BufWriter::new(File::create(batchfile)?);
    out.write_all(header(&CommandRegistry::standard(), &created).as_bytes())?;
    let listed = write_entries(&mut out, &tagged)?;
    out.flush()?;

    tracing::info!(files = listed, batchfile = %batchfile.display(), "created batchfile");
    if !quiet {
        println!(
            "{} Listed {listed} file(s) in {}",
            "✓".green(),
            batchfile.display().to_string().bold()
        );
    }
    Ok(listed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::MemoryStore;
    use crate::testing::{TempDir, tag_map};

    fn body(files: &[(PathBuf, TagMap)]) -> String {
        let mut out = Vec::new();
        write_entries(&mut out, files).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_only_changes_are_emitted() {
        let files = vec![
            (
                PathBuf::from("./a/01.flac"),
                tag_map(&[("ALBUM", "Kind of Blue"), ("TITLE", "So What")]),
            ),
            (
                PathBuf::from("./a/02.flac"),
                tag_map(&[("ALBUM", "Kind of Blue"), ("TITLE", "Freddie Freeloader")]),
            ),
        ];
        assert_eq!(
            body(&files),
            ":set ALBUM 'Kind of Blue'\n:set TITLE 'So What'\n./a/01.flac\n\n\
             :set TITLE 'Freddie Freeloader'\n./a/02.flac\n\n"
        );
    }

    #[test]
    fn test_missing_keys_are_unset() {
        let files = vec![
            (PathBuf::from("./1.flac"), tag_map(&[("A", "x"), ("B", "y")])),
            (PathBuf::from("./2.flac"), tag_map(&[("A", "x")])),
            (PathBuf::from("./3.flac"), tag_map(&[("A", "x"), ("B", "y")])),
        ];
        assert_eq!(
            body(&files),
            ":set A x\n:set B y\n./1.flac\n\n:unset B\n./2.flac\n\n:set B y\n./3.flac\n\n"
        );
    }

    #[test]
    fn test_unrepresentable_paths_are_left_out() {
        let files = vec![
            (PathBuf::from("./odd\\"), tag_map(&[("A", "1")])),
            (PathBuf::from("./ok.flac"), tag_map(&[("A", "1")])),
        ];
        let mut out = Vec::new();
        assert_eq!(write_entries(&mut out, &files).unwrap(), 1);
        assert_eq!(String::from_utf8(out).unwrap(), ":set A 1\n./ok.flac\n\n");
    }

    #[test]
    fn test_header_lists_commands_as_comments() {
        let text = header(&CommandRegistry::standard(), "2026-01-01 00:00:00");
        assert!(text.starts_with("# mfbatch\n"));
        assert!(text.contains(":set-pattern TO FROM PATTERN REPLACEMENT"));
        assert!(text.lines().all(|l| l.is_empty() || l.starts_with('#')));
    }

    #[test]
    fn test_discover_sorts_and_filters() {
        let dir = TempDir::new("discover");
        dir.touch("b/02.flac");
        dir.touch("b/01.FLAC");
        dir.touch("a/cover.jpg");
        dir.touch("a/01.flac");

        let files = discover(dir.path(), &["flac".to_string()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a/01.flac"),
                PathBuf::from("b/01.FLAC"),
                PathBuf::from("b/02.flac"),
            ]
        );
    }

    #[test]
    fn test_read_all_keeps_order_and_reports_failures() {
        let store = MemoryStore::new();
        let files: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("./{i:02}.flac"))).collect();
        for (i, path) in files.iter().enumerate() {
            store.insert(path.clone(), tag_map(&[("TRACK", &i.to_string())]));
        }
        let tagged = read_all(&store, &files).unwrap();
        assert_eq!(tagged.len(), 20);
        assert_eq!(tagged[7].1.get("TRACK").map(String::as_str), Some("7"));

        let missing = [PathBuf::from("./nope.flac")];
        assert!(matches!(
            read_all(&store, &missing),
            Err(MfbatchError::Batch(BatchError::TagRead(_)))
        ));
    }
}
