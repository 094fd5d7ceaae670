//! Output formatting for CLI display
//!
//! Renders the per-file preview shown before tags are written: a header
//! naming the file and one row per key, with long values wrapped under the
//! value column.

use colored::Colorize;

/// Width of the key column, keys are padded with dots up to it
pub const KEY_COLUMN: usize = 30;
/// Columns taken by the key column and its separator
const GUTTER: usize = KEY_COLUMN + 2;
/// Narrowest value column used for wrapping
const MIN_VALUE_WIDTH: usize = 16;
/// Width assumed when the terminal size is unknown
pub const DEFAULT_WIDTH: usize = 80;

/// Current terminal width in columns
#[must_use]
pub fn terminal_width() -> usize {
    crossterm::terminal::size().map_or(DEFAULT_WIDTH, |(cols, _)| usize::from(cols))
}

/// Split a value into chunks of at most `width` characters
#[must_use]
pub fn wrap_value(value: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = value.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Header line naming the file being previewed
#[must_use]
pub fn file_header(path: &str, dry_run: bool) -> String {
    if dry_run {
        format!("DRY RUN File: {}", path.bold())
    } else {
        format!("File: {}", path.bold())
    }
}

/// Rows for one key, the first carrying the key
#[must_use]
pub fn key_rows(key: &str, value: &str, total_width: usize) -> Vec<String> {
    let value_width = total_width.saturating_sub(GUTTER).max(MIN_VALUE_WIDTH);
    wrap_value(value, value_width)
        .into_iter()
        .enumerate()
        .map(|(i, chunk)| {
            let label = if i == 0 {
                format!("{key:.<width$}", width = KEY_COLUMN)
            } else {
                " ".repeat(KEY_COLUMN)
            };
            format!("{label}  {}", chunk.underline())
        })
        .collect()
}

/// Full preview of a file's tags
#[must_use]
pub fn preview<'a>(
    path: &str,
    tags: impl IntoIterator<Item = (&'a str, &'a str)>,
    total_width: usize,
    dry_run: bool,
) -> Vec<String> {
    let mut lines = vec![String::new(), file_header(path, dry_run)];
    for (key, value) in tags {
        lines.extend(key_rows(key, value, total_width));
    }
    lines
}
