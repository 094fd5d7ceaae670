//! Logical line reader
//!
//! A physical line ending in a backslash continues on the next physical line:
//! the backslash is dropped and the two are joined. Each logical line is
//! reported with the number of the physical line it started on.

use std::io::{self, BufRead};

/// Marks a physical line that continues on the next one
pub const CONTINUATION: char = '\\';

/// Iterator over the logical lines of a batchfile
pub struct LogicalLines<R> {
    reader: R,
    physical: usize,
    done: bool,
}

impl<R: BufRead> LogicalLines<R> {
    pub const fn new(reader: R) -> Self {
        Self {
            reader,
            physical: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for LogicalLines<R> {
    type Item = io::Result<(usize, String)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut logical = String::new();
        let mut start = None;
        loop {
            let mut buf = String::new();
            match self.reader.read_line(&mut buf) {
                Ok(0) => {
                    self.done = true;
                    // a trailing continuation still yields what was collected
                    return start.map(|line| Ok((line, logical)));
                }
                Ok(_) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
            self.physical += 1;
            start.get_or_insert(self.physical);

            let content = buf.trim_end_matches(['\n', '\r']);
            if let Some(joined) = content.strip_suffix(CONTINUATION) {
                logical.push_str(joined);
                continue;
            }
            logical.push_str(content);
            return start.map(|line| Ok((line, logical)));
        }
    }
}

/// Split a batchfile into logical lines
pub fn logical_lines<R: BufRead>(reader: R) -> LogicalLines<R> {
    LogicalLines::new(reader)
}
