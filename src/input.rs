//! A producer of textual lines for the grammar parser. This module
//! supplies the trait seam plus a straightforward `BufRead`-backed
//! implementation for the CLI driver and an in-memory one for tests.

use std::io::{self, BufRead};

/// Yields the grammar specification one logical line at a time, including
/// the trailing `\n` where present (`parse_header`/`parse_body` rely on
/// it to detect end-of-line).
pub trait InputLines {
    /// Returns the next line, or `None` at end of input. `Err` propagates
    /// an underlying I/O failure (reading this line is the only thing in
    /// this crate that can hit one).
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Reads lines from any `BufRead`, truncating to `MAX_REGEX_LEN` bytes;
/// lines exceeding that capacity are truncated by the reader rather than
/// rejected.
pub struct BufReadLines<R> {
    reader: R,
}

impl<R: BufRead> BufReadLines<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> InputLines for BufReadLines<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        let bytes_read = self.reader.read_line(&mut line)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        if line.len() > crate::pools::MAX_REGEX_LEN {
            line.truncate(crate::pools::MAX_REGEX_LEN);
        }
        Ok(Some(line))
    }
}

/// An in-memory line source, handy for tests and for the CLI's `--both`
/// mode where the whole spec is read up front.
pub struct VecLines {
    lines: std::vec::IntoIter<String>,
}

impl VecLines {
    pub fn new(text: &str) -> Self {
        let lines = text
            .split_inclusive('\n')
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .into_iter();
        Self { lines }
    }
}

impl InputLines for VecLines {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_lines_splits_on_newline_keeping_terminator() {
        let mut lines = VecLines::new("$A := a\n$B := b\n");
        assert_eq!(lines.next_line().unwrap(), Some("$A := a\n".to_string()));
        assert_eq!(lines.next_line().unwrap(), Some("$B := b\n".to_string()));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn vec_lines_handles_missing_final_newline() {
        let mut lines = VecLines::new("$A := a");
        assert_eq!(lines.next_line().unwrap(), Some("$A := a".to_string()));
        assert_eq!(lines.next_line().unwrap(), None);
    }

    #[test]
    fn buf_read_lines_reads_from_a_cursor() {
        let cursor = std::io::Cursor::new(b"$A := a\n".to_vec());
        let mut lines = BufReadLines::new(cursor);
        assert_eq!(lines.next_line().unwrap(), Some("$A := a\n".to_string()));
        assert_eq!(lines.next_line().unwrap(), None);
    }
}
