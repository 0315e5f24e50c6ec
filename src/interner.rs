//! The terminal interner. Copies a terminal's bytes into the terminal
//! arena, decoding `@`-escapes as it goes, and appends a terminating
//! `NUL`.

use crate::diagnostics::{Diagnostics, Location};
use crate::error::Error;
use crate::pool::{Offset, Pool};
use crate::pools::{ESCAPE_BYTE, MAX_TOTAL_TERM_LEN};

/// `@`-escape mapping table.
fn escape_replacement(byte: u8) -> Option<u8> {
    match byte {
        b'_' => Some(b' '),
        b'@' => Some(b'@'),
        b'|' => Some(b'|'),
        b'*' => Some(b'*'),
        b'$' => Some(b'$'),
        _ => None,
    }
}

#[derive(Debug)]
pub struct TerminalPool {
    pool: Pool<u8>,
}

impl TerminalPool {
    pub fn new() -> Self {
        Self {
            pool: Pool::with_capacity("terminal pool", MAX_TOTAL_TERM_LEN),
        }
    }

    /// Returns the interned byte string starting at `offset`, stopping at
    /// (not including) its terminating `NUL`.
    pub fn bytes_from(&self, offset: Offset) -> &[u8] {
        let start = offset as usize;
        let mut end = start;
        while *self.pool.get(end as Offset) != 0 {
            end += 1;
        }
        self.pool.slice(start, end)
    }

    /// Interns `src`, decoding `@`-escapes, appending a
    /// terminating `NUL`, and returning the offset of the first stored
    /// byte. Unknown escape sequences pass the following byte through
    /// verbatim and emit a warning; an `@` with nothing after it is
    /// fatal.
    pub fn intern(
        &mut self,
        src: &[u8],
        location: Location,
        diagnostics: &mut impl Diagnostics,
    ) -> Result<Offset, Error> {
        let start = self.pool.len() as Offset;
        let mut i = 0;
        while i < src.len() {
            let byte = src[i];
            if byte == ESCAPE_BYTE {
                if i + 1 >= src.len() {
                    return Err(Error::DanglingEscape(location));
                }
                let escaped = src[i + 1];
                let stored = match escape_replacement(escaped) {
                    Some(replacement) => replacement,
                    None => {
                        diagnostics.warning(location, "Incorrect escape sequence");
                        escaped
                    }
                };
                self.pool.allocate(stored)?;
                i += 2;
            } else {
                self.pool.allocate(byte)?;
                i += 1;
            }
        }
        self.pool.allocate(0)?;
        Ok(start)
    }
}
