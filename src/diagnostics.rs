//! The diagnostic channel: fatal errors and warnings, each carrying a
//! source [`Location`].

use std::fmt;
use std::io::{stderr, Write};

/// A line:column position in the grammar specification text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub fn start() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        write!(dest, "{}:{}", self.line, self.column)
    }
}

/// Sink for parser/builder diagnostics. `fatal` reports the message and
/// terminates the run; `warning` reports the message and lets the run
/// continue.
pub trait Diagnostics {
    fn fatal(&mut self, location: Location, message: &str) -> !;
    fn warning(&mut self, location: Location, message: &str);
}

/// The crate's default sink: errors to stderr, process exit on fatal.
#[derive(Debug, Default)]
pub struct StderrDiagnostics {
    pub warning_count: u32,
}

impl Diagnostics for StderrDiagnostics {
    fn fatal(&mut self, location: Location, message: &str) -> ! {
        writeln!(stderr(), "Error {}: {}", location, message).expect("stderr write failed");
        std::process::exit(1);
    }

    fn warning(&mut self, location: Location, message: &str) {
        writeln!(stderr(), "Warning {}: {}", location, message).expect("stderr write failed");
        self.warning_count += 1;
    }
}

/// An in-memory sink for tests: records formatted messages instead of
/// writing to stderr, and panics instead of exiting on `fatal` so test
/// assertions can observe the message.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    pub warnings: Vec<String>,
}

#[cfg(test)]
impl Diagnostics for RecordingDiagnostics {
    fn fatal(&mut self, location: Location, message: &str) -> ! {
        panic!("Error {}: {}", location, message);
    }

    fn warning(&mut self, location: Location, message: &str) {
        self.warnings.push(format!("{}: {}", location, message));
    }
}
