//! Fatal-error variants surfaced by the builder, modelled on
//! `src/analyzer.rs::Error<T>`: a plain enum, a hand-written `Display`,
//! and a blanket `std::error::Error` impl with no extra machinery.

use std::fmt;

use crate::diagnostics::Location;
use crate::pool::PoolOverflow;

#[derive(Debug, Clone)]
pub enum Error {
    /// A line's first non-whitespace byte is not `$` and not `!`.
    MissingNonTerminalHeader(Location),
    /// `$` immediately followed by whitespace or end of line.
    EmptyNonTerminalName(Location),
    /// A non-terminal name longer than `MAX_NONTERM_NAME`.
    NonTerminalNameTooLong(String, Location),
    /// `:=` missing or malformed (no interior whitespace allowed).
    MissingHeaderSeparator(Location),
    /// Header parsed but the body is empty.
    MissingBody(Location),
    /// `|` or `*` encountered where an operand was expected.
    OperatorWithoutOperand(Location),
    /// `@` as the last byte of a terminal token.
    DanglingEscape(Location),
    /// Re-definition of an already-complete non-terminal.
    Redefinition(String, Location),
    /// A non-terminal is referenced but never defined.
    UndefinedNonTerminal(String),
    /// A non-terminal's construction re-enters itself before completing.
    RecursiveNonTerminal(String),
    /// Any of the six arenas exceeded its fixed capacity.
    PoolOverflow(PoolOverflow),
}

impl From<PoolOverflow> for Error {
    fn from(overflow: PoolOverflow) -> Self {
        Error::PoolOverflow(overflow)
    }
}

impl Error {
    /// The source location this error should be reported at, where one
    /// applies. `UndefinedNonTerminal`, `RecursiveNonTerminal`, and
    /// `PoolOverflow` are detected after the line that caused them has
    /// long since been consumed, so they carry none.
    pub fn location(&self) -> Option<Location> {
        match self {
            Error::MissingNonTerminalHeader(loc)
            | Error::EmptyNonTerminalName(loc)
            | Error::NonTerminalNameTooLong(_, loc)
            | Error::MissingHeaderSeparator(loc)
            | Error::MissingBody(loc)
            | Error::OperatorWithoutOperand(loc)
            | Error::DanglingEscape(loc)
            | Error::Redefinition(_, loc) => Some(*loc),
            Error::UndefinedNonTerminal(_)
            | Error::RecursiveNonTerminal(_)
            | Error::PoolOverflow(_) => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, dest: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::MissingNonTerminalHeader(_) => write!(
                dest,
                "Malformed regex spec line. Each line must specify a non-terminal"
            ),
            Error::EmptyNonTerminalName(_) => write!(dest, "Empty non-terminal name"),
            Error::NonTerminalNameTooLong(name, _) => {
                write!(dest, "Non-terminal name too long: {}", name)
            }
            Error::MissingHeaderSeparator(_) => {
                write!(dest, "Missing definition of a non-terminal")
            }
            Error::MissingBody(_) => {
                write!(dest, "Missing definition of a non-terminal")
            }
            Error::OperatorWithoutOperand(_) => {
                write!(dest, "An operator without an operand")
            }
            Error::DanglingEscape(_) => write!(
                dest,
                "An incomplete escape sequence at the end of a string"
            ),
            Error::Redefinition(name, _) => {
                write!(dest, "Re-definition of a non-terminal: {}", name)
            }
            Error::UndefinedNonTerminal(name) => {
                write!(dest, "Undefined non-terminal: {}", name)
            }
            Error::RecursiveNonTerminal(name) => {
                write!(dest, "Recursive non-terminal (unsupported): {}", name)
            }
            Error::PoolOverflow(overflow) => write!(dest, "{}", overflow),
        }
    }
}

impl std::error::Error for Error {}
