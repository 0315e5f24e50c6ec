//! `nfa_gen`: parses a line-oriented regex-grammar specification into an
//! expression forest over interned terminals and non-terminal references,
//! then runs Thompson's construction to build a single unified NFA.
//!
//! The pipeline is `Builder::parse` (the recursive-descent line parser)
//! followed by `Builder::build_nfa` (the expression-tree to NFA
//! translation); `emit` renders the result as text or Graphviz.

pub mod builder;
pub mod diagnostics;
pub mod emit;
pub mod error;
pub mod expr;
pub mod input;
pub mod interner;
pub mod nfa;
pub mod nonterm;
pub mod pool;
pub mod pools;

pub use builder::Builder;
pub use diagnostics::{Diagnostics, Location, StderrDiagnostics};
pub use error::Error;
pub use input::{BufReadLines, InputLines};
pub use nfa::Handle;
