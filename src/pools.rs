//! Pool capacity constants for the arenas in this crate.

/// Total bytes of interned terminal text the terminal pool can hold.
pub const MAX_TOTAL_TERM_LEN: usize = 8192;
/// Maximum number of non-terminals a single run can define or reference.
pub const MAX_NONTERMS: usize = 256;
/// Maximum byte length of a non-terminal's name.
pub const MAX_NONTERM_NAME: usize = 64;
/// Expression pool capacity: sized for an average of 4 nested
/// expressions per non-terminal.
pub const MAX_NESTED_EXPRS: usize = 4 * MAX_NONTERMS;
/// Maximum length, in bytes, of a single logical spec line.
pub const MAX_REGEX_LEN: usize = 1024;

/// Maximum number of outgoing edges any single NFA state may carry.
pub const MAX_EDGES_PER_NODE: usize = 128;
/// NFA state pool capacity.
pub const MAX_NFA_STATES: usize = 1024;
/// NFA edge pool capacity: a constant factor of 10 over the worst-case
/// count of expressions/non-terminals, generous enough to cover
/// multi-byte terminals being split into one edge per byte.
pub const MAX_NFA_EDGES: usize = 10 * (MAX_NESTED_EXPRS + MAX_NONTERMS);
/// NFA handle pool capacity.
pub const MAX_NFAS: usize = MAX_NFA_STATES / 4;

/// The escape byte used by the terminal interner.
pub const ESCAPE_BYTE: u8 = b'@';
/// The byte value denoting an epsilon transition.
pub const EPSILON: u8 = 0;
