//! The NFA pools and Thompson's-construction primitives: `build_single_symbol`,
//! `build_terminal`, `concat_inplace`, `or_inplace`, and `closure_inplace`
//! each mutate a [`Handle`] in place so the composed automaton always has
//! exactly one start state and one accepting state.

use crate::pool::{Offset, Pool};
use crate::pools::{EPSILON, MAX_EDGES_PER_NODE, MAX_NFAS, MAX_NFA_EDGES, MAX_NFA_STATES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateKind {
    Start,
    Internal,
    Accepting,
}

#[derive(Debug, Clone)]
pub struct NfaState {
    pub edges: Vec<Offset>,
    pub kind: StateKind,
    pub visited: bool,
}

impl NfaState {
    fn new(kind: StateKind) -> Self {
        Self {
            edges: Vec::new(),
            kind,
            visited: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct NfaEdge {
    pub target: Offset,
    pub symbol: u8,
}

/// A subautomaton's single entry and single exit state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    pub start: Offset,
    pub accepting: Offset,
}

#[derive(Debug)]
pub struct NfaBuilder {
    states: Pool<NfaState>,
    edges: Pool<NfaEdge>,
    handles: Pool<Handle>,
}

impl NfaBuilder {
    pub fn new() -> Self {
        Self {
            states: Pool::with_capacity("NFA state pool", MAX_NFA_STATES),
            edges: Pool::with_capacity("NFA edge pool", MAX_NFA_EDGES),
            handles: Pool::with_capacity("NFA handle pool", MAX_NFAS),
        }
    }

    pub fn state(&self, offset: Offset) -> &NfaState {
        self.states.get(offset)
    }

    pub fn state_mut(&mut self, offset: Offset) -> &mut NfaState {
        self.states.get_mut(offset)
    }

    pub fn edge(&self, offset: Offset) -> &NfaEdge {
        self.edges.get(offset)
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn new_state(&mut self, kind: StateKind) -> Result<Offset, crate::pool::PoolOverflow> {
        self.states.allocate(NfaState::new(kind))
    }

    fn new_edge(&mut self, target: Offset, symbol: u8) -> Result<Offset, crate::pool::PoolOverflow> {
        self.edges.allocate(NfaEdge { target, symbol })
    }

    /// Adds an edge from `from` to `target` carrying `symbol` (`EPSILON`
    /// for ε). Panics if `from` is already at `MAX_EDGES_PER_NODE`.
    fn add_edge(
        &mut self,
        from: Offset,
        target: Offset,
        symbol: u8,
    ) -> Result<(), crate::pool::PoolOverflow> {
        let edge_off = self.new_edge(target, symbol)?;
        let state = self.state_mut(from);
        assert!(
            state.edges.len() < MAX_EDGES_PER_NODE,
            "state {} exceeded MAX_EDGES_PER_NODE",
            from
        );
        state.edges.push(edge_off);
        Ok(())
    }

    fn demote(&mut self, offset: Offset) {
        self.state_mut(offset).kind = StateKind::Internal;
    }

    fn new_handle(&mut self, start: Offset, accepting: Offset) -> Result<Handle, crate::pool::PoolOverflow> {
        let handle = Handle { start, accepting };
        self.handles.allocate(handle)?;
        Ok(handle)
    }

    /// Builds a handle for a single symbol: a start state, an accepting
    /// state, and one edge between them.
    pub fn build_single_symbol(&mut self, symbol: u8) -> Result<Handle, crate::pool::PoolOverflow> {
        debug_assert_ne!(symbol, EPSILON, "a terminal symbol may not be epsilon");
        let start = self.new_state(StateKind::Start)?;
        let accepting = self.new_state(StateKind::Accepting)?;
        self.add_edge(start, accepting, symbol)?;
        self.new_handle(start, accepting)
    }

    /// Builds a handle spelling out the bytes of `text` in sequence, one
    /// state and edge per byte. `text` must be non-empty.
    pub fn build_terminal(&mut self, text: &[u8]) -> Result<Handle, crate::pool::PoolOverflow> {
        assert!(!text.is_empty(), "empty terminal");
        if text.len() == 1 {
            return self.build_single_symbol(text[0]);
        }
        let start = self.new_state(StateKind::Start)?;
        let mut prev = start;
        for &byte in &text[..text.len() - 1] {
            let next = self.new_state(StateKind::Internal)?;
            self.add_edge(prev, next, byte)?;
            prev = next;
        }
        let accepting = self.new_state(StateKind::Accepting)?;
        self.add_edge(prev, accepting, *text.last().unwrap())?;
        self.new_handle(start, accepting)
    }

    /// Concatenates `h2` onto `h1` in place by linking `h1`'s accepting
    /// state to `h2`'s start state with an epsilon edge.
    pub fn concat_inplace(&mut self, h1: &mut Handle, h2: Handle) -> Result<(), crate::pool::PoolOverflow> {
        assert_ne!(h1.start, h2.start, "trying to concatenate an NFA to itself");
        self.demote(h1.accepting);
        self.demote(h2.start);
        self.add_edge(h1.accepting, h2.start, EPSILON)?;
        h1.accepting = h2.accepting;
        Ok(())
    }

    /// Alternates `h1` and `h2` in place, leaving the result in `h1`.
    pub fn or_inplace(&mut self, h1: &mut Handle, h2: Handle) -> Result<(), crate::pool::PoolOverflow> {
        assert_ne!(h1.start, h2.start, "trying to OR an NFA with itself");
        let new_start = self.new_state(StateKind::Start)?;
        let new_accepting = self.new_state(StateKind::Accepting)?;
        self.demote(h1.start);
        self.demote(h1.accepting);
        self.demote(h2.start);
        self.demote(h2.accepting);
        self.add_edge(new_start, h1.start, EPSILON)?;
        self.add_edge(new_start, h2.start, EPSILON)?;
        self.add_edge(h1.accepting, new_accepting, EPSILON)?;
        self.add_edge(h2.accepting, new_accepting, EPSILON)?;
        h1.start = new_start;
        h1.accepting = new_accepting;
        Ok(())
    }

    /// Closes `h` under Kleene star in place.
    pub fn closure_inplace(&mut self, h: &mut Handle) -> Result<(), crate::pool::PoolOverflow> {
        let new_start = self.new_state(StateKind::Start)?;
        let new_accepting = self.new_state(StateKind::Accepting)?;
        self.demote(h.start);
        self.demote(h.accepting);
        self.add_edge(new_start, h.start, EPSILON)?;
        self.add_edge(new_start, new_accepting, EPSILON)?;
        self.add_edge(h.accepting, h.start, EPSILON)?;
        self.add_edge(h.accepting, new_accepting, EPSILON)?;
        h.start = new_start;
        h.accepting = new_accepting;
        Ok(())
    }

    /// Clears every state's `visited` bit, used before each DFS walk in
    /// the emitter.
    pub fn clear_visited(&mut self) {
        for offset in 0..self.states.len() as Offset {
            self.state_mut(offset).visited = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_symbol_nfa_has_two_states_one_edge() {
        let mut nfa = NfaBuilder::new();
        let h = nfa.build_single_symbol(b'a').unwrap();
        assert_eq!(nfa.state_count(), 2);
        assert_eq!(nfa.edge_count(), 1);
        assert_eq!(nfa.state(h.start).kind, StateKind::Start);
        assert_eq!(nfa.state(h.accepting).kind, StateKind::Accepting);
    }

    #[test]
    fn concat_merges_accept_into_next_start_via_epsilon() {
        let mut nfa = NfaBuilder::new();
        let mut a = nfa.build_single_symbol(b'a').unwrap();
        let b = nfa.build_single_symbol(b'b').unwrap();
        let old_a_accept = a.accepting;
        nfa.concat_inplace(&mut a, b).unwrap();
        assert_eq!(nfa.state(old_a_accept).kind, StateKind::Internal);
        assert_eq!(nfa.state(b.start).kind, StateKind::Internal);
        assert_eq!(a.accepting, b.accepting);
        assert_eq!(nfa.state_count(), 4);
    }

    #[test]
    fn or_creates_new_start_and_accept_with_four_epsilons() {
        let mut nfa = NfaBuilder::new();
        let mut a = nfa.build_single_symbol(b'a').unwrap();
        let b = nfa.build_single_symbol(b'b').unwrap();
        nfa.or_inplace(&mut a, b).unwrap();
        assert_eq!(nfa.state_count(), 6);
        assert_eq!(nfa.edge_count(), 6); // 2 symbol edges + 4 epsilon edges
        assert_eq!(nfa.state(a.start).kind, StateKind::Start);
        assert_eq!(nfa.state(a.accepting).kind, StateKind::Accepting);
    }

    #[test]
    fn closure_adds_new_start_accept_and_four_epsilons() {
        let mut nfa = NfaBuilder::new();
        let mut a = nfa.build_single_symbol(b'a').unwrap();
        nfa.closure_inplace(&mut a).unwrap();
        assert_eq!(nfa.state_count(), 4);
        assert_eq!(nfa.edge_count(), 5); // 1 symbol edge + 4 epsilon edges
    }

    #[test]
    fn multi_byte_terminal_spells_bytes_in_sequence() {
        let mut nfa = NfaBuilder::new();
        let h = nfa.build_terminal(b"then").unwrap();
        // 4 bytes => 5 states (start + 3 internal + accepting), 4 edges
        assert_eq!(nfa.state_count(), 5);
        assert_eq!(nfa.edge_count(), 4);
        let mut state = h.start;
        for &expected in b"then" {
            let edges = &nfa.state(state).edges;
            assert_eq!(edges.len(), 1);
            let edge = nfa.edge(edges[0]);
            assert_eq!(edge.symbol, expected);
            state = edge.target;
        }
        assert_eq!(state, h.accepting);
    }

    #[test]
    #[should_panic(expected = "itself")]
    fn concat_of_handle_with_itself_is_an_assertion_failure() {
        let mut nfa = NfaBuilder::new();
        let mut a = nfa.build_single_symbol(b'a').unwrap();
        let a2 = a;
        nfa.concat_inplace(&mut a, a2).unwrap();
    }
}
