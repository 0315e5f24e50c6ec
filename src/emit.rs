//! Emitting the built NFA as plain text or Graphviz. A depth-first walk
//! driven by each state's `visited` bit, one emitter for each output
//! form side by side.

use std::io::{self, Write};

use crate::nfa::{Handle, NfaBuilder, StateKind};
use crate::pool::Offset;
use crate::pools::EPSILON;

fn state_label(offset: Offset) -> String {
    format!("State {}", offset)
}

fn kind_suffix(kind: StateKind) -> &'static str {
    match kind {
        StateKind::Start => " <start>",
        StateKind::Accepting => " <accept>",
        StateKind::Internal => "",
    }
}

fn symbol_label(symbol: u8) -> String {
    if symbol == EPSILON {
        "eps".to_string()
    } else if symbol.is_ascii_graphic() || symbol == b' ' {
        format!("{}", symbol as char)
    } else {
        format!("\\x{:02x}", symbol)
    }
}

/// Writes a depth-first text dump of the NFA reachable from `handle.start`,
/// one line per state and one indented line per outgoing edge.
pub fn emit_text(nfa: &mut NfaBuilder, handle: Handle, out: &mut impl Write) -> io::Result<()> {
    nfa.clear_visited();
    emit_text_from(nfa, handle.start, out)
}

fn emit_text_from(nfa: &mut NfaBuilder, offset: Offset, out: &mut impl Write) -> io::Result<()> {
    if nfa.state(offset).visited {
        return Ok(());
    }
    nfa.state_mut(offset).visited = true;

    let kind = nfa.state(offset).kind;
    writeln!(out, "{}{}", state_label(offset), kind_suffix(kind))?;

    let edges: Vec<_> = nfa.state(offset).edges.clone();
    for edge_off in &edges {
        let edge = *nfa.edge(*edge_off);
        writeln!(
            out,
            "  ==({})==> {}",
            symbol_label(edge.symbol),
            state_label(edge.target)
        )?;
    }
    for edge_off in &edges {
        let target = nfa.edge(*edge_off).target;
        emit_text_from(nfa, target, out)?;
    }
    Ok(())
}

/// Writes a Graphviz `digraph` rendering of the NFA reachable from
/// `handle.start`. Start state is a green box, accepting a red box,
/// everything else left unstyled; epsilon edges are labelled `eps`.
pub fn emit_dot(nfa: &mut NfaBuilder, handle: Handle, out: &mut impl Write) -> io::Result<()> {
    nfa.clear_visited();
    writeln!(out, "digraph NFA {{")?;
    writeln!(out, "  rankdir=LR;")?;
    emit_dot_from(nfa, handle.start, out)?;
    writeln!(out, "}}")
}

fn node_name(offset: Offset) -> String {
    format!("S{}", offset)
}

fn emit_dot_from(nfa: &mut NfaBuilder, offset: Offset, out: &mut impl Write) -> io::Result<()> {
    if nfa.state(offset).visited {
        return Ok(());
    }
    nfa.state_mut(offset).visited = true;

    let kind = nfa.state(offset).kind;
    let name = node_name(offset);
    match kind {
        StateKind::Start => writeln!(
            out,
            "  {} [shape=box, style=filled, fillcolor=green];",
            name
        )?,
        StateKind::Accepting => {
            writeln!(out, "  {} [shape=box, style=filled, fillcolor=red];", name)?
        }
        StateKind::Internal => {}
    }

    let edges: Vec<_> = nfa.state(offset).edges.clone();
    for edge_off in &edges {
        let edge = *nfa.edge(*edge_off);
        let label = symbol_label(edge.symbol);
        writeln!(
            out,
            "  {} -> {} [label=\"{}\"];",
            name,
            node_name(edge.target),
            label
        )?;
    }
    for edge_off in &edges {
        let target = nfa.edge(*edge_off).target;
        emit_dot_from(nfa, target, out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_emit_visits_every_reachable_state_once() {
        let mut nfa = NfaBuilder::new();
        let mut a = nfa.build_single_symbol(b'a').unwrap();
        let b = nfa.build_single_symbol(b'b').unwrap();
        nfa.or_inplace(&mut a, b).unwrap();

        let mut out = Vec::new();
        emit_text(&mut nfa, a, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let state_headers = text.lines().filter(|line| line.starts_with("State")).count();

        assert_eq!(state_headers, 6); // 6 states, each printed once
        assert!(text.contains("<start>"));
        assert!(text.contains("<accept>"));
        assert!(text.contains("==(eps)==>"));
        assert!(text.contains("==(a)==>"));
    }

    #[test]
    fn dot_emit_produces_a_well_formed_digraph() {
        let mut nfa = NfaBuilder::new();
        let h = nfa.build_single_symbol(b'a').unwrap();

        let mut out = Vec::new();
        emit_dot(&mut nfa, h, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("digraph NFA {"));
        assert!(text.trim_end().ends_with('}'));
        assert!(text.contains("fillcolor=green"));
        assert!(text.contains("fillcolor=red"));
        assert!(text.contains("label=\"a\""));
    }

    #[test]
    fn cyclic_closure_does_not_loop_forever() {
        let mut nfa = NfaBuilder::new();
        let mut h = nfa.build_single_symbol(b'a').unwrap();
        nfa.closure_inplace(&mut h).unwrap();

        let mut out = Vec::new();
        emit_text(&mut nfa, h, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let state_headers = text.lines().filter(|line| line.starts_with("State")).count();
        assert_eq!(state_headers, 4);
    }
}
