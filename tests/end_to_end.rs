//! End-to-end coverage of the parse -> build_nfa -> emit pipeline: one
//! test per observable grammar scenario (alternation, closure,
//! concatenation, escapes, forward references, and the fatal parse
//! errors).

use nfa_gen::input::VecLines;
use nfa_gen::{Builder, Error, StderrDiagnostics};

fn parse_and_build(spec: &str) -> Result<(Builder, nfa_gen::Handle), Error> {
    let mut builder = Builder::new();
    let mut lines = VecLines::new(spec);
    let mut diagnostics = StderrDiagnostics::default();
    builder.parse(&mut lines, &mut diagnostics)?;
    let handle = builder.build_nfa()?;
    Ok((builder, handle))
}

#[test]
fn minimal_single_terminal_produces_a_two_state_nfa() {
    let (mut builder, handle) = parse_and_build("$Start := a\n").unwrap();
    assert_eq!(builder.nfa.state_count(), 2);
    assert_eq!(builder.nfa.edge_count(), 1);

    let mut out = Vec::new();
    nfa_gen::emit::emit_text(&mut builder.nfa, handle, &mut out).unwrap();
    assert!(String::from_utf8(out).unwrap().contains("<start>"));
}

#[test]
fn alternation_unions_two_terminals() {
    let (builder, _handle) = parse_and_build("$S := a | b\n").unwrap();
    assert_eq!(builder.nfa.state_count(), 6);
    assert_eq!(builder.nfa.edge_count(), 6);
}

#[test]
fn closure_wraps_a_single_terminal() {
    let (builder, _handle) = parse_and_build("$S := a*\n").unwrap();
    assert_eq!(builder.nfa.state_count(), 4);
    assert_eq!(builder.nfa.edge_count(), 5);
}

#[test]
fn concatenation_spells_out_multi_byte_terminals() {
    let (builder, _handle) = parse_and_build("$S := if then\n").unwrap();
    assert_eq!(builder.nfa.state_count(), 8);
    assert_eq!(builder.nfa.edge_count(), 7);
}

#[test]
fn escape_sequence_is_decoded_before_interning() {
    let (builder, _handle) = parse_and_build("$S := a@_b\n").unwrap();
    // "a b" (3 bytes) as a single terminal: 4 states, 3 edges.
    assert_eq!(builder.nfa.state_count(), 4);
    assert_eq!(builder.nfa.edge_count(), 3);
}

#[test]
fn forward_reference_is_resolved_after_both_lines_are_parsed() {
    let (builder, _handle) = parse_and_build("$A := $B c\n$B := d\n").unwrap();
    assert_eq!(builder.nonterms.get(0).name, "A");
    assert!(builder.nonterms.get(0).complete);
    assert_eq!(builder.nonterms.get(1).name, "B");
    assert!(builder.nonterms.get(1).complete);
}

#[test]
fn redefinition_of_a_non_terminal_is_a_fatal_parse_error() {
    let err = parse_and_build("$A := a\n$A := b\n").unwrap_err();
    match err {
        Error::Redefinition(name, _) => assert_eq!(name, "A"),
        other => panic!("expected Redefinition, got {:?}", other),
    }
}

#[test]
fn operator_without_a_preceding_operand_is_a_fatal_parse_error() {
    let err = parse_and_build("$A := | a\n").unwrap_err();
    assert!(matches!(err, Error::OperatorWithoutOperand(_)));
}

#[test]
fn blank_lines_and_comments_are_ignored() {
    let (builder, _handle) =
        parse_and_build("! this is a comment\n\n$S := a\n   \n").unwrap();
    assert_eq!(builder.nonterms.len(), 1);
}

#[test]
fn terminal_pool_overflow_is_a_fatal_pool_error_not_a_panic() {
    // One non-terminal whose body is a single terminal bigger than
    // MAX_TOTAL_TERM_LEN overflows the terminal arena on intern.
    let huge_terminal = "x".repeat(nfa_gen::pools::MAX_TOTAL_TERM_LEN + 1);
    let spec = format!("$S := {}\n", huge_terminal);
    let err = parse_and_build(&spec).unwrap_err();
    assert!(matches!(err, Error::PoolOverflow(_)));
    assert!(err.location().is_none());
}
