//! The `Builder` context: owns all six arenas and the parse cursors,
//! threading them through both the recursive-descent line parser and the
//! expression-tree-to-NFA translation.

use crate::diagnostics::{Diagnostics, Location};
use crate::error::Error;
use crate::expr::{ExprNode, ExprPool, Op, OperandKind};
use crate::input::InputLines;
use crate::interner::TerminalPool;
use crate::nfa::{Handle, NfaBuilder};
use crate::nonterm::NonTermTable;
use crate::pool::{Offset, NONE};

fn is_ws(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

pub struct Builder {
    pub terminals: TerminalPool,
    pub nonterms: NonTermTable,
    pub exprs: ExprPool,
    pub nfa: NfaBuilder,
    current_line: usize,
    current_column: usize,
    /// Guards re-entrant construction of a non-terminal's NFA: `true` while
    /// `build_nonterm(idx)` is on the call stack, so a self- or mutually-
    /// recursive reference is reported rather than looping forever.
    building: Vec<bool>,
}

impl Builder {
    pub fn new() -> Self {
        Self {
            terminals: TerminalPool::new(),
            nonterms: NonTermTable::new(),
            exprs: ExprPool::new(),
            nfa: NfaBuilder::new(),
            current_line: 0,
            current_column: 0,
            building: Vec::new(),
        }
    }

    fn location(&self) -> Location {
        Location::new(self.current_line, self.current_column)
    }

    fn advance(&mut self, pos: &mut usize) {
        *pos += 1;
        self.current_column += 1;
    }

    fn skip_ws(&mut self, bytes: &[u8], pos: &mut usize, stop_at_newline: bool) {
        while *pos < bytes.len() {
            let byte = bytes[*pos];
            if !is_ws(byte) || (stop_at_newline && byte == b'\n') {
                break;
            }
            self.advance(pos);
        }
    }

    /// Reads every line from `lines`, parsing each one. Returns the first
    /// fatal error encountered; stops cleanly at end of input.
    pub fn parse(
        &mut self,
        lines: &mut impl InputLines,
        diagnostics: &mut impl Diagnostics,
    ) -> Result<(), Error> {
        while let Some(line) = lines.next_line().expect("input line read failed") {
            self.current_line += 1;
            self.current_column = 0;
            self.parse_line(line.as_bytes(), diagnostics)?;
        }
        Ok(())
    }

    fn parse_line(&mut self, bytes: &[u8], diagnostics: &mut impl Diagnostics) -> Result<(), Error> {
        let mut pos = 0;
        self.skip_ws(bytes, &mut pos, false);

        if pos >= bytes.len() || bytes[pos] == b'!' {
            return Ok(());
        }

        let nonterm_idx = self.parse_header(bytes, &mut pos)?;
        let root_expr = self.parse_body(bytes, &mut pos, diagnostics)?;
        self.nonterms.mark_complete(nonterm_idx, root_expr);
        Ok(())
    }

    fn parse_header(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Offset, Error> {
        if *pos >= bytes.len() || bytes[*pos] != b'$' {
            return Err(Error::MissingNonTerminalHeader(self.location()));
        }
        let header_location = self.location();
        let name_start = *pos;
        self.advance(pos);

        while *pos < bytes.len() && !is_ws(bytes[*pos]) {
            self.advance(pos);
        }

        if *pos == name_start + 1 {
            return Err(Error::EmptyNonTerminalName(self.location()));
        }
        if *pos >= bytes.len() || bytes[*pos] == b'\n' {
            return Err(Error::MissingHeaderSeparator(header_location));
        }

        let name = String::from_utf8_lossy(&bytes[name_start + 1..*pos]).into_owned();
        if name.len() > crate::pools::MAX_NONTERM_NAME {
            return Err(Error::NonTerminalNameTooLong(name, header_location));
        }

        let idx = match self.nonterms.find(&name) {
            Some(existing) if self.nonterms.get(existing).complete => {
                return Err(Error::Redefinition(name, self.location()));
            }
            Some(existing) => existing,
            None => self.nonterms.forward_declare(&name)?,
        };

        self.skip_ws(bytes, pos, true);
        if *pos + 1 >= bytes.len() || bytes[*pos] != b':' || bytes[*pos + 1] != b'=' {
            return Err(Error::MissingHeaderSeparator(self.location()));
        }
        self.advance(pos);
        self.advance(pos);

        self.skip_ws(bytes, pos, true);
        if *pos >= bytes.len() || bytes[*pos] == b'\n' {
            return Err(Error::MissingBody(self.location()));
        }

        Ok(idx)
    }

    fn parse_body(
        &mut self,
        bytes: &[u8],
        pos: &mut usize,
        diagnostics: &mut impl Diagnostics,
    ) -> Result<Offset, Error> {
        let root_off = self.exprs.allocate(ExprNode::empty())?;
        let mut current_expr = root_off;
        let mut prev_expr = root_off;
        // The node ultimately handed back as this body's root. Usually
        // `root_off`, except when the very first operand is a closure: the
        // splice below then has no real parent to retarget (`prev_expr ==
        // current_expr` on the first iteration), so the freshly allocated
        // wrapper node must become the root itself instead of being linked
        // in from a parent that doesn't yet exist.
        let mut body_root = root_off;

        while let Some((operand_kind, operand_off)) = self.parse_operand(bytes, pos, diagnostics)? {
            let opcode = self.parse_operator(bytes, pos);

            {
                let node = self.exprs.get_mut(current_expr);
                node.op1 = operand_off;
                node.op1_kind = operand_kind;
                node.op = opcode;
            }

            if opcode == Op::ZeroOrMore {
                {
                    let node = self.exprs.get_mut(current_expr);
                    node.op2 = NONE;
                    node.op2_kind = OperandKind::Nothing;
                }
                let wrapper_op = self.parse_operator(bytes, pos);
                let wrapper_off = self.exprs.allocate(ExprNode::empty())?;
                {
                    let wrapper = self.exprs.get_mut(wrapper_off);
                    wrapper.op1 = current_expr;
                    wrapper.op1_kind = OperandKind::NestedExpr;
                    wrapper.op = wrapper_op;
                }
                if current_expr == prev_expr {
                    body_root = wrapper_off;
                } else {
                    let prev = self.exprs.get_mut(prev_expr);
                    prev.op2 = wrapper_off;
                    prev.op2_kind = OperandKind::NestedExpr;
                }
                current_expr = wrapper_off;
            }

            let successor_off = self.exprs.allocate(ExprNode::empty())?;
            {
                let node = self.exprs.get_mut(current_expr);
                node.op2 = successor_off;
                node.op2_kind = OperandKind::NestedExpr;
            }
            prev_expr = current_expr;
            current_expr = successor_off;
        }

        let tail = self.exprs.get(prev_expr);
        assert!(
            tail.op == Op::NoOp || tail.op == Op::ZeroOrMore,
            "last expression of a non-terminal's body should be a no-op or closure"
        );

        self.exprs.release_last();
        {
            let prev = self.exprs.get_mut(prev_expr);
            prev.op2 = NONE;
            prev.op2_kind = OperandKind::Nothing;
        }

        Ok(body_root)
    }

    fn parse_operand(
        &mut self,
        bytes: &[u8],
        pos: &mut usize,
        diagnostics: &mut impl Diagnostics,
    ) -> Result<Option<(OperandKind, Offset)>, Error> {
        self.skip_ws(bytes, pos, true);

        if *pos >= bytes.len() || bytes[*pos] == b'\n' {
            return Ok(None);
        }
        if bytes[*pos] == b'|' || bytes[*pos] == b'*' {
            return Err(Error::OperatorWithoutOperand(self.location()));
        }

        let operand_start = *pos;
        while *pos < bytes.len() && !is_ws(bytes[*pos]) {
            self.advance(pos);
        }

        if *pos >= operand_start + 2
            && bytes[*pos - 1] == b'*'
            && bytes[*pos - 2] != crate::pools::ESCAPE_BYTE
        {
            *pos -= 1;
            self.current_column -= 1;
        }

        let token = &bytes[operand_start..*pos];

        if token[0] == b'$' {
            if token.len() == 1 {
                return Err(Error::EmptyNonTerminalName(self.location()));
            }
            let name = String::from_utf8_lossy(&token[1..]).into_owned();
            if name.len() > crate::pools::MAX_NONTERM_NAME {
                return Err(Error::NonTerminalNameTooLong(name, self.location()));
            }
            let idx = match self.nonterms.find(&name) {
                Some(existing) => existing,
                None => self.nonterms.forward_declare(&name)?,
            };
            Ok(Some((OperandKind::NonTerminal, idx)))
        } else {
            let offset = self.terminals.intern(token, self.location(), diagnostics)?;
            Ok(Some((OperandKind::Terminal, offset)))
        }
    }

    fn parse_operator(&mut self, bytes: &[u8], pos: &mut usize) -> Op {
        self.skip_ws(bytes, pos, true);
        if *pos >= bytes.len() || bytes[*pos] == b'\n' {
            Op::NoOp
        } else if bytes[*pos] == b'|' {
            self.advance(pos);
            Op::Or
        } else if bytes[*pos] == b'*' {
            self.advance(pos);
            Op::ZeroOrMore
        } else {
            Op::And
        }
    }

    /// Reports the first non-terminal that was referenced but never
    /// defined, if any.
    pub fn finish_parse(&self) -> Result<(), Error> {
        if let Some(nonterm) = self.nonterms.first_undefined() {
            return Err(Error::UndefinedNonTerminal(nonterm.name.clone()));
        }
        Ok(())
    }

    /// Runs Thompson's construction over every parsed non-terminal and
    /// unions them into a single NFA, in table order starting from slot 0.
    ///
    /// Every table entry gets its own fresh construction here, even one
    /// that some other non-terminal's body also references inline via
    /// `build_operand`'s `NonTerminal` arm: `build_nonterm` never caches or
    /// reuses a `Handle` across calls, so a non-terminal referenced both
    /// inline and as a top-level alternative of its own ends up as two
    /// independent (but language-equivalent) subautomata, never as one
    /// handle OR'd against itself. This matches the original construction's
    /// rebuild-on-every-reference behaviour; only cycle detection is new.
    pub fn build_nfa(&mut self) -> Result<Handle, Error> {
        self.finish_parse()?;
        let count = self.nonterms.len();
        assert!(count > 0, "no non-terminals defined");
        self.building = vec![false; count];

        let mut union_handle = self.build_nonterm(0)?;
        for idx in 1..count as Offset {
            let handle = self.build_nonterm(idx)?;
            self.nfa.or_inplace(&mut union_handle, handle)?;
        }
        Ok(union_handle)
    }

    /// Builds a fresh NFA for non-terminal `idx` from its expression tree.
    /// Guards against direct or indirect recursion (a non-terminal whose
    /// construction re-enters itself before finishing) with
    /// `Error::RecursiveNonTerminal`; does not memoize, so each call
    /// allocates new states even for a non-terminal already built elsewhere.
    fn build_nonterm(&mut self, idx: Offset) -> Result<Handle, Error> {
        if self.building[idx as usize] {
            let name = self.nonterms.get(idx).name.clone();
            return Err(Error::RecursiveNonTerminal(name));
        }
        self.building[idx as usize] = true;
        let root_expr = self.nonterms.get(idx).root_expr;
        let handle = self.build_expr(root_expr);
        self.building[idx as usize] = false;
        handle
    }

    fn build_expr(&mut self, expr_off: Offset) -> Result<Handle, Error> {
        let node = *self.exprs.get(expr_off);
        let mut lhs = self.build_operand(node.op1, node.op1_kind)?;
        match node.op {
            Op::NoOp => Ok(lhs),
            Op::Or => {
                let rhs = self.build_operand(node.op2, node.op2_kind)?;
                self.nfa.or_inplace(&mut lhs, rhs)?;
                Ok(lhs)
            }
            Op::And => {
                let rhs = self.build_operand(node.op2, node.op2_kind)?;
                self.nfa.concat_inplace(&mut lhs, rhs)?;
                Ok(lhs)
            }
            Op::ZeroOrMore => {
                self.nfa.closure_inplace(&mut lhs)?;
                Ok(lhs)
            }
        }
    }

    fn build_operand(&mut self, off: Offset, kind: OperandKind) -> Result<Handle, Error> {
        match kind {
            OperandKind::NestedExpr => self.build_expr(off),
            OperandKind::NonTerminal => self.build_nonterm(off),
            OperandKind::Terminal => {
                let bytes = self.terminals.bytes_from(off).to_vec();
                Ok(self.nfa.build_terminal(&bytes)?)
            }
            OperandKind::Nothing => unreachable!("build_operand reached a NOTHING operand"),
        }
    }
}
