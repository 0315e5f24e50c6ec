//! The non-terminal table: names are entered in first-encounter order
//! and may be forward-declared before their definition is parsed.

use crate::pool::{Offset, Pool, PoolOverflow, NONE};
use crate::pools::{MAX_NONTERMS, MAX_NONTERM_NAME};

#[derive(Debug, Clone)]
pub struct NonTerm {
    pub name: String,
    /// Offset of the root expression node defining this non-terminal.
    /// `NONE` until the entry's first expression node is allocated.
    pub root_expr: Offset,
    /// `false` while forward-referenced but not yet defined.
    pub complete: bool,
    /// Equal to this entry's own offset; carried for debugging and
    /// emitter labels.
    pub idx: Offset,
}

impl NonTerm {
    fn forward_declared(name: &str, idx: Offset) -> Self {
        Self {
            name: name.to_string(),
            root_expr: NONE,
            complete: false,
            idx,
        }
    }
}

/// Thin wrapper over `Pool<NonTerm>` adding name lookup, since the pool
/// layer itself only knows about offsets.
#[derive(Debug)]
pub struct NonTermTable {
    pool: Pool<NonTerm>,
}

impl NonTermTable {
    pub fn new() -> Self {
        Self {
            pool: Pool::with_capacity("non-terminal table", MAX_NONTERMS),
        }
    }

    fn pool(&self) -> &Pool<NonTerm> {
        &self.pool
    }

    fn pool_mut(&mut self) -> &mut Pool<NonTerm> {
        &mut self.pool
    }

    pub fn len(&self) -> usize {
        self.pool().len()
    }

    pub fn get(&self, idx: Offset) -> &NonTerm {
        self.pool().get(idx)
    }

    pub fn get_mut(&mut self, idx: Offset) -> &mut NonTerm {
        self.pool_mut().get_mut(idx)
    }

    pub fn iter_with_offsets(&self) -> impl Iterator<Item = (Offset, &NonTerm)> {
        self.pool().iter_with_offsets()
    }

    /// Looks up `name` among already-entered non-terminals, complete or
    /// not, returning its offset.
    pub fn find(&self, name: &str) -> Option<Offset> {
        self.pool()
            .iter_with_offsets()
            .find(|(_, nt)| nt.name == name)
            .map(|(off, _)| off)
    }

    /// Allocates a fresh forward-declared (incomplete) entry for `name`.
    /// Caller is responsible for checking `find` first.
    pub fn forward_declare(&mut self, name: &str) -> Result<Offset, PoolOverflow> {
        assert!(
            name.len() <= MAX_NONTERM_NAME,
            "non-terminal name is too long"
        );
        let pool = self.pool_mut();
        let idx = pool.len() as Offset;
        let off = pool.allocate(NonTerm::forward_declared(name, idx))?;
        Ok(off)
    }

    pub fn mark_complete(&mut self, idx: Offset, root_expr: Offset) {
        let entry = self.get_mut(idx);
        entry.root_expr = root_expr;
        entry.complete = true;
    }

    /// The first table entry that never received a definition, if any.
    pub fn first_undefined(&self) -> Option<&NonTerm> {
        self.pool().iter().find(|nt| !nt.complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_declare_then_find_then_complete() {
        let mut table = NonTermTable::new();
        let off = table.forward_declare("B").unwrap();
        assert_eq!(table.find("B"), Some(off));
        assert!(!table.get(off).complete);
        table.mark_complete(off, 7);
        assert!(table.get(off).complete);
        assert_eq!(table.get(off).root_expr, 7);
    }

    #[test]
    fn first_undefined_reports_forward_reference_left_dangling() {
        let mut table = NonTermTable::new();
        table.forward_declare("A").unwrap();
        let b = table.forward_declare("B").unwrap();
        table.mark_complete(b, 0);
        let undefined = table.first_undefined().expect("A is undefined");
        assert_eq!(undefined.name, "A");
    }

    #[test]
    fn idx_equals_position() {
        let mut table = NonTermTable::new();
        let a = table.forward_declare("A").unwrap();
        let b = table.forward_declare("B").unwrap();
        assert_eq!(table.get(a).idx, a);
        assert_eq!(table.get(b).idx, b);
    }
}
