//! Scope management for name analysis
//!
//! The scope stack mirrors the chain of lexical ancestors of the node
//! currently being visited. Record field namespaces use [`SymbolTable`]
//! directly without ever being pushed onto the stack: fields are only
//! reachable through member access.

use std::collections::HashMap;

use crate::ast::ast::{DeclId, StmtId};
use crate::context::Symbol;

/// One namespace: a map from declared name to its declaration.
///
/// A name maps to at most one declaration; a second insertion fails and
/// the original stays authoritative.
#[derive(Debug, Default, Clone)]
pub struct SymbolTable {
    entries: HashMap<Symbol, DeclId>,
}

impl SymbolTable {
    /// Insert `name`, or fail with the already-present declaration.
    pub fn declare(&mut self, name: Symbol, decl: DeclId) -> Result<(), DeclId> {
        match self.entries.get(&name) {
            Some(&original) => Err(original),
            None => {
                self.entries.insert(name, decl);
                Ok(())
            }
        }
    }

    /// Look up in this table only, ignoring enclosing scopes. This is the
    /// lookup member access uses against a record's field namespace.
    pub fn resolve_local(&self, name: Symbol) -> Option<DeclId> {
        self.entries.get(&name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Which AST node a scope belongs to. The finished table is attached to
/// its owner in the resolution table when the scope is exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeOwner {
    /// The global scope of the whole program.
    Program,
    /// A function's scope, holding its parameters and body locals.
    Fn(DeclId),
    /// A block statement's scope.
    Block(StmtId),
}

/// Stack of open scopes, innermost last.
pub struct ScopeStack {
    scopes: Vec<(ScopeOwner, SymbolTable)>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            scopes: vec![(ScopeOwner::Program, SymbolTable::default())],
        }
    }

    pub fn push(&mut self, owner: ScopeOwner) {
        self.scopes.push((owner, SymbolTable::default()));
    }

    /// Close the innermost scope, handing its finished table back so the
    /// caller can attach it to the owning node.
    pub fn pop(&mut self) -> (ScopeOwner, SymbolTable) {
        debug_assert!(self.scopes.len() > 1, "cannot pop the global scope");
        self.scopes.pop().expect("scope stack is never empty")
    }

    /// Tear down the stack at the end of analysis, yielding the global
    /// scope's table.
    pub fn into_global(mut self) -> SymbolTable {
        let (owner, table) = self.scopes.pop().expect("scope stack is never empty");
        debug_assert_eq!(owner, ScopeOwner::Program, "unbalanced scope stack");
        table
    }

    pub fn current_mut(&mut self) -> &mut SymbolTable {
        &mut self.scopes.last_mut().expect("scope stack is never empty").1
    }

    /// Look `name` up from the innermost scope outward. The first match
    /// wins, which is what makes inner declarations shadow outer ones.
    pub fn lookup(&self, name: Symbol) -> Option<DeclId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|(_, table)| table.resolve_local(name))
    }

    /// Every name currently visible, for did-you-mean suggestions.
    pub fn visible_names(&self) -> impl Iterator<Item = Symbol> + '_ {
        self.scopes.iter().flat_map(|(_, table)| table.names())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Interner;

    #[test]
    fn duplicate_returns_original() {
        let mut interner = Interner::default();
        let name = interner.intern("x");
        let first = DeclId::new(0);
        let second = DeclId::new(1);

        let mut table = SymbolTable::default();
        assert_eq!(table.declare(name, first), Ok(()));
        assert_eq!(table.declare(name, second), Err(first));
        // Original stays authoritative.
        assert_eq!(table.resolve_local(name), Some(first));
    }

    #[test]
    fn lookup_prefers_inner_scope() {
        let mut interner = Interner::default();
        let name = interner.intern("x");
        let outer = DeclId::new(0);
        let inner = DeclId::new(1);

        let mut scopes = ScopeStack::new();
        scopes.current_mut().declare(name, outer).unwrap();
        scopes.push(ScopeOwner::Block(StmtId::new(0)));
        scopes.current_mut().declare(name, inner).unwrap();

        assert_eq!(scopes.lookup(name), Some(inner));
        scopes.pop();
        assert_eq!(scopes.lookup(name), Some(outer));
    }

    #[test]
    fn lookup_misses_unknown_name() {
        let mut interner = Interner::default();
        let name = interner.intern("total");
        let scopes = ScopeStack::new();
        assert_eq!(scopes.lookup(name), None);
    }
}
