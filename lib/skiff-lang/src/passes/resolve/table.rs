//! Resolution tables
//!
//! Output of name analysis: maps from AST nodes to the declarations they
//! resolve to, plus the finished symbol table of every scope. Use sites
//! hold declaration handles, never owning references, so the AST stays an
//! acyclic arena with cross-references.

use std::collections::HashMap;

use crate::ast::ast::{DeclId, ExprId, TypeId};
use crate::passes::resolve::scope::{ScopeOwner, SymbolTable};

#[derive(Debug, Default)]
pub struct ResolutionTable {
    /// Identifier and member-access expressions, mapped to the
    /// declaration each one refers to. An expression missing here after a
    /// run means the run reported a diagnostic for it.
    pub uses: HashMap<ExprId, DeclId>,
    /// Named type references, mapped to the record declaration they name.
    pub types: HashMap<TypeId, DeclId>,
    /// The finished symbol table of every lexical scope, keyed by the
    /// node that introduced the scope. Retained read-only for later
    /// phases to re-query.
    pub scopes: HashMap<ScopeOwner, SymbolTable>,
    /// Per-record field namespaces. Never consulted by bare-identifier
    /// lookup, only by member access.
    pub fields: HashMap<DeclId, SymbolTable>,
}

impl ResolutionTable {
    /// The declaration a use expression resolved to, if resolution
    /// succeeded for it.
    pub fn use_target(&self, expr: ExprId) -> Option<DeclId> {
        self.uses.get(&expr).copied()
    }

    /// The record declaration a named type reference resolved to.
    pub fn type_target(&self, ty: TypeId) -> Option<DeclId> {
        self.types.get(&ty).copied()
    }

    /// The field namespace of a record declaration.
    pub fn field_table(&self, record: DeclId) -> Option<&SymbolTable> {
        self.fields.get(&record)
    }

    /// The symbol table attached to a scope-introducing node.
    pub fn scope_table(&self, owner: ScopeOwner) -> Option<&SymbolTable> {
        self.scopes.get(&owner)
    }
}
