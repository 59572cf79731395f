//! Name analysis
//!
//! One depth-first traversal over the AST that builds the symbol table of
//! every scope, resolves each identifier use to the declaration it refers
//! to, and accumulates diagnostics for duplicate declarations and
//! undeclared uses. The traversal never aborts: a failed declaration or
//! lookup is recorded and analysis continues, so one run reports as many
//! distinct errors as possible.

pub mod resolver;
pub mod scope;
pub mod table;

pub use resolver::NameResolver;
pub use scope::{ScopeOwner, ScopeStack, SymbolTable};
pub use table::ResolutionTable;

use crate::error::CompileErrors;
use crate::passes::{AnalyzedProgram, ParsedProgram};

/// Run name analysis over a parsed program.
///
/// Always returns an annotated program (best-effort when diagnostics are
/// non-empty); the phase succeeded only if the returned errors are empty.
pub fn analyze(program: ParsedProgram) -> (AnalyzedProgram, CompileErrors) {
    NameResolver::new(program).resolve()
}
