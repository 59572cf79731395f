pub mod parse;
pub mod resolve;

use crate::ast::ast::Ast;
use crate::context::Interner;
use crate::passes::resolve::table::ResolutionTable;

/// Parsed program (AST plus the interner that owns its names).
#[derive(Debug)]
pub struct ParsedProgram {
    pub ast: Ast,
    pub interner: Interner,
}

/// Program after name analysis. Always produced, even when the run
/// reported diagnostics: the resolution table is then best-effort and
/// callers must check the accompanying [`CompileErrors`] before trusting
/// it downstream.
///
/// [`CompileErrors`]: crate::error::CompileErrors
pub struct AnalyzedProgram {
    pub ast: Ast,
    pub interner: Interner,
    pub resolutions: ResolutionTable,
}
