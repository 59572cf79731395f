//! Compiler orchestration module
//!
//! Coordinates the front-end pipeline: Source -> Parse -> Resolve.
//!
//! Parsing is all-or-nothing, but name analysis is not: it always walks
//! the whole program, so a [`CompilationResult`] can carry both a fully
//! resolved program and a non-empty error list at the same time.

use crate::error::CompileErrors;
use crate::passes::{parse::Parser, resolve, AnalyzedProgram};

/// Result of running the front end over one source.
pub struct CompilationResult {
    /// The analyzed program. `None` only when parsing itself failed.
    pub program: Option<AnalyzedProgram>,
    /// Every diagnostic produced, in discovery order.
    pub errors: CompileErrors,
}

impl CompilationResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty() && self.program.is_some()
    }

    pub fn is_err(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct Compiler {
    /// The source ID used in locations and error reporting.
    source_id: usize,
}

impl Compiler {
    pub fn new() -> Self {
        Self { source_id: 0 }
    }

    /// Run the whole front end over `source`.
    pub fn compile(&self, source: &str) -> CompilationResult {
        match Parser::parse(source, self.source_id) {
            Ok(parsed) => {
                let (program, errors) = resolve::analyze(parsed);
                CompilationResult {
                    program: Some(program),
                    errors,
                }
            }
            Err(errors) => CompilationResult {
                program: None,
                errors,
            },
        }
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
