#![allow(dead_code)]

use skiff_lang::ast::unparse::Unparser;
use skiff_lang::compiler::Compiler;
use skiff_lang::context::Interner;
use skiff_lang::error::{CompileError, CompileErrorKind, CompileErrors};
use skiff_lang::passes::AnalyzedProgram;

/// Parse and resolve, panicking if the source does not even parse.
pub fn analyze(src: &str) -> (AnalyzedProgram, CompileErrors) {
    let result = Compiler::new().compile(src);
    match result.program {
        Some(program) => (program, result.errors),
        None => panic!("source failed to parse: {:?}", result.errors.0),
    }
}

/// Analyze and require zero diagnostics.
pub fn assert_clean(src: &str) -> AnalyzedProgram {
    let (program, errors) = analyze(src);
    let messages: Vec<String> = errors
        .iter()
        .map(|e| e.message(&program.interner))
        .collect();
    assert!(messages.is_empty(), "unexpected errors: {:?}", messages);
    program
}

/// Analyze and return the diagnostics plus the interner needed to read
/// the symbols they mention.
pub fn errors_of(src: &str) -> (Vec<CompileError>, Interner) {
    let (program, errors) = analyze(src);
    (errors.0, program.interner)
}

/// Rendered diagnostic messages, in discovery order.
pub fn messages_of(src: &str) -> Vec<String> {
    let (errors, interner) = errors_of(src);
    errors.iter().map(|e| e.message(&interner)).collect()
}

/// The type-annotated unparse of a program that must resolve cleanly.
pub fn annotated(src: &str) -> String {
    let program = assert_clean(src);
    Unparser::new(&program.ast, &program.interner)
        .with_resolutions(&program.resolutions)
        .unparse()
}

pub fn is_duplicate(err: &CompileError) -> bool {
    matches!(err.kind, CompileErrorKind::DuplicateDeclaration { .. })
}

pub fn is_undeclared(err: &CompileError) -> bool {
    matches!(err.kind, CompileErrorKind::UndeclaredIdentifier { .. })
}
