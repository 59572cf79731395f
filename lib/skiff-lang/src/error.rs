//! Error types and reporting
//!
//! Diagnostics are accumulated in [`CompileErrors`] rather than thrown:
//! name analysis walks the whole program and reports everything it finds
//! in one run. Rendering to user-facing reports goes through Ariadne.

use ariadne::{Label, Report, ReportKind};
use thiserror::Error;

use crate::ast::Loc;
use crate::context::{Interner, Symbol};

fn format_symbol(sym: Symbol, interner: &Interner) -> String {
    interner.try_resolve(sym).unwrap_or("<unknown>").to_string()
}

/// A compilation error with location and optional context.
#[derive(Debug, Error)]
#[error("{kind:?}")]
pub struct CompileError {
    pub kind: CompileErrorKind,
    pub loc: Loc,
    pub context: Option<String>,
    pub suggestions: Vec<ErrorSuggestion>,
}

/// The specific kind of compilation error.
#[derive(Clone, Debug)]
pub enum CompileErrorKind {
    /// The parser rejected the input; carries the parser's own message.
    Parse(String),
    /// A name declared twice in the same namespace (scope, parameter
    /// list, or record field set). `original` is the surviving first
    /// declaration.
    DuplicateDeclaration { name: Symbol, original: Loc },
    /// An identifier or member-access name with no visible declaration in
    /// any applicable namespace at the point of use.
    UndeclaredIdentifier { name: Symbol },
}

/// Collection of compilation errors.
#[derive(Debug, Default)]
pub struct CompileErrors(pub Vec<CompileError>);

impl CompileErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, error: CompileError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.0.iter()
    }

    pub fn into_result<T>(self, ok: T) -> Result<T, Self> {
        if self.is_empty() { Ok(ok) } else { Err(self) }
    }

    pub fn reports(&self, interner: &Interner) -> Vec<Report<'_, Loc>> {
        self.0.iter().map(|e| e.report(interner)).collect()
    }
}

impl std::fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "compilation failed with {} error(s)", self.0.len())
    }
}

impl std::error::Error for CompileErrors {}

impl From<CompileError> for CompileErrors {
    fn from(err: CompileError) -> Self {
        Self(vec![err])
    }
}

/// Suggestion attached to an error, rendered as a report note.
#[derive(Debug, Clone)]
pub enum ErrorSuggestion {
    DidYouMean { suggestion: String },
}

impl ErrorSuggestion {
    pub fn format(&self) -> String {
        match self {
            Self::DidYouMean { suggestion } => format!("Did you mean '{}'?", suggestion),
        }
    }
}

impl CompileError {
    pub fn new(kind: CompileErrorKind, loc: Loc) -> Self {
        Self {
            kind,
            loc,
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_suggestion(mut self, suggestion: ErrorSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// A human-readable message with symbol names resolved.
    pub fn message(&self, interner: &Interner) -> String {
        use CompileErrorKind::*;

        match &self.kind {
            Parse(msg) => format!("Syntax error: {}", msg),
            DuplicateDeclaration { name, .. } => {
                format!(
                    "Multiply declared identifier '{}'",
                    format_symbol(*name, interner)
                )
            }
            UndeclaredIdentifier { name } => {
                format!("Undeclared identifier '{}'", format_symbol(*name, interner))
            }
        }
    }

    /// Build an Ariadne report for this error.
    pub fn report(&self, interner: &Interner) -> Report<'_, Loc> {
        let mut report =
            Report::build(ReportKind::Error, self.loc.clone()).with_message(self.message(interner));

        let mut label = Label::new(self.loc.clone());
        if let Some(ctx) = &self.context {
            label = label.with_message(ctx);
        }
        report = report.with_label(label);

        for suggestion in &self.suggestions {
            report = report.with_note(suggestion.format());
        }

        match &self.kind {
            CompileErrorKind::DuplicateDeclaration { original, .. } => {
                report = report
                    .with_label(Label::new(original.clone()).with_message("first declared here"));
            }
            CompileErrorKind::UndeclaredIdentifier { .. } => {
                if self.suggestions.is_empty() {
                    report = report.with_help(
                        "Names must be declared before use. Check spelling and scope.",
                    );
                }
            }
            CompileErrorKind::Parse(_) => {}
        }

        report.finish()
    }
}
