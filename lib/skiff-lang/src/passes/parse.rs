use std::cell::RefCell;
use std::rc::Rc;

use chumsky::input::Stream;
use chumsky::prelude::*;
// The Parser struct below shadows the glob-imported trait name; the
// trait still has to be in scope for its methods.
use chumsky::Parser as _;
use logos::Logos;

use crate::ast::{ast::Ast, Loc, SourceId};
use crate::context::Interner;
use crate::error::{CompileError, CompileErrorKind, CompileErrors};
use crate::parser::grammar::{parse_decl, AstCtx};
use crate::parser::lexer::Token;
use crate::passes::ParsedProgram;

pub struct Parser;

impl Parser {
    /// Parse one source file into an arena AST.
    ///
    /// The input is assumed to be a whole program; the parser consumes it
    /// completely or fails with one [`CompileErrorKind::Parse`] per
    /// chumsky error, each carrying the offending byte span.
    pub fn parse(src: &str, source_id: SourceId) -> Result<ParsedProgram, CompileErrors> {
        // Unlexable bytes become Error tokens so the parser rejects them
        // with a real position instead of the lexer silently stopping.
        let token_iter = Token::lexer(src).spanned().map(|(tok, span)| match tok {
            Ok(tok) => (tok, SimpleSpan::from(span)),
            Err(()) => (Token::Error, SimpleSpan::from(span)),
        });

        let token_stream = Stream::from_iter(token_iter)
            .map((0..src.len()).into(), |(t, s): (_, SimpleSpan)| (t, s));

        let ast = Rc::new(RefCell::new(Ast::default()));
        let interner = Rc::new(RefCell::new(Interner::default()));

        let ctx = AstCtx {
            ast: ast.clone(),
            interner: interner.clone(),
            source_id,
        };

        let program = parse_decl(&ctx).repeated().collect::<Vec<_>>();

        match program.parse(token_stream).into_result() {
            Ok(root) => {
                let mut final_ast = std::mem::take(&mut *ast.borrow_mut());
                final_ast.root = root;
                let final_interner = std::mem::take(&mut *interner.borrow_mut());

                tracing::debug!(
                    decls = final_ast.decls.len(),
                    stmts = final_ast.stmts.len(),
                    exprs = final_ast.exprs.len(),
                    "parsed program"
                );

                Ok(ParsedProgram {
                    ast: final_ast,
                    interner: final_interner,
                })
            }
            Err(errors) => {
                let mut out = CompileErrors::new();
                for err in errors {
                    let loc = Loc::new(source_id, err.span().into_range());
                    out.push(CompileError::new(
                        CompileErrorKind::Parse(err.to_string()),
                        loc,
                    ));
                }
                Err(out)
            }
        }
    }
}
