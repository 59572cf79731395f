use std::cell::RefCell;
use std::rc::Rc;

use chumsky::input::ValueInput;
use chumsky::pratt::{infix, left, postfix, prefix};
use chumsky::prelude::*;

use crate::ast::ast::{
    Ast, BinaryOp, Decl, DeclId, DeclKind, Expr, ExprId, ExprKind, Literal, PrimitiveType, Stmt,
    StmtId, StmtKind, Type, TypeId, TypeKind, UnaryOp,
};
use crate::ast::{Loc, SourceId};
use crate::context::{Interner, Symbol};
use crate::parser::lexer::Token;

type ParserError<'a> = extra::Err<Rich<'a, Token<'a>, SimpleSpan>>;

/// Shared parser context: the arena being filled and the interner, behind
/// `Rc<RefCell>` so every sub-parser can allocate while chumsky drives them.
#[derive(Clone)]
pub struct AstCtx {
    pub ast: Rc<RefCell<Ast>>,
    pub interner: Rc<RefCell<Interner>>,
    pub source_id: SourceId,
}

impl AstCtx {
    pub fn intern(&self, ident: &str) -> Symbol {
        self.interner.borrow_mut().intern(ident)
    }

    pub fn to_loc(&self, span: SimpleSpan) -> Loc {
        Loc::new(self.source_id, span.into_range())
    }

    pub fn alloc_decl(&self, decl: Decl) -> DeclId {
        self.ast.borrow_mut().decls.alloc(decl)
    }

    pub fn alloc_stmt(&self, kind: StmtKind, loc: Loc) -> StmtId {
        self.ast.borrow_mut().stmts.alloc(Stmt { loc, kind })
    }

    pub fn alloc_expr(&self, kind: ExprKind, loc: Loc) -> ExprId {
        self.ast.borrow_mut().exprs.alloc(Expr { loc, kind })
    }

    pub fn alloc_type(&self, kind: TypeKind, loc: Loc) -> TypeId {
        self.ast.borrow_mut().types.alloc(Type { loc, kind })
    }
}

fn parse_symbol<'a, I>(ctx: &'a AstCtx) -> impl Parser<'a, I, Symbol, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    select! { Token::Identifier(ident) => ctx.intern(ident) }
}

/// An identifier together with the span of just that identifier, for
/// declarations where diagnostics point at the name rather than the whole
/// declaration.
fn parse_named<'a, I>(
    ctx: &'a AstCtx,
) -> impl Parser<'a, I, (Symbol, SimpleSpan), ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    parse_symbol(ctx).map_with(|name, e| (name, e.span()))
}

pub fn parse_type<'a, I>(ctx: &'a AstCtx) -> impl Parser<'a, I, TypeId, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    let primitive = select! {
        Token::IntType => TypeKind::Primitive(PrimitiveType::Int),
        Token::BoolType => TypeKind::Primitive(PrimitiveType::Bool),
        Token::StringType => TypeKind::Primitive(PrimitiveType::Str),
        Token::VoidType => TypeKind::Primitive(PrimitiveType::Void),
    }
    .map_with(|kind, e| ctx.alloc_type(kind, ctx.to_loc(e.span())));

    let named = parse_symbol(ctx)
        .map_with(|name, e| ctx.alloc_type(TypeKind::Named(name), ctx.to_loc(e.span())));

    primitive.or(named)
}

pub fn parse_expr<'a, I>(ctx: &'a AstCtx) -> impl Parser<'a, I, ExprId, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    recursive(|expr| {
        let literal = select! {
            Token::Integer(i) => Literal::Int(i),
            Token::True => Literal::Bool(true),
            Token::False => Literal::Bool(false),
        }
        .map_with(|lit, e| ctx.alloc_expr(ExprKind::Literal(lit), ctx.to_loc(e.span())));

        let string = select! { Token::String(s) => s }.map_with(|s, e| {
            let sym = ctx.intern(s);
            ctx.alloc_expr(ExprKind::Literal(Literal::Str(sym)), ctx.to_loc(e.span()))
        });

        let ident = parse_symbol(ctx)
            .map_with(|name, e| ctx.alloc_expr(ExprKind::Identifier(name), ctx.to_loc(e.span())));

        let parens = expr
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let atom = choice((literal, string, ident, parens)).boxed();

        let call_args = expr
            .clone()
            .separated_by(just(Token::Comma))
            .allow_trailing()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        atom.pratt((
            postfix(
                8,
                just(Token::Dot).ignore_then(parse_named(ctx)),
                |object, (field, field_span): (Symbol, SimpleSpan), e| {
                    ctx.alloc_expr(
                        ExprKind::Member {
                            object,
                            field,
                            field_loc: ctx.to_loc(field_span),
                        },
                        ctx.to_loc(e.span()),
                    )
                },
            ),
            postfix(8, call_args, |callee, args, e| {
                ctx.alloc_expr(ExprKind::Call { callee, args }, ctx.to_loc(e.span()))
            }),
            prefix(
                7,
                choice((
                    just(Token::Minus).to(UnaryOp::Neg),
                    just(Token::Bang).to(UnaryOp::Not),
                )),
                |op, operand, e| {
                    ctx.alloc_expr(ExprKind::Unary { op, operand }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(6),
                select! {
                    Token::Star => BinaryOp::Mul,
                    Token::Slash => BinaryOp::Div,
                },
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(5),
                select! {
                    Token::Plus => BinaryOp::Add,
                    Token::Minus => BinaryOp::Sub,
                },
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(4),
                select! {
                    Token::Lt => BinaryOp::Lt,
                    Token::Le => BinaryOp::Le,
                    Token::Gt => BinaryOp::Gt,
                    Token::Ge => BinaryOp::Ge,
                },
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(3),
                select! {
                    Token::EqEq => BinaryOp::Eq,
                    Token::NotEq => BinaryOp::Ne,
                },
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(2),
                just(Token::AndAnd).to(BinaryOp::And),
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
            infix(
                left(1),
                just(Token::OrOr).to(BinaryOp::Or),
                |lhs, op, rhs, e| {
                    ctx.alloc_expr(ExprKind::Binary { lhs, op, rhs }, ctx.to_loc(e.span()))
                },
            ),
        ))
    })
}

/// A variable declaration `type name;` or `type name = expr;`, shared by
/// statement position and top level.
fn parse_var_decl<'a, I>(
    ctx: &'a AstCtx,
    expr: impl Parser<'a, I, ExprId, ParserError<'a>> + Clone + 'a,
) -> impl Parser<'a, I, DeclId, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    parse_type(ctx)
        .then(parse_named(ctx))
        .then(just(Token::Assign).ignore_then(expr).or_not())
        .then_ignore(just(Token::Semi))
        .map_with(|((ty, (name, name_span)), init), e| {
            ctx.alloc_decl(Decl {
                loc: ctx.to_loc(e.span()),
                name,
                name_loc: ctx.to_loc(name_span),
                kind: DeclKind::Var { ty, init },
            })
        })
}

pub fn parse_stmt<'a, I>(ctx: &'a AstCtx) -> impl Parser<'a, I, StmtId, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    recursive(|stmt| {
        let expr = parse_expr(ctx);

        let block = stmt
            .clone()
            .repeated()
            .collect::<Vec<_>>()
            .delimited_by(just(Token::LBrace), just(Token::RBrace))
            .map_with(|stmts, e| ctx.alloc_stmt(StmtKind::Block(stmts), ctx.to_loc(e.span())))
            .boxed();

        let var_decl = parse_var_decl(ctx, expr.clone())
            .map_with(|decl, e| ctx.alloc_stmt(StmtKind::Decl(decl), ctx.to_loc(e.span())));

        let cond = expr
            .clone()
            .delimited_by(just(Token::LParen), just(Token::RParen));

        let if_stmt = just(Token::If)
            .ignore_then(cond.clone())
            .then(block.clone())
            .then(just(Token::Else).ignore_then(block.clone()).or_not())
            .map_with(|((cond, then_branch), else_branch), e| {
                ctx.alloc_stmt(
                    StmtKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    ctx.to_loc(e.span()),
                )
            });

        let while_stmt = just(Token::While)
            .ignore_then(cond)
            .then(block.clone())
            .map_with(|(cond, body), e| {
                ctx.alloc_stmt(StmtKind::While { cond, body }, ctx.to_loc(e.span()))
            });

        let return_stmt = just(Token::Return)
            .ignore_then(expr.clone().or_not())
            .then_ignore(just(Token::Semi))
            .map_with(|value, e| ctx.alloc_stmt(StmtKind::Return(value), ctx.to_loc(e.span())));

        let assign = expr
            .clone()
            .then_ignore(just(Token::Assign))
            .then(expr.clone())
            .then_ignore(just(Token::Semi))
            .map_with(|(target, value), e| {
                ctx.alloc_stmt(StmtKind::Assign { target, value }, ctx.to_loc(e.span()))
            });

        let expr_stmt = expr
            .then_ignore(just(Token::Semi))
            .map_with(|expr, e| ctx.alloc_stmt(StmtKind::Expr(expr), ctx.to_loc(e.span())));

        // var_decl must come before assign: `x = 1;` fails the var_decl
        // branch (a Named type followed by `=`) and rewinds into assign.
        choice((
            var_decl,
            if_stmt,
            while_stmt,
            return_stmt,
            block,
            assign,
            expr_stmt,
        ))
    })
}

/// A top-level declaration: record, function or global variable.
pub fn parse_decl<'a, I>(ctx: &'a AstCtx) -> impl Parser<'a, I, DeclId, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token<'a>, Span = SimpleSpan>,
{
    let field = parse_type(ctx)
        .then(parse_named(ctx))
        .then_ignore(just(Token::Semi))
        .map_with(|(ty, (name, name_span)), e| {
            ctx.alloc_decl(Decl {
                loc: ctx.to_loc(e.span()),
                name,
                name_loc: ctx.to_loc(name_span),
                kind: DeclKind::Field { ty },
            })
        });

    let record = just(Token::Record)
        .ignore_then(parse_named(ctx))
        .then(
            field
                .repeated()
                .collect::<Vec<_>>()
                .delimited_by(just(Token::LBrace), just(Token::RBrace)),
        )
        .map_with(|((name, name_span), fields), e| {
            ctx.alloc_decl(Decl {
                loc: ctx.to_loc(e.span()),
                name,
                name_loc: ctx.to_loc(name_span),
                kind: DeclKind::Record { fields },
            })
        });

    let param = parse_type(ctx)
        .then(parse_named(ctx))
        .map_with(|(ty, (name, name_span)), e| {
            ctx.alloc_decl(Decl {
                loc: ctx.to_loc(e.span()),
                name,
                name_loc: ctx.to_loc(name_span),
                kind: DeclKind::Param { ty },
            })
        });

    let params = param
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LParen), just(Token::RParen));

    // The function body is not a Block statement: its statements live
    // directly in the scope that also holds the parameters.
    let body = parse_stmt(ctx)
        .repeated()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace));

    let func = parse_type(ctx)
        .then(parse_named(ctx))
        .then(params)
        .then(body)
        .map_with(|(((ret, (name, name_span)), params), body), e| {
            ctx.alloc_decl(Decl {
                loc: ctx.to_loc(e.span()),
                name,
                name_loc: ctx.to_loc(name_span),
                kind: DeclKind::Fn { ret, params, body },
            })
        });

    let global = parse_var_decl(ctx, parse_expr(ctx));

    choice((record, func, global))
}
