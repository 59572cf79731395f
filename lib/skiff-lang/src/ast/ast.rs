use crate::ast::Loc;
use crate::context::{Arena, NodeId, Symbol};

pub type DeclId = NodeId<Decl>;
pub type StmtId = NodeId<Stmt>;
pub type ExprId = NodeId<Expr>;
pub type TypeId = NodeId<Type>;

/// The whole program as typed arenas plus the ordered list of top-level
/// declarations. Nodes reference each other by id, never by ownership.
#[derive(Default, Debug)]
pub struct Ast {
    pub decls: Arena<Decl>,
    pub stmts: Arena<Stmt>,
    pub exprs: Arena<Expr>,
    pub types: Arena<Type>,
    pub root: Vec<DeclId>,
}

/// A declaration: something that introduces a name.
///
/// `loc` spans the whole declaration, `name_loc` just the declared name.
/// Diagnostics point at `name_loc` so duplicate reports land on the
/// identifier rather than the full declaration.
#[derive(Debug, Clone)]
pub struct Decl {
    pub loc: Loc,
    pub name: Symbol,
    pub name_loc: Loc,
    pub kind: DeclKind,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    /// A global or local variable: `int x;` or `int x = e;`
    Var { ty: TypeId, init: Option<ExprId> },
    /// A formal parameter of a function.
    Param { ty: TypeId },
    /// A field inside a record body.
    Field { ty: TypeId },
    /// A function: `int add(int a, int b) { ... }`
    Fn {
        ret: TypeId,
        params: Vec<DeclId>,
        body: Vec<StmtId>,
    },
    /// A record type: `record Point { int x; int y; }`
    Record { fields: Vec<DeclId> },
}

impl Decl {
    /// The declared value type, for declarations that have one.
    /// Functions and records describe themselves through their kind instead.
    pub fn value_type(&self) -> Option<TypeId> {
        match self.kind {
            DeclKind::Var { ty, .. } | DeclKind::Param { ty } | DeclKind::Field { ty } => Some(ty),
            DeclKind::Fn { .. } | DeclKind::Record { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub loc: Loc,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    /// A local variable declaration.
    Decl(DeclId),
    /// An assignment `lvalue = expr;`
    Assign { target: ExprId, value: ExprId },
    /// `if (cond) { ... }` with an optional `else { ... }`.
    /// Both branches are always block statements.
    If {
        cond: ExprId,
        then_branch: StmtId,
        else_branch: Option<StmtId>,
    },
    /// `while (cond) { ... }`; the body is always a block statement.
    While { cond: ExprId, body: StmtId },
    /// `return;` or `return expr;`
    Return(Option<ExprId>),
    /// A bare expression statement `expr;`
    Expr(ExprId),
    /// A braced block `{ stmt* }`, which introduces a scope.
    Block(Vec<StmtId>),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub loc: Loc,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Literal(Literal),
    /// An identifier use (unresolved until name analysis).
    Identifier(Symbol),
    /// Member access `object.field`. `field_loc` spans just the field name
    /// so undeclared-field diagnostics point at it.
    Member {
        object: ExprId,
        field: Symbol,
        field_loc: Loc,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
    },
    Binary {
        lhs: ExprId,
        op: BinaryOp,
        rhs: ExprId,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Literal {
    Int(i64),
    Str(Symbol),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    And,
    Or,
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Neg => write!(f, "-"),
            UnaryOp::Not => write!(f, "!"),
        }
    }
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone)]
pub struct Type {
    pub loc: Loc,
    pub kind: TypeKind,
}

#[derive(Debug, Clone)]
pub enum TypeKind {
    Primitive(PrimitiveType),
    /// A record type referenced by name; resolved during name analysis.
    Named(Symbol),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    Int,
    Bool,
    Str,
    Void,
}

impl std::fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            PrimitiveType::Int => "int",
            PrimitiveType::Bool => "bool",
            PrimitiveType::Str => "string",
            PrimitiveType::Void => "void",
        };
        write!(f, "{text}")
    }
}
