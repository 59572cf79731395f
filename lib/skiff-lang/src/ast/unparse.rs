//! Canonical source renderer.
//!
//! Rebuilds program text from the arenas in a fixed layout: four-space
//! indentation, one statement per line, and every compound expression
//! wrapped in parentheses so grouping is explicit no matter how the
//! original text was written.
//!
//! With a [`ResolutionTable`] attached, every resolved name is annotated
//! with its declared type in braces, `total{int}` or
//! `add{(int,int)->int}`, which makes the resolver's conclusions visible
//! in plain text.

use crate::ast::ast::{
    Ast, Decl, DeclId, DeclKind, ExprId, ExprKind, Literal, StmtId, StmtKind, TypeId, TypeKind,
};
use crate::context::{Interner, Symbol};
use crate::passes::resolve::ResolutionTable;

pub struct Unparser<'a> {
    ast: &'a Ast,
    interner: &'a Interner,
    resolutions: Option<&'a ResolutionTable>,
}

impl<'a> Unparser<'a> {
    pub fn new(ast: &'a Ast, interner: &'a Interner) -> Self {
        Self {
            ast,
            interner,
            resolutions: None,
        }
    }

    /// Switch on type annotations for resolved names.
    pub fn with_resolutions(mut self, resolutions: &'a ResolutionTable) -> Self {
        self.resolutions = Some(resolutions);
        self
    }

    pub fn unparse(&self) -> String {
        let mut out = String::new();
        for (i, decl_id) in self.ast.root.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            self.write_decl(&mut out, *decl_id, 0);
        }
        out
    }

    fn write_decl(&self, out: &mut String, decl_id: DeclId, indent: usize) {
        let decl = self.ast.decls.get(decl_id);

        match &decl.kind {
            DeclKind::Var { ty, init } => {
                self.write_indent(out, indent);
                self.write_type(out, *ty);
                out.push(' ');
                self.write_decl_name(out, decl, decl_id);
                if let Some(init) = init {
                    out.push_str(" = ");
                    self.write_expr(out, *init);
                }
                out.push_str(";\n");
            }

            DeclKind::Param { ty } => {
                self.write_type(out, *ty);
                out.push(' ');
                self.write_decl_name(out, decl, decl_id);
            }

            DeclKind::Field { ty } => {
                self.write_indent(out, indent);
                self.write_type(out, *ty);
                out.push(' ');
                self.write_decl_name(out, decl, decl_id);
                out.push_str(";\n");
            }

            DeclKind::Fn { ret, params, body } => {
                self.write_indent(out, indent);
                self.write_type(out, *ret);
                out.push(' ');
                self.write_decl_name(out, decl, decl_id);
                out.push('(');
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_decl(out, *param, 0);
                }
                out.push_str(") {\n");
                for stmt in body {
                    self.write_stmt(out, *stmt, indent + 1);
                }
                self.write_indent(out, indent);
                out.push_str("}\n");
            }

            DeclKind::Record { fields } => {
                self.write_indent(out, indent);
                out.push_str("record ");
                out.push_str(self.name(decl.name));
                out.push_str(" {\n");
                for field in fields {
                    self.write_decl(out, *field, indent + 1);
                }
                self.write_indent(out, indent);
                out.push_str("}\n");
            }
        }
    }

    fn write_stmt(&self, out: &mut String, stmt_id: StmtId, indent: usize) {
        let stmt = self.ast.stmts.get(stmt_id);

        match &stmt.kind {
            StmtKind::Decl(decl) => self.write_decl(out, *decl, indent),

            StmtKind::Assign { target, value } => {
                self.write_indent(out, indent);
                self.write_expr(out, *target);
                out.push_str(" = ");
                self.write_expr(out, *value);
                out.push_str(";\n");
            }

            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.write_indent(out, indent);
                out.push_str("if (");
                self.write_expr(out, *cond);
                out.push_str(") ");
                self.write_braced(out, *then_branch, indent);
                if let Some(else_branch) = else_branch {
                    self.write_indent(out, indent);
                    out.push_str("else ");
                    self.write_braced(out, *else_branch, indent);
                }
            }

            StmtKind::While { cond, body } => {
                self.write_indent(out, indent);
                out.push_str("while (");
                self.write_expr(out, *cond);
                out.push_str(") ");
                self.write_braced(out, *body, indent);
            }

            StmtKind::Return(value) => {
                self.write_indent(out, indent);
                out.push_str("return");
                if let Some(value) = value {
                    out.push(' ');
                    self.write_expr(out, *value);
                }
                out.push_str(";\n");
            }

            StmtKind::Expr(expr) => {
                self.write_indent(out, indent);
                self.write_expr(out, *expr);
                out.push_str(";\n");
            }

            StmtKind::Block(stmts) => {
                self.write_indent(out, indent);
                out.push_str("{\n");
                for stmt in stmts {
                    self.write_stmt(out, *stmt, indent + 1);
                }
                self.write_indent(out, indent);
                out.push_str("}\n");
            }
        }
    }

    /// Renders a statement in brace position after `if`, `else`, or
    /// `while`. Block statements keep their braces on the same line; any
    /// other statement is braced on its own.
    fn write_braced(&self, out: &mut String, stmt_id: StmtId, indent: usize) {
        let stmt = self.ast.stmts.get(stmt_id);
        if let StmtKind::Block(stmts) = &stmt.kind {
            out.push_str("{\n");
            for stmt in stmts {
                self.write_stmt(out, *stmt, indent + 1);
            }
            self.write_indent(out, indent);
            out.push_str("}\n");
        } else {
            out.push_str("{\n");
            self.write_stmt(out, stmt_id, indent + 1);
            self.write_indent(out, indent);
            out.push_str("}\n");
        }
    }

    fn write_expr(&self, out: &mut String, expr_id: ExprId) {
        let expr = self.ast.exprs.get(expr_id);

        match &expr.kind {
            ExprKind::Literal(Literal::Int(value)) => out.push_str(&value.to_string()),
            ExprKind::Literal(Literal::Bool(value)) => out.push_str(&value.to_string()),
            ExprKind::Literal(Literal::Str(sym)) => {
                out.push('"');
                out.push_str(self.name(*sym));
                out.push('"');
            }

            ExprKind::Identifier(name) => {
                out.push_str(self.name(*name));
                self.write_use_annotation(out, expr_id);
            }

            ExprKind::Member { object, field, .. } => {
                self.write_expr(out, *object);
                out.push('.');
                out.push_str(self.name(*field));
                self.write_use_annotation(out, expr_id);
            }

            ExprKind::Call { callee, args } => {
                self.write_expr(out, *callee);
                out.push('(');
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.write_expr(out, *arg);
                }
                out.push(')');
            }

            ExprKind::Unary { op, operand } => {
                out.push('(');
                out.push_str(&op.to_string());
                self.write_expr(out, *operand);
                out.push(')');
            }

            ExprKind::Binary { lhs, op, rhs } => {
                out.push('(');
                self.write_expr(out, *lhs);
                out.push(' ');
                out.push_str(&op.to_string());
                out.push(' ');
                self.write_expr(out, *rhs);
                out.push(')');
            }
        }
    }

    fn write_type(&self, out: &mut String, type_id: TypeId) {
        match &self.ast.types.get(type_id).kind {
            TypeKind::Primitive(prim) => out.push_str(&prim.to_string()),
            TypeKind::Named(name) => out.push_str(self.name(*name)),
        }
    }

    fn write_decl_name(&self, out: &mut String, decl: &Decl, decl_id: DeclId) {
        out.push_str(self.name(decl.name));
        if self.resolutions.is_some() {
            self.write_annotation(out, decl_id);
        }
    }

    fn write_use_annotation(&self, out: &mut String, expr_id: ExprId) {
        let Some(resolutions) = self.resolutions else {
            return;
        };
        // Unresolved uses stay bare; the diagnostics already cover them.
        if let Some(target) = resolutions.use_target(expr_id) {
            self.write_annotation(out, target);
        }
    }

    /// The `{type}` annotation for a declaration: its declared value type,
    /// or a `(params)->ret` signature for functions. Record names carry no
    /// annotation.
    fn write_annotation(&self, out: &mut String, decl_id: DeclId) {
        let decl = self.ast.decls.get(decl_id);
        match &decl.kind {
            DeclKind::Var { ty, .. } | DeclKind::Param { ty } | DeclKind::Field { ty } => {
                out.push('{');
                self.write_type(out, *ty);
                out.push('}');
            }
            DeclKind::Fn { ret, params, .. } => {
                out.push_str("{(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    if let Some(ty) = self.ast.decls.get(*param).value_type() {
                        self.write_type(out, ty);
                    }
                }
                out.push_str(")->");
                self.write_type(out, *ret);
                out.push('}');
            }
            DeclKind::Record { .. } => {}
        }
    }

    fn write_indent(&self, out: &mut String, indent: usize) {
        for _ in 0..indent {
            out.push_str("    ");
        }
    }

    fn name(&self, sym: Symbol) -> &str {
        self.interner.try_resolve(sym).unwrap_or("<unknown>")
    }
}
