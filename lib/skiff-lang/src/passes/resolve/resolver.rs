//! Name resolver implementation

use tracing::debug;

use crate::ast::ast::{Ast, DeclId, DeclKind, ExprId, ExprKind, StmtId, StmtKind, TypeId, TypeKind};
use crate::ast::Loc;
use crate::context::Symbol;
use crate::error::{CompileError, CompileErrorKind, CompileErrors, ErrorSuggestion};
use crate::passes::{AnalyzedProgram, ParsedProgram};
use crate::suggestions;

use super::scope::{ScopeOwner, ScopeStack, SymbolTable};
use super::table::ResolutionTable;

/// Whether a member access has a field namespace to look its name up in.
enum FieldNamespace {
    /// The object's type is a resolved record.
    Record(DeclId),
    /// The object resolved but its type cannot name fields; the field is
    /// reported as undeclared.
    NotARecord,
    /// The object (or its type) already failed to resolve. Suppressed to
    /// avoid cascades: the earlier diagnostic covers it.
    Unknown,
}

/// Name analysis driver: one depth-first traversal that builds symbol
/// tables, resolves every identifier use, and accumulates diagnostics
/// without ever aborting.
pub struct NameResolver {
    ast: Ast,
    interner: crate::context::Interner,
    resolutions: ResolutionTable,
    scopes: ScopeStack,
    errors: CompileErrors,
}

impl NameResolver {
    pub fn new(program: ParsedProgram) -> Self {
        Self {
            ast: program.ast,
            interner: program.interner,
            resolutions: ResolutionTable::default(),
            scopes: ScopeStack::new(),
            errors: CompileErrors::new(),
        }
    }

    pub fn resolve(mut self) -> (AnalyzedProgram, CompileErrors) {
        debug!(decls = self.ast.root.len(), "name analysis started");

        // Top-level functions and records are visible from anywhere at
        // top level, so mutual recursion and forward references resolve.
        self.collect_top_level();
        self.resolve_record_bodies();
        self.resolve_signatures();

        let root = self.ast.root.clone();
        for decl_id in root {
            self.resolve_decl(decl_id);
        }

        debug!(errors = self.errors.len(), "name analysis finished");

        let Self {
            ast,
            interner,
            mut resolutions,
            scopes,
            errors,
        } = self;
        resolutions
            .scopes
            .insert(ScopeOwner::Program, scopes.into_global());

        (
            AnalyzedProgram {
                ast,
                interner,
                resolutions,
            },
            errors,
        )
    }

    /// Pre-declare every top-level function and record name, body unseen.
    /// Global variables are deliberately left out: they become visible at
    /// their declaration site, in source order.
    fn collect_top_level(&mut self) {
        for decl_id in self.ast.root.clone() {
            let decl = self.ast.decls.get(decl_id);
            if matches!(decl.kind, DeclKind::Fn { .. } | DeclKind::Record { .. }) {
                let name = decl.name;
                let name_loc = decl.name_loc.clone();
                self.declare(name, name_loc, decl_id);
            }
        }
    }

    /// Build every record's field namespace up front, so member access in
    /// any function body can consult it regardless of declaration order.
    /// Field namespaces are local-only: they are never pushed onto the
    /// scope stack.
    fn resolve_record_bodies(&mut self) {
        for decl_id in self.ast.root.clone() {
            let decl = self.ast.decls.get(decl_id);
            let DeclKind::Record { fields } = &decl.kind else {
                continue;
            };

            let fields = fields.clone();
            let mut table = SymbolTable::default();
            for field_id in fields {
                let field = self.ast.decls.get(field_id);
                let name = field.name;
                let name_loc = field.name_loc.clone();
                let ty = field.value_type();

                if let Some(ty) = ty {
                    self.resolve_type(ty);
                }
                if let Err(original) = table.declare(name, field_id) {
                    self.duplicate(name, name_loc, original);
                }
            }
            self.resolutions.fields.insert(decl_id, table);
        }
    }

    /// Resolve every top-level function's return type before any body is
    /// walked. Member access through a call needs the callee's return
    /// type even when the call site comes first in the source.
    fn resolve_signatures(&mut self) {
        for decl_id in self.ast.root.clone() {
            let ret = match &self.ast.decls.get(decl_id).kind {
                DeclKind::Fn { ret, .. } => *ret,
                _ => continue,
            };
            self.resolve_type(ret);
        }
    }

    fn resolve_decl(&mut self, decl_id: DeclId) {
        let decl = self.ast.decls.get(decl_id);
        let name = decl.name;
        let name_loc = decl.name_loc.clone();
        let kind = decl.kind.clone();

        match kind {
            DeclKind::Var { ty, init } => {
                self.resolve_type(ty);
                // The initializer is resolved before the name is declared:
                // `int x = x;` binds the right-hand `x` to an outer
                // declaration if one exists, otherwise it is undeclared.
                // Declarations are not hoisted.
                if let Some(init) = init {
                    self.resolve_expr(init);
                }
                self.declare(name, name_loc, decl_id);
            }

            DeclKind::Param { ty } => {
                self.resolve_type(ty);
                self.declare(name, name_loc, decl_id);
            }

            DeclKind::Fn { params, body, .. } => {
                // The name and return type were handled by the pre-passes.
                // Parameters and body locals share one scope.
                self.scopes.push(ScopeOwner::Fn(decl_id));
                for param in params {
                    self.resolve_decl(param);
                }
                for stmt in body {
                    self.resolve_stmt(stmt);
                }
                let (owner, table) = self.scopes.pop();
                self.resolutions.scopes.insert(owner, table);
            }

            // Records and their fields are fully handled by the pre-pass.
            DeclKind::Record { .. } | DeclKind::Field { .. } => {}
        }
    }

    fn resolve_stmt(&mut self, stmt_id: StmtId) {
        let kind = self.ast.stmts.get(stmt_id).kind.clone();

        match kind {
            StmtKind::Decl(decl) => self.resolve_decl(decl),

            StmtKind::Assign { target, value } => {
                self.resolve_expr(target);
                self.resolve_expr(value);
            }

            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.resolve_expr(cond);
                self.resolve_stmt(then_branch);
                if let Some(else_branch) = else_branch {
                    self.resolve_stmt(else_branch);
                }
            }

            StmtKind::While { cond, body } => {
                self.resolve_expr(cond);
                self.resolve_stmt(body);
            }

            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.resolve_expr(value);
                }
            }

            StmtKind::Expr(expr) => self.resolve_expr(expr),

            StmtKind::Block(stmts) => {
                self.scopes.push(ScopeOwner::Block(stmt_id));
                for stmt in stmts {
                    self.resolve_stmt(stmt);
                }
                let (owner, table) = self.scopes.pop();
                self.resolutions.scopes.insert(owner, table);
            }
        }
    }

    fn resolve_expr(&mut self, expr_id: ExprId) {
        let expr = self.ast.exprs.get(expr_id);
        let loc = expr.loc.clone();
        let kind = expr.kind.clone();

        match kind {
            ExprKind::Literal(_) => {}

            ExprKind::Identifier(name) => match self.scopes.lookup(name) {
                Some(decl) => {
                    self.resolutions.uses.insert(expr_id, decl);
                }
                None => self.undeclared(name, loc),
            },

            ExprKind::Member {
                object,
                field,
                field_loc,
            } => {
                self.resolve_expr(object);

                match self.field_namespace(object) {
                    FieldNamespace::Record(record) => {
                        let target = self
                            .resolutions
                            .field_table(record)
                            .and_then(|table| table.resolve_local(field));
                        match target {
                            Some(decl) => {
                                self.resolutions.uses.insert(expr_id, decl);
                            }
                            None => self.undeclared_field(field, field_loc, Some(record)),
                        }
                    }
                    FieldNamespace::NotARecord => {
                        self.undeclared_field(field, field_loc, None);
                    }
                    FieldNamespace::Unknown => {}
                }
            }

            ExprKind::Call { callee, args } => {
                self.resolve_expr(callee);
                for arg in args {
                    self.resolve_expr(arg);
                }
            }

            ExprKind::Unary { operand, .. } => self.resolve_expr(operand),

            ExprKind::Binary { lhs, rhs, .. } => {
                self.resolve_expr(lhs);
                self.resolve_expr(rhs);
            }
        }
    }

    fn resolve_type(&mut self, type_id: TypeId) {
        let ty = self.ast.types.get(type_id);
        let loc = ty.loc.clone();
        let kind = ty.kind.clone();

        match kind {
            TypeKind::Primitive(_) => {}

            TypeKind::Named(name) => match self.scopes.lookup(name) {
                Some(decl) if matches!(self.ast.decls.get(decl).kind, DeclKind::Record { .. }) => {
                    self.resolutions.types.insert(type_id, decl);
                }
                Some(_) => {
                    // Visible, but it names no record type; there is no
                    // declaration usable in type position here.
                    self.errors.push(
                        CompileError::new(CompileErrorKind::UndeclaredIdentifier { name }, loc)
                            .with_context("this name does not refer to a record type"),
                    );
                }
                None => self.undeclared(name, loc),
            },
        }
    }

    /// Determine, structurally, which record's field namespace a member
    /// access on `object` should consult. Only inspects declared types;
    /// no compatibility checking happens here.
    fn field_namespace(&self, object: ExprId) -> FieldNamespace {
        let (target, is_call) = match &self.ast.exprs.get(object).kind {
            ExprKind::Identifier(_) | ExprKind::Member { .. } => {
                (self.resolutions.use_target(object), false)
            }
            ExprKind::Call { callee, .. } => (self.resolutions.use_target(*callee), true),
            _ => return FieldNamespace::NotARecord,
        };
        let Some(decl_id) = target else {
            return FieldNamespace::Unknown;
        };

        let ty = match &self.ast.decls.get(decl_id).kind {
            DeclKind::Var { ty, .. } | DeclKind::Param { ty } | DeclKind::Field { ty } => *ty,
            // A function's return type only becomes a field namespace
            // through a call; the bare function name has no fields.
            DeclKind::Fn { ret, .. } if is_call => *ret,
            DeclKind::Fn { .. } | DeclKind::Record { .. } => return FieldNamespace::NotARecord,
        };

        match &self.ast.types.get(ty).kind {
            TypeKind::Named(_) => match self.resolutions.type_target(ty) {
                Some(record) => FieldNamespace::Record(record),
                None => FieldNamespace::Unknown,
            },
            TypeKind::Primitive(_) => FieldNamespace::NotARecord,
        }
    }

    /// Declare `name` in the innermost open scope, reporting a duplicate
    /// against the surviving original on failure.
    fn declare(&mut self, name: Symbol, name_loc: Loc, decl_id: DeclId) {
        if let Err(original) = self.scopes.current_mut().declare(name, decl_id) {
            self.duplicate(name, name_loc, original);
        }
    }

    fn duplicate(&mut self, name: Symbol, name_loc: Loc, original: DeclId) {
        let original_loc = self.ast.decls.get(original).name_loc.clone();
        self.errors.push(
            CompileError::new(
                CompileErrorKind::DuplicateDeclaration {
                    name,
                    original: original_loc,
                },
                name_loc,
            )
            .with_context("redeclared here"),
        );
    }

    fn undeclared(&mut self, name: Symbol, loc: Loc) {
        let suggestion = {
            let target = self.interner.resolve(name);
            let candidates: Vec<&str> = self
                .scopes
                .visible_names()
                .map(|sym| self.interner.resolve(sym))
                .collect();
            suggestions::best_match(target, candidates.into_iter()).map(str::to_string)
        };

        let mut err = CompileError::new(CompileErrorKind::UndeclaredIdentifier { name }, loc);
        if let Some(suggestion) = suggestion {
            err = err.with_suggestion(ErrorSuggestion::DidYouMean { suggestion });
        }
        self.errors.push(err);
    }

    fn undeclared_field(&mut self, field: Symbol, field_loc: Loc, record: Option<DeclId>) {
        let suggestion = record.and_then(|record| {
            let table = self.resolutions.field_table(record)?;
            let target = self.interner.resolve(field);
            let candidates: Vec<&str> = table
                .names()
                .map(|sym| self.interner.resolve(sym))
                .collect();
            suggestions::best_match(target, candidates.into_iter()).map(str::to_string)
        });

        let mut err = CompileError::new(
            CompileErrorKind::UndeclaredIdentifier { name: field },
            field_loc,
        )
        .with_context("no field with this name is declared here");
        if let Some(suggestion) = suggestion {
            err = err.with_suggestion(ErrorSuggestion::DidYouMean { suggestion });
        }
        self.errors.push(err);
    }
}
