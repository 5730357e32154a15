//! Phase 3 of effect enforcement: per-function effect
//! inference. Walks a function body construct by construct, unioning the
//! contribution of each: calls (internal via the computed table, external via
//! the resolver), containers (conditions/bodies/handlers), throws, and
//! mutating assignments.
//!
//! Call-site argument types aren't carried on [`ast::Expr`] beyond literals —
//! the bound AST this crate consumes doesn't attach resolved static types to
//! call arguments — so the signature built for resolver/built-in lookup uses
//! a literal-derived type hint (`"string"`, `"int"`, `"bool"`, `"null"`) and
//! falls back to `"Any"` for anything else. This is a documented
//! approximation (see DESIGN.md), not a spec requirement.

use super::call_index::CallIndex;
use crate::ast::{self, AssignTarget, Expr, Literal, Stmt};
use crate::features::effect_model::{Effect, EffectKind, EffectSet};
use crate::features::effect_resolver::{EffectResolver, ResolveQuery, Resolution};
use crate::shared::{FunctionId, Span};
use std::collections::HashMap;

/// A call whose target the resolver could not determine at all — an
/// "unknown call". Diagnostics for these are emitted once, after
/// the enclosing SCC's fixpoint has settled, not on every iteration.
#[derive(Debug, Clone)]
pub struct UnknownCallSite {
    pub span: Span,
    pub descriptor: String,
}

fn arg_type_hint(expr: &Expr) -> &'static str {
    match expr {
        Expr::Literal(lit) => match lit.value {
            Literal::Int(_) => "int",
            Literal::Bool(_) => "bool",
            Literal::Str(_) => "string",
            Literal::Null => "null",
        },
        _ => "Any",
    }
}

fn arg_signature(args: &[Expr]) -> String {
    args.iter().map(|a| arg_type_hint(a)).collect::<Vec<_>>().join(",")
}

struct InferCtx<'a> {
    index: &'a CallIndex,
    computed: &'a HashMap<FunctionId, EffectSet>,
    resolver: &'a EffectResolver,
    unknown_sites: Vec<UnknownCallSite>,
}

/// Computes one function's effect set from already-settled callee estimates,
/// plus the list of call sites the resolver couldn't classify at all.
pub fn compute_function_effects(
    func: &ast::Function,
    index: &CallIndex,
    computed: &HashMap<FunctionId, EffectSet>,
    resolver: &EffectResolver,
) -> (EffectSet, Vec<UnknownCallSite>) {
    let mut ctx = InferCtx {
        index,
        computed,
        resolver,
        unknown_sites: Vec::new(),
    };
    let set = ctx.infer_stmts(&func.body);
    (set, ctx.unknown_sites)
}

impl<'a> InferCtx<'a> {
    fn infer_stmts(&mut self, stmts: &[Stmt]) -> EffectSet {
        let mut set = EffectSet::empty();
        for stmt in stmts {
            set = set.union(&self.infer_stmt(stmt));
        }
        set
    }

    fn infer_stmt(&mut self, stmt: &Stmt) -> EffectSet {
        match stmt {
            Stmt::If(s) => {
                let mut set = self.infer_expr(&s.condition);
                set = set.union(&self.infer_stmts(&s.then_branch));
                if let Some(else_branch) = &s.else_branch {
                    set = set.union(&self.infer_stmts(else_branch));
                }
                set
            }
            Stmt::While(s) => self.infer_expr(&s.condition).union(&self.infer_stmts(&s.body)),
            Stmt::DoWhile(s) => self.infer_stmts(&s.body).union(&self.infer_expr(&s.condition)),
            Stmt::For(s) => {
                let mut set = EffectSet::empty();
                if let Some(init) = &s.init {
                    set = set.union(&self.infer_stmt(init));
                }
                if let Some(cond) = &s.condition {
                    set = set.union(&self.infer_expr(cond));
                }
                set = set.union(&self.infer_stmts(&s.body));
                if let Some(update) = &s.update {
                    set = set.union(&self.infer_stmt(update));
                }
                set
            }
            Stmt::ForEach(s) => self.infer_expr(&s.iterable).union(&self.infer_stmts(&s.body)),
            Stmt::Match(s) => {
                let mut set = self.infer_expr(&s.scrutinee);
                for arm in &s.arms {
                    if let Some(guard) = &arm.guard {
                        set = set.union(&self.infer_expr(guard));
                    }
                    set = set.union(&self.infer_stmts(&arm.body));
                }
                set
            }
            Stmt::Try(s) => {
                let mut set = self.infer_stmts(&s.body);
                for catch in &s.catches {
                    set = set.union(&self.infer_stmts(&catch.body));
                }
                if let Some(finally) = &s.finally {
                    set = set.union(&self.infer_stmts(finally));
                }
                set
            }
            Stmt::Return(s) => s
                .value
                .as_ref()
                .map(|v| self.infer_expr(v))
                .unwrap_or_else(EffectSet::empty),
            Stmt::Throw(s) => {
                let mut set = EffectSet::single(Effect::new(EffectKind::Exception, "intentional"));
                if let Some(value) = &s.value {
                    set = set.union(&self.infer_expr(value));
                }
                set
            }
            Stmt::Break(_) | Stmt::Continue(_) => EffectSet::empty(),
            Stmt::Binding(s) => s
                .value
                .as_ref()
                .map(|v| self.infer_expr(v))
                .unwrap_or_else(EffectSet::empty),
            Stmt::Assignment(s) => {
                let mut set = self.infer_expr(&s.value);
                match &s.target {
                    AssignTarget::Local(_) => {}
                    AssignTarget::Field { base, .. } => {
                        set = set.union(&self.infer_expr(base));
                        set = set.union(&EffectSet::single(Effect::new(EffectKind::Mutation, "heap_write")));
                    }
                    AssignTarget::Index { base, index } => {
                        set = set.union(&self.infer_expr(base));
                        set = set.union(&self.infer_expr(index));
                        set = set.union(&EffectSet::single(Effect::new(EffectKind::Mutation, "heap_write")));
                    }
                }
                set
            }
            Stmt::Expr(s) => self.infer_expr(&s.expr),
            Stmt::Block(s) => self.infer_stmts(&s.stmts),
        }
    }

    fn infer_expr(&mut self, expr: &Expr) -> EffectSet {
        match expr {
            Expr::Literal(_) | Expr::Identifier(_) => EffectSet::empty(),
            Expr::Binary(e) => self.infer_expr(&e.lhs).union(&self.infer_expr(&e.rhs)),
            Expr::Unary(e) => self.infer_expr(&e.operand),
            Expr::Call(e) => {
                let mut set = self.resolve_free_call(&e.callee, &e.args, e.span);
                for arg in &e.args {
                    set = set.union(&self.infer_expr(arg));
                }
                set
            }
            Expr::MethodCall(e) => {
                let mut set = self.resolve_method_call(
                    e.receiver_type.as_deref(),
                    &e.method,
                    &e.args,
                    e.span,
                );
                set = set.union(&self.infer_expr(&e.receiver));
                for arg in &e.args {
                    set = set.union(&self.infer_expr(arg));
                }
                set
            }
            Expr::New(e) => {
                let mut set = self.resolve_constructor(&e.type_name, &e.args, e.span);
                for arg in &e.args {
                    set = set.union(&self.infer_expr(arg));
                }
                set
            }
            Expr::FieldAccess(e) => self.infer_expr(&e.base),
            Expr::Index(e) => self.infer_expr(&e.base).union(&self.infer_expr(&e.index)),
            Expr::Lambda(e) => self.infer_stmts(&e.body),
            Expr::Unwrap(e) => {
                let mut set = self.infer_expr(&e.base);
                if let ast::UnwrapKind::UnwrapOr(default) = &e.kind {
                    set = set.union(&self.infer_expr(default));
                }
                set
            }
        }
    }

    fn resolve_free_call(&mut self, name: &str, args: &[Expr], span: Span) -> EffectSet {
        if let Some(id) = self.index.resolve_free(name) {
            return self.computed.get(&id).cloned().unwrap_or_else(EffectSet::empty);
        }
        let signature = format!("{name}({})", arg_signature(args));
        self.resolve_external(ResolveQuery::method("", name, signature), name.to_string(), span)
    }

    fn resolve_method_call(
        &mut self,
        receiver_type: Option<&str>,
        method: &str,
        args: &[Expr],
        span: Span,
    ) -> EffectSet {
        let Some(owner) = receiver_type else {
            return self.resolve_external(
                ResolveQuery::method("", method, method.to_string()),
                method.to_string(),
                span,
            );
        };
        if let Some(id) = self.index.resolve_member(owner, method) {
            return self.computed.get(&id).cloned().unwrap_or_else(EffectSet::empty);
        }
        let signature = format!("{owner}::{method}({})", arg_signature(args));
        self.resolve_external(
            ResolveQuery::method(owner, method, signature),
            format!("{owner}::{method}"),
            span,
        )
    }

    fn resolve_constructor(&mut self, type_name: &str, args: &[Expr], span: Span) -> EffectSet {
        if let Some(id) = self.index.resolve_member(type_name, type_name) {
            return self.computed.get(&id).cloned().unwrap_or_else(EffectSet::empty);
        }
        let signature = format!("{type_name}::{type_name}({})", arg_signature(args));
        self.resolve_external(
            ResolveQuery::method(type_name, type_name, signature),
            type_name.to_string(),
            span,
        )
    }

    fn resolve_external(&mut self, query: ResolveQuery, descriptor: String, span: Span) -> EffectSet {
        let resolution = self.resolver.resolve(&query);
        if resolution == Resolution::Unknown {
            self.unknown_sites.push(UnknownCallSite { span, descriptor });
        }
        resolution.effect_set()
    }
}
