//! Generic function-body walker threading a guard-context stack: checkers
//! reason about the conjunction of guards active at an operation, not a full
//! CFG dominator query.

use crate::ast::{Expr, Stmt};
use crate::features::bug_patterns::domain::{guards_from_condition, Guard};

/// Invoked for every expression encountered, with the guards known to hold at
/// that point (outermost first).
pub trait ExprVisitor {
    fn visit_expr(&mut self, expr: &Expr, guards: &[Guard]);
}

pub fn walk_function(body: &[Stmt], visitor: &mut dyn ExprVisitor) {
    let mut guards = Vec::new();
    walk_stmts(body, &mut guards, visitor);
}

fn walk_stmts(stmts: &[Stmt], guards: &mut Vec<Guard>, visitor: &mut dyn ExprVisitor) {
    for stmt in stmts {
        walk_stmt(stmt, guards, visitor);
    }
}

fn walk_expr(expr: &Expr, guards: &[Guard], visitor: &mut dyn ExprVisitor) {
    visitor.visit_expr(expr, guards);
    for child in expr.children() {
        walk_expr(child, guards, visitor);
    }
}

fn with_guards<F: FnOnce(&mut Vec<Guard>)>(guards: &mut Vec<Guard>, extra: Vec<Guard>, f: F) {
    let added = extra.len();
    guards.extend(extra);
    f(guards);
    guards.truncate(guards.len() - added);
}

fn walk_stmt(stmt: &Stmt, guards: &mut Vec<Guard>, visitor: &mut dyn ExprVisitor) {
    match stmt {
        Stmt::If(s) => {
            walk_expr(&s.condition, guards, visitor);
            let then_guards = guards_from_condition(&s.condition, true);
            with_guards(guards, then_guards, |g| walk_stmts(&s.then_branch, g, visitor));
            if let Some(else_branch) = &s.else_branch {
                let else_guards = guards_from_condition(&s.condition, false);
                with_guards(guards, else_guards, |g| walk_stmts(else_branch, g, visitor));
            }
        }
        Stmt::While(s) => {
            walk_expr(&s.condition, guards, visitor);
            let body_guards = guards_from_condition(&s.condition, true);
            with_guards(guards, body_guards, |g| walk_stmts(&s.body, g, visitor));
        }
        Stmt::DoWhile(s) => {
            walk_stmts(&s.body, guards, visitor);
            walk_expr(&s.condition, guards, visitor);
        }
        Stmt::For(s) => {
            if let Some(init) = &s.init {
                walk_stmt(init, guards, visitor);
            }
            let cond_guards = s
                .condition
                .as_ref()
                .map(|c| {
                    walk_expr(c, guards, visitor);
                    guards_from_condition(c, true)
                })
                .unwrap_or_default();
            with_guards(guards, cond_guards, |g| {
                walk_stmts(&s.body, g, visitor);
                if let Some(update) = &s.update {
                    walk_stmt(update, g, visitor);
                }
            });
        }
        Stmt::ForEach(s) => {
            walk_expr(&s.iterable, guards, visitor);
            walk_stmts(&s.body, guards, visitor);
        }
        Stmt::Match(s) => {
            walk_expr(&s.scrutinee, guards, visitor);
            for arm in &s.arms {
                if let Some(g) = &arm.guard {
                    walk_expr(g, guards, visitor);
                }
                walk_stmts(&arm.body, guards, visitor);
            }
        }
        Stmt::Try(s) => {
            walk_stmts(&s.body, guards, visitor);
            for catch in &s.catches {
                walk_stmts(&catch.body, guards, visitor);
            }
            if let Some(finally) = &s.finally {
                walk_stmts(finally, guards, visitor);
            }
        }
        Stmt::Return(s) => {
            if let Some(v) = &s.value {
                walk_expr(v, guards, visitor);
            }
        }
        Stmt::Throw(s) => {
            if let Some(v) = &s.value {
                walk_expr(v, guards, visitor);
            }
        }
        Stmt::Break(_) | Stmt::Continue(_) => {}
        Stmt::Binding(s) => {
            if let Some(v) = &s.value {
                walk_expr(v, guards, visitor);
            }
        }
        Stmt::Assignment(s) => {
            if let crate::ast::AssignTarget::Index { base, index } = &s.target {
                walk_expr(base, guards, visitor);
                walk_expr(index, guards, visitor);
            }
            if let crate::ast::AssignTarget::Field { base, .. } = &s.target {
                walk_expr(base, guards, visitor);
            }
            walk_expr(&s.value, guards, visitor);
        }
        Stmt::Expr(s) => walk_expr(&s.expr, guards, visitor),
        Stmt::Block(s) => walk_stmts(&s.stmts, guards, visitor),
    }
}
