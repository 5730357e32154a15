//! Shared value types and variable-reference helpers for the three dataflow
//! analyses. Each analysis plugs a different [`super::super::lattice::Lattice`]
//! into the generic solver; this module holds what they all need to walk a
//! statement for the variable it defines and the variables it reads.

use crate::ast::{AssignTarget, Expr, Stmt};
use crate::shared::BlockId;
use rustc_hash::FxHashSet;

/// Where a definition occurs: the block and the statement's index within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefSite {
    pub block: BlockId,
    pub stmt_index: usize,
}

/// A reaching-definitions fact: a variable paired with the site that last
/// bound it ("set of `(variable, definition-site)` pairs").
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Definition {
    pub variable: String,
    pub site: DefSite,
}

/// The local variable a statement defines, if any. A binding always defines
/// one; an assignment only defines one when its target is a bare local —
/// assigning into a field or an index mutates the referenced object without
/// rebinding the base variable, so it isn't itself a "definition".
pub fn stmt_local_def(stmt: &Stmt) -> Option<&str> {
    match stmt {
        Stmt::Binding(b) => Some(&b.name),
        Stmt::Assignment(a) => match &a.target {
            AssignTarget::Local(name) => Some(name),
            AssignTarget::Field { .. } | AssignTarget::Index { .. } => None,
        },
        _ => None,
    }
}

/// Every identifier *read* by a statement — condition expressions, a
/// binding/assignment's RHS, the base/index of a mutating assignment target —
/// appended to `out` in source order. Never includes the LHS name of a local
/// definition.
pub fn stmt_reads(stmt: &Stmt, out: &mut Vec<String>) {
    match stmt {
        Stmt::Binding(b) => {
            if let Some(v) = &b.value {
                expr_reads(v, out);
            }
        }
        Stmt::Assignment(a) => {
            match &a.target {
                AssignTarget::Local(_) => {}
                AssignTarget::Field { base, .. } => expr_reads(base, out),
                AssignTarget::Index { base, index } => {
                    expr_reads(base, out);
                    expr_reads(index, out);
                }
            }
            expr_reads(&a.value, out);
        }
        Stmt::Expr(s) => expr_reads(&s.expr, out),
        Stmt::Return(s) => {
            if let Some(v) = &s.value {
                expr_reads(v, out);
            }
        }
        Stmt::Throw(s) => {
            if let Some(v) = &s.value {
                expr_reads(v, out);
            }
        }
        Stmt::If(s) => expr_reads(&s.condition, out),
        Stmt::While(s) => expr_reads(&s.condition, out),
        Stmt::DoWhile(s) => expr_reads(&s.condition, out),
        Stmt::For(s) => {
            if let Some(c) = &s.condition {
                expr_reads(c, out);
            }
        }
        Stmt::ForEach(s) => expr_reads(&s.iterable, out),
        Stmt::Match(s) => expr_reads(&s.scrutinee, out),
        Stmt::Break(_) | Stmt::Continue(_) | Stmt::Try(_) | Stmt::Block(_) => {}
    }
}

fn expr_reads(expr: &Expr, out: &mut Vec<String>) {
    if let Expr::Identifier(id) = expr {
        out.push(id.name.clone());
    }
    for child in expr.children() {
        expr_reads(child, out);
    }
}

/// All locally-bound variable names in a function body, recursively through
/// every nested block/branch/loop, excluding parameters ("every
/// local — but not parameters — begins uninitialized"). Flat over names: a
/// binding in a nested block shadowing an outer one is treated as the same
/// variable, matching its note that the scope-aware alternative is
/// an open question the source leaves unresolved.
pub fn collect_bound_locals(body: &[Stmt]) -> FxHashSet<String> {
    let mut out = FxHashSet::default();
    collect_bound_locals_into(body, &mut out);
    out
}

fn collect_bound_locals_into(stmts: &[Stmt], out: &mut FxHashSet<String>) {
    for stmt in stmts {
        match stmt {
            Stmt::Binding(b) => {
                out.insert(b.name.clone());
            }
            Stmt::If(s) => {
                collect_bound_locals_into(&s.then_branch, out);
                if let Some(e) = &s.else_branch {
                    collect_bound_locals_into(e, out);
                }
            }
            Stmt::While(s) => collect_bound_locals_into(&s.body, out),
            Stmt::DoWhile(s) => collect_bound_locals_into(&s.body, out),
            Stmt::For(s) => {
                if let Some(init) = &s.init {
                    collect_bound_locals_into(std::slice::from_ref(init.as_ref()), out);
                }
                collect_bound_locals_into(&s.body, out);
            }
            Stmt::ForEach(s) => {
                out.insert(s.variable.clone());
                collect_bound_locals_into(&s.body, out);
            }
            Stmt::Match(s) => {
                for arm in &s.arms {
                    collect_bound_locals_into(&arm.body, out);
                }
            }
            Stmt::Try(s) => {
                collect_bound_locals_into(&s.body, out);
                for c in &s.catches {
                    collect_bound_locals_into(&c.body, out);
                }
                if let Some(f) = &s.finally {
                    collect_bound_locals_into(f, out);
                }
            }
            Stmt::Block(s) => collect_bound_locals_into(&s.stmts, out),
            Stmt::Return(_) | Stmt::Throw(_) | Stmt::Break(_) | Stmt::Continue(_)
            | Stmt::Assignment(_) | Stmt::Expr(_) => {}
        }
    }
}
