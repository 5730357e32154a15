//! Overflow checker: flags self-referencing accumulation
//! (`x = x + e`, `x = x - e`, `x = x * e`, or the equivalent compound-target
//! assignment) repeated inside a loop body with no guard bounding the
//! accumulator, since each loop iteration can push the value past the
//! integer's representable range.

use crate::ast::{AssignTarget, BinOp, Expr, Stmt};
use crate::features::bug_patterns::domain::Guard;
use crate::shared::{DiagnosticCode, DiagnosticSink, Severity};

pub fn check(body: &[Stmt], sink: &dyn DiagnosticSink) {
    walk(body, false, &[], sink);
}

fn walk(stmts: &[Stmt], in_loop: bool, guards: &[Guard], sink: &dyn DiagnosticSink) {
    for stmt in stmts {
        match stmt {
            Stmt::If(s) => {
                let mut then_guards = guards.to_vec();
                then_guards.extend(crate::features::bug_patterns::domain::guards_from_condition(
                    &s.condition,
                    true,
                ));
                walk(&s.then_branch, in_loop, &then_guards, sink);
                if let Some(e) = &s.else_branch {
                    let mut else_guards = guards.to_vec();
                    else_guards.extend(
                        crate::features::bug_patterns::domain::guards_from_condition(
                            &s.condition,
                            false,
                        ),
                    );
                    walk(e, in_loop, &else_guards, sink);
                }
            }
            Stmt::While(s) => walk(&s.body, true, guards, sink),
            Stmt::DoWhile(s) => walk(&s.body, true, guards, sink),
            Stmt::For(s) => walk(&s.body, true, guards, sink),
            Stmt::ForEach(s) => walk(&s.body, true, guards, sink),
            Stmt::Match(s) => {
                for arm in &s.arms {
                    walk(&arm.body, in_loop, guards, sink);
                }
            }
            Stmt::Try(s) => {
                walk(&s.body, in_loop, guards, sink);
                for c in &s.catches {
                    walk(&c.body, in_loop, guards, sink);
                }
                if let Some(f) = &s.finally {
                    walk(f, in_loop, guards, sink);
                }
            }
            Stmt::Block(s) => walk(&s.stmts, in_loop, guards, sink),
            Stmt::Assignment(a) => {
                if in_loop {
                    if let AssignTarget::Local(name) = &a.target {
                        check_accumulation(name, &a.value, guards, stmt.span(), sink);
                    }
                }
            }
            _ => {}
        }
    }
}

fn check_accumulation(
    target: &str,
    value: &Expr,
    guards: &[Guard],
    span: crate::shared::Span,
    sink: &dyn DiagnosticSink,
) {
    let Expr::Binary(b) = value else { return };
    if !matches!(b.op, BinOp::Add | BinOp::Sub | BinOp::Mul) {
        return;
    }
    let self_referencing = matches!(b.lhs.as_ref(), Expr::Identifier(id) if id.name == target)
        || matches!(b.rhs.as_ref(), Expr::Identifier(id) if id.name == target);
    if !self_referencing {
        return;
    }
    let bounded = guards.iter().any(|g| {
        matches!(g, Guard::LessThanLen(n) if n == target)
    });
    if bounded {
        return;
    }
    sink.report(
        span,
        DiagnosticCode::Overflow,
        format!(
            "`{target}` accumulates across loop iterations with no bound in scope; it may overflow"
        ),
        Severity::Warning,
    );
}
