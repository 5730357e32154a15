//! Loop discovery and invariant-template synthesis: finds
//! every loop in a function body and proposes candidate templates from the
//! loop's guard condition and the accumulation statements in its body.

use crate::ast::{AssignTarget, BinOp, Expr, Stmt};
use crate::features::bug_patterns::domain::{guards_from_condition, Guard};
use crate::features::invariants::domain::{InvariantTemplate, LoopContext};

/// Every loop (`while`, `for`, `do`/`while`) found anywhere in `body`,
/// including nested ones, in source order.
pub fn find_loops(body: &[Stmt]) -> Vec<LoopContext> {
    let mut out = Vec::new();
    collect_loops(body, &mut out);
    out
}

fn collect_loops(stmts: &[Stmt], out: &mut Vec<LoopContext>) {
    for stmt in stmts {
        match stmt {
            Stmt::While(s) => {
                out.push(LoopContext {
                    condition: Some(s.condition.clone()),
                    body: s.body.clone(),
                    header_bound: vec![],
                    span: s.span,
                });
                collect_loops(&s.body, out);
            }
            Stmt::DoWhile(s) => {
                out.push(LoopContext {
                    condition: Some(s.condition.clone()),
                    body: s.body.clone(),
                    header_bound: vec![],
                    span: s.span,
                });
                collect_loops(&s.body, out);
            }
            Stmt::For(s) => {
                let header_bound = match &s.init {
                    Some(init) => crate::features::dataflow::domain::stmt_local_def(init)
                        .map(|n| vec![n.to_string()])
                        .unwrap_or_default(),
                    None => vec![],
                };
                out.push(LoopContext {
                    condition: s.condition.clone(),
                    body: s.body.clone(),
                    header_bound,
                    span: s.span,
                });
                collect_loops(&s.body, out);
            }
            Stmt::ForEach(s) => collect_loops(&s.body, out),
            Stmt::If(s) => {
                collect_loops(&s.then_branch, out);
                if let Some(e) = &s.else_branch {
                    collect_loops(e, out);
                }
            }
            Stmt::Match(s) => {
                for arm in &s.arms {
                    collect_loops(&arm.body, out);
                }
            }
            Stmt::Try(s) => {
                collect_loops(&s.body, out);
                for c in &s.catches {
                    collect_loops(&c.body, out);
                }
                if let Some(f) = &s.finally {
                    collect_loops(f, out);
                }
            }
            Stmt::Block(s) => collect_loops(&s.stmts, out),
            _ => {}
        }
    }
}

/// Proposes every template the loop's syntactic shape supports. A loop may
/// yield zero, one, or several candidates; the k-induction driver checks
/// each independently.
pub fn synthesize(ctx: &LoopContext) -> Vec<InvariantTemplate> {
    let mut templates = Vec::new();

    if let Some(cond) = &ctx.condition {
        for guard in guards_from_condition(cond, true) {
            match guard {
                Guard::NonNegative(var) | Guard::Positive(var) => {
                    templates.push(InvariantTemplate::BoundedVariable {
                        var: var.clone(),
                        lower: Some(0),
                        upper: None,
                    });
                }
                Guard::LessThanLen(var) => {
                    if let Expr::Binary(b) = cond {
                        if let BinOp::Lt = b.op {
                            if let Expr::Identifier(bound) = b.rhs.as_ref() {
                                templates.push(InvariantTemplate::BoundedVariable {
                                    var: var.clone(),
                                    lower: Some(0),
                                    upper: None,
                                });
                                templates.push(InvariantTemplate::ArrayIndexWithinBounds {
                                    index: var,
                                    array: bound.name.clone(),
                                });
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }

    for stmt in &ctx.body {
        if let Stmt::Assignment(a) = stmt {
            if let AssignTarget::Local(name) = &a.target {
                if is_monotonic_increase(name, &a.value) {
                    templates.push(InvariantTemplate::MonotonicIncrease { var: name.clone() });
                }
                if is_nonneg_accumulation(name, &a.value) {
                    templates.push(InvariantTemplate::AccumulatorNonNegative {
                        var: name.clone(),
                    });
                }
            }
        }
    }

    if let Some(measure) = ctx.header_bound.first() {
        templates.push(InvariantTemplate::TerminationMeasure {
            measure: measure.clone(),
        });
    }

    templates.dedup();
    templates
}

fn is_monotonic_increase(target: &str, value: &Expr) -> bool {
    let Expr::Binary(b) = value else { return false };
    matches!(b.op, BinOp::Add)
        && matches!(b.lhs.as_ref(), Expr::Identifier(id) if id.name == target)
}

fn is_nonneg_accumulation(target: &str, value: &Expr) -> bool {
    let Expr::Binary(b) = value else { return false };
    matches!(b.op, BinOp::Add)
        && (matches!(b.lhs.as_ref(), Expr::Identifier(id) if id.name == target)
            || matches!(b.rhs.as_ref(), Expr::Identifier(id) if id.name == target))
}
