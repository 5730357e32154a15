//! Division-by-zero checker: flags `a / b` or `a % b` whose
//! divisor is a variable not covered by a `NotEqualZero` guard, or a literal
//! zero divisor outright.

use crate::ast::{BinOp, Expr, Literal};
use crate::features::bug_patterns::domain::Guard;
use crate::features::bug_patterns::infrastructure::walker::{walk_function, ExprVisitor};
use crate::shared::{DiagnosticCode, DiagnosticSink, Fix, Severity, TextEdit};

struct DivisionChecker<'s> {
    sink: &'s dyn DiagnosticSink,
}

impl ExprVisitor for DivisionChecker<'_> {
    fn visit_expr(&mut self, expr: &Expr, guards: &[Guard]) {
        let Expr::Binary(b) = expr else { return };
        if !matches!(b.op, BinOp::Div | BinOp::Mod) {
            return;
        }
        match b.rhs.as_ref() {
            Expr::Literal(l) if matches!(l.value, Literal::Int(0)) => {
                self.sink.report(
                    expr.span(),
                    DiagnosticCode::DivisionByZero,
                    "division by the literal constant zero".to_string(),
                    Severity::Error,
                );
            }
            Expr::Identifier(id) => {
                let guarded = guards
                    .iter()
                    .any(|g| matches!(g, Guard::NotEqualZero(n) if n == &id.name));
                if !guarded {
                    let fix = Fix::new(
                        format!("guard the divisor with `if ({} != 0)`", id.name),
                        vec![TextEdit {
                            file_path: String::new(),
                            start_line: expr.span().start.line,
                            start_col: expr.span().start.column,
                            end_line: expr.span().end.line,
                            end_col: expr.span().end.column,
                            replacement: format!(
                                "/* guard: if ({name} != 0) */ {expr}",
                                name = id.name,
                                expr = render_division(b)
                            ),
                        }],
                    );
                    self.sink.report_with_fix(
                        expr.span(),
                        DiagnosticCode::DivisionByZero,
                        format!("`{}` may be zero at this division; no guard found on the path leading here", id.name),
                        Severity::Warning,
                        fix,
                    );
                }
            }
            _ => {}
        }
    }
}

pub fn check(body: &[crate::ast::Stmt], sink: &dyn DiagnosticSink) {
    let mut checker = DivisionChecker { sink };
    walk_function(body, &mut checker);
}

/// Best-effort re-rendering of `a / b` / `a % b` for the fix's replacement text.
/// Only identifiers and integer literals render as themselves; anything else
/// falls back to a placeholder, since this checker has no general pretty-printer.
fn render_division(b: &crate::ast::BinaryExpr) -> String {
    let op = match b.op {
        BinOp::Div => "/",
        BinOp::Mod => "%",
        _ => unreachable!("render_division only called for Div/Mod"),
    };
    format!("{} {} {}", render_operand(&b.lhs), op, render_operand(&b.rhs))
}

fn render_operand(expr: &Expr) -> String {
    match expr {
        Expr::Identifier(id) => id.name.clone(),
        Expr::Literal(l) => match &l.value {
            Literal::Int(v) => v.to_string(),
            _ => "<expr>".to_string(),
        },
        _ => "<expr>".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::shared::{Diagnostic, Span};
    use std::sync::Mutex;

    struct RecordingSink(Mutex<Vec<Diagnostic>>);
    impl DiagnosticSink for RecordingSink {
        fn report(&self, span: Span, code: DiagnosticCode, message: String, severity: Severity) {
            self.0.lock().unwrap().push(Diagnostic {
                span,
                code,
                message,
                severity,
                fix: None,
            });
        }
    }

    fn span() -> Span {
        Span::zero()
    }

    fn ident(name: &str) -> Expr {
        Expr::Identifier(IdentifierExpr {
            name: name.into(),
            span: span(),
        })
    }

    fn int(v: i64) -> Expr {
        Expr::Literal(LiteralExpr {
            value: Literal::Int(v),
            span: span(),
        })
    }

    fn div(lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            op: BinOp::Div,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: span(),
        })
    }

    #[test]
    fn unguarded_division_is_flagged() {
        let body = vec![Stmt::Expr(ExprStmt {
            expr: div(ident("a"), ident("b")),
            span: span(),
        })];
        let sink = RecordingSink(Mutex::new(Vec::new()));
        check(&body, &sink);
        assert_eq!(sink.0.lock().unwrap().len(), 1);
    }

    #[test]
    fn literal_zero_divisor_is_flagged_as_error() {
        let body = vec![Stmt::Expr(ExprStmt {
            expr: div(ident("a"), int(0)),
            span: span(),
        })];
        let sink = RecordingSink(Mutex::new(Vec::new()));
        check(&body, &sink);
        let diags = sink.0.lock().unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].severity, Severity::Error);
    }

    #[test]
    fn guarded_division_is_clean() {
        let body = vec![Stmt::If(IfStmt {
            condition: Expr::Binary(BinaryExpr {
                op: BinOp::Ne,
                lhs: Box::new(ident("b")),
                rhs: Box::new(int(0)),
                span: span(),
            }),
            then_branch: vec![Stmt::Expr(ExprStmt {
                expr: div(ident("a"), ident("b")),
                span: span(),
            })],
            else_branch: None,
            span: span(),
        })];
        let sink = RecordingSink(Mutex::new(Vec::new()));
        check(&body, &sink);
        assert!(sink.0.lock().unwrap().is_empty());
    }
}
