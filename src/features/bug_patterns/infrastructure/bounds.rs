//! Out-of-bounds index checker: flags `arr[i]` where `i` is a
//! variable not covered by both a `NonNegative` (or `Positive`) and a
//! `LessThanLen` guard on the path.

use crate::ast::Expr;
use crate::features::bug_patterns::domain::Guard;
use crate::features::bug_patterns::infrastructure::walker::{walk_function, ExprVisitor};
use crate::shared::{DiagnosticCode, DiagnosticSink, Severity};

struct BoundsChecker<'s> {
    sink: &'s dyn DiagnosticSink,
}

impl ExprVisitor for BoundsChecker<'_> {
    fn visit_expr(&mut self, expr: &Expr, guards: &[Guard]) {
        let Expr::Index(idx) = expr else { return };
        let Expr::Identifier(index_var) = idx.index.as_ref() else {
            return;
        };
        let lower_bounded = guards.iter().any(|g| {
            matches!(g, Guard::NonNegative(n) | Guard::Positive(n) if n == &index_var.name)
        });
        let upper_bounded = guards
            .iter()
            .any(|g| matches!(g, Guard::LessThanLen(n) if n == &index_var.name));
        if !lower_bounded || !upper_bounded {
            self.sink.report(
                expr.span(),
                DiagnosticCode::IndexOutOfBounds,
                format!(
                    "`{}` is not provably within bounds at this index ({}{})",
                    index_var.name,
                    if !lower_bounded { "no lower bound" } else { "" },
                    if !lower_bounded && !upper_bounded {
                        ", no upper bound"
                    } else if !upper_bounded {
                        "no upper bound"
                    } else {
                        ""
                    }
                ),
                Severity::Warning,
            );
        }
    }
}

pub fn check(body: &[crate::ast::Stmt], sink: &dyn DiagnosticSink) {
    let mut checker = BoundsChecker { sink };
    walk_function(body, &mut checker);
}
