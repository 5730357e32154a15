//! Path-condition guards: the fixed vocabulary of relations a
//! bug-pattern checker can recognize along the way to an operation of
//! interest, derived syntactically from `if`/`while`/`for` conditions and
//! `match` arm patterns.

use crate::ast::{BinOp, Expr, Literal, UnOp};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guard {
    NotEqualZero(String),
    Positive(String),
    Negative(String),
    NonNegative(String),
    LessThanLen(String),
    NotNull(String),
}

impl Guard {
    pub fn variable(&self) -> &str {
        match self {
            Guard::NotEqualZero(n)
            | Guard::Positive(n)
            | Guard::Negative(n)
            | Guard::NonNegative(n)
            | Guard::LessThanLen(n)
            | Guard::NotNull(n) => n,
        }
    }
}

enum Rel {
    Gt,
    Lt,
    Ge,
}

/// Extracts every guard implied by `expr` being true (`polarity = true`, the
/// `if`/`while`'s condition itself, or a loop body) or false (the `else`
/// branch). Conjunctions split into both sides' guards; disjunctions (and De
/// Morgan's law across a negated conjunction) only contribute a guard both
/// sides agree on, since neither disjunct alone guarantees it.
pub fn guards_from_condition(expr: &Expr, polarity: bool) -> Vec<Guard> {
    match expr {
        Expr::Unary(u) if u.op == UnOp::Not => guards_from_condition(&u.operand, !polarity),
        Expr::Binary(b) => match (b.op, polarity) {
            (BinOp::And, true) => {
                let mut lhs = guards_from_condition(&b.lhs, true);
                lhs.extend(guards_from_condition(&b.rhs, true));
                lhs
            }
            (BinOp::Or, false) => {
                let mut lhs = guards_from_condition(&b.lhs, false);
                lhs.extend(guards_from_condition(&b.rhs, false));
                lhs
            }
            (BinOp::Or, true) => intersect(
                guards_from_condition(&b.lhs, true),
                guards_from_condition(&b.rhs, true),
            ),
            (BinOp::And, false) => intersect(
                guards_from_condition(&b.lhs, false),
                guards_from_condition(&b.rhs, false),
            ),
            (BinOp::Ne, _) => simple_compare(&b.lhs, &b.rhs, polarity, true),
            (BinOp::Eq, _) => simple_compare(&b.lhs, &b.rhs, polarity, false),
            (BinOp::Gt, _) => relational(&b.lhs, &b.rhs, polarity, Rel::Gt),
            (BinOp::Lt, _) => relational(&b.lhs, &b.rhs, polarity, Rel::Lt),
            (BinOp::Ge, _) => relational(&b.lhs, &b.rhs, polarity, Rel::Ge),
            _ => vec![],
        },
        Expr::MethodCall(m) if m.method == "is_some" && polarity => match m.receiver.as_ref() {
            Expr::Identifier(id) => vec![Guard::NotNull(id.name.clone())],
            _ => vec![],
        },
        _ => vec![],
    }
}

fn intersect(a: Vec<Guard>, b: Vec<Guard>) -> Vec<Guard> {
    a.into_iter().filter(|g| b.contains(g)).collect()
}

/// `x != 0` / `x == 0` and `x != null` / `x == null`, in either operand order.
/// `is_ne_op` is whether the source operator was `!=`; combined with
/// `polarity` it tells us whether the condition, taken as true, asserts
/// inequality (`want_ne`).
fn simple_compare(lhs: &Expr, rhs: &Expr, polarity: bool, is_ne_op: bool) -> Vec<Guard> {
    let want_ne = polarity == is_ne_op;
    if !want_ne {
        return vec![];
    }
    let (ident, other) = match (lhs, rhs) {
        (Expr::Identifier(i), other) => (i, other),
        (other, Expr::Identifier(i)) => (i, other),
        _ => return vec![],
    };
    match other {
        Expr::Literal(l) => match &l.value {
            Literal::Int(0) => vec![Guard::NotEqualZero(ident.name.clone())],
            Literal::Null => vec![Guard::NotNull(ident.name.clone())],
            _ => vec![],
        },
        _ => vec![],
    }
}

/// `x > 0`, `x < 0`, `x >= 0` against a literal zero; `x < <anything else>`
/// is read as a bounds check on `x` (`x < len` guard shape).
fn relational(lhs: &Expr, rhs: &Expr, polarity: bool, rel: Rel) -> Vec<Guard> {
    let Expr::Identifier(id) = lhs else {
        return vec![];
    };
    if let Expr::Literal(l) = rhs {
        if matches!(l.value, Literal::Int(0)) {
            return match (rel, polarity) {
                (Rel::Gt, true) => vec![Guard::Positive(id.name.clone())],
                (Rel::Lt, true) => vec![Guard::Negative(id.name.clone())],
                (Rel::Ge, true) => vec![Guard::NonNegative(id.name.clone())],
                _ => vec![],
            };
        }
    }
    if matches!(rel, Rel::Lt) && polarity {
        return vec![Guard::LessThanLen(id.name.clone())];
    }
    vec![]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;
    use crate::shared::Span;

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

    fn bin(op: BinOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(BinaryExpr {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
            span: span(),
        })
    }

    #[test]
    fn not_equal_zero_guard() {
        let cond = bin(BinOp::Ne, ident("b"), int(0));
        let guards = guards_from_condition(&cond, true);
        assert_eq!(guards, vec![Guard::NotEqualZero("b".into())]);
    }

    #[test]
    fn equal_zero_false_branch_implies_not_equal() {
        let cond = bin(BinOp::Eq, ident("b"), int(0));
        let guards = guards_from_condition(&cond, false);
        assert_eq!(guards, vec![Guard::NotEqualZero("b".into())]);
    }

    #[test]
    fn conjunction_splits_into_both_guards() {
        let cond = bin(
            BinOp::And,
            bin(BinOp::Ge, ident("i"), int(0)),
            bin(BinOp::Lt, ident("i"), ident("len")),
        );
        let guards = guards_from_condition(&cond, true);
        assert!(guards.contains(&Guard::NonNegative("i".into())));
        assert!(guards.contains(&Guard::LessThanLen("i".into())));
    }

    #[test]
    fn disjunction_only_keeps_shared_guards() {
        let cond = bin(
            BinOp::Or,
            bin(BinOp::Ne, ident("x"), int(0)),
            bin(BinOp::Gt, ident("y"), int(0)),
        );
        assert!(guards_from_condition(&cond, true).is_empty());
    }

    #[test]
    fn not_null_via_literal_comparison() {
        let cond = bin(
            BinOp::Ne,
            ident("obj"),
            Expr::Literal(LiteralExpr {
                value: Literal::Null,
                span: span(),
            }),
        );
        assert_eq!(
            guards_from_condition(&cond, true),
            vec![Guard::NotNull("obj".into())]
        );
    }
}
