//! Bounded k-induction driver: checks a synthesized template
//! against a loop up to a configured depth by phrasing a base-case query for
//! each unrolling `0..depth` and one inductive-step query, handing both to a
//! [`DecisionProcedure`]. This crate owns the query phrasing only — the
//! procedure itself is supplied by the embedder (Non-goals: no SMT solver
//! implementation).

use crate::config::KInductionBudget;
use crate::features::invariants::domain::{
    DecisionOutcome, DecisionProcedure, InvariantResult, InvariantTemplate, InvariantVerdict,
    LoopContext,
};

/// Checks every template synthesized for `ctx` against `procedure`, up to
/// `budget.depth` unrollings.
pub fn check_loop(
    ctx: &LoopContext,
    procedure: &dyn DecisionProcedure,
    budget: KInductionBudget,
) -> Vec<InvariantResult> {
    super::synthesis::synthesize(ctx)
        .into_iter()
        .map(|template| check_template(ctx, template, procedure, budget))
        .collect()
}

fn check_template(
    ctx: &LoopContext,
    template: InvariantTemplate,
    procedure: &dyn DecisionProcedure,
    budget: KInductionBudget,
) -> InvariantResult {
    let formula = template.as_formula();
    let guard = ctx
        .condition
        .as_ref()
        .map(|_| "loop_guard_holds".to_string());
    let mut assumptions = Vec::new();
    if let Some(g) = &guard {
        assumptions.push(g.clone());
    }

    // Base cases: the invariant must hold at loop entry and after each of the
    // first `depth` iterations.
    for k in 0..budget.depth {
        let base_assumptions = {
            let mut a = assumptions.clone();
            a.push(format!("iteration == {k}"));
            a
        };
        match procedure.is_valid(&base_assumptions, &formula) {
            DecisionOutcome::Invalid => {
                return InvariantResult {
                    template,
                    verdict: InvariantVerdict::Refuted,
                    loop_span: ctx.span,
                };
            }
            DecisionOutcome::Unknown => {
                return InvariantResult {
                    template,
                    verdict: InvariantVerdict::Unknown,
                    loop_span: ctx.span,
                };
            }
            DecisionOutcome::Valid => {}
        }
    }

    // Inductive step: assuming the invariant holds at some iteration within
    // the unrolled window, it holds after one more iteration through the
    // loop guard.
    let mut step_assumptions = assumptions.clone();
    step_assumptions.push(formula.clone());
    step_assumptions.push("loop_guard_holds".to_string());
    let step_formula = format!("{formula} /* after one more iteration */");
    let verdict = match procedure.is_valid(&step_assumptions, &step_formula) {
        DecisionOutcome::Valid => InvariantVerdict::HoldsUpToDepth,
        DecisionOutcome::Invalid => InvariantVerdict::Refuted,
        DecisionOutcome::Unknown => InvariantVerdict::Unknown,
    };

    InvariantResult {
        template,
        verdict,
        loop_span: ctx.span,
    }
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

    struct AlwaysValid;
    impl DecisionProcedure for AlwaysValid {
        fn is_valid(&self, _assumptions: &[String], _formula: &str) -> DecisionOutcome {
            DecisionOutcome::Valid
        }
    }

    struct AlwaysInvalid;
    impl DecisionProcedure for AlwaysInvalid {
        fn is_valid(&self, _assumptions: &[String], _formula: &str) -> DecisionOutcome {
            DecisionOutcome::Invalid
        }
    }

    fn bounds_loop() -> LoopContext {
        LoopContext {
            condition: Some(Expr::Binary(BinaryExpr {
                op: BinOp::Lt,
                lhs: Box::new(ident("i")),
                rhs: Box::new(ident("len")),
                span: span(),
            })),
            body: vec![],
            header_bound: vec![],
            span: span(),
        }
    }

    #[test]
    fn holds_up_to_depth_when_procedure_always_validates() {
        let ctx = bounds_loop();
        let budget = KInductionBudget {
            depth: 3,
            timeout_ms: 1_000,
        };
        let results = check_loop(&ctx, &AlwaysValid, budget);
        assert!(!results.is_empty());
        assert!(results
            .iter()
            .all(|r| r.verdict == InvariantVerdict::HoldsUpToDepth));
    }

    #[test]
    fn refuted_when_base_case_fails() {
        let ctx = bounds_loop();
        let budget = KInductionBudget {
            depth: 2,
            timeout_ms: 1_000,
        };
        let results = check_loop(&ctx, &AlwaysInvalid, budget);
        assert!(results
            .iter()
            .all(|r| r.verdict == InvariantVerdict::Refuted));
    }
}
