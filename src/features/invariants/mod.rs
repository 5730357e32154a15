//! Loop-invariant synthesis and bounded k-induction: proposes
//! candidate invariants from a loop's syntactic shape, then checks each one
//! against an external decision procedure up to a configured unrolling depth.

pub mod domain;
pub mod infrastructure;

use crate::ast::{Function, Stmt};
use crate::config::KInductionBudget;
use crate::features::invariants::domain::{DecisionProcedure, InvariantResult};

/// Finds every loop in `function` and checks every template synthesized for
/// it, in loop-discovery order.
pub fn analyze_function(
    function: &Function,
    procedure: &dyn DecisionProcedure,
    budget: KInductionBudget,
) -> Vec<InvariantResult> {
    infrastructure::synthesis::find_loops(&function.body)
        .iter()
        .flat_map(|ctx| infrastructure::k_induction::check_loop(ctx, procedure, budget))
        .collect()
}

/// Re-exported so callers that only need loop discovery (e.g. a future
/// termination-only checker) don't have to depend on the k-induction driver.
pub fn find_loops(body: &[Stmt]) -> Vec<domain::LoopContext> {
    infrastructure::synthesis::find_loops(body)
}
