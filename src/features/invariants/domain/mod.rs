//! Loop-invariant candidate templates and the k-induction driver's decision
//! procedure seam. No SMT backend is implemented here —
//! `DecisionProcedure` is a trait object the embedder supplies; this crate
//! only knows how to phrase base-case and inductive-step queries against it.

use crate::ast::{Expr, Stmt};
use crate::shared::Span;

/// A loop body plus the syntactic facts the template synthesizer needs:
/// the condition that must hold to keep iterating, and the variable names
/// the loop's own `for`-header binds (if any), which are never candidates
/// for a generated invariant since they are trivially bounded by the header.
#[derive(Debug, Clone)]
pub struct LoopContext {
    pub condition: Option<Expr>,
    pub body: Vec<Stmt>,
    pub header_bound: Vec<String>,
    pub span: Span,
}

/// A candidate loop invariant, expressed over the variables observed in the
/// loop's guard and accumulation statements. Each variant corresponds to one
/// of the synthesis heuristics `synthesize` composes by conjunction.
#[derive(Debug, Clone, PartialEq)]
pub enum InvariantTemplate {
    /// `lower <= var <= upper` holds on every iteration entry.
    BoundedVariable {
        var: String,
        lower: Option<i64>,
        upper: Option<i64>,
    },
    /// `var` never decreases across an iteration.
    MonotonicIncrease { var: String },
    /// `var >= 0` holds on every iteration entry, for a variable that only
    /// ever accumulates a (possibly negative) addend — the common
    /// running-total loop shape.
    AccumulatorNonNegative { var: String },
    /// `0 <= index < len(array)` holds whenever `array[index]` executes.
    ArrayIndexWithinBounds { index: String, array: String },
    /// `measure` strictly decreases and is bounded below, proving
    /// termination rather than a safety property.
    TerminationMeasure { measure: String },
}

impl InvariantTemplate {
    /// A human/decision-procedure-facing rendering of the template as a
    /// boolean expression string. Kept deliberately simple (no expression
    /// parser round-trip) since the only consumer is a `DecisionProcedure`
    /// that accepts free-form formula text — this crate never embeds an
    /// SMT solver and never parses the result.
    pub fn as_formula(&self) -> String {
        match self {
            InvariantTemplate::BoundedVariable { var, lower, upper } => {
                match (lower, upper) {
                    (Some(l), Some(u)) => format!("{l} <= {var} && {var} <= {u}"),
                    (Some(l), None) => format!("{l} <= {var}"),
                    (None, Some(u)) => format!("{var} <= {u}"),
                    (None, None) => format!("true /* {var} unbounded */"),
                }
            }
            InvariantTemplate::MonotonicIncrease { var } => {
                format!("{var} >= {var}@entry")
            }
            InvariantTemplate::AccumulatorNonNegative { var } => format!("{var} >= 0"),
            InvariantTemplate::ArrayIndexWithinBounds { index, array } => {
                format!("0 <= {index} && {index} < len({array})")
            }
            InvariantTemplate::TerminationMeasure { measure } => {
                format!("{measure} >= 0 && {measure} < {measure}@entry")
            }
        }
    }
}

/// Outcome of checking one template against the k-induction driver's base
/// case and inductive step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantVerdict {
    /// Held in the base cases and the inductive step up to the configured
    /// depth; not a soundness proof beyond that depth (this
    /// is bounded k-induction, not full induction).
    HoldsUpToDepth,
    /// A base case or the inductive step failed; a counterexample step
    /// exists within the configured depth.
    Refuted,
    /// The decision procedure could not decide within its timeout budget.
    Unknown,
}

/// The result of synthesizing and checking one template against one loop.
#[derive(Debug, Clone)]
pub struct InvariantResult {
    pub template: InvariantTemplate,
    pub verdict: InvariantVerdict,
    pub loop_span: Span,
}

/// A single query a k-induction step needs answered: "is `formula` valid
/// given `assumptions`?". The embedder owns the actual solver; this crate
/// never implements one (Non-goals: no SMT solver implementation).
pub trait DecisionProcedure: Send + Sync {
    fn is_valid(&self, assumptions: &[String], formula: &str) -> DecisionOutcome;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    Valid,
    Invalid,
    Unknown,
}
