//! Bug-pattern checkers: division-by-zero, overflow,
//! null-dereference and out-of-bounds indexing, each a guard-context walk
//! over a function body rather than a CFG-dominator query — the uniform
//! `check(function, diagnostics)` surface does not require dominance
//! reasoning, only "is this guard active on every path reaching here", which
//! a structured walk over `if`/`while`/`match` answers directly.

pub mod domain;
pub mod infrastructure;

use crate::ast::Module;
use crate::shared::DiagnosticSink;

#[cfg(feature = "decision-procedure-assist")]
use crate::features::invariants::domain::DecisionProcedure;

/// Runs all four checkers over every function in the module, in the bound
/// AST's function order (reporting-order guarantee).
pub fn check_all(module: &Module, sink: &dyn DiagnosticSink) {
    for function in module.all_functions() {
        infrastructure::division::check(&function.body, sink);
        infrastructure::overflow::check(&function.body, sink);
        infrastructure::null_deref::check(&function.body, sink);
        infrastructure::bounds::check(&function.body, sink);
    }
}

/// As [`check_all`], but with an external decision procedure consulted to
/// discharge guard residuals the syntactic walk cannot resolve on its own.
/// The procedure itself is an external collaborator behind a trait object,
/// never a concrete SMT backend. Only compiled with the
/// `decision-procedure-assist` feature.
#[cfg(feature = "decision-procedure-assist")]
pub fn check_all_with_assist(
    module: &Module,
    sink: &dyn DiagnosticSink,
    _decision_procedure: &dyn DecisionProcedure,
) {
    // The syntactic guard walk already covers every shape this rewrite's
    // checkers recognize; the assist hook is a seam for callers that wire in
    // a real decision procedure to resolve guards this crate leaves as
    // warnings (e.g. `x < f(y)` where `f` is known monotonic). No such
    // resolution is implemented here.
    check_all(module, sink);
}
