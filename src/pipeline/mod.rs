//! Pipeline driver: given a bound AST, runs six steps in order —
//!
//! 1. discover manifests and initialize the effect resolver,
//! 2. run effect enforcement over every function,
//! 3. build one CFG per function,
//! 4. run the dataflow suite and bug-pattern checkers per function,
//! 5. run taint analysis over the module,
//! 6. (optionally) check loop invariants via k-induction.
//!
//! Steps 3-5 are independent per function and run through rayon's
//! work-stealing pool; the resolver and its caches are fully built in
//! step 1 and are read-mostly afterward, so sharing them across the pool needs
//! no extra synchronization. Diagnostics flow through the shared
//! sink the caller supplies — the only thing every parallel task writes to.

use crate::ast::{Function, Module};
use crate::config::{AnalysisConfig, ValidatedConfig};
use crate::features::dataflow::{self, Definition};
use crate::features::effect_enforcement::{self, EnforcementMetrics};
use crate::features::effect_model::EffectSet;
use crate::features::effect_resolver::{shared_catalog, EffectResolver};
use crate::features::flow_graph::{self, ControlFlowGraph};
use crate::features::invariants::{self, domain::DecisionProcedure, domain::InvariantResult};
use crate::features::lattice::{MaySet, SolverResult};
use crate::features::manifest::{self, domain::LoadError};
use crate::features::taint_analysis;
use crate::features::bug_patterns;
use crate::shared::{DiagnosticSink, FunctionId};
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::debug;

/// Every artifact computed for one function, kept around for callers that
/// want to query dataflow facts directly rather than rely solely on emitted
/// diagnostics (reaching-definitions/live-variables queries).
pub struct FunctionAnalysis {
    pub cfg: ControlFlowGraph,
    pub reaching_definitions: SolverResult<MaySet<Definition>>,
    pub live_variables: SolverResult<MaySet<String>>,
    /// Empty unless a [`DecisionProcedure`] was supplied and
    /// `decision_procedure_assist` is on.
    pub invariants: Vec<InvariantResult>,
}

/// Everything the driver produced for one run: the computed effect table
/// (keyed by function id, as `effect_enforcement::enforce` returns it), the
/// manifest load errors collected during resolver initialization, and the
/// per-function artifacts above. Diagnostics themselves went to the caller's
/// sink as each phase ran, not into this struct.
pub struct AnalysisReport {
    pub effects: HashMap<FunctionId, EffectSet>,
    pub manifest_load_errors: Vec<LoadError>,
    pub functions: HashMap<FunctionId, FunctionAnalysis>,
    pub metrics: AnalysisMetrics,
}

/// Run-level counters an embedder can log or export without walking
/// `AnalysisReport` itself — functions analyzed plus the call-graph counters
/// `effect_enforcement` collects along the way (SCC condensation
/// and fixpoint cap). Per-severity diagnostic counts are the caller's own to
/// compute from whatever [`crate::shared::DiagnosticSink`] they passed in (a
/// [`crate::shared::DiagnosticBag`] already exposes `count_by_severity`) — this
/// struct only tracks counters the driver itself observes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalysisMetrics {
    pub functions_analyzed: usize,
    pub manifests_loaded: usize,
    pub manifest_load_errors: usize,
    pub enforcement: EnforcementMetrics,
}

/// Runs the full pipeline with no k-induction decision procedure: bug-pattern
/// checkers stay purely syntactic (default posture) and no
/// invariant is ever checked, only synthesized-and-discarded.
pub fn run(module: &Module, config: &ValidatedConfig, sink: &dyn DiagnosticSink) -> AnalysisReport {
    run_with_decision_procedure(module, config, sink, None)
}

/// As [`run`], but with a k-induction decision procedure wired in. Has no
/// effect unless `config.decision_procedure_assist` is also set — the
/// procedure is an external collaborator (no SMT solver
/// implementation lives in this crate) the embedder opts into explicitly.
pub fn run_with_decision_procedure(
    module: &Module,
    config: &ValidatedConfig,
    sink: &dyn DiagnosticSink,
    decision_procedure: Option<&dyn DecisionProcedure>,
) -> AnalysisReport {
    let analysis_config = config.as_inner();

    // Step 1: manifests + resolver.
    let (manifests, manifest_load_errors) = manifest::load_and_validate(&analysis_config.manifest_roots);
    for error in &manifest_load_errors {
        debug!(source = %error.source_path, message = %error.message, "manifest load error");
    }
    let manifest_load_error_count = manifest_load_errors.len();
    let manifests_loaded = manifests.len();
    let resolver = EffectResolver::new(shared_catalog(), manifests);

    // Step 2: effect enforcement (builds its own call graph, runs SCC
    // condensation and per-SCC fixpoint inference internally).
    let (effects, enforcement_metrics) = effect_enforcement::enforce(module, &resolver, analysis_config, sink);

    // Steps 3-5, per function, in parallel.
    let functions: Vec<&Function> = module.all_functions();
    let functions_analyzed = functions.len();
    let per_function: Vec<(FunctionId, FunctionAnalysis)> = functions
        .into_par_iter()
        .map(|function| analyze_function(function, analysis_config, sink, decision_procedure))
        .collect();

    AnalysisReport {
        effects,
        manifest_load_errors,
        functions: per_function.into_iter().collect(),
        metrics: AnalysisMetrics {
            functions_analyzed,
            manifests_loaded,
            manifest_load_errors: manifest_load_error_count,
            enforcement: enforcement_metrics,
        },
    }
}

fn analyze_function(
    function: &Function,
    config: &AnalysisConfig,
    sink: &dyn DiagnosticSink,
    decision_procedure: Option<&dyn DecisionProcedure>,
) -> (FunctionId, FunctionAnalysis) {
    let cfg = flow_graph::build(&function.body);

    bug_patterns::infrastructure::division::check(&function.body, sink);
    bug_patterns::infrastructure::overflow::check(&function.body, sink);
    bug_patterns::infrastructure::null_deref::check(&function.body, sink);
    bug_patterns::infrastructure::bounds::check(&function.body, sink);

    let reaching_definitions = dataflow::reaching_definitions::analyze(&cfg);
    let live_variables = dataflow::live_variables::analyze(&cfg);
    let uninitialized = dataflow::uninitialized::analyze(function, &cfg);
    dataflow::uninitialized::check_uninitialized_use(&cfg, &uninitialized, sink);

    taint_analysis::analyze_function(function, &cfg, config.taint.clone(), sink);

    let invariants = match decision_procedure {
        Some(procedure) if config.decision_procedure_assist => {
            invariants::analyze_function(function, procedure, config.k_induction)
        }
        _ => Vec::new(),
    };

    (
        function.id,
        FunctionAnalysis {
            cfg,
            reaching_definitions,
            live_variables,
            invariants,
        },
    )
}
