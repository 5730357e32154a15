//! Interprocedural effect enforcement: call-graph construction,
//! SCC condensation, per-SCC fixpoint inference and the declaration check,
//! wired into a single entry point the pipeline driver calls once per module.

pub mod domain;
pub mod infrastructure;

use crate::ast::Module;
use crate::config::{AnalysisConfig, UnknownCallPolicy};
use crate::features::effect_model::EffectSet;
use crate::features::effect_resolver::EffectResolver;
use crate::shared::{DiagnosticCode, DiagnosticSink, FunctionId, Severity};
use infrastructure::inference::UnknownCallSite;
use std::collections::HashMap;
use tracing::warn;

pub use domain::{CallEdge, CallGraph, CallTarget};

/// A hard ceiling on round-robin fixpoint iterations for one recursive SCC
/// ("a hard iteration cap (≥100) guards against divergence").
const MAX_FIXPOINT_ITERATIONS: u32 = 100;

/// Call-graph-shaped counters from one `enforce` run, surfaced to the pipeline's
/// own `AnalysisMetrics` rather than only logged — lets an embedder alert on a
/// module whose recursive SCCs keep needing the full iteration cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnforcementMetrics {
    pub scc_count: usize,
    pub recursive_scc_count: usize,
    pub max_fixpoint_iterations: u32,
}

/// Runs all four effect-enforcement phases over `module` and returns every
/// function's computed effect set, keyed by id, plus a few call-graph
/// counters. Diagnostics (unknown calls, forbidden effects, unused
/// declarations) are reported through `sink` as a side effect; the returned
/// table is what the dataflow/taint/bug-pattern passes downstream key their
/// own per-function effect lookups on.
pub fn enforce(
    module: &Module,
    resolver: &EffectResolver,
    config: &AnalysisConfig,
    sink: &dyn DiagnosticSink,
) -> (HashMap<FunctionId, EffectSet>, EnforcementMetrics) {
    let (graph, index) = infrastructure::call_graph_builder::build(module);
    let sccs = infrastructure::scc::tarjan_scc(&graph);
    let functions_by_id: HashMap<FunctionId, _> =
        module.all_functions().into_iter().map(|f| (f.id, f)).collect();

    let mut computed: HashMap<FunctionId, EffectSet> = HashMap::new();
    let mut unknown_sites: Vec<UnknownCallSite> = Vec::new();
    let mut metrics = EnforcementMetrics {
        scc_count: sccs.len(),
        ..EnforcementMetrics::default()
    };

    for component in &sccs {
        if infrastructure::scc::is_recursive(component, &graph) {
            metrics.recursive_scc_count += 1;
            let iterations =
                run_fixpoint(component, &functions_by_id, &index, resolver, &mut computed, &mut unknown_sites);
            metrics.max_fixpoint_iterations = metrics.max_fixpoint_iterations.max(iterations);
        } else {
            let fid = component[0];
            computed.insert(fid, EffectSet::empty());
            if let Some(func) = functions_by_id.get(&fid) {
                let (set, mut sites) =
                    infrastructure::inference::compute_function_effects(func, &index, &computed, resolver);
                computed.insert(fid, set);
                unknown_sites.append(&mut sites);
            }
        }
    }

    for site in &unknown_sites {
        report_unknown_call(site, config, sink);
    }

    infrastructure::declaration_check::check_all(module, &computed, &graph, sink);

    (computed, metrics)
}

fn run_fixpoint(
    component: &[FunctionId],
    functions_by_id: &HashMap<FunctionId, &crate::ast::Function>,
    index: &infrastructure::CallIndex,
    resolver: &EffectResolver,
    computed: &mut HashMap<FunctionId, EffectSet>,
    unknown_sites: &mut Vec<UnknownCallSite>,
) -> u32 {
    for &fid in component {
        computed.insert(fid, EffectSet::empty());
    }

    let mut round_sites: HashMap<FunctionId, Vec<UnknownCallSite>> = HashMap::new();
    let mut iterations = 0;
    loop {
        let mut changed = false;
        for &fid in component {
            let Some(func) = functions_by_id.get(&fid) else {
                continue;
            };
            let (set, sites) = infrastructure::inference::compute_function_effects(func, index, computed, resolver);
            if computed.get(&fid) != Some(&set) {
                changed = true;
            }
            computed.insert(fid, set);
            round_sites.insert(fid, sites);
        }
        iterations += 1;
        if !changed {
            break;
        }
        if iterations >= MAX_FIXPOINT_ITERATIONS {
            warn!(
                scc_size = component.len(),
                iterations, "effect fixpoint did not converge; using last estimate"
            );
            break;
        }
    }

    for (_, mut sites) in round_sites {
        unknown_sites.append(&mut sites);
    }

    iterations
}

fn report_unknown_call(site: &UnknownCallSite, config: &AnalysisConfig, sink: &dyn DiagnosticSink) {
    let severity = match config.unknown_call_policy {
        UnknownCallPolicy::Strict | UnknownCallPolicy::StubRequired => Severity::Error,
        UnknownCallPolicy::Warn => {
            if config.strict_effects {
                Severity::Error
            } else {
                Severity::Warning
            }
        }
    };
    sink.report(
        site.span,
        DiagnosticCode::UnknownExternalCall,
        format!(
            "call to `{}` has no known effect declaration; treated as unknown",
            site.descriptor
        ),
        severity,
    );
}
