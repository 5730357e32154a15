//! Phase 4 of effect enforcement: checks a function's computed
//! effect set against its declared `effects(...)` clause. The check is
//! `computed ⊆ declared` under subtyping; every uncovered effect is a hard
//! error naming the surface code and the shortest call chain witnessing it
//! (breadth-first over the call graph until a leaf carries the effect).
//! Unused declared effects are reported at info severity, and a declared
//! surface code that didn't parse to anything recognized is flagged
//! separately rather than silently dropped.

use crate::ast::{Function, Module};
use crate::features::effect_enforcement::domain::CallGraph;
use crate::features::effect_model::{parse_declared, Effect, EffectKind, EffectSet};
use crate::shared::{DiagnosticCode, DiagnosticSink, FunctionId, Severity};
use std::collections::{HashMap, HashSet, VecDeque};

pub fn check_all(
    module: &Module,
    computed: &HashMap<FunctionId, EffectSet>,
    graph: &CallGraph,
    sink: &dyn DiagnosticSink,
) {
    let functions = module.all_functions();
    let by_id: HashMap<FunctionId, &Function> = functions.iter().map(|f| (f.id, *f)).collect();

    for func in functions {
        check_function(func, computed, graph, &by_id, sink);
    }
}

fn check_function(
    func: &Function,
    computed: &HashMap<FunctionId, EffectSet>,
    graph: &CallGraph,
    by_id: &HashMap<FunctionId, &Function>,
    sink: &dyn DiagnosticSink,
) {
    let declared = func
        .declared_effects
        .as_deref()
        .map(parse_declared)
        .unwrap_or_else(EffectSet::empty);
    let actual = computed.get(&func.id).cloned().unwrap_or_else(EffectSet::empty);

    for effect in declared.effects() {
        if effect.kind == EffectKind::Unknown {
            sink.report(
                func.span,
                DiagnosticCode::UndeclaredEffect,
                format!(
                    "function `{}` declares an unrecognized effect code `{}`; treated conservatively and will never match a concrete effect",
                    func.name, effect.value
                ),
                Severity::Warning,
            );
        }
    }

    for effect in actual.difference(&declared).effects() {
        let chain = witness_chain(func.id, effect, computed, graph);
        let chain_desc = describe_chain(&chain, by_id);
        sink.report(
            func.span,
            DiagnosticCode::EffectForbidden,
            format!(
                "function `{}` performs effect `{}` not covered by its declared effects{}",
                func.name, effect, chain_desc
            ),
            Severity::Error,
        );
    }

    for effect in declared.effects() {
        if effect.kind == EffectKind::Unknown {
            continue;
        }
        let required = EffectSet::single(effect.clone());
        if !required.is_subset(&actual) {
            sink.report(
                func.span,
                DiagnosticCode::UnusedEffectDeclaration,
                format!(
                    "function `{}` declares effect `{}` but its body never performs it",
                    func.name, effect
                ),
                Severity::Info,
            );
        }
    }
}

/// Shortest path (by function id, inclusive of `start`) from `start` to the
/// function where `effect` bottoms out: the frontier node whose internal
/// callees no longer carry it, meaning it originates at that node's own
/// external call or mutation rather than being inherited from a callee.
fn witness_chain(
    start: FunctionId,
    effect: &Effect,
    computed: &HashMap<FunctionId, EffectSet>,
    graph: &CallGraph,
) -> Vec<FunctionId> {
    let mut visited = HashSet::new();
    visited.insert(start);
    let mut queue = VecDeque::new();
    queue.push_back(vec![start]);

    while let Some(path) = queue.pop_front() {
        let current = *path.last().expect("path is never empty");
        let callees = graph.internal_callees(current);
        let contributing: Vec<FunctionId> = callees
            .into_iter()
            .filter(|callee| {
                computed
                    .get(callee)
                    .map(|set| carries_effect(set, effect))
                    .unwrap_or(false)
            })
            .collect();

        if contributing.is_empty() {
            return path;
        }

        for callee in contributing {
            if visited.insert(callee) {
                let mut next = path.clone();
                next.push(callee);
                queue.push_back(next);
            }
        }
    }

    vec![start]
}

fn carries_effect(set: &EffectSet, effect: &Effect) -> bool {
    EffectSet::single(effect.clone()).is_subset(set)
}

fn describe_chain(chain: &[FunctionId], by_id: &HashMap<FunctionId, &Function>) -> String {
    if chain.len() <= 1 {
        return String::new();
    }
    let names: Vec<&str> = chain
        .iter()
        .map(|id| by_id.get(id).map(|f| f.name.as_str()).unwrap_or("?"))
        .collect();
    format!(" (via {})", names.join(" -> "))
}
