//! Strongly-connected-components condensation over the call graph's
//! internal edges, via `petgraph::algo::tarjan_scc`. External edges never
//! participate. Components come back in reverse topological order — a
//! callee's SCC always finishes (and is pushed) before its caller's — so
//! phase 3 can walk the result leaves-first.

use crate::features::effect_enforcement::domain::CallGraph;
use crate::shared::FunctionId;

pub fn tarjan_scc(graph: &CallGraph) -> Vec<Vec<FunctionId>> {
    petgraph::algo::tarjan_scc(graph.internal_graph())
        .into_iter()
        .map(|component| {
            component
                .into_iter()
                .map(|node| graph.internal_graph()[node])
                .collect()
        })
        .collect()
}

/// True when `scc` needs fixpoint iteration: more than one member, or a
/// single member with a self-loop. Single-node SCCs with no self-loop are
/// the common case and resolve in one pass.
pub fn is_recursive(scc: &[FunctionId], graph: &CallGraph) -> bool {
    scc.len() > 1 || (scc.len() == 1 && graph.has_self_loop(scc[0]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::effect_enforcement::domain::{CallEdge, CallTarget};
    use crate::shared::span::Span;

    fn edge(caller: u32, callee: u32) -> CallEdge {
        CallEdge {
            caller: FunctionId(caller),
            callee: CallTarget::Internal(FunctionId(callee)),
            span: Span::zero(),
        }
    }

    #[test]
    fn linear_chain_is_leaves_first() {
        let graph = CallGraph::new(
            vec![FunctionId(0), FunctionId(1), FunctionId(2)],
            vec![edge(0, 1), edge(1, 2)],
        );
        let sccs = tarjan_scc(&graph);
        let order: Vec<FunctionId> = sccs.iter().map(|scc| scc[0]).collect();
        assert_eq!(order, vec![FunctionId(2), FunctionId(1), FunctionId(0)]);
    }

    #[test]
    fn mutual_recursion_is_one_scc() {
        let graph = CallGraph::new(
            vec![FunctionId(0), FunctionId(1)],
            vec![edge(0, 1), edge(1, 0)],
        );
        let sccs = tarjan_scc(&graph);
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), 2);
        assert!(is_recursive(&sccs[0], &graph));
    }

    #[test]
    fn self_loop_single_node_scc_is_recursive() {
        let graph = CallGraph::new(vec![FunctionId(0)], vec![edge(0, 0)]);
        let sccs = tarjan_scc(&graph);
        assert_eq!(sccs.len(), 1);
        assert!(is_recursive(&sccs[0], &graph));
    }

    #[test]
    fn isolated_node_is_not_recursive() {
        let graph = CallGraph::new(vec![FunctionId(0)], vec![]);
        let sccs = tarjan_scc(&graph);
        assert!(!is_recursive(&sccs[0], &graph));
    }
}
