//! Call graph value types: a directed multigraph over the
//! functions of the current module. External edges are kept for diagnostic
//! call-chain reconstruction but never participate in SCC computation.
//!
//! The internal-edge subgraph that feeds SCC computation is a `petgraph`
//! `DiGraph` rather than a hand-rolled adjacency map, the same way the
//! module's own file-dependency graph is built on `petgraph::graph::DiGraph`
//! plus `petgraph::algo::tarjan_scc`.

use crate::shared::{FunctionId, Span};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// What a call site resolves to: a function in this module, or a name we
/// couldn't bind to one (built-in, manifest-declared, or truly unknown).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallTarget {
    Internal(FunctionId),
    External(String),
}

/// One call site: who called, what, and where (for diagnostic spans and
/// call-chain reconstruction).
#[derive(Debug, Clone)]
pub struct CallEdge {
    pub caller: FunctionId,
    pub callee: CallTarget,
    pub span: Span,
}

/// The call graph for one module: every function that exists, plus every call
/// edge found inside their bodies (including lambda bodies, which contribute
/// to the enclosing function).
#[derive(Debug, Clone, Default)]
pub struct CallGraph {
    functions: Vec<FunctionId>,
    edges: Vec<CallEdge>,
    internal: DiGraph<FunctionId, ()>,
    node_of: HashMap<FunctionId, NodeIndex>,
}

impl CallGraph {
    pub fn new(functions: Vec<FunctionId>, edges: Vec<CallEdge>) -> Self {
        let mut internal = DiGraph::new();
        let mut node_of = HashMap::new();
        for &f in &functions {
            node_of.entry(f).or_insert_with(|| internal.add_node(f));
        }
        for edge in &edges {
            if let CallTarget::Internal(callee) = edge.callee {
                let caller_idx = *node_of
                    .entry(edge.caller)
                    .or_insert_with(|| internal.add_node(edge.caller));
                let callee_idx = *node_of
                    .entry(callee)
                    .or_insert_with(|| internal.add_node(callee));
                internal.add_edge(caller_idx, callee_idx, ());
            }
        }
        Self {
            functions,
            edges,
            internal,
            node_of,
        }
    }

    pub fn functions(&self) -> &[FunctionId] {
        &self.functions
    }

    pub fn edges(&self) -> &[CallEdge] {
        &self.edges
    }

    pub fn edges_from(&self, caller: FunctionId) -> impl Iterator<Item = &CallEdge> {
        self.edges.iter().filter(move |e| e.caller == caller)
    }

    /// Internal callees only — the edges that feed SCC computation.
    pub fn internal_callees(&self, caller: FunctionId) -> Vec<FunctionId> {
        match self.node_of.get(&caller) {
            Some(&idx) => self
                .internal
                .neighbors(idx)
                .map(|n| self.internal[n])
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn has_self_loop(&self, function: FunctionId) -> bool {
        self.internal_callees(function).contains(&function)
    }

    /// The petgraph view of the internal-edge subgraph, for SCC computation.
    pub(crate) fn internal_graph(&self) -> &DiGraph<FunctionId, ()> {
        &self.internal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::span::Span;

    #[test]
    fn internal_callees_excludes_external_edges() {
        let graph = CallGraph::new(
            vec![FunctionId(0), FunctionId(1)],
            vec![
                CallEdge {
                    caller: FunctionId(0),
                    callee: CallTarget::Internal(FunctionId(1)),
                    span: Span::zero(),
                },
                CallEdge {
                    caller: FunctionId(0),
                    callee: CallTarget::External("Console::WriteLine".into()),
                    span: Span::zero(),
                },
            ],
        );
        assert_eq!(graph.internal_callees(FunctionId(0)), vec![FunctionId(1)]);
    }

    #[test]
    fn self_loop_detection() {
        let graph = CallGraph::new(
            vec![FunctionId(0)],
            vec![CallEdge {
                caller: FunctionId(0),
                callee: CallTarget::Internal(FunctionId(0)),
                span: Span::zero(),
            }],
        );
        assert!(graph.has_self_loop(FunctionId(0)));
    }
}
