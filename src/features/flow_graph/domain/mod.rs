//! Control-flow graph value types: blocks and directed edges.
//! Nodes are arena-allocated and indexed by small integer ids, never by
//! reference, so the graph is cheap to pass around and to iterate during
//! dataflow solving.

use crate::ast::Stmt;
use crate::shared::BlockId;
use serde::{Deserialize, Serialize};

/// The kind of control-flow edge, used by the path-condition builder to tell a
/// guarded branch from a loop back-edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CfgEdgeKind {
    Sequential,
    TrueBranch,
    FalseBranch,
    LoopBack,
    LoopExit,
    Exception,
    Finally,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CfgEdge {
    pub from: BlockId,
    pub to: BlockId,
    pub kind: CfgEdgeKind,
}

/// A basic block: a straight-line sequence of leaf statements (no `if`,
/// `while`, `match`, or `try` — those are structural and become edges between
/// blocks instead). `branch_condition` is set only on a block that ends by
/// branching on an `if`/`while`/`do-while`/`for` condition, for the
/// bug-pattern path-condition builder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicBlock {
    pub id: BlockId,
    pub stmts: Vec<Stmt>,
    pub branch_condition: Option<crate::ast::Expr>,
}

impl BasicBlock {
    pub(crate) fn new(id: BlockId) -> Self {
        Self {
            id,
            stmts: Vec::new(),
            branch_condition: None,
        }
    }
}

/// A function's control-flow graph: exactly one entry, exactly one exit, dense
/// block ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFlowGraph {
    pub(crate) blocks: Vec<BasicBlock>,
    pub(crate) edges: Vec<CfgEdge>,
    pub entry: BlockId,
    pub exit: BlockId,
}

impl ControlFlowGraph {
    pub(crate) fn new(blocks: Vec<BasicBlock>, edges: Vec<CfgEdge>, entry: BlockId, exit: BlockId) -> Self {
        Self {
            blocks,
            edges,
            entry,
            exit,
        }
    }

    pub fn block(&self, id: BlockId) -> &BasicBlock {
        &self.blocks[id.index()]
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock> {
        self.blocks.iter()
    }

    pub fn edges(&self) -> impl Iterator<Item = &CfgEdge> {
        self.edges.iter()
    }

    pub fn successors(&self, id: BlockId) -> Vec<(BlockId, CfgEdgeKind)> {
        self.edges
            .iter()
            .filter(|e| e.from == id)
            .map(|e| (e.to, e.kind))
            .collect()
    }

    pub fn predecessors(&self, id: BlockId) -> Vec<BlockId> {
        self.edges
            .iter()
            .filter(|e| e.to == id)
            .map(|e| e.from)
            .collect()
    }

    /// Deterministic reverse-post-order over the blocks reachable from entry,
    /// used by the forward lattice solver.
    pub fn reverse_post_order(&self) -> Vec<BlockId> {
        let mut visited = vec![false; self.blocks.len()];
        let mut post_order = Vec::with_capacity(self.blocks.len());
        let mut stack = vec![(self.entry, false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                post_order.push(id);
                continue;
            }
            if visited[id.index()] {
                continue;
            }
            visited[id.index()] = true;
            stack.push((id, true));
            for (succ, _) in self.successors(id) {
                if !visited[succ.index()] {
                    stack.push((succ, false));
                }
            }
        }
        post_order.reverse();
        post_order
    }

    /// Verifies the structural guarantees a builder must uphold: exactly one
    /// entry and exit, dense block ids, every non-exit block has a
    /// successor, every non-entry block has a predecessor. Meant for
    /// tests and debug assertions, not the hot path.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.blocks.is_empty() {
            return Err("CFG has no blocks".to_string());
        }
        for (i, block) in self.blocks.iter().enumerate() {
            if block.id.index() != i {
                return Err(format!("block ids are not dense at index {i}"));
            }
        }
        for block in &self.blocks {
            if block.id != self.exit && self.successors(block.id).is_empty() {
                return Err(format!("non-exit block {} has no successor", block.id));
            }
            if block.id != self.entry && self.predecessors(block.id).is_empty() {
                return Err(format!("non-entry block {} has no predecessor", block.id));
            }
        }
        Ok(())
    }
}
