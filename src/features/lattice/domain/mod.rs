//! Generic monotone lattice and worklist solver.
//!
//! `Lattice` and `Analysis` are the seams the dataflow analyses (reaching
//! definitions, live variables, uninitialized-use) plug into; the solver
//! itself never looks at what the value type represents. Monotonicity of
//! `Analysis::transfer` is an obligation on the implementation, not checked
//! here.

use crate::features::flow_graph::{BasicBlock, CfgEdgeKind, ControlFlowGraph};
use crate::shared::BlockId;
use rustc_hash::FxHashSet;
use std::collections::{HashMap, VecDeque};

/// A join-semilattice with a distinguished bottom element.
pub trait Lattice: Clone + PartialEq {
    fn bottom() -> Self;
    fn join(&self, other: &Self) -> Self;
    fn less_or_equal(&self, other: &Self) -> bool {
        &self.join(other) == other
    }
}

/// "May" reachability: union is join, bottom is the empty set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaySet<T: Clone + Eq + std::hash::Hash>(pub FxHashSet<T>);

impl<T: Clone + Eq + std::hash::Hash> MaySet<T> {
    pub fn singleton(item: T) -> Self {
        let mut set = FxHashSet::default();
        set.insert(item);
        Self(set)
    }

    pub fn contains(&self, item: &T) -> bool {
        self.0.contains(item)
    }
}

impl<T: Clone + Eq + std::hash::Hash> Lattice for MaySet<T> {
    fn bottom() -> Self {
        Self(FxHashSet::default())
    }

    fn join(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }
}

/// "Must" reachability: intersection is join, bottom is the ambient
/// universe. `None` models the universe itself (no finite representation
/// needed until the first real intersection narrows it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MustSet<T: Clone + Eq + std::hash::Hash>(pub Option<FxHashSet<T>>);

impl<T: Clone + Eq + std::hash::Hash> MustSet<T> {
    pub fn universe() -> Self {
        Self(None)
    }

    pub fn singleton(item: T) -> Self {
        let mut set = FxHashSet::default();
        set.insert(item);
        Self(Some(set))
    }

    pub fn contains(&self, item: &T) -> bool {
        match &self.0 {
            None => true,
            Some(set) => set.contains(item),
        }
    }
}

impl<T: Clone + Eq + std::hash::Hash> Lattice for MustSet<T> {
    fn bottom() -> Self {
        Self::universe()
    }

    fn join(&self, other: &Self) -> Self {
        match (&self.0, &other.0) {
            (None, other) => Self(other.clone()),
            (me, None) => Self(me.clone()),
            (Some(a), Some(b)) => Self(Some(a.intersection(b).cloned().collect())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// A monotone dataflow analysis: which direction it runs, what lattice its
/// facts live in, the entry (forward) or exit (backward) seed, and the
/// per-block transfer function.
pub trait Analysis {
    type Fact: Lattice;

    fn direction(&self) -> Direction;
    fn initial_entry(&self) -> Self::Fact;
    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact;
}

/// Per-block in/out facts produced by [`solve`].
pub struct SolverResult<F> {
    pub entry: HashMap<BlockId, F>,
    pub exit: HashMap<BlockId, F>,
}

impl<F: Lattice> SolverResult<F> {
    pub fn at_entry(&self, block: BlockId) -> &F {
        &self.entry[&block]
    }

    pub fn at_exit(&self, block: BlockId) -> &F {
        &self.exit[&block]
    }
}

/// Worklist fixpoint solver: reverse-post-order for forward analyses,
/// post-order (the reverse of that) for backward ones.
pub fn solve<A: Analysis>(cfg: &ControlFlowGraph, analysis: &A) -> SolverResult<A::Fact> {
    let order = cfg.reverse_post_order();
    match analysis.direction() {
        Direction::Forward => solve_forward(cfg, analysis, &order),
        Direction::Backward => solve_backward(cfg, analysis, &order),
    }
}

fn solve_forward<A: Analysis>(
    cfg: &ControlFlowGraph,
    analysis: &A,
    order: &[BlockId],
) -> SolverResult<A::Fact> {
    let mut entry: HashMap<BlockId, A::Fact> = cfg
        .blocks()
        .map(|b| (b.id, A::Fact::bottom()))
        .collect();
    entry.insert(cfg.entry, analysis.initial_entry());
    let mut exit: HashMap<BlockId, A::Fact> = cfg
        .blocks()
        .map(|b| (b.id, A::Fact::bottom()))
        .collect();

    let mut worklist: VecDeque<BlockId> = order.iter().copied().collect();
    while let Some(id) = worklist.pop_front() {
        let preds = cfg.predecessors(id);
        let mut input = if id == cfg.entry {
            entry[&id].clone()
        } else {
            A::Fact::bottom()
        };
        for pred in &preds {
            input = input.join(&exit[pred]);
        }
        entry.insert(id, input.clone());

        let new_out = analysis.transfer(cfg.block(id), &input);
        if exit[&id] != new_out {
            exit.insert(id, new_out);
            for (succ, _) in cfg.successors(id) {
                if !worklist.contains(&succ) {
                    worklist.push_back(succ);
                }
            }
        }
    }

    SolverResult { entry, exit }
}

fn solve_backward<A: Analysis>(
    cfg: &ControlFlowGraph,
    analysis: &A,
    order: &[BlockId],
) -> SolverResult<A::Fact> {
    let mut exit: HashMap<BlockId, A::Fact> = cfg
        .blocks()
        .map(|b| (b.id, A::Fact::bottom()))
        .collect();
    exit.insert(cfg.exit, analysis.initial_entry());
    let mut entry: HashMap<BlockId, A::Fact> = cfg
        .blocks()
        .map(|b| (b.id, A::Fact::bottom()))
        .collect();

    let mut reverse_order = order.to_vec();
    reverse_order.reverse();
    let mut worklist: VecDeque<BlockId> = reverse_order.iter().copied().collect();
    while let Some(id) = worklist.pop_front() {
        let succs = cfg.successors(id);
        let mut output = if id == cfg.exit {
            exit[&id].clone()
        } else {
            A::Fact::bottom()
        };
        for (succ, _) in &succs {
            output = output.join(&entry[succ]);
        }
        exit.insert(id, output.clone());

        let new_in = analysis.transfer(cfg.block(id), &output);
        if entry[&id] != new_in {
            entry.insert(id, new_in);
            for pred in cfg.predecessors(id) {
                if !worklist.contains(&pred) {
                    worklist.push_back(pred);
                }
            }
        }
    }

    SolverResult { entry, exit }
}
