//! Reaching definitions: a may/forward analysis over
//! `(variable, site)` pairs. A binding or assignment into a local kills every
//! prior definition of that variable in the running set and generates a fresh
//! one at its own site.

use crate::features::dataflow::domain::{stmt_local_def, DefSite, Definition};
use crate::features::flow_graph::{BasicBlock, ControlFlowGraph};
use crate::features::lattice::{solve, Analysis, Direction, MaySet, SolverResult};
use crate::shared::BlockId;

pub struct ReachingDefinitions;

impl Analysis for ReachingDefinitions {
    type Fact = MaySet<Definition>;

    fn direction(&self) -> Direction {
        Direction::Forward
    }

    fn initial_entry(&self) -> Self::Fact {
        MaySet::bottom()
    }

    fn transfer(&self, block: &BasicBlock, input: &Self::Fact) -> Self::Fact {
        let mut current = input.0.clone();
        for (i, stmt) in block.stmts.iter().enumerate() {
            if let Some(name) = stmt_local_def(stmt) {
                current.retain(|d| d.variable != name);
                current.insert(Definition {
                    variable: name.to_string(),
                    site: DefSite {
                        block: block.id,
                        stmt_index: i,
                    },
                });
            }
        }
        MaySet(current)
    }
}

pub fn analyze(cfg: &ControlFlowGraph) -> SolverResult<MaySet<Definition>> {
    solve(cfg, &ReachingDefinitions)
}

/// Definitions of `variable` reaching the entry of `block`: definitions
/// reaching a point, filtered by variable name.
pub fn reaching_at_entry<'a>(
    result: &'a SolverResult<MaySet<Definition>>,
    block: BlockId,
    variable: &str,
) -> Vec<&'a Definition> {
    result
        .at_entry(block)
        .0
        .iter()
        .filter(|d| d.variable == variable)
        .collect()
}

pub fn reaching_at_exit<'a>(
    result: &'a SolverResult<MaySet<Definition>>,
    block: BlockId,
    variable: &str,
) -> Vec<&'a Definition> {
    result
        .at_exit(block)
        .0
        .iter()
        .filter(|d| d.variable == variable)
        .collect()
}
