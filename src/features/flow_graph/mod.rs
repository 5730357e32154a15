//! Control-flow graph construction and the graph value types dataflow
//! solvers, bug-pattern checkers and invariant synthesis are all built on
//! top of.

pub mod domain;
pub mod infrastructure;

pub use domain::{BasicBlock, CfgEdge, CfgEdgeKind, ControlFlowGraph};
pub use infrastructure::build;
