//! Heuristic, manifest-independent taint tracking: name-based
//! source/sink/sanitizer recognition plus an intraprocedural, flow-sensitive
//! propagation analysis built on the same lattice/worklist solver the other
//! dataflow analyses use.

pub mod domain;
pub mod infrastructure;

pub use domain::{SinkKind, SourceKind, TaintLabel};
pub use infrastructure::analyzer::{analyze, analyze_function, check_taint_sinks, TaintState};
