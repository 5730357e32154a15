pub mod call_graph_builder;
pub mod call_index;
pub mod declaration_check;
pub mod inference;
pub mod scc;

pub use call_index::CallIndex;
pub use inference::{compute_function_effects, UnknownCallSite};
pub use scc::{is_recursive, tarjan_scc};
