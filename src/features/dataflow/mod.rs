//! The three dataflow analyses, each a client of the generic
//! lattice/worklist solver in [`crate::features::lattice`].

pub mod domain;
pub mod infrastructure;

pub use domain::{collect_bound_locals, DefSite, Definition};
pub use infrastructure::{live_variables, reaching_definitions, uninitialized};
