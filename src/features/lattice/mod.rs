//! Generic monotone-lattice / worklist solver, parametric at
//! compile time over a lattice element and a transfer function rather than
//! dynamically dispatched.

pub mod domain;

pub use domain::{solve, Analysis, Direction, Lattice, MaySet, MustSet, SolverResult};
