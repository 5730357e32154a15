//! calor-effects: the effect system and dataflow analysis core for the Calor
//! static analyzer.
//!
//! This crate consumes a bound AST (modules, functions, classes — lexing,
//! parsing and binding are external collaborators) and a [`shared::DiagnosticSink`],
//! and produces diagnostics and suggested fixes through them. Two halves:
//!
//! - an **effect system** (`features::effect_model`, `features::manifest`,
//!   `features::effect_resolver`, `features::effect_enforcement`) that classifies
//!   every function by the side effects it may perform and enforces declared
//!   effect signatures interprocedurally;
//! - a **dataflow framework** (`features::flow_graph`, `features::lattice`,
//!   `features::dataflow`, `features::taint_analysis`, `features::bug_patterns`,
//!   `features::invariants`) built around a generic monotone-lattice solver.
//!
//! [`pipeline::run`] wires both halves into a single driver. Everything else
//! is exposed for callers that want to run one analysis in isolation (an
//! LSP-style incremental host, a single checker in a test) rather than the
//! full pipeline.

#![allow(clippy::too_many_arguments)]

pub mod ast;
pub mod config;
pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use config::{AnalysisConfig, Preset, ValidatedConfig};
pub use errors::{CalorError, Result};
pub use pipeline::{run, AnalysisMetrics, AnalysisReport, FunctionAnalysis};
pub use shared::{Diagnostic, DiagnosticBag, DiagnosticCode, DiagnosticSink, Fix, Severity, TextEdit};
