//! Common models shared across feature modules: source spans, diagnostics, ids.

pub mod diagnostics;
pub mod ids;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticBag, DiagnosticCode, DiagnosticSink, Fix, Severity, TextEdit};
pub use ids::{BlockId, FunctionId};
pub use span::Span;
