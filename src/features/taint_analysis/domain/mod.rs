//! Taint labels and the source/sink/sanitizer vocabulary.
//! Sources and sinks are recognized heuristically by name — this rewrite has
//! no type system to key a manifest-style catalog on, so the catalog is a
//! name-pattern table instead of the effect resolver's signature table.

use crate::shared::DiagnosticCode;

/// Where a taint label originated, mirroring the toggle set in
/// [`crate::config::TaintToggles`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    UserInput,
    Environment,
    FileRead,
    NetworkInput,
    DatabaseResult,
}

/// A sink category; each maps to the diagnostic code raised when tainted
/// data reaches it unsanitized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
    Sql,
    Command,
    Path,
    Html,
    Eval,
}

impl SinkKind {
    pub fn diagnostic_code(self) -> DiagnosticCode {
        match self {
            SinkKind::Sql => DiagnosticCode::SqlInjection,
            SinkKind::Command => DiagnosticCode::CommandInjection,
            SinkKind::Path => DiagnosticCode::PathTraversal,
            SinkKind::Html => DiagnosticCode::Xss,
            SinkKind::Eval => DiagnosticCode::CodeEval,
        }
    }
}

/// The taint carried by a value: which source(s) contributed to it. A value
/// tainted by more than one source (e.g. concatenating user input with an
/// environment variable) keeps every contributing kind, since sanitizing one
/// does not clear the others.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TaintLabel {
    pub sources: Vec<SourceKind>,
}

impl TaintLabel {
    pub fn single(kind: SourceKind) -> Self {
        Self {
            sources: vec![kind],
        }
    }

    pub fn is_tainted(&self) -> bool {
        !self.sources.is_empty()
    }

    pub fn merge(&mut self, other: &TaintLabel) {
        for s in &other.sources {
            if !self.sources.contains(s) {
                self.sources.push(*s);
            }
        }
    }
}
