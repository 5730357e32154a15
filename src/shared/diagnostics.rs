//! Diagnostic bag and suggested-fix model.
//!
//! Every analysis in this crate reports through a [`DiagnosticSink`] rather than
//! returning its findings directly: the driver may run per-function analyses in
//! parallel, so the sink's `report`/`report_with_fix` must be safe to
//! call from multiple threads concurrently.

use crate::shared::span::Span;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// Diagnostic severity. Malformed or unrecognized severities are dropped by callers
/// rather than surfaced — there is no "unknown" variant here by
/// design; a sink that cannot classify an incoming report should not call `report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Stable diagnostic codes, grouped by family; implementers should keep
/// the family boundaries stable across versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticCode {
    // Calor04xx — effect system
    EffectForbidden,
    UnknownExternalCall,
    UndeclaredEffect,
    UnusedEffectDeclaration,
    // Calor08xx — dataflow
    UninitializedUse,
    // Calor09xx — bug-pattern checkers
    DivisionByZero,
    Overflow,
    NullDereference,
    IndexOutOfBounds,
    // Calor10xx — taint / injection
    SqlInjection,
    CommandInjection,
    PathTraversal,
    Xss,
    CodeEval,
    // Calor12xx — contract checks (LSP-facing; code space shared, not implemented here)
    StrongerPrecondition,
    WeakerPostcondition,
}

impl DiagnosticCode {
    /// The stable string form used in diagnostic output.
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticCode::EffectForbidden => "effect-forbidden",
            DiagnosticCode::UnknownExternalCall => "unknown-external-call",
            DiagnosticCode::UndeclaredEffect => "undeclared-effect",
            DiagnosticCode::UnusedEffectDeclaration => "unused-effect-declaration",
            DiagnosticCode::UninitializedUse => "uninitialized-use",
            DiagnosticCode::DivisionByZero => "division-by-zero",
            DiagnosticCode::Overflow => "overflow",
            DiagnosticCode::NullDereference => "null-dereference",
            DiagnosticCode::IndexOutOfBounds => "index-out-of-bounds",
            DiagnosticCode::SqlInjection => "sql-injection",
            DiagnosticCode::CommandInjection => "command-injection",
            DiagnosticCode::PathTraversal => "path-traversal",
            DiagnosticCode::Xss => "xss",
            DiagnosticCode::CodeEval => "code-eval",
            DiagnosticCode::StrongerPrecondition => "stronger-precondition",
            DiagnosticCode::WeakerPostcondition => "weaker-postcondition",
        }
    }

    /// The `CalorNNxx` family prefix this code belongs to.
    pub fn family(self) -> &'static str {
        match self {
            DiagnosticCode::EffectForbidden
            | DiagnosticCode::UnknownExternalCall
            | DiagnosticCode::UndeclaredEffect
            | DiagnosticCode::UnusedEffectDeclaration => "Calor04xx",
            DiagnosticCode::UninitializedUse => "Calor08xx",
            DiagnosticCode::DivisionByZero
            | DiagnosticCode::Overflow
            | DiagnosticCode::NullDereference
            | DiagnosticCode::IndexOutOfBounds => "Calor09xx",
            DiagnosticCode::SqlInjection
            | DiagnosticCode::CommandInjection
            | DiagnosticCode::PathTraversal
            | DiagnosticCode::Xss
            | DiagnosticCode::CodeEval => "Calor10xx",
            DiagnosticCode::StrongerPrecondition | DiagnosticCode::WeakerPostcondition => {
                "Calor12xx"
            }
        }
    }
}

/// A single text edit within a suggested fix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextEdit {
    pub file_path: String,
    pub start_line: u32,
    pub start_col: u32,
    pub end_line: u32,
    pub end_col: u32,
    pub replacement: String,
}

/// A suggested fix: a human-facing description plus an ordered list of edits.
/// Edits within one fix must be non-overlapping — this is an
/// obligation on the checker constructing the fix, not enforced structurally here;
/// callers that need the guarantee checked should validate separately from
/// construction, the same split `Validatable` uses for config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    pub description: String,
    pub edits: Vec<TextEdit>,
}

impl Fix {
    pub fn new(description: impl Into<String>, edits: Vec<TextEdit>) -> Self {
        Self {
            description: description.into(),
            edits,
        }
    }

    /// True when no two edits in this fix overlap by (file, line/col range).
    pub fn edits_non_overlapping(&self) -> bool {
        for (i, a) in self.edits.iter().enumerate() {
            for b in self.edits.iter().skip(i + 1) {
                if a.file_path != b.file_path {
                    continue;
                }
                let a_start = (a.start_line, a.start_col);
                let a_end = (a.end_line, a.end_col);
                let b_start = (b.start_line, b.start_col);
                let b_end = (b.end_line, b.end_col);
                if a_start < b_end && b_start < a_end {
                    return false;
                }
            }
        }
        true
    }
}

/// A single diagnostic finding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub span: Span,
    pub code: DiagnosticCode,
    pub message: String,
    pub severity: Severity,
    pub fix: Option<Fix>,
}

/// Sink every analysis reports findings through. Implementations MUST provide a
/// thread-safe `report`/`report_with_fix` since the driver may run
/// per-function analyses concurrently.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, span: Span, code: DiagnosticCode, message: String, severity: Severity);

    fn report_with_fix(
        &self,
        span: Span,
        code: DiagnosticCode,
        message: String,
        severity: Severity,
        fix: Fix,
    ) {
        // Default bridges to `report`, dropping the fix, for sinks that don't care
        // about suggested edits (e.g. a count-only sink in tests).
        let _ = fix;
        self.report(span, code, message, severity);
    }
}

/// An in-memory, thread-safe diagnostic bag. The default sink used by the driver
/// and by tests; production embedders are expected to supply their own sink wired
/// to their own transport (the sink is an external collaborator).
#[derive(Default)]
pub struct DiagnosticBag {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.diagnostics
            .lock()
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&self, span: Span, code: DiagnosticCode, message: String, severity: Severity) {
        self.diagnostics.lock().push(Diagnostic {
            span,
            code,
            message,
            severity,
            fix: None,
        });
    }

    fn report_with_fix(
        &self,
        span: Span,
        code: DiagnosticCode,
        message: String,
        severity: Severity,
        fix: Fix,
    ) {
        self.diagnostics.lock().push(Diagnostic {
            span,
            code,
            message,
            severity,
            fix: Some(fix),
        });
    }
}
