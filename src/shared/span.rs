//! Source location types.
//!
//! Every bound-AST node and every diagnostic carries a [`Span`]. This mirrors the
//! position model the binder hands the analysis core: an offset/length pair plus
//! the line/column a human-facing diagnostic wants to print.

use serde::{Deserialize, Serialize};

/// A single point in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    pub line: u32,
    pub column: u32,
}

impl Location {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// A source range: byte offset/length plus the line/column of both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub offset: u32,
    pub length: u32,
    pub start: Location,
    pub end: Location,
}

impl Span {
    pub fn new(offset: u32, length: u32, start: Location, end: Location) -> Self {
        Self {
            offset,
            length,
            start,
            end,
        }
    }

    /// A span with no useful position, for synthesized nodes.
    pub fn zero() -> Self {
        Self {
            offset: 0,
            length: 0,
            start: Location::new(0, 0),
            end: Location::new(0, 0),
        }
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start.line <= line && line <= self.end.line
    }

    pub fn contains(&self, other: &Span) -> bool {
        self.start.line <= other.start.line && other.end.line <= self.end.line
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_line() {
        let span = Span::new(0, 0, Location::new(10, 0), Location::new(20, 0));
        assert!(span.contains_line(10));
        assert!(span.contains_line(15));
        assert!(span.contains_line(20));
        assert!(!span.contains_line(9));
        assert!(!span.contains_line(21));
    }

    #[test]
    fn nested_span_contains() {
        let outer = Span::new(0, 0, Location::new(1, 0), Location::new(30, 0));
        let inner = Span::new(0, 0, Location::new(5, 0), Location::new(10, 0));
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
    }
}
