//! Parse diagnostics.

use std::fmt;

/// Line and column in the source document, both 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl From<roxmltree::TextPos> for Position {
    fn from(pos: roxmltree::TextPos) -> Self {
        Self::new(pos.row, pos.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Diagnostic with source location and context.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Kind of problem
    pub kind: DiagnosticKind,
    /// Location of the offending element or markup
    pub position: Position,
    /// Human-readable message
    pub message: String,
}

/// Category of diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// The text is not well-formed markup. Parsing stops immediately.
    MalformedDocument,

    /// An element has the wrong shape: unknown tag, wrong number of
    /// children, missing or empty attribute, unparsable attribute value.
    Structure,

    /// The document is well-shaped but describes an invalid scenario:
    /// duplicate event ids, missing or repeated time limit.
    Semantic,
}

impl Diagnostic {
    pub fn malformed(message: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::MalformedDocument,
            position,
            message: message.into(),
        }
    }

    pub fn structure(message: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::Structure,
            position,
            message: message.into(),
        }
    }

    pub fn semantic(message: impl Into<String>, position: Position) -> Self {
        Self {
            kind: DiagnosticKind::Semantic,
            position,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

impl std::error::Error for Diagnostic {}

/// Render diagnostics as `line:col: message` strings
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics.iter().map(ToString::to_string).collect()
}
