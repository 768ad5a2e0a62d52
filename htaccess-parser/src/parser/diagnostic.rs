//! Parse diagnostics
//!
//! Parsing never fails. Lines that cannot be placed cleanly are recorded here
//! and parsing carries on.

use super::lexer::Location;
use serde::Serialize;
use std::fmt;

/// One recorded problem, pointing at a 1-based line of the normalized source
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub line: usize,
    /// Byte range of the offending line, without its line ending
    #[serde(skip)]
    pub span: Location,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn new(line: usize, span: Location, kind: DiagnosticKind) -> Self {
        Self { line, span, kind }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Matched no line rule and was skipped
    DroppedLine { text: String },
    /// Closed the innermost open block under a different name
    MismatchedClose { open: String, close: String },
    /// Close tag with no open block
    StrayClose { close: String },
    /// Block still open at end of input
    UnclosedBlock { name: String },
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::DroppedLine { text } => write!(f, "unrecognized line `{}`", text),
            DiagnosticKind::MismatchedClose { open, close } => {
                write!(f, "`</{}>` closes block `<{}>`", close, open)
            }
            DiagnosticKind::StrayClose { close } => {
                write!(f, "`</{}>` has no matching open block", close)
            }
            DiagnosticKind::UnclosedBlock { name } => {
                write!(f, "block `<{}>` is never closed", name)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let diagnostic = Diagnostic::new(
            3,
            Location { start: 10, end: 20 },
            DiagnosticKind::MismatchedClose {
                open: "IfModule".to_string(),
                close: "Files".to_string(),
            },
        );
        assert_eq!(
            diagnostic.to_string(),
            "line 3: `</Files>` closes block `<IfModule>`"
        );
    }

    #[test]
    fn test_serialize() {
        let diagnostic = Diagnostic::new(
            1,
            Location::default(),
            DiagnosticKind::UnclosedBlock {
                name: "Files".to_string(),
            },
        );
        assert_eq!(
            serde_json::to_value(&diagnostic).unwrap(),
            serde_json::json!({ "line": 1, "kind": { "kind": "unclosed_block", "name": "Files" } })
        );
    }
}
