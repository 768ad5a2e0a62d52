//! Error types for tree manipulation
//!
//! Parsing itself never fails. These errors come from structural edits made
//! through the [`Document`](crate::Document) API and from the opt-in
//! [`Document::validate`](crate::Document::validate) post-check.

use thiserror::Error;

/// Result type for tree operations
pub type TreeResult<T> = Result<T, TreeError>;

/// Tree and argument errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// A handle or argument the operation cannot accept
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// Index-based access outside the current bounds
    #[error("Index {index} out of range for length {len}")]
    OutOfRange { index: usize, len: usize },

    /// Reported by validation only; the parser records a diagnostic and moves on
    #[error("Malformed input at line {line}: {message}")]
    Malformed { line: usize, message: String },
}

impl TreeError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
