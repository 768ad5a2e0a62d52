//! `.htaccess` text to tree
//!
//! Lines are classified by [`classifier`], arguments split by [`lexer`],
//! and [`parser`] assembles the [`Document`](crate::Document).

pub mod classifier;
pub mod diagnostic;
pub mod lexer;
pub mod parser;

pub use classifier::{classify, LineKind};
pub use diagnostic::{Diagnostic, DiagnosticKind};
pub use lexer::{tokenize, tokenize_arguments, Location, Spanned, Token};
pub use parser::{normalize_line_endings, parse, Parser};
