//! `.htaccess` parser and editable configuration tree
//!
//! Text is parsed line by line into a [`Document`]: blocks, directives,
//! comments and blank lines, nested the way the source nests them. The tree
//! can be queried, edited and rendered back to text.
//!
//! # Example
//!
//! ```rust
//! use htaccess_parser::Document;
//!
//! let mut doc = Document::parse("<IfModule mod_rewrite.c>\nRewriteEngine On\n</IfModule>\n");
//! let block = doc.find(|n| n.name() == "IfModule").unwrap().id();
//!
//! let rule = doc.create_directive("RewriteRule", ["^old$", "/new"]);
//! doc.append(block, rule).unwrap();
//!
//! assert_eq!(
//!     doc.render(),
//!     "\t<IfModule \"mod_rewrite.c\">\n\
//!      \t\tRewriteEngine \"On\"\n\
//!      \t\tRewriteRule \"^old$\" \"/new\"\n\
//!      \t</IfModule>\n"
//! );
//! ```

pub mod error;
pub mod parser;
pub mod tree;

pub use error::{TreeError, TreeResult};
pub use parser::{
    classify, normalize_line_endings, parse, tokenize_arguments, Diagnostic, DiagnosticKind,
    LineKind, Location,
};
pub use tree::{
    Arguments, Children, Descendants, Document, LineEnding, NodeId, NodeKind, NodeRef,
    NodeSnapshot, NodeType, RenderOptions,
};
