//! Rewrite routing for `.htaccess` files
//!
//! Reads `RewriteRule` and `ErrorDocument` directives from a parsed
//! [`htaccess_parser::Document`] and resolves URLs against them.

pub mod config;
pub mod error;
pub mod rewrite;
pub mod router;

pub use config::RouteConfig;
pub use error::{Error, Result};
pub use rewrite::{RewriteRule, RewriteTable};
pub use router::{Resolution, Router};
