//! In-memory configuration tree
//!
//! A [`Document`] arena owns every node; [`NodeRef`] views read it and
//! `&mut Document` methods edit it.

pub mod arguments;
pub mod document;
pub mod node;
pub mod node_ref;
pub mod render;
pub mod snapshot;

pub use arguments::Arguments;
pub use document::Document;
pub use node::{NodeId, NodeKind, NodeType};
pub use node_ref::{Children, Descendants, NodeRef};
pub use render::{LineEnding, RenderOptions};
pub use snapshot::NodeSnapshot;
