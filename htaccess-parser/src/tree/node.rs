//! Node storage
//!
//! Every node lives in the [`Document`](super::Document) arena. Links between
//! nodes are [`NodeId`] handles: `children` owns downward, `parent` is a
//! non-owning back-reference used only for traversal.

use super::arguments::Arguments;
use serde::Serialize;
use std::fmt;

/// Handle to a node in a document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Document,
    Block,
    Directive,
    Comment,
    BlankLine,
}

impl NodeType {
    /// Whether nodes of this type may own children
    pub fn is_container(self) -> bool {
        matches!(self, NodeType::Document | NodeType::Block)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeType::Document => "document",
            NodeType::Block => "block",
            NodeType::Directive => "directive",
            NodeType::Comment => "comment",
            NodeType::BlankLine => "blank_line",
        };
        f.write_str(s)
    }
}

/// Per-kind payload
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root node, holding the normalized source it was parsed from
    Document { source: String },

    /// `<Name args />` or `<Name args>` ... `</Name>`
    Block { name: String, arguments: Arguments },

    /// `Name args`
    Directive { name: String, arguments: Arguments },

    /// `# text`
    Comment { text: String },

    BlankLine,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document { .. } => NodeType::Document,
            NodeKind::Block { .. } => NodeType::Block,
            NodeKind::Directive { .. } => NodeType::Directive,
            NodeKind::Comment { .. } => NodeType::Comment,
            NodeKind::BlankLine => NodeType::BlankLine,
        }
    }

    /// Block/directive name, `#` for comments, empty otherwise
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Block { name, .. } | NodeKind::Directive { name, .. } => name,
            NodeKind::Comment { .. } => "#",
            NodeKind::Document { .. } | NodeKind::BlankLine => "",
        }
    }

    pub fn arguments(&self) -> Option<&Arguments> {
        match self {
            NodeKind::Block { arguments, .. } | NodeKind::Directive { arguments, .. } => {
                Some(arguments)
            }
            _ => None,
        }
    }

    pub(crate) fn arguments_mut(&mut self) -> Option<&mut Arguments> {
        match self {
            NodeKind::Block { arguments, .. } | NodeKind::Directive { arguments, .. } => {
                Some(arguments)
            }
            _ => None,
        }
    }
}

/// Arena slot for one node
#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    /// Position among the parent's children; 0 while detached
    pub index: usize,
    pub children: Vec<NodeId>,
    /// Where `append` lands instead of the physical end, when set
    pub cursor: Option<usize>,
    /// Cleared once the node is removed; the slot is never reused
    pub live: bool,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            index: 0,
            children: Vec::new(),
            cursor: None,
            live: true,
        }
    }

    pub fn vacant() -> Self {
        Self {
            live: false,
            ..Self::new(NodeKind::BlankLine)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_per_kind() {
        let comment = NodeKind::Comment {
            text: "hello".to_string(),
        };
        assert_eq!(comment.name(), "#");
        assert_eq!(NodeKind::BlankLine.name(), "");

        let directive = NodeKind::Directive {
            name: "Options".to_string(),
            arguments: Arguments::from(vec!["-Indexes".to_string()]),
        };
        assert_eq!(directive.name(), "Options");
        assert_eq!(directive.node_type(), NodeType::Directive);
        assert_eq!(directive.arguments().map(Arguments::len), Some(1));
        assert!(comment.arguments().is_none());
    }

    #[test]
    fn test_container_types() {
        assert!(NodeType::Document.is_container());
        assert!(NodeType::Block.is_container());
        assert!(!NodeType::Directive.is_container());
        assert!(!NodeType::Comment.is_container());
        assert!(!NodeType::BlankLine.is_container());
    }
}
