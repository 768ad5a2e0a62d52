//! Owned, serializable copies of a subtree

use super::node::{NodeId, NodeKind, NodeType};
use super::node_ref::NodeRef;
use serde::Serialize;
use std::collections::HashMap;

/// Structural copy of a node: kind, name, arguments, comment text and
/// children. Two parses of equivalent text produce equal snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
    pub kind: NodeType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Built bottom-up from a reversed pre-order walk, so every child is
    /// finished before its parent
    pub(crate) fn of(node: NodeRef<'_>) -> Self {
        let order: Vec<NodeRef<'_>> = std::iter::once(node).chain(node.descendants()).collect();
        let mut built: HashMap<NodeId, NodeSnapshot> = HashMap::with_capacity(order.len());

        for current in order.iter().rev() {
            let children = current
                .children()
                .filter_map(|child| built.remove(&child.id()))
                .collect();
            built.insert(current.id(), Self::leaf(*current, children));
        }

        built
            .remove(&node.id())
            .unwrap_or_else(|| Self::leaf(node, Vec::new()))
    }

    fn leaf(node: NodeRef<'_>, children: Vec<NodeSnapshot>) -> Self {
        let text = match node.payload() {
            NodeKind::Comment { text } => Some(text.clone()),
            _ => None,
        };
        Self {
            kind: node.kind(),
            name: node.name().to_string(),
            arguments: node.arguments().to_vec(),
            text,
            children,
        }
    }
}

impl Drop for NodeSnapshot {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut child) = stack.pop() {
            stack.append(&mut child.children);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Document, NodeType};

    #[test]
    fn test_snapshot_shape() {
        let doc = Document::parse("<IfModule a>\n# hi\n</IfModule>\n");
        let snapshot = doc.snapshot();
        assert_eq!(snapshot.kind, NodeType::Document);
        assert_eq!(snapshot.children.len(), 1);

        let block = &snapshot.children[0];
        assert_eq!(block.name, "IfModule");
        assert_eq!(block.arguments, ["a"]);
        assert_eq!(block.children[0].text.as_deref(), Some("hi"));
    }

    #[test]
    fn test_snapshot_deep_nesting() {
        let depth = 20_000;
        let doc = Document::parse(&"<A>\n".repeat(depth));
        let snapshot = doc.snapshot();

        let mut level = &snapshot;
        let mut seen = 0;
        while let Some(child) = level.children.first() {
            seen += 1;
            level = child;
        }
        assert_eq!(seen, depth);
        assert_eq!(level.name, "A");
    }

    #[test]
    fn test_snapshot_json() {
        let doc = Document::parse("Options -Indexes\n\n");
        let json = serde_json::to_value(doc.snapshot()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "document",
                "children": [
                    { "kind": "directive", "name": "Options", "arguments": ["-Indexes"] },
                    { "kind": "blank_line" }
                ]
            })
        );
    }
}
