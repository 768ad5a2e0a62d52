//! Borrowed, read-only view of a node

use super::arguments::Arguments;
use super::document::Document;
use super::node::{NodeData, NodeId, NodeKind, NodeType};
use super::render::{self, RenderOptions};
use super::snapshot::NodeSnapshot;
use crate::error::{TreeError, TreeResult};
use std::borrow::Cow;
use std::fmt;

/// A node together with the document it lives in.
///
/// Cheap to copy; every navigation method returns further `NodeRef`s tied to
/// the same borrow of the document.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
    data: &'a NodeData,
}

impl<'a> NodeRef<'a> {
    /// `id` must be live in `doc`
    pub(crate) fn new(doc: &'a Document, id: NodeId) -> Self {
        Self {
            doc,
            id,
            data: doc.slot(id),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeType {
        self.data.kind.node_type()
    }

    /// Full per-kind payload
    pub fn payload(&self) -> &'a NodeKind {
        &self.data.kind
    }

    pub fn name(&self) -> &'a str {
        self.data.kind.name()
    }

    /// Arguments of a block or directive; empty for other kinds
    pub fn arguments(&self) -> &'a [String] {
        self.data
            .kind
            .arguments()
            .map(Arguments::as_slice)
            .unwrap_or_default()
    }

    pub fn argument_list(&self) -> Option<&'a Arguments> {
        self.data.kind.arguments()
    }

    /// Case-insensitive exact match against any argument
    pub fn has_argument_value(&self, value: &str) -> bool {
        self.argument_list()
            .is_some_and(|args| args.contains_ignore_case(value))
    }

    /// Line-level content.
    ///
    /// The source text for the document, the tag line for a block, `name`
    /// plus quoted arguments for a directive, the text after `# ` for a
    /// comment, and nothing for a blank line.
    pub fn text(&self) -> Cow<'a, str> {
        match &self.data.kind {
            NodeKind::Document { source } => Cow::Borrowed(source),
            NodeKind::Block { name, arguments } => {
                Cow::Owned(render::start_tag(name, arguments, !self.has_children()))
            }
            NodeKind::Directive { name, arguments } => {
                Cow::Owned(render::directive_line(name, arguments))
            }
            NodeKind::Comment { text } => Cow::Borrowed(text),
            NodeKind::BlankLine => Cow::Borrowed(""),
        }
    }

    // --- Position ---

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        self.data.parent.map(|id| NodeRef::new(self.doc, id))
    }

    /// Position among the parent's children
    pub fn index(&self) -> usize {
        self.data.index
    }

    /// Depth below the root; the root document is level 0
    pub fn level(&self) -> usize {
        let mut level = 0;
        let mut current = self.data.parent;
        while let Some(id) = current {
            level += 1;
            current = self.doc.slot(id).parent;
        }
        level
    }

    // --- Children ---

    pub fn children(&self) -> Children<'a> {
        Children {
            doc: self.doc,
            ids: self.data.children.iter(),
        }
    }

    pub fn child(&self, index: usize) -> TreeResult<NodeRef<'a>> {
        self.data
            .children
            .get(index)
            .map(|&id| NodeRef::new(self.doc, id))
            .ok_or(TreeError::OutOfRange {
                index,
                len: self.data.children.len(),
            })
    }

    pub fn child_count(&self) -> usize {
        self.data.children.len()
    }

    pub fn has_children(&self) -> bool {
        !self.data.children.is_empty()
    }

    /// No text and no children
    pub fn is_empty(&self) -> bool {
        self.text().is_empty() && !self.has_children()
    }

    pub fn first_child(&self) -> Option<NodeRef<'a>> {
        self.children().next()
    }

    pub fn last_child(&self) -> Option<NodeRef<'a>> {
        self.children().next_back()
    }

    pub fn next_sibling(&self) -> Option<NodeRef<'a>> {
        self.parent()?.child(self.index() + 1).ok()
    }

    pub fn prev_sibling(&self) -> Option<NodeRef<'a>> {
        let index = self.index().checked_sub(1)?;
        self.parent()?.child(index).ok()
    }

    /// Number of children, or of all descendants when `deep`
    pub fn node_count(&self, deep: bool) -> usize {
        if deep {
            self.descendants().count()
        } else {
            self.child_count()
        }
    }

    // --- Search ---

    /// Every node below this one, depth-first pre-order
    pub fn descendants(&self) -> Descendants<'a> {
        Descendants {
            doc: self.doc,
            stack: self.data.children.iter().rev().copied().collect(),
        }
    }

    /// First descendant matching `predicate`: each child is tested before
    /// its own subtree is searched
    pub fn find<P>(&self, mut predicate: P) -> Option<NodeRef<'a>>
    where
        P: FnMut(&NodeRef<'a>) -> bool,
    {
        self.descendants().find(|node| predicate(node))
    }

    /// All descendants matching `predicate`, in pre-order. Matching nodes
    /// are still descended into.
    pub fn find_all<P>(&self, mut predicate: P) -> Vec<NodeRef<'a>>
    where
        P: FnMut(&NodeRef<'a>) -> bool,
    {
        self.descendants().filter(|node| predicate(node)).collect()
    }

    // --- Output ---

    pub fn render(&self) -> String {
        self.render_with(&RenderOptions::default())
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        render::render(*self, options)
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot::of(*self)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", &self.kind())
            .field("name", &self.name())
            .field("arguments", &self.arguments())
            .field("index", &self.index())
            .finish()
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for NodeRef<'_> {}

/// Iterator over the direct children of a node
pub struct Children<'a> {
    doc: &'a Document,
    ids: std::slice::Iter<'a, NodeId>,
}

impl<'a> Iterator for Children<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.ids.next().map(|&id| NodeRef::new(self.doc, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.ids.size_hint()
    }
}

impl DoubleEndedIterator for Children<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.ids.next_back().map(|&id| NodeRef::new(self.doc, id))
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Depth-first pre-order iterator over a subtree, excluding its root
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = NodeRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = NodeRef::new(self.doc, id);
        self.stack.extend(node.data.children.iter().rev().copied());
        Some(node)
    }
}
