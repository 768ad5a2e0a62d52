//! Document arena and structural edits
//!
//! The [`Document`] owns every node. Nodes are addressed by [`NodeId`] and
//! read through [`NodeRef`]; all mutation goes through `&mut Document`, which
//! keeps `children[i].index == i` and `children[i].parent == parent` after
//! every edit.

use super::arguments::Arguments;
use super::node::{NodeData, NodeId, NodeKind};
use super::node_ref::NodeRef;
use super::render::RenderOptions;
use super::snapshot::NodeSnapshot;
use crate::error::{TreeError, TreeResult};
use crate::parser::diagnostic::Diagnostic;
use std::collections::HashSet;

/// A parsed configuration file.
///
/// Removed nodes leave a vacant slot behind and slots are never reused, so a
/// stale [`NodeId`] can never alias a newer node. The arena therefore grows
/// with every node created over the document's lifetime; rebuild it with
/// `Document::parse(&doc.render())` to compact a heavily edited document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Node arena. Slot 0 is the root and is never vacated.
    nodes: Vec<NodeData>,
    root: NodeId,
    diagnostics: Vec<Diagnostic>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::with_source(String::new())
    }

    pub(crate) fn with_source(source: String) -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document { source })],
            root: NodeId::from_index(0),
            diagnostics: Vec::new(),
        }
    }

    /// Parse configuration text into a new document
    pub fn parse(text: &str) -> Self {
        crate::parser::parse(text)
    }

    // --- Queries ---

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef::new(self, self.root)
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// The normalized text this document was parsed from
    pub fn source(&self) -> &str {
        match &self.slot(self.root).kind {
            NodeKind::Document { source } => source,
            _ => "",
        }
    }

    /// Read access to a live node
    pub fn node(&self, id: NodeId) -> TreeResult<NodeRef<'_>> {
        self.data(id)?;
        Ok(NodeRef::new(self, id))
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        self.node(id).ok()
    }

    /// Depth-first pre-order search below the root
    pub fn find<P>(&self, predicate: P) -> Option<NodeRef<'_>>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        self.root().find(predicate)
    }

    /// Every node below the root matching `predicate`, in pre-order
    pub fn find_all<P>(&self, predicate: P) -> Vec<NodeRef<'_>>
    where
        P: FnMut(&NodeRef<'_>) -> bool,
    {
        self.root().find_all(predicate)
    }

    pub fn render(&self) -> String {
        self.root().render()
    }

    pub fn render_with(&self, options: &RenderOptions) -> String {
        self.root().render_with(options)
    }

    pub fn snapshot(&self) -> NodeSnapshot {
        self.root().snapshot()
    }

    /// Lines the parser could not place cleanly, in source order
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Fail with the first parse diagnostic, if any
    pub fn validate(&self) -> TreeResult<()> {
        match self.diagnostics.first() {
            Some(diagnostic) => Err(TreeError::Malformed {
                line: diagnostic.line,
                message: diagnostic.kind.to_string(),
            }),
            None => Ok(()),
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    // --- Node creation ---

    /// Create a detached block; attach it with [`append`](Self::append) or
    /// [`insert`](Self::insert)
    pub fn create_block<I, S>(&mut self, name: impl Into<String>, arguments: I) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create(NodeKind::Block {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        })
    }

    pub fn create_directive<I, S>(&mut self, name: impl Into<String>, arguments: I) -> NodeId
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.create(NodeKind::Directive {
            name: name.into(),
            arguments: arguments.into_iter().collect(),
        })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create(NodeKind::Comment { text: text.into() })
    }

    pub fn create_blank_line(&mut self) -> NodeId {
        self.create(NodeKind::BlankLine)
    }

    fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Create and attach in one step, used by the parser on fresh containers
    pub(crate) fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = self.create(kind);
        let index = self.slot(parent).children.len();
        self.link(parent, id, index);
        id
    }

    // --- Child collection ---

    /// Attach `node` under `parent`.
    ///
    /// Lands at the physical end, or at the parent's insertion cursor when
    /// one is set (the cursor then advances past the new node). Returns the
    /// position the node landed at.
    pub fn append(&mut self, parent: NodeId, node: NodeId) -> TreeResult<usize> {
        self.check_attachable(parent, node)?;
        let data = self.slot(parent);
        let len = data.children.len();
        let index = data.cursor.map_or(len, |cursor| cursor.min(len));
        self.link(parent, node, index);
        if let Some(cursor) = self.slot_mut(parent).cursor.as_mut() {
            *cursor = index + 1;
        }
        Ok(index)
    }

    /// Append several detached nodes, contiguously when a cursor is set.
    ///
    /// Every node is checked before any is attached, so a failure leaves the
    /// tree unchanged.
    pub fn append_all<I>(&mut self, parent: NodeId, nodes: I) -> TreeResult<usize>
    where
        I: IntoIterator<Item = NodeId>,
    {
        let nodes: Vec<NodeId> = nodes.into_iter().collect();
        let mut seen = HashSet::with_capacity(nodes.len());
        for &node in &nodes {
            self.check_attachable(parent, node)?;
            if !seen.insert(node) {
                return Err(TreeError::invalid(format!(
                    "{} appears more than once in the batch",
                    node
                )));
            }
        }
        for &node in &nodes {
            self.append(parent, node)?;
        }
        Ok(nodes.len())
    }

    /// Attach `node` at `index` under `parent`; `index` is clamped to
    /// `0..=len`. Returns the position actually used.
    pub fn insert(&mut self, parent: NodeId, index: usize, node: NodeId) -> TreeResult<usize> {
        self.check_attachable(parent, node)?;
        let index = index.min(self.slot(parent).children.len());
        self.link(parent, node, index);
        Ok(index)
    }

    /// Remove `node` and its whole subtree, children first.
    ///
    /// Later siblings shift left and are renumbered. Handles to removed
    /// nodes become invalid. Returns the number of nodes removed.
    pub fn remove(&mut self, node: NodeId) -> TreeResult<usize> {
        self.data(node)?;
        if node == self.root {
            return Err(TreeError::invalid("the document root cannot be removed"));
        }
        let removed = self.destroy_children(node);
        self.unlink(node);
        self.vacate(node);
        Ok(removed + 1)
    }

    /// Unlink `node` from its parent, keeping it and its subtree alive so it
    /// can be attached elsewhere
    pub fn detach(&mut self, node: NodeId) -> TreeResult<()> {
        self.data(node)?;
        if node == self.root {
            return Err(TreeError::invalid("the document root cannot be detached"));
        }
        self.unlink(node);
        Ok(())
    }

    /// Remove every child of `node`, last to first
    pub fn clear(&mut self, node: NodeId) -> TreeResult<usize> {
        self.data(node)?;
        let mut removed = 0;
        while let Some(&last) = self.slot(node).children.last() {
            removed += self.remove(last)?;
        }
        Ok(removed)
    }

    /// Redirect where [`append`](Self::append) places new children of
    /// `parent`. `None` restores appending at the physical end.
    pub fn set_insertion_cursor(
        &mut self,
        parent: NodeId,
        cursor: Option<usize>,
    ) -> TreeResult<()> {
        let data = self.container_mut(parent)?;
        let len = data.children.len();
        data.cursor = cursor.map(|c| c.min(len));
        Ok(())
    }

    pub fn insertion_cursor(&self, parent: NodeId) -> TreeResult<Option<usize>> {
        Ok(self.data(parent)?.cursor)
    }

    // --- Payload edits ---

    pub fn set_name(&mut self, node: NodeId, name: impl Into<String>) -> TreeResult<()> {
        match &mut self.data_mut(node)?.kind {
            NodeKind::Block { name: current, .. } | NodeKind::Directive { name: current, .. } => {
                *current = name.into();
                Ok(())
            }
            other => Err(TreeError::invalid(format!(
                "{} {} has no settable name",
                other.node_type(),
                node
            ))),
        }
    }

    /// Replace the whole argument list of a block or directive
    pub fn set_arguments<I, S>(&mut self, node: NodeId, arguments: I) -> TreeResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        *self.arguments_mut(node)? = arguments.into_iter().collect();
        Ok(())
    }

    pub fn arguments_mut(&mut self, node: NodeId) -> TreeResult<&mut Arguments> {
        let data = self.data_mut(node)?;
        let node_type = data.kind.node_type();
        data.kind.arguments_mut().ok_or_else(|| {
            TreeError::invalid(format!("{} {} has no arguments", node_type, node))
        })
    }

    pub fn set_comment_text(&mut self, node: NodeId, text: impl Into<String>) -> TreeResult<()> {
        match &mut self.data_mut(node)?.kind {
            NodeKind::Comment { text: current } => {
                *current = text.into();
                Ok(())
            }
            other => Err(TreeError::invalid(format!(
                "{} {} is not a comment",
                other.node_type(),
                node
            ))),
        }
    }

    // --- Internals ---

    pub(crate) fn slot(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.as_index()]
    }

    fn slot_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.as_index()]
    }

    fn data(&self, id: NodeId) -> TreeResult<&NodeData> {
        self.nodes
            .get(id.as_index())
            .filter(|data| data.live)
            .ok_or_else(|| TreeError::invalid(format!("node {} does not exist", id)))
    }

    fn data_mut(&mut self, id: NodeId) -> TreeResult<&mut NodeData> {
        self.nodes
            .get_mut(id.as_index())
            .filter(|data| data.live)
            .ok_or_else(|| TreeError::invalid(format!("node {} does not exist", id)))
    }

    fn container_mut(&mut self, id: NodeId) -> TreeResult<&mut NodeData> {
        let data = self.data_mut(id)?;
        let node_type = data.kind.node_type();
        if !node_type.is_container() {
            return Err(TreeError::invalid(format!(
                "{} {} cannot own children",
                node_type, id
            )));
        }
        Ok(data)
    }

    fn check_attachable(&self, parent: NodeId, node: NodeId) -> TreeResult<()> {
        let parent_type = self.data(parent)?.kind.node_type();
        if !parent_type.is_container() {
            return Err(TreeError::invalid(format!(
                "{} {} cannot own children",
                parent_type, parent
            )));
        }
        let data = self.data(node)?;
        if node == self.root {
            return Err(TreeError::invalid("the document root cannot be attached"));
        }
        if data.parent.is_some() {
            return Err(TreeError::invalid(format!(
                "{} is already attached; detach it first",
                node
            )));
        }

        let mut ancestor = Some(parent);
        while let Some(id) = ancestor {
            if id == node {
                return Err(TreeError::invalid(format!(
                    "cannot attach {} beneath itself",
                    node
                )));
            }
            ancestor = self.slot(id).parent;
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, node: NodeId, index: usize) {
        let data = self.slot_mut(parent);
        data.children.insert(index, node);
        if let Some(cursor) = data.cursor.as_mut() {
            if index < *cursor {
                *cursor += 1;
            }
        }
        self.slot_mut(node).parent = Some(parent);
        self.renumber(parent, index);
    }

    fn unlink(&mut self, node: NodeId) {
        let data = self.slot_mut(node);
        let Some(parent) = data.parent.take() else {
            return;
        };
        let index = std::mem::take(&mut data.index);

        let parent_data = self.slot_mut(parent);
        parent_data.children.remove(index);
        if let Some(cursor) = parent_data.cursor.as_mut() {
            if index < *cursor {
                *cursor -= 1;
            }
        }
        self.renumber(parent, index);
    }

    /// Restore `children[i].index == i` from `from` onwards
    fn renumber(&mut self, parent: NodeId, from: usize) {
        for i in from..self.slot(parent).children.len() {
            let child = self.slot(parent).children[i];
            self.slot_mut(child).index = i;
        }
    }

    /// Tear down the subtree below `node` bottom-up; returns nodes removed
    fn destroy_children(&mut self, node: NodeId) -> usize {
        let mut pending = std::mem::take(&mut self.slot_mut(node).children);
        let mut order = Vec::new();
        while let Some(id) = pending.pop() {
            pending.extend(self.slot_mut(id).children.drain(..));
            order.push(id);
        }
        // Parents were pushed before their children
        for &id in order.iter().rev() {
            self.vacate(id);
        }
        order.len()
    }

    fn vacate(&mut self, node: NodeId) {
        *self.slot_mut(node) = NodeData::vacant();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
