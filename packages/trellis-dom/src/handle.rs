//! Typed node handles and the DOM capability traits they implement.
//!
//! Each node kind gets a `Copy` handle. Capabilities are traits with default
//! methods, implemented only for the kinds that have them:
//!
//! | trait                        | Document | Fragment | Element | Text | Comment |
//! |------------------------------|----------|----------|---------|------|---------|
//! | [`TreeNode`]                 | yes      | yes      | yes     | yes  | yes     |
//! | [`ParentNode`]               | yes      | yes      | yes     |      |         |
//! | [`ChildNode`]                |          |          | yes     | yes  | yes     |
//! | [`NonDocumentTypeChildNode`] |          |          | yes     | yes  | yes     |
//! | [`CharacterData`]            |          |          |         | yes  | yes     |
//!
//! Untyped [`NodeId`]s implement [`TreeNode`], [`ParentNode`] and [`ChildNode`],
//! whatever the kind of node behind them. Inserting under a text or comment
//! id fails with [`DomError::HierarchyRequest`].

use trellis_traits::{Align, AlignProp, DimProp, Dimension, SurfaceId};

use crate::{Document, DomError, NodeId, NodeType};

pub trait NodeHandle {
    fn id(&self) -> NodeId;
}

impl NodeHandle for NodeId {
    fn id(&self) -> NodeId {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentRef(pub(crate) NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FragmentRef(pub(crate) NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub(crate) NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRef(pub(crate) NodeId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CommentRef(pub(crate) NodeId);

/// An argument to the variadic insertion methods. Strings become new text
/// nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeOrString {
    Node(NodeId),
    Text(String),
}

impl From<NodeId> for NodeOrString {
    fn from(id: NodeId) -> Self {
        NodeOrString::Node(id)
    }
}

impl From<&str> for NodeOrString {
    fn from(text: &str) -> Self {
        NodeOrString::Text(text.to_string())
    }
}

impl From<String> for NodeOrString {
    fn from(text: String) -> Self {
        NodeOrString::Text(text)
    }
}

macro_rules! impl_handle {
    ($($handle:ident),*) => {
        $(
            impl NodeHandle for $handle {
                fn id(&self) -> NodeId {
                    self.0
                }
            }

            impl From<$handle> for NodeId {
                fn from(handle: $handle) -> Self {
                    handle.0
                }
            }

            impl From<$handle> for NodeOrString {
                fn from(handle: $handle) -> Self {
                    NodeOrString::Node(handle.0)
                }
            }

            impl TreeNode for $handle {}
        )*
    };
}

impl_handle!(DocumentRef, FragmentRef, ElementRef, TextRef, CommentRef);

impl TreeNode for NodeId {}
impl ParentNode for NodeId {}
impl ChildNode for NodeId {}

impl ParentNode for DocumentRef {}
impl ParentNode for FragmentRef {}
impl ParentNode for ElementRef {}

impl ChildNode for ElementRef {}
impl ChildNode for TextRef {}
impl ChildNode for CommentRef {}

impl NonDocumentTypeChildNode for ElementRef {}
impl NonDocumentTypeChildNode for TextRef {}
impl NonDocumentTypeChildNode for CommentRef {}

impl CharacterData for TextRef {}
impl CharacterData for CommentRef {}

/// Members every node has.
pub trait TreeNode: NodeHandle {
    fn node_type(&self, doc: &Document) -> NodeType {
        doc.node_type(self.id())
    }

    fn node_name(&self, doc: &Document) -> String {
        doc.node_name(self.id())
    }

    fn node_value(&self, doc: &Document) -> Option<String> {
        doc.node_value(self.id())
    }

    fn parent_node(&self, doc: &Document) -> Option<NodeId> {
        doc.parent_node(self.id())
    }

    fn parent_element(&self, doc: &Document) -> Option<ElementRef> {
        doc.parent_element(self.id()).map(ElementRef)
    }

    fn child_nodes<'d>(&self, doc: &'d Document) -> &'d [NodeId] {
        doc.child_nodes(self.id())
    }

    fn first_child(&self, doc: &Document) -> Option<NodeId> {
        doc.first_child(self.id())
    }

    fn last_child(&self, doc: &Document) -> Option<NodeId> {
        doc.last_child(self.id())
    }

    fn has_child_nodes(&self, doc: &Document) -> bool {
        doc.has_child_nodes(self.id())
    }

    fn next_sibling(&self, doc: &Document) -> Option<NodeId> {
        doc.next_sibling(self.id())
    }

    fn previous_sibling(&self, doc: &Document) -> Option<NodeId> {
        doc.previous_sibling(self.id())
    }

    fn text_content(&self, doc: &Document) -> String {
        doc.text_content(self.id())
    }

    fn set_text_content(&self, doc: &mut Document, value: &str) -> Result<(), DomError> {
        doc.set_text_content(self.id(), value)
    }

    fn append_child(&self, doc: &mut Document, child: impl NodeHandle) -> Result<NodeId, DomError> {
        doc.append_child(self.id(), child.id())
    }

    fn insert_before(
        &self,
        doc: &mut Document,
        child: impl NodeHandle,
        ref_node: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        doc.insert_before(self.id(), child.id(), ref_node)
    }

    fn remove_child(&self, doc: &mut Document, child: impl NodeHandle) -> Result<NodeId, DomError> {
        doc.remove_child(self.id(), child.id())
    }

    fn replace_child(
        &self,
        doc: &mut Document,
        new_child: impl NodeHandle,
        old_child: impl NodeHandle,
    ) -> Result<NodeId, DomError> {
        doc.replace_child(self.id(), new_child.id(), old_child.id())
    }

    fn is_connected(&self, doc: &Document) -> bool {
        doc.is_connected(self.id())
    }

    fn get_root_node(&self, doc: &Document) -> NodeId {
        doc.get_root_node(self.id())
    }

    fn is_same_node(&self, other: &impl NodeHandle) -> bool {
        self.id() == other.id()
    }

    fn clone_node(&self, doc: &Document, deep: bool) -> Result<NodeId, DomError> {
        doc.clone_node(self.id(), deep)
    }

    fn is_equal_node(&self, doc: &Document, other: impl NodeHandle) -> Result<bool, DomError> {
        doc.is_equal_node(self.id(), other.id())
    }

    fn compare_document_position(
        &self,
        doc: &Document,
        other: impl NodeHandle,
    ) -> Result<u16, DomError> {
        doc.compare_document_position(self.id(), other.id())
    }

    fn contains(&self, doc: &Document, other: impl NodeHandle) -> Result<bool, DomError> {
        doc.contains(self.id(), other.id())
    }

    fn normalize(&self, doc: &mut Document) -> Result<(), DomError> {
        doc.normalize(self.id())
    }
}

/// Nodes that can have children.
pub trait ParentNode: TreeNode {
    /// Element children only.
    fn children(&self, doc: &Document) -> Vec<ElementRef> {
        element_children(doc, self.id()).collect()
    }

    fn child_element_count(&self, doc: &Document) -> usize {
        element_children(doc, self.id()).count()
    }

    fn first_element_child(&self, doc: &Document) -> Option<ElementRef> {
        element_children(doc, self.id()).next()
    }

    fn last_element_child(&self, doc: &Document) -> Option<ElementRef> {
        element_children(doc, self.id()).last()
    }

    /// Insert `nodes` after the last child, in order.
    fn append<I, N>(&self, doc: &mut Document, nodes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeOrString>,
    {
        let parent = self.id();
        let nodes = resolve_nodes(doc, parent, nodes)?;
        insert_all(doc, parent, nodes, None)
    }

    /// Insert `nodes` before the first child, in order.
    fn prepend<I, N>(&self, doc: &mut Document, nodes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeOrString>,
    {
        let parent = self.id();
        let nodes = resolve_nodes(doc, parent, nodes)?;
        let reference = doc
            .child_nodes(parent)
            .iter()
            .copied()
            .find(|id| !nodes.contains(id));
        insert_all(doc, parent, nodes, reference)
    }

    fn query_selector(&self, doc: &Document, selectors: &str) -> Option<NodeId> {
        doc.query_selector(self.id(), selectors)
    }

    fn query_selector_all(&self, doc: &Document, selectors: &str) -> Vec<NodeId> {
        doc.query_selector_all(self.id(), selectors)
    }
}

/// Nodes that can be a child. Detached nodes ignore every method here.
pub trait ChildNode: TreeNode {
    /// Insert `nodes` just before this node, in order.
    fn before<I, N>(&self, doc: &mut Document, nodes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeOrString>,
    {
        let Some(parent) = doc.parent_node(self.id()) else {
            return Ok(());
        };
        let nodes = resolve_nodes(doc, parent, nodes)?;

        let siblings = doc.child_nodes(parent);
        let position = siblings.iter().position(|id| *id == self.id()).unwrap_or(0);
        let viable_previous = siblings[..position]
            .iter()
            .rev()
            .copied()
            .find(|id| !nodes.contains(id));

        // Pull the nodes out first so the reference below stays put
        for id in &nodes {
            doc.remove(*id);
        }
        let reference = match viable_previous {
            Some(previous) => doc.next_sibling(previous),
            None => doc.first_child(parent),
        };
        insert_all(doc, parent, nodes, reference)
    }

    /// Insert `nodes` just after this node, in order.
    fn after<I, N>(&self, doc: &mut Document, nodes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeOrString>,
    {
        let Some(parent) = doc.parent_node(self.id()) else {
            return Ok(());
        };
        let nodes = resolve_nodes(doc, parent, nodes)?;
        let reference = viable_next_sibling(doc, self.id(), &nodes);
        insert_all(doc, parent, nodes, reference)
    }

    /// Replace this node with `nodes`. If this node is among them it is
    /// repositioned rather than removed.
    fn replace_with<I, N>(&self, doc: &mut Document, nodes: I) -> Result<(), DomError>
    where
        I: IntoIterator<Item = N>,
        N: Into<NodeOrString>,
    {
        let Some(parent) = doc.parent_node(self.id()) else {
            return Ok(());
        };
        let nodes = resolve_nodes(doc, parent, nodes)?;

        if nodes.contains(&self.id()) {
            let reference = viable_next_sibling(doc, self.id(), &nodes);
            return insert_all(doc, parent, nodes, reference);
        }
        insert_all(doc, parent, nodes, Some(self.id()))?;
        doc.remove_child(parent, self.id())?;
        Ok(())
    }

    fn remove(&self, doc: &mut Document) {
        doc.remove(self.id());
    }
}

pub trait NonDocumentTypeChildNode: TreeNode {
    fn next_element_sibling(&self, doc: &Document) -> Option<ElementRef> {
        let mut current = doc.next_sibling(self.id());
        while let Some(id) = current {
            if let Some(element) = doc.element(id) {
                return Some(element);
            }
            current = doc.next_sibling(id);
        }
        None
    }

    fn previous_element_sibling(&self, doc: &Document) -> Option<ElementRef> {
        let mut current = doc.previous_sibling(self.id());
        while let Some(id) = current {
            if let Some(element) = doc.element(id) {
                return Some(element);
            }
            current = doc.previous_sibling(id);
        }
        None
    }
}

/// Text and comment payload editing. Offsets count characters and are clamped
/// to the payload length.
pub trait CharacterData: TreeNode {
    fn data<'d>(&self, doc: &'d Document) -> &'d str {
        doc.data(self.id()).unwrap_or_default()
    }

    fn set_data(&self, doc: &mut Document, data: &str) -> Result<(), DomError> {
        doc.set_data(self.id(), data)
    }

    fn length(&self, doc: &Document) -> usize {
        doc.length(self.id()).unwrap_or_default()
    }

    fn substring_data(&self, doc: &Document, offset: usize, count: usize) -> String {
        doc.substring_data(self.id(), offset, count)
            .unwrap_or_default()
    }

    fn append_data(&self, doc: &mut Document, data: &str) -> Result<(), DomError> {
        doc.append_data(self.id(), data)
    }

    fn insert_data(&self, doc: &mut Document, offset: usize, data: &str) -> Result<(), DomError> {
        doc.insert_data(self.id(), offset, data)
    }

    fn delete_data(&self, doc: &mut Document, offset: usize, count: usize) -> Result<(), DomError> {
        doc.delete_data(self.id(), offset, count)
    }

    fn replace_data(
        &self,
        doc: &mut Document,
        offset: usize,
        count: usize,
        data: &str,
    ) -> Result<(), DomError> {
        doc.replace_data(self.id(), offset, count, data)
    }
}

impl ElementRef {
    pub fn local_name<'d>(&self, doc: &'d Document) -> &'d str {
        doc.node(self.0)
            .element_data()
            .map(|el| el.local_name.as_str())
            .unwrap_or_default()
    }

    pub fn surface(&self, doc: &Document) -> SurfaceId {
        doc.node(self.0)
            .element_data()
            .map(|el| el.surface)
            .unwrap_or(SurfaceId::ROOT)
    }

    pub fn set_dimension(
        &self,
        doc: &mut Document,
        prop: DimProp,
        dim: Dimension,
    ) -> Result<(), DomError> {
        doc.set_dimension(self.0, prop, dim)
    }

    pub fn set_align(&self, doc: &mut Document, prop: AlignProp, align: Align) -> Result<(), DomError> {
        doc.set_align(self.0, prop, align)
    }
}

fn element_children(doc: &Document, id: NodeId) -> impl Iterator<Item = ElementRef> + '_ {
    doc.child_nodes(id)
        .iter()
        .filter_map(move |child| doc.element(*child))
}

fn viable_next_sibling(doc: &Document, id: NodeId, nodes: &[NodeId]) -> Option<NodeId> {
    let mut current = doc.next_sibling(id);
    while let Some(sibling) = current {
        if !nodes.contains(&sibling) {
            return Some(sibling);
        }
        current = doc.next_sibling(sibling);
    }
    None
}

/// Turn strings into fresh text nodes and check every node can go under
/// `parent` before anything moves.
fn resolve_nodes<I, N>(doc: &mut Document, parent: NodeId, nodes: I) -> Result<Vec<NodeId>, DomError>
where
    I: IntoIterator<Item = N>,
    N: Into<NodeOrString>,
{
    let mut resolved = Vec::new();
    for node in nodes {
        let id = match node.into() {
            NodeOrString::Node(id) => id,
            NodeOrString::Text(text) => doc.create_text_node(&text).0,
        };
        doc.ensure_insertable(parent, id)?;
        resolved.push(id);
    }
    Ok(resolved)
}

fn insert_all(
    doc: &mut Document,
    parent: NodeId,
    nodes: Vec<NodeId>,
    reference: Option<NodeId>,
) -> Result<(), DomError> {
    for id in nodes {
        doc.insert_before(parent, id, reference)?;
    }
    Ok(())
}
