use crate::node::{ElementData, Node, NodeData, NodeId, NodeType, TextData};
use crate::{
    CommentRef, DocumentConfig, DocumentRef, DomError, DummyQueryEngine, ElementRef, FragmentRef,
    QueryEngine, SceneContext, TextRef,
};
use rustc_hash::FxHashMap;
use slab::Slab;
use std::sync::Arc;
use trellis_traits::{Align, AlignProp, DimProp, Dimension, SurfaceId, WindowId};

/// A document tree mirrored into one window's native scene.
///
/// Every structural or textual mutation records the matching native change in
/// the document's [`SceneContext`]. Only the document node and elements are
/// mirrored as surfaces; text reaches the scene as the text of its parent
/// element, and comments and fragments are never mirrored.
pub struct Document {
    /// A slab-backed tree of nodes. The document node is always at index 0.
    pub(crate) nodes: Slab<Node>,
    pub(crate) scene: SceneContext,
    /// Reverse lookup used to route native event targets.
    surfaces: FxHashMap<SurfaceId, NodeId>,
    query_engine: Arc<dyn QueryEngine>,
}

impl Document {
    pub fn new(window: WindowId, config: DocumentConfig) -> Self {
        let mut nodes = Slab::new();
        let entry = nodes.vacant_entry();
        let id = NodeId(entry.key());
        entry.insert(Node::new(id, NodeData::Document));
        debug_assert_eq!(id, NodeId::DOCUMENT);

        let mut surfaces = FxHashMap::default();
        surfaces.insert(SurfaceId::ROOT, NodeId::DOCUMENT);

        Self {
            nodes,
            scene: SceneContext::new(window),
            surfaces,
            query_engine: config
                .query_engine
                .unwrap_or_else(|| Arc::new(DummyQueryEngine)),
        }
    }

    pub fn window(&self) -> WindowId {
        self.scene.window()
    }

    pub fn scene(&self) -> &SceneContext {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneContext {
        &mut self.scene
    }

    pub fn tree(&self) -> &Slab<Node> {
        &self.nodes
    }

    pub fn root(&self) -> DocumentRef {
        DocumentRef(NodeId::DOCUMENT)
    }

    pub fn get_node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    #[track_caller]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[track_caller]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn create_node(&mut self, data: NodeData) -> NodeId {
        let entry = self.nodes.vacant_entry();
        let id = NodeId(entry.key());
        entry.insert(Node::new(id, data));
        id
    }

    pub fn create_element(&mut self, local_name: &str) -> ElementRef {
        let surface = self.scene.create_surface();
        let id = self.create_node(NodeData::Element(ElementData {
            local_name: local_name.to_ascii_lowercase(),
            surface,
        }));
        self.surfaces.insert(surface, id);
        ElementRef(id)
    }

    pub fn create_text_node(&mut self, data: &str) -> TextRef {
        TextRef(self.create_node(NodeData::Text(TextData::new(data.to_string()))))
    }

    pub fn create_comment(&mut self, data: &str) -> CommentRef {
        CommentRef(self.create_node(NodeData::Comment(TextData::new(data.to_string()))))
    }

    pub fn create_document_fragment(&mut self) -> FragmentRef {
        FragmentRef(self.create_node(NodeData::Fragment))
    }

    pub fn element(&self, id: NodeId) -> Option<ElementRef> {
        self.get_node(id)?.is_element().then_some(ElementRef(id))
    }

    pub fn text(&self, id: NodeId) -> Option<TextRef> {
        self.get_node(id)?.is_text_node().then_some(TextRef(id))
    }

    pub fn comment(&self, id: NodeId) -> Option<CommentRef> {
        matches!(self.get_node(id)?.data, NodeData::Comment(_)).then_some(CommentRef(id))
    }

    pub fn fragment(&self, id: NodeId) -> Option<FragmentRef> {
        self.get_node(id)?.is_fragment().then_some(FragmentRef(id))
    }

    pub fn node_for_surface(&self, surface: SurfaceId) -> Option<NodeId> {
        self.surfaces.get(&surface).copied()
    }

    pub fn node_type(&self, id: NodeId) -> NodeType {
        self.node(id).node_type()
    }

    pub fn node_name(&self, id: NodeId) -> String {
        self.node(id).node_name()
    }

    /// The payload of text and comment nodes, `None` for everything else.
    pub fn node_value(&self, id: NodeId) -> Option<String> {
        self.node(id).character_data().map(|data| data.content.clone())
    }

    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)
            .parent
            .filter(|parent| self.node(*parent).is_element())
    }

    pub fn child_nodes(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.first().copied()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).children.last().copied()
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        !self.node(id).children.is_empty()
    }

    /// Linear in the number of siblings.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, 1)
    }

    /// Linear in the number of siblings.
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.sibling(id, -1)
    }

    fn sibling(&self, id: NodeId, offset: isize) -> Option<NodeId> {
        let siblings = &self.node(self.node(id).parent?).children;
        let index = siblings.iter().position(|sibling| *sibling == id)?;
        siblings.get(index.checked_add_signed(offset)?).copied()
    }

    /// Whether the node is attached, through its ancestors, to the document.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.get_root_node(id) == NodeId::DOCUMENT
    }

    pub fn get_root_node(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.node(current).parent {
            current = parent;
        }
        current
    }

    pub(crate) fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.node(id).parent;
        }
        false
    }

    /// Text of element and text children, in document order. Comments are
    /// skipped. Text and comment nodes return their own payload.
    pub fn text_content(&self, id: NodeId) -> String {
        if let Some(data) = self.node(id).character_data() {
            return data.content.clone();
        }
        let mut out = String::new();
        self.write_text_content(id, &mut out);
        out
    }

    fn write_text_content(&self, id: NodeId, out: &mut String) {
        for child_id in self.node(id).children.iter() {
            let child = self.node(*child_id);
            match &child.data {
                NodeData::Text(data) => out.push_str(&data.content),
                NodeData::Element(_) => self.write_text_content(*child_id, out),
                _ => {}
            }
        }
    }

    /// Replace all children with one new text node holding `value`.
    ///
    /// A fresh text node is created even when the only child already is a text
    /// node. On text and comment nodes this sets the payload instead.
    pub fn set_text_content(&mut self, id: NodeId, value: &str) -> Result<(), DomError> {
        if self.node(id).character_data().is_some() {
            return self.set_data(id, value);
        }

        let children = self.node(id).children.clone();
        for child in children {
            self.remove_child(id, child)?;
        }
        let text = self.create_text_node(value);
        self.append_child(id, text.0)?;
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `ref_node`, or last when `ref_node`
    /// is `None`.
    ///
    /// A child that already has a parent is moved, never duplicated. A
    /// fragment is flattened: its children are inserted in order and the
    /// fragment is left empty and detached. Fails with `NotAChild` if
    /// `ref_node` is not a child of `parent`, and with `HierarchyRequest` if
    /// `parent` is a text or comment node, or if the insertion would create a
    /// cycle or attach the document node. Nothing is mutated on failure.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        ref_node: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        if let Some(ref_node) = ref_node {
            if self.node(ref_node).parent != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: ref_node,
                });
            }
        }

        self.ensure_insertable(parent, child)?;

        if self.node(child).is_fragment() {
            let fragment_children = std::mem::take(&mut self.node_mut(child).children);
            if let Some(err) = fragment_children
                .iter()
                .find_map(|id| self.ensure_insertable(parent, *id).err())
            {
                self.node_mut(child).children = fragment_children;
                return Err(err);
            }

            for id in &fragment_children {
                self.node_mut(*id).parent = None;
            }
            for id in fragment_children {
                self.insert_unchecked(parent, id, ref_node);
            }
            return Ok(child);
        }

        self.insert_unchecked(parent, child, ref_node);
        Ok(child)
    }

    /// Reject insertions under text or comment nodes, and those that would
    /// attach the document node or make a node its own ancestor.
    pub(crate) fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.node(parent).character_data().is_some()
            || matches!(self.node(child).data, NodeData::Document)
            || self.is_inclusive_ancestor(child, parent)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn insert_unchecked(&mut self, parent: NodeId, child: NodeId, ref_node: Option<NodeId>) {
        let ref_node = match ref_node {
            Some(id) if id == child => self.next_sibling(child),
            other => other,
        };

        if let Some(old_parent) = self.node(child).parent {
            self.detach(old_parent, child);
        }

        let parent_node = self.node_mut(parent);
        let index = ref_node
            .and_then(|id| parent_node.index_of_child(id))
            .unwrap_or(parent_node.children.len());
        parent_node.children.insert(index, child);
        self.node_mut(child).parent = Some(parent);

        self.mirror_insert(parent, child, index);
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        if self.node(child).parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(parent, child);
        Ok(child)
    }

    /// Insert `new_child` before `old_child`, then remove `old_child`.
    /// Returns `old_child`.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<NodeId, DomError> {
        if new_child == old_child {
            if self.node(old_child).parent != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    child: old_child,
                });
            }
            return Ok(old_child);
        }
        self.insert_before(parent, new_child, Some(old_child))?;
        self.remove_child(parent, old_child)
    }

    /// Detach the node from its parent, if it has one.
    pub fn remove(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.detach(parent, id);
        }
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let Some(index) = self.node(parent).index_of_child(child) else {
            return;
        };
        self.node_mut(parent).children.remove(index);
        self.node_mut(child).parent = None;

        self.mirror_remove(parent, child);
    }

    fn mirror_insert(&mut self, parent: NodeId, child: NodeId, index: usize) {
        match (self.node(parent).surface(), self.node(child).surface()) {
            (Some(parent_surface), Some(child_surface)) => {
                // Native children are the surface-bearing subset of ours
                let native_index = self.node(parent).children[..index]
                    .iter()
                    .filter(|id| self.node(**id).surface().is_some())
                    .count();
                self.scene
                    .insert_at(parent_surface, child_surface, native_index as u32);
            }
            _ if self.node(child).is_text_node() => self.sync_text(parent),
            _ => {}
        }
    }

    fn mirror_remove(&mut self, parent: NodeId, child: NodeId) {
        match (self.node(parent).surface(), self.node(child).surface()) {
            (Some(parent_surface), Some(child_surface)) => {
                self.scene.remove_child(parent_surface, child_surface);
            }
            _ if self.node(child).is_text_node() => self.sync_text(parent),
            _ => {}
        }
    }

    /// Re-send the direct text of an element to its surface.
    pub(crate) fn sync_text(&mut self, id: NodeId) {
        let node = self.node(id);
        let Some(element) = node.element_data() else {
            return;
        };
        let surface = element.surface;
        let text: String = node
            .children
            .iter()
            .filter_map(|child| match &self.node(*child).data {
                NodeData::Text(data) => Some(data.content.as_str()),
                _ => None,
            })
            .collect();
        self.scene.set_text(surface, text);
    }

    pub fn set_dimension(
        &mut self,
        id: NodeId,
        prop: DimProp,
        dim: Dimension,
    ) -> Result<(), DomError> {
        let surface = self.node(id).surface().ok_or(DomError::NoSurface(id))?;
        self.scene.set_dimension(surface, prop, dim);
        Ok(())
    }

    pub fn set_align(&mut self, id: NodeId, prop: AlignProp, align: Align) -> Result<(), DomError> {
        let surface = self.node(id).surface().ok_or(DomError::NoSurface(id))?;
        self.scene.set_align(surface, prop, align);
        Ok(())
    }

    pub fn query_selector(&self, scope: NodeId, selectors: &str) -> Option<NodeId> {
        self.query_engine.query_selector(self, scope, selectors)
    }

    pub fn query_selector_all(&self, scope: NodeId, selectors: &str) -> Vec<NodeId> {
        self.query_engine.query_selector_all(self, scope, selectors)
    }

    pub fn clone_node(&self, _id: NodeId, _deep: bool) -> Result<NodeId, DomError> {
        Err(DomError::Unsupported("cloneNode"))
    }

    pub fn is_equal_node(&self, _id: NodeId, _other: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("isEqualNode"))
    }

    pub fn compare_document_position(&self, _id: NodeId, _other: NodeId) -> Result<u16, DomError> {
        Err(DomError::Unsupported("compareDocumentPosition"))
    }

    pub fn contains(&self, _id: NodeId, _other: NodeId) -> Result<bool, DomError> {
        Err(DomError::Unsupported("contains"))
    }

    pub fn normalize(&mut self, _id: NodeId) -> Result<(), DomError> {
        Err(DomError::Unsupported("normalize"))
    }
}
