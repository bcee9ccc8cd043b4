use std::fmt;

use trellis_traits::SurfaceId;

/// Opaque handle to a node in a [`Document`](crate::Document)'s arena.
///
/// Ids are only minted by the document's factory methods. Using an id with a
/// document other than the one that created it panics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// The document node itself.
    pub const DOCUMENT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// DOM `nodeType` numbers for the kinds this tree supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    Comment = 8,
    Document = 9,
    DocumentFragment = 11,
}

pub struct Node {
    /// Our Id
    pub(crate) id: NodeId,
    /// Our parent's ID. Non-owning.
    pub(crate) parent: Option<NodeId>,
    // What are our children?
    pub(crate) children: Vec<NodeId>,
    /// Node type (Element, TextNode, etc) specific data
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(id: NodeId, data: NodeData) -> Self {
        Self {
            id,
            parent: None,
            children: Vec::new(),
            data,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::Fragment => NodeType::DocumentFragment,
        }
    }

    pub fn node_name(&self) -> String {
        match &self.data {
            NodeData::Document => "#document".to_string(),
            NodeData::Element(el) => el.local_name.to_ascii_uppercase(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::Fragment => "#document-fragment".to_string(),
        }
    }

    /// The native surface mirroring this node, for the document and elements.
    pub fn surface(&self) -> Option<SurfaceId> {
        match &self.data {
            NodeData::Document => Some(SurfaceId::ROOT),
            NodeData::Element(el) => Some(el.surface),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    pub fn is_text_node(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self.data, NodeData::Fragment)
    }

    pub fn element_data(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(data) => Some(data),
            _ => None,
        }
    }

    /// Payload of a text or comment node.
    pub fn character_data(&self) -> Option<&TextData> {
        match &self.data {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut TextData> {
        match &mut self.data {
            NodeData::Text(data) | NodeData::Comment(data) => Some(data),
            _ => None,
        }
    }

    pub fn index_of_child(&self, child_id: NodeId) -> Option<usize> {
        self.children.iter().position(|id| *id == child_id)
    }
}

#[derive(Debug, Clone)]
pub enum NodeData {
    /// The `Document` itself - the root node, mirrored as the root surface.
    Document,

    /// An element, mirrored as a native surface.
    Element(ElementData),

    /// A text node.
    Text(TextData),

    /// A comment. Never rendered.
    Comment(TextData),

    /// A transient container whose children are moved out on insertion.
    Fragment,
}

#[derive(Debug, Clone)]
pub struct ElementData {
    pub local_name: String,
    pub surface: SurfaceId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextData {
    pub content: String,
}

impl TextData {
    pub fn new(content: String) -> Self {
        Self { content }
    }
}
