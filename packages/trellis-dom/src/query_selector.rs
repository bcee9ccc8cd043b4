use crate::{Document, NodeId};

/// Selector matching, supplied by the embedder.
///
/// The document never parses selectors itself: `ParentNode::query_selector*`
/// delegate here with the calling node as scope.
pub trait QueryEngine {
    /// All matching nodes under `scope`, in document order.
    fn query_selector_all(&self, doc: &Document, scope: NodeId, selectors: &str) -> Vec<NodeId>;

    fn query_selector(&self, doc: &Document, scope: NodeId, selectors: &str) -> Option<NodeId> {
        self.query_selector_all(doc, scope, selectors)
            .into_iter()
            .next()
    }
}

/// Matches nothing.
pub struct DummyQueryEngine;
impl QueryEngine for DummyQueryEngine {
    fn query_selector_all(&self, _doc: &Document, _scope: NodeId, _selectors: &str) -> Vec<NodeId> {
        Vec::new()
    }
}
