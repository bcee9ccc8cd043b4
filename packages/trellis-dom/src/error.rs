use thiserror::Error;

use crate::NodeId;

/// Errors raised synchronously by tree operations.
///
/// `NotAChild` and `HierarchyRequest` signal a caller bug: the operation is
/// abandoned before anything in the tree or the scene batch changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DomError {
    #[error("node {child} is not a child of node {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {child} cannot be inserted into node {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
    #[error("{0} is not supported")]
    Unsupported(&'static str),
    #[error("node {0} is not a text or comment node")]
    NotCharacterData(NodeId),
    #[error("node {0} has no native surface")]
    NoSurface(NodeId),
}
