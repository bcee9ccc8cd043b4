//! The document tree in Trellis
//!
//! This crate implements a headless DOM ([`Document`]) whose structural and
//! textual mutations are mirrored, as they happen, into a per-window
//! [`SceneContext`]. The context batches those mirrored changes until the run
//! loop flushes them to the native backend once per tick.
//!
//! Nodes live in an arena owned by the document and are addressed by
//! [`NodeId`]. DOM behaviour is exposed twice: as inherent methods on
//! [`Document`] taking ids, and as capability traits ([`TreeNode`],
//! [`ParentNode`], [`ChildNode`], [`NonDocumentTypeChildNode`],
//! [`CharacterData`]) implemented by typed handles such as [`ElementRef`].
//!
//! ## Feature flags
//!  - `default`: Enables the features listed below.
//!  - `tracing`: Enables tracing support.

/// The DOM implementation.
///
/// This is the primary entry point for this crate.
mod document;

/// The nodes themselves, and their data.
pub mod node;

mod character_data;
mod config;
mod debug;
mod error;
mod handle;
mod query_selector;
mod scene;

pub use config::DocumentConfig;
pub use document::Document;
pub use error::DomError;
pub use handle::{
    CharacterData, ChildNode, CommentRef, DocumentRef, ElementRef, FragmentRef, NodeHandle,
    NodeOrString, NonDocumentTypeChildNode, ParentNode, TextRef, TreeNode,
};
pub use node::{ElementData, Node, NodeData, NodeId, NodeType, TextData};
pub use query_selector::{DummyQueryEngine, QueryEngine};
pub use scene::SceneContext;

pub use trellis_traits::{Align, AlignProp, ChangeBatch, DimProp, Dimension, SurfaceId, WindowId};
