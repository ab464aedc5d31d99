use thiserror::Error;

use crate::dom::NodeId;

/// Errors reported by [`MemoryDom`](crate::MemoryDom).
#[derive(Debug, Error)]
pub enum MemoryDomError {
    /// The handle does not belong to this tree.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// The node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild {
        /// The expected parent.
        parent: NodeId,
        /// The node looked up under it.
        child: NodeId,
    },
    /// Text nodes carry neither attributes nor children.
    #[error("node {0} is a text node")]
    NotAnElement(NodeId),
    /// The tag name is not a valid element name.
    #[error("invalid tag name `{0}`")]
    InvalidTagName(String),
    /// The attribute name is not a valid attribute name.
    #[error("invalid attribute name `{0}`")]
    InvalidAttributeName(String),
    /// The insertion would make a node its own ancestor.
    #[error("cannot insert {child} under {parent}: it would create a cycle")]
    HierarchyRequest {
        /// The intended parent.
        parent: NodeId,
        /// The node being inserted.
        child: NodeId,
    },
    /// Serializing a snapshot failed.
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
