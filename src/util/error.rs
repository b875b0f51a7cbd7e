//! Error types for the graph and accessor layers.

use super::{ElementShape, LinkId, NodeId, ScalarKind};
use thiserror::Error;

/// Main error type for graph operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Typed array holds a scalar kind outside the accessor component types
    #[error("Unsupported accessor component representation: {0}")]
    UnsupportedRepresentation(ScalarKind),

    /// Array length is not a whole number of items for the element shape
    #[error("Array length {len} is not a multiple of {shape} item size {item_size}")]
    ShapeMismatch {
        len: usize,
        shape: ElementShape,
        item_size: usize,
    },

    /// Raw byte slice cannot be reinterpreted as the requested scalar kind
    #[error("Byte length {len} is not a multiple of {kind} size")]
    ByteLength { len: usize, kind: ScalarKind },

    /// Operation has no implementation for this node
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Node id was never allocated by this graph
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),

    /// Link id was never allocated by this graph
    #[error("Link not found: {0}")]
    LinkNotFound(LinkId),

    /// Node has been disposed and can no longer take part in links
    #[error("Node {0} is disposed")]
    NodeDisposed(NodeId),

    /// Node has no relation slot with this name
    #[error("Node {node} has no slot named '{slot}'")]
    UnknownSlot { node: NodeId, slot: String },

    /// Slot exists but was registered with another kind
    #[error("Slot '{slot}' is a {actual} slot, expected {expected}")]
    SlotKindMismatch {
        slot: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// Property has a different type than the operation requires
    #[error("Property {node} is a {actual}, expected {expected}")]
    WrongPropertyType {
        node: NodeId,
        expected: &'static str,
        actual: &'static str,
    },

    /// Extension name was not registered at setup
    #[error("Unknown extension: {0}")]
    UnknownExtension(String),

    /// Extension property attached under a name other than its own
    #[error("Extension mismatch: slot '{expected}', property is '{actual}'")]
    ExtensionMismatch { expected: String, actual: String },

    /// Graph is already borrowed by an enclosing scope on this thread
    #[error("Re-entrant graph mutation from inside an active graph scope")]
    ReentrantMutation,
}

impl Error {
    /// Create an unsupported operation error.
    pub fn unsupported(msg: impl Into<String>) -> Self {
        Self::UnsupportedOperation(msg.into())
    }

    /// Whether this error reports broken data rather than API misuse.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedRepresentation(_) | Self::ShapeMismatch { .. } | Self::ByteLength { .. }
        )
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, Error>;
