//! Links - directed, named, disposable edges between graph nodes.

use super::{LinkId, NodeId};
use std::fmt;

/// Callback run once when a link is disposed.
///
/// Listeners only see the link record, never the graph, so they cannot
/// dispose the link that is notifying them.
pub type DisposeListener = Box<dyn FnOnce(&Link) + Send + 'static>;

/// A connection between two nodes in a [`Graph`](super::Graph).
///
/// The left node is the owner and the right node the resource. The owner can
/// find and remove its own links; the resource holds no reference to the link
/// or to its owner, that direction is answered by the graph's reverse index.
pub struct Link {
    id: LinkId,
    name: String,
    left: NodeId,
    right: NodeId,
    disposed: bool,
    listeners: Vec<DisposeListener>,
}

impl Link {
    pub(crate) fn new(id: LinkId, name: String, left: NodeId, right: NodeId) -> Self {
        Self {
            id,
            name,
            left,
            right,
            disposed: false,
            listeners: Vec::new(),
        }
    }

    #[inline]
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// Name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owner node.
    #[inline]
    pub fn left(&self) -> NodeId {
        self.left
    }

    /// Resource node.
    #[inline]
    pub fn right(&self) -> NodeId {
        self.right
    }

    /// Whether this link has been destroyed. Never reverts to false.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Number of listeners still waiting for disposal.
    pub fn num_listeners(&self) -> usize {
        self.listeners.len()
    }

    pub(crate) fn push_listener(&mut self, listener: DisposeListener) {
        self.listeners.push(listener);
    }

    /// Flip to disposed and hand back the pending listeners.
    ///
    /// Returns `None` if the link was already disposed.
    pub(crate) fn mark_disposed(&mut self) -> Option<Vec<DisposeListener>> {
        if self.disposed {
            return None;
        }
        self.disposed = true;
        Some(std::mem::take(&mut self.listeners))
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("left", &self.left)
            .field("right", &self.right)
            .field("disposed", &self.disposed)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
