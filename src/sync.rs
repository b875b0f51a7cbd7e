//! Shared access to one property graph from several threads.
//!
//! The graph itself has no internal locking. [`SharedGraph`] wraps it in a
//! single lock so that a multi-step edit (replacing an extension, detaching
//! and re-attaching a property) runs as one exclusive scope.

use crate::property::PropertyGraph;
use crate::util::{Error, Result};
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;

/// Cloneable handle to a lock-protected [`PropertyGraph`].
///
/// A scope opened from inside another scope on the same thread, typically
/// from a dispose listener, fails with [`Error::ReentrantMutation`] instead
/// of deadlocking.
#[derive(Clone)]
pub struct SharedGraph {
    inner: Arc<ReentrantMutex<RefCell<PropertyGraph>>>,
}

impl SharedGraph {
    pub fn new(graph: PropertyGraph) -> Self {
        Self {
            inner: Arc::new(ReentrantMutex::new(RefCell::new(graph))),
        }
    }

    /// Run `f` with exclusive access to the graph.
    pub fn with<R>(&self, f: impl FnOnce(&mut PropertyGraph) -> R) -> Result<R> {
        let guard = self.inner.lock();
        let mut graph = guard
            .try_borrow_mut()
            .map_err(|_| Error::ReentrantMutation)?;
        Ok(f(&mut graph))
    }

    /// Run `f` with shared access to the graph.
    ///
    /// Other threads are still excluded for the duration of `f`.
    pub fn read<R>(&self, f: impl FnOnce(&PropertyGraph) -> R) -> Result<R> {
        let guard = self.inner.lock();
        let graph = guard.try_borrow().map_err(|_| Error::ReentrantMutation)?;
        Ok(f(&graph))
    }
}

impl Default for SharedGraph {
    fn default() -> Self {
        Self::new(PropertyGraph::new())
    }
}
