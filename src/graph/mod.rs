//! Graph layer - nodes, links and reference bookkeeping.
//!
//! This module provides:
//! - [`Graph`] - Arena of nodes and links with a reverse (incoming) index
//! - [`GraphNode`] / [`Slot`] - Nodes and the relation slots they register
//! - [`Link`] - Directed, named, disposable edges
//!
//! Ownership only runs one way: an owner holds its outgoing links, a resource
//! holds nothing. Reference cycles between nodes are therefore plain data and
//! never keep anything alive.

mod link;
mod node;
#[allow(clippy::module_inception)]
mod graph;

pub use crate::util::{LinkId, NodeId};
pub use link::{DisposeListener, Link};
pub use node::{GraphNode, Slot, SlotDef, SlotKind};
pub use graph::Graph;
