//! The graph arena: nodes, links and the reverse index.

use super::{DisposeListener, GraphNode, Link, LinkId, NodeId, Slot, SlotDef, SlotKind};
use crate::util::{Error, Result};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// Central authority over nodes and the links between them.
///
/// Nodes and links live in arenas and are never removed; disposal leaves a
/// tombstone so that `is_disposed` stays answerable for stale handles.
///
/// The graph maintains a reverse index from each node to its live incoming
/// links, so parent lookups and detachment cost O(incoming) rather than a scan
/// of the whole graph.
#[derive(Default)]
pub struct Graph {
    nodes: Vec<GraphNode>,
    links: Vec<Link>,
    parents: HashMap<NodeId, SmallVec<[LinkId; 4]>>,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Register a node with the relation slots it owns.
    pub fn create_node(&mut self, slots: &[SlotDef]) -> NodeId {
        let id = NodeId::from_index(self.nodes.len() as u32);
        self.nodes.push(GraphNode::new(id, slots));
        id
    }

    /// Get a node by id (live or disposed).
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.slot())
    }

    /// Number of nodes ever created, disposed ones included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the node exists and has been disposed.
    pub fn is_node_disposed(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(GraphNode::is_disposed)
    }

    fn live_node(&self, id: NodeId) -> Result<&GraphNode> {
        let node = self.node(id).ok_or(Error::NodeNotFound(id))?;
        if node.is_disposed() {
            return Err(Error::NodeDisposed(id));
        }
        Ok(node)
    }

    /// Dispose a node: all of its outgoing links, then all of its incoming
    /// links. Returns false if the node was already disposed.
    pub fn dispose_node(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node(id).ok_or(Error::NodeNotFound(id))?;
        if node.is_disposed() {
            return Ok(false);
        }
        let children = self.disconnect_children(id);
        let parents = self.disconnect_parents(id, |_| true);
        self.nodes[id.slot()].mark_disposed();
        debug!(node = %id, children, parents, "disposed node");
        Ok(true)
    }

    // ========================================================================
    // Links
    // ========================================================================

    /// Get a link by id (live or disposed).
    #[inline]
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.slot())
    }

    /// Number of links ever created, disposed ones included.
    pub fn num_links(&self) -> usize {
        self.links.len()
    }

    /// Whether the link exists and has been disposed.
    pub fn is_disposed(&self, id: LinkId) -> bool {
        self.link(id).is_some_and(Link::is_disposed)
    }

    /// Register a new directed edge from `owner` to `resource`.
    ///
    /// The link is appended to the owner's outgoing set and to the reverse
    /// index, but not to any slot: single-valued relations are enforced by the
    /// slot operations, not here.
    pub fn create_link(
        &mut self,
        name: impl Into<String>,
        owner: NodeId,
        resource: NodeId,
    ) -> Result<LinkId> {
        self.live_node(owner)?;
        self.live_node(resource)?;

        let id = LinkId::from_index(self.links.len() as u32);
        let name = name.into();
        trace!(link = %id, name = %name, %owner, %resource, "created link");

        self.links.push(Link::new(id, name, owner, resource));
        self.nodes[owner.slot()].push_outgoing(id);
        self.parents.entry(resource).or_default().push(id);
        Ok(id)
    }

    /// Destroy a link, updating its owner and the reverse index, then run its
    /// listeners in registration order.
    ///
    /// Idempotent: returns false, and notifies nobody, if the link was already
    /// disposed.
    pub fn dispose_link(&mut self, id: LinkId) -> Result<bool> {
        let link = self.links.get_mut(id.slot()).ok_or(Error::LinkNotFound(id))?;
        let Some(listeners) = link.mark_disposed() else {
            return Ok(false);
        };
        let (owner, resource) = (link.left(), link.right());

        self.nodes[owner.slot()].forget(id);
        if let Some(incoming) = self.parents.get_mut(&resource) {
            if let Some(pos) = incoming.iter().position(|l| *l == id) {
                incoming.remove(pos);
            }
            if incoming.is_empty() {
                self.parents.remove(&resource);
            }
        }
        trace!(link = %id, %owner, %resource, listeners = listeners.len(), "disposed link");

        let link = &self.links[id.slot()];
        for listener in listeners {
            listener(link);
        }
        Ok(true)
    }

    /// Register a callback for the disposal of a link.
    ///
    /// If the link is already disposed the callback runs immediately, so a
    /// listener is never silently dropped.
    pub fn on_dispose<F>(&mut self, id: LinkId, listener: F) -> Result<()>
    where
        F: FnOnce(&Link) + Send + 'static,
    {
        let link = self.links.get_mut(id.slot()).ok_or(Error::LinkNotFound(id))?;
        if link.is_disposed() {
            listener(&*link);
        } else {
            link.push_listener(Box::new(listener) as DisposeListener);
        }
        Ok(())
    }

    // ========================================================================
    // Traversal
    // ========================================================================

    /// Live outgoing links of a node.
    pub fn child_links(&self, node: NodeId) -> &[LinkId] {
        self.node(node).map_or(&[][..], GraphNode::outgoing)
    }

    /// Live incoming links of a node, from the reverse index.
    pub fn parent_links(&self, node: NodeId) -> &[LinkId] {
        self.parents.get(&node).map_or(&[][..], |v| v.as_slice())
    }

    /// Resources referenced by a node, de-duplicated in first-seen order.
    pub fn list_children(&self, node: NodeId) -> Vec<NodeId> {
        self.collect_unique(self.child_links(node), Link::right)
    }

    /// Owners referencing a node, de-duplicated in first-seen order.
    pub fn list_parents(&self, node: NodeId) -> Vec<NodeId> {
        self.collect_unique(self.parent_links(node), Link::left)
    }

    fn collect_unique(&self, links: &[LinkId], end: fn(&Link) -> NodeId) -> Vec<NodeId> {
        let mut seen = HashSet::with_capacity(links.len());
        links
            .iter()
            .map(|id| end(&self.links[id.slot()]))
            .filter(|n| seen.insert(*n))
            .collect()
    }

    /// Dispose every incoming link of `node` whose owner satisfies `predicate`.
    ///
    /// Returns the number of links disposed.
    pub fn disconnect_parents<P>(&mut self, node: NodeId, mut predicate: P) -> usize
    where
        P: FnMut(NodeId) -> bool,
    {
        let doomed: SmallVec<[LinkId; 8]> = self
            .parent_links(node)
            .iter()
            .copied()
            .filter(|id| predicate(self.links[id.slot()].left()))
            .collect();
        self.dispose_all(&doomed)
    }

    /// Dispose every outgoing link of `node`.
    pub fn disconnect_children(&mut self, node: NodeId) -> usize {
        let doomed: SmallVec<[LinkId; 8]> = self.child_links(node).iter().copied().collect();
        self.dispose_all(&doomed)
    }

    /// Remove every incoming link of `node` except those owned by `root`.
    ///
    /// The node's own outgoing links are left untouched.
    pub fn detach(&mut self, node: NodeId, root: NodeId) -> usize {
        let removed = self.disconnect_parents(node, |owner| owner != root);
        debug!(%node, %root, removed, "detached node");
        removed
    }

    fn dispose_all(&mut self, links: &[LinkId]) -> usize {
        links
            .iter()
            .filter(|id| matches!(self.dispose_link(**id), Ok(true)))
            .count()
    }

    // ========================================================================
    // Slots
    // ========================================================================

    fn checked_slot(&self, owner: NodeId, slot: &str, kind: SlotKind) -> Result<&Slot> {
        let node = self.node(owner).ok_or(Error::NodeNotFound(owner))?;
        let found = node.slot(slot).ok_or_else(|| Error::UnknownSlot {
            node: owner,
            slot: slot.to_string(),
        })?;
        if found.kind() != kind {
            return Err(Error::SlotKindMismatch {
                slot: slot.to_string(),
                expected: kind.name(),
                actual: found.kind().name(),
            });
        }
        Ok(found)
    }

    /// Links currently held by a slot, whatever its kind.
    pub fn slot_links(&self, owner: NodeId, slot: &str) -> Result<&[LinkId]> {
        let node = self.node(owner).ok_or(Error::NodeNotFound(owner))?;
        node.slot(slot).map(Slot::links).ok_or_else(|| Error::UnknownSlot {
            node: owner,
            slot: slot.to_string(),
        })
    }

    fn attach(&mut self, owner: NodeId, slot: &str, link: LinkId) {
        if let Some(s) = self.nodes[owner.slot()].slot_mut(slot) {
            s.push(link);
        }
    }

    /// Resource held by a single-valued slot.
    pub fn get_ref(&self, owner: NodeId, slot: &str) -> Result<Option<NodeId>> {
        let s = self.checked_slot(owner, slot, SlotKind::Ref)?;
        Ok(s.links().first().map(|id| self.links[id.slot()].right()))
    }

    /// Point a single-valued slot at `resource`, or clear it with `None`.
    ///
    /// The previous link is disposed before the new one is created. The new
    /// link is named after the slot.
    pub fn set_ref(
        &mut self,
        owner: NodeId,
        slot: &str,
        resource: Option<NodeId>,
    ) -> Result<Option<LinkId>> {
        self.live_node(owner)?;
        let s = self.checked_slot(owner, slot, SlotKind::Ref)?;
        let name = s.name();
        let previous: SmallVec<[LinkId; 2]> = s.links().iter().copied().collect();
        if let Some(r) = resource {
            self.live_node(r)?;
        }

        self.dispose_all(&previous);
        let Some(r) = resource else {
            return Ok(None);
        };
        let id = self.create_link(name, owner, r)?;
        self.attach(owner, name, id);
        Ok(Some(id))
    }

    /// Append `resource` to a list slot.
    pub fn add_ref(&mut self, owner: NodeId, slot: &str, resource: NodeId) -> Result<LinkId> {
        let name = self.checked_slot(owner, slot, SlotKind::RefList)?.name();
        let id = self.create_link(name, owner, resource)?;
        self.attach(owner, name, id);
        Ok(id)
    }

    /// Remove every link to `resource` from a list slot.
    pub fn remove_ref(&mut self, owner: NodeId, slot: &str, resource: NodeId) -> Result<usize> {
        let s = self.checked_slot(owner, slot, SlotKind::RefList)?;
        let doomed: SmallVec<[LinkId; 2]> = s
            .links()
            .iter()
            .copied()
            .filter(|id| self.links[id.slot()].right() == resource)
            .collect();
        Ok(self.dispose_all(&doomed))
    }

    /// Resources in a list slot, in insertion order.
    pub fn list_refs(&self, owner: NodeId, slot: &str) -> Result<Vec<NodeId>> {
        let s = self.checked_slot(owner, slot, SlotKind::RefList)?;
        Ok(s.links().iter().map(|id| self.links[id.slot()].right()).collect())
    }

    fn find_keyed(&self, s: &Slot, key: &str) -> Option<LinkId> {
        s.links()
            .iter()
            .copied()
            .find(|id| self.links[id.slot()].name() == key)
    }

    /// Resource stored under `key` in a map slot.
    pub fn get_ref_map(&self, owner: NodeId, slot: &str, key: &str) -> Result<Option<NodeId>> {
        let s = self.checked_slot(owner, slot, SlotKind::RefMap)?;
        Ok(self
            .find_keyed(s, key)
            .map(|id| self.links[id.slot()].right()))
    }

    /// Store `resource` under `key` in a map slot, or clear the key with `None`.
    ///
    /// Any link already stored under `key` is disposed before the new link is
    /// created, so the slot never holds two links with the same name.
    pub fn set_ref_map(
        &mut self,
        owner: NodeId,
        slot: &str,
        key: &str,
        resource: Option<NodeId>,
    ) -> Result<Option<LinkId>> {
        self.live_node(owner)?;
        let s = self.checked_slot(owner, slot, SlotKind::RefMap)?;
        let name = s.name();
        let previous = self.find_keyed(s, key);
        if let Some(r) = resource {
            self.live_node(r)?;
        }

        if let Some(prev) = previous {
            self.dispose_link(prev)?;
        }
        let Some(r) = resource else {
            return Ok(None);
        };
        let id = self.create_link(key, owner, r)?;
        self.attach(owner, name, id);
        Ok(Some(id))
    }

    /// `(key, resource)` pairs of a map slot.
    pub fn list_ref_map(&self, owner: NodeId, slot: &str) -> Result<Vec<(&str, NodeId)>> {
        let s = self.checked_slot(owner, slot, SlotKind::RefMap)?;
        Ok(s.links()
            .iter()
            .map(|id| {
                let link = &self.links[id.slot()];
                (link.name(), link.right())
            })
            .collect())
    }
}
