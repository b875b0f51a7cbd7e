//! Graph nodes and their relation slots.
//!
//! A node registers every relation it owns when it is created. The graph uses
//! those slots to drop a link from its owner when the link is disposed, so no
//! runtime introspection of node payloads is ever needed.

use super::{LinkId, NodeId};
use smallvec::SmallVec;

/// How many live links a slot may hold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// At most one link; setting a new resource replaces the old link.
    Ref,
    /// Ordered list of links.
    RefList,
    /// Links keyed by link name, at most one per name.
    RefMap,
}

impl SlotKind {
    /// Human-readable kind name, used in error messages.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ref => "ref",
            Self::RefList => "ref list",
            Self::RefMap => "ref map",
        }
    }
}

/// Slot declaration passed to [`Graph::create_node`](super::Graph::create_node).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotDef {
    pub name: &'static str,
    pub kind: SlotKind,
}

impl SlotDef {
    /// Single-reference slot.
    pub const fn one(name: &'static str) -> Self {
        Self { name, kind: SlotKind::Ref }
    }

    /// Ordered list slot. The same resource may appear more than once.
    pub const fn list(name: &'static str) -> Self {
        Self { name, kind: SlotKind::RefList }
    }

    /// Keyed slot; the link name is the key.
    pub const fn map(name: &'static str) -> Self {
        Self { name, kind: SlotKind::RefMap }
    }
}

/// A named relation owned by a node.
#[derive(Clone, Debug)]
pub struct Slot {
    name: &'static str,
    kind: SlotKind,
    links: SmallVec<[LinkId; 2]>,
}

impl Slot {
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// Live links held by this slot, in insertion order.
    #[inline]
    pub fn links(&self) -> &[LinkId] {
        &self.links
    }

    pub(crate) fn push(&mut self, link: LinkId) {
        self.links.push(link);
    }

    pub(crate) fn remove(&mut self, link: LinkId) -> bool {
        if let Some(pos) = self.links.iter().position(|l| *l == link) {
            self.links.remove(pos);
            true
        } else {
            false
        }
    }
}

/// Base graph participant.
///
/// Holds the outgoing links it created, grouped into slots where the link was
/// attached through one. Incoming links are never stored here.
#[derive(Clone, Debug)]
pub struct GraphNode {
    id: NodeId,
    slots: SmallVec<[Slot; 4]>,
    outgoing: SmallVec<[LinkId; 4]>,
    disposed: bool,
}

impl GraphNode {
    pub(crate) fn new(id: NodeId, slots: &[SlotDef]) -> Self {
        Self {
            id,
            slots: slots
                .iter()
                .map(|def| Slot {
                    name: def.name,
                    kind: def.kind,
                    links: SmallVec::new(),
                })
                .collect(),
            outgoing: SmallVec::new(),
            disposed: false,
        }
    }

    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// All live outgoing links, in creation order.
    #[inline]
    pub fn outgoing(&self) -> &[LinkId] {
        &self.outgoing
    }

    /// Get a slot by name.
    pub fn slot(&self, name: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.name == name)
    }

    /// Iterate over registered slots.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub(crate) fn slot_mut(&mut self, name: &str) -> Option<&mut Slot> {
        self.slots.iter_mut().find(|s| s.name == name)
    }

    pub(crate) fn push_outgoing(&mut self, link: LinkId) {
        self.outgoing.push(link);
    }

    /// Forget a link from the outgoing set and from whichever slot holds it.
    pub(crate) fn forget(&mut self, link: LinkId) {
        if let Some(pos) = self.outgoing.iter().position(|l| *l == link) {
            self.outgoing.remove(pos);
        }
        for slot in &mut self.slots {
            if slot.remove(link) {
                break;
            }
        }
    }

    pub(crate) fn mark_disposed(&mut self) {
        self.disposed = true;
    }
}
