//! # gltf-graph
//!
//! Mutable in-memory graph of glTF properties, with typed accessors over
//! flat numeric arrays.
//!
//! Properties (buffers, accessors, textures, materials, extension properties)
//! reference each other through named links. The graph keeps the links and a
//! reverse index, so a property can be detached from everything that uses it,
//! or disposed outright, without any back-pointers stored on the property.
//!
//! ## Modules
//!
//! - [`util`] - Numeric types (typed arrays, component types, shapes), errors
//! - [`graph`] - Nodes, links, slots and the reverse index
//! - [`property`] - Properties, accessors, extensions and the root
//! - [`sync`] - Lock-protected handle for sharing a graph between threads
//!
//! ## Example
//!
//! ```ignore
//! use gltf_graph::prelude::*;
//!
//! let mut doc = PropertyGraph::new();
//! let buffer = doc.create_buffer("bin")?;
//! let positions = doc.create_accessor("POSITION", vec![0f32; 9], ElementShape::Vec3)?;
//! doc.set_accessor_buffer(positions, Some(buffer))?;
//!
//! let accessor = doc.accessor(positions).unwrap();
//! println!("{} items, min {:?}", accessor.count(), accessor.min());
//! ```

pub mod util;
pub mod graph;
pub mod property;
pub mod sync;

// Re-export commonly used types
pub use util::{ComponentType, ElementShape, Error, Result, ScalarKind, TypedArray};
pub use graph::{Graph, Link, LinkId, NodeId};
pub use property::{Accessor, PropertyGraph, PropertyType};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{
        ComponentType, DVec2, DVec3, DVec4, ElementShape, Error, Result, ScalarKind, TypedArray,
        Vec4,
    };
    pub use crate::graph::{Graph, Link, LinkId, NodeId, SlotDef, SlotKind};
    pub use crate::property::*;
    pub use crate::sync::SharedGraph;
}
