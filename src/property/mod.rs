//! Property layer - named, typed resources linked through the graph.
//!
//! This module provides:
//! - [`PropertyGraph`] - Owns the link graph, the property table and the root
//! - [`Property`] / [`PropertyType`] / [`PropertyBody`] - Per-node data
//! - [`Accessor`] - Typed numeric view over a flat array
//! - [`Buffer`], [`Texture`], [`Material`] - Concrete resource payloads
//! - [`ExtensionRegistry`] / [`ExtensionProperty`] - String-keyed extensions

mod accessor;
mod elements;
mod extension;
#[allow(clippy::module_inception)]
mod property;
mod property_graph;

pub use accessor::Accessor;
pub use elements::{Buffer, Material, Texture};
pub use extension::*;
pub use property::{
    Property, PropertyBody, PropertyType, SLOT_BASE_COLOR_TEXTURE, SLOT_BUFFER, SLOT_EXTENSIONS,
};
pub use property_graph::PropertyGraph;
