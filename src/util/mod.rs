//! Utility types shared by the graph and accessor layers.
//!
//! This module contains fundamental types used throughout the library:
//! - [`ScalarKind`] / [`ComponentType`] / [`TypedArray`] - Numeric payloads
//! - [`ElementShape`] - Item shape (SCALAR, VEC3, MAT4, ...)
//! - [`NodeId`] / [`LinkId`] - Arena handles
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam

mod pod;
mod element_shape;
mod id;
mod error;
mod math;

pub use pod::*;
pub use element_shape::*;
pub use id::{LinkId, NodeId};
pub use error::*;
pub use math::*;
