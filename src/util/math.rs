//! Math type re-exports.
//!
//! Accessor element windows are read and written as double-precision `glam`
//! vectors so that 32-bit integer components survive the round trip. Material
//! factors use the single-precision types. No vector math is implemented here.

pub use glam::{DVec2, DVec3, DVec4, Vec4};
