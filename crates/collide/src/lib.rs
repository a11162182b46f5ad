//! Collision: static spatial index and the character capsule.
//!
//! # Invariants
//! - The index is built once from a triangle soup and never mutated afterwards.
//! - A query reports the deepest penetration, never the first one found.
//! - Result normals are unit length and depths are non-negative.

mod bvh;
mod capsule;

pub use bvh::{IndexConfig, IndexStats, SpatialIndex};
pub use capsule::{Capsule, CapsuleError, CollisionResult};

pub fn crate_info() -> &'static str {
    "folio-collide v0.1.0"
}
