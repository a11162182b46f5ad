//! Shared types and geometry helpers used by every folio crate.
//!
//! # Invariants
//! - Everything here is plain data or pure functions; no crate state lives here.
//! - Angles are radians; wrapped angles lie in `(-PI, PI]`.

mod angle;
mod geometry;
mod types;

pub use angle::{shortest_arc, wrap_angle};
pub use geometry::{Aabb, Ray, Triangle, closest_points_segment_segment};
pub use types::{NodeId, Transform};

pub fn crate_info() -> &'static str {
    "folio-common v0.1.0"
}
