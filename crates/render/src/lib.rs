//! Rendering adapter: camera, lighting parameters and a renderer-agnostic
//! interface.
//!
//! # Invariants
//! - Renderers read the scene graph; they never mutate it.
//! - Picking rays come from the same camera the frame is drawn with.
//!
//! Only a debug text backend ships here. The trait is the seam a GPU
//! backend plugs into without changing the session.

mod camera;
mod lighting;
mod renderer;

pub use camera::{Camera, CameraConfig, FollowRig, Projection};
pub use lighting::{LightingConfig, SunLight};
pub use renderer::{DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    "folio-render v0.1.0"
}
