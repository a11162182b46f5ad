//! Pointer picking: which interactable sits under the pointer, and what a
//! click on it should do.
//!
//! # Invariants
//! - The registry is built once at load and read-only afterwards.
//! - Only meshes under allow-listed nodes are hit-tested, against current
//!   world transforms, nearest first.
//! - A hit reports the nearest registered name at or above the mesh.
//! - Direct links win over overlay content.

mod content;
mod dispatcher;
mod registry;

pub use content::{InfoContent, InteractionConfig};
pub use dispatcher::{CursorStyle, PickingDispatcher, PointerState, UiEvent};
pub use registry::{InteractableRegistry, Interactable, PickHit};

pub fn crate_info() -> &'static str {
    "folio-picking v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("picking"));
    }
}
