//! Session: loads a scene, wires the character, picking and camera to it,
//! and runs the per-frame loop.
//!
//! # Invariants
//! - Input handlers only write the intent buffer; `frame` is the only reader.
//! - Each frame runs input, physics, write-back, camera, picking, clicks in that order.
//! - Physics advances in fixed sub-steps, capped per frame.
//! - A failed load yields an inert session, never a panic.

mod config;
mod session;

pub use config::{ConfigError, MovementStyle, SessionConfig};
pub use folio_input::{Direction, InputEvent};
pub use folio_picking::{CursorStyle, UiEvent};
pub use session::Session;

pub fn crate_info() -> &'static str {
    "folio-session v0.1.0"
}
