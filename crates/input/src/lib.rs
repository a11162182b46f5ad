//! Input mapping: platform key, pointer and touch-button events collected
//! into an intent buffer that the frame tick drains.
//!
//! # Invariants
//! - Event handlers only write the buffer; the frame tick is the only reader.
//! - Keyboard keys and on-screen buttons decode to the same `Direction`s.

pub mod action;
pub mod intent;

pub use action::{Action, Direction, InputError};
pub use intent::{FrameIntent, InputEvent, IntentBuffer, Viewport};

pub fn crate_info() -> &'static str {
    "folio-input v0.1.0"
}
