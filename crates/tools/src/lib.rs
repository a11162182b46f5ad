//! Developer tooling: session inspector, node role listing, frame timing.
//!
//! # Invariants
//! - Tools only read session state; timing is the one exception and it only
//!   drives `Session::frame`.

mod inspector;
mod timer;

pub use inspector::{
    CharacterSummary, ClickBehavior, InteractableInfo, NodeInfo, SessionInspector, SessionSummary,
};
pub use timer::{FrameStats, FrameTimer};

pub fn crate_info() -> &'static str {
    "folio-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
