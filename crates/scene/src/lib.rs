//! Scene graph: the named-node hierarchy produced by asset loading.
//!
//! # Invariants
//! - Nodes are only ever appended; a `NodeId` stays valid for the graph's lifetime.
//! - A parent is always added before its children, so arena order lists parents first.
//! - After load the only mutation is `set_transform`.

mod graph;
mod mesh;
mod naming;

pub use graph::{Node, SceneError, SceneGraph};
pub use mesh::Mesh;
pub use naming::{Naming, NodeRole};

pub fn crate_info() -> &'static str {
    "folio-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
