//! Scene assets: JSON scene documents, content-addressed ids, built-in demo scene.
//!
//! Scene documents are identified by a hash of their bytes. The session
//! consumes the resulting `SceneGraph`, never raw file paths.
//!
//! # Layout
//! A document is a tree of named nodes, each with an optional local-space
//! triangle mesh. See `SceneDocument`.

mod demo;
mod document;

pub use demo::demo_scene;
pub use document::{
    AssetError, AssetId, LoadedScene, MeshDocument, NodeDocument, SceneDocument, load_scene,
};

pub fn crate_info() -> &'static str {
    "folio-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("assets"));
    }
}
