use folio_common::Transform;
use folio_scene::{Mesh, SceneError, SceneGraph};
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::Path;

/// Content-addressed asset ID computed from the document bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        AssetId(u64::from_le_bytes(head))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("scene graph error: {0}")]
    Scene(#[from] SceneError),
    #[error("scene document has no nodes")]
    Empty,
}

/// Mesh as stored in a document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDocument {
    pub positions: Vec<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub indices: Vec<u32>,
}

impl From<Mesh> for MeshDocument {
    fn from(m: Mesh) -> Self {
        Self {
            positions: m.positions,
            indices: m.indices,
        }
    }
}

fn identity_rotation() -> Quat {
    Quat::IDENTITY
}

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

fn is_identity_rotation(q: &Quat) -> bool {
    *q == Quat::IDENTITY
}

fn is_unit_scale(s: &Vec3) -> bool {
    *s == Vec3::ONE
}

/// One node of a scene document. All fields but `name` are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDocument {
    pub name: String,
    #[serde(default)]
    pub translation: Vec3,
    #[serde(default = "identity_rotation", skip_serializing_if = "is_identity_rotation")]
    pub rotation: Quat,
    #[serde(default = "unit_scale", skip_serializing_if = "is_unit_scale")]
    pub scale: Vec3,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<MeshDocument>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDocument>,
}

impl NodeDocument {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn at(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh.into());
        self
    }

    pub fn with_child(mut self, child: NodeDocument) -> Self {
        self.children.push(child);
        self
    }

    fn transform(&self) -> Transform {
        Transform {
            position: self.translation,
            rotation: self.rotation.normalize(),
            scale: self.scale,
        }
    }
}

/// A whole scene as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDocument {
    #[serde(default)]
    pub name: String,
    pub nodes: Vec<NodeDocument>,
}

impl SceneDocument {
    pub fn from_json_str(s: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json_string(&self) -> Result<String, AssetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Build the scene graph. Nodes are added in document pre-order.
    pub fn to_graph(&self) -> Result<SceneGraph, AssetError> {
        if self.nodes.is_empty() {
            return Err(AssetError::Empty);
        }
        let mut graph = SceneGraph::new(self.name.clone());
        let mut stack: Vec<(&NodeDocument, Option<folio_common::NodeId>)> =
            self.nodes.iter().rev().map(|n| (n, None)).collect();
        while let Some((doc, parent)) = stack.pop() {
            let mesh = doc
                .mesh
                .as_ref()
                .map(|m| Mesh::new(m.positions.clone(), m.indices.clone()));
            let id = graph.add_node(doc.name.clone(), parent, doc.transform(), mesh)?;
            stack.extend(doc.children.iter().rev().map(|c| (c, Some(id))));
        }
        Ok(graph)
    }
}

/// A loaded scene plus the id of the bytes it came from.
#[derive(Debug, Clone)]
pub struct LoadedScene {
    pub id: AssetId,
    pub graph: SceneGraph,
}

impl LoadedScene {
    pub fn from_document(doc: &SceneDocument) -> Result<Self, AssetError> {
        let json = doc.to_json_string()?;
        Ok(Self {
            id: AssetId::of_bytes(json.as_bytes()),
            graph: doc.to_graph()?,
        })
    }
}

/// Read and parse a scene document from disk.
pub fn load_scene(path: impl AsRef<Path>) -> Result<LoadedScene, AssetError> {
    let path = path.as_ref();
    let _span = tracing::info_span!("load_scene", path = %path.display()).entered();
    let bytes = std::fs::read(path)?;
    let id = AssetId::of_bytes(&bytes);
    let doc: SceneDocument = serde_json::from_slice(&bytes)?;
    let graph = doc.to_graph()?;
    tracing::info!(%id, nodes = graph.len(), "scene loaded");
    Ok(LoadedScene { id, graph })
}
