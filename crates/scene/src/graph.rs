use folio_common::{NodeId, Transform, Triangle};
use glam::{Mat4, Vec3};
use std::collections::BTreeMap;

use crate::mesh::Mesh;
use crate::naming::{Naming, NodeRole};

/// Errors from building a scene graph.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("unknown parent node {0}")]
    UnknownParent(NodeId),
    #[error("invalid mesh on node '{name}': {reason}")]
    InvalidMesh { name: String, reason: String },
}

/// A single named node.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    children: Vec<NodeId>,
}

impl Node {
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// The scene graph handed over by the asset loader.
///
/// Nodes live in an append-only arena. The name index keeps the first node
/// added under each name, which for loader-built graphs is the first node in
/// traversal order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    name: String,
    nodes: Vec<Node>,
    roots: Vec<NodeId>,
    by_name: BTreeMap<String, NodeId>,
}

impl SceneGraph {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Append a node. The parent, if any, must already exist.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        parent: Option<NodeId>,
        transform: Transform,
        mesh: Option<Mesh>,
    ) -> Result<NodeId, SceneError> {
        let name = name.into();
        if let Some(p) = parent {
            if p.index() >= self.nodes.len() {
                tracing::debug!(%name, parent = %p, "rejected node with unknown parent");
                return Err(SceneError::UnknownParent(p));
            }
        }
        if let Some(m) = &mesh {
            m.validate().map_err(|reason| {
                tracing::debug!(%name, %reason, "rejected node mesh");
                SceneError::InvalidMesh {
                    name: name.clone(),
                    reason,
                }
            })?;
        }

        let id = NodeId(self.nodes.len() as u32);
        match parent {
            Some(p) => self.nodes[p.index()].children.push(id),
            None => self.roots.push(id),
        }
        self.by_name.entry(name.clone()).or_insert(id);
        self.nodes.push(Node {
            name,
            parent,
            transform,
            mesh,
            children: Vec::new(),
        });
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.by_name.get(name).copied()
    }

    /// Replace a node's local transform. Returns false for unknown ids.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> bool {
        match self.nodes.get_mut(id.index()) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    /// Local-to-world matrix, composed through the parent chain.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut m = Mat4::IDENTITY;
        let mut cur = Some(id);
        while let Some(c) = cur {
            let Some(node) = self.nodes.get(c.index()) else {
                break;
            };
            m = node.transform.to_matrix() * m;
            cur = node.parent;
        }
        m
    }

    pub fn world_position(&self, id: NodeId) -> Vec3 {
        self.world_matrix(id).transform_point3(Vec3::ZERO)
    }

    /// Depth-first pre-order over all nodes: parents before children,
    /// siblings in insertion order.
    pub fn traverse(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        for &root in &self.roots {
            self.collect_subtree(root, &mut out);
        }
        out
    }

    /// The node itself followed by all of its descendants, in pre-order.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.get(id).is_some() {
            self.collect_subtree(id, &mut out);
        }
        out
    }

    fn collect_subtree(&self, id: NodeId, out: &mut Vec<NodeId>) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            out.push(cur);
            // Reverse so the first child is visited first.
            stack.extend(self.nodes[cur.index()].children.iter().rev());
        }
    }

    /// All triangles of the subtree rooted at `id`, mapped by `space * world`.
    ///
    /// Pass `Mat4::IDENTITY` for world space, or the inverse world matrix of
    /// `id` for the root's local space.
    pub fn subtree_triangles(&self, id: NodeId, space: Mat4) -> Vec<Triangle> {
        let mut tris = Vec::new();
        for node_id in self.subtree(id) {
            let node = &self.nodes[node_id.index()];
            if let Some(mesh) = &node.mesh {
                let m = space * self.world_matrix(node_id);
                tris.extend(mesh.triangles().map(|t| t.transformed(&m)));
            }
        }
        tris
    }

    /// Topmost nodes with the given role. Nested matches are covered by their
    /// ancestor's subtree and are not repeated.
    pub fn topmost_with_role(&self, naming: &Naming, role: NodeRole) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(cur) = stack.pop() {
            let node = &self.nodes[cur.index()];
            if naming.role(&node.name) == role {
                out.push(cur);
                continue;
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }
}
