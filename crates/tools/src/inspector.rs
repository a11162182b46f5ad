use folio_assets::AssetId;
use folio_character::Phase;
use folio_common::NodeId;
use folio_picking::Interactable;
use folio_scene::{Naming, NodeRole, SceneGraph};
use folio_session::Session;
use glam::Vec3;

/// Session inspector for developer tooling.
///
/// Read-only queries against a running session for debugging and the CLI.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let index = session.spatial_index();
        let character = session.character().map(|c| CharacterSummary {
            position: c.position,
            facing: c.facing_angle,
            phase: c.phase(),
            moving: c.moving,
        });
        SessionSummary {
            scene: session.scene().map(|g| g.name().to_string()),
            asset_id: session.asset_id(),
            nodes: session.scene().map_or(0, SceneGraph::len),
            collider_triangles: index.map_or(0, |i| i.len()),
            bvh_nodes: index.map_or(0, |i| i.stats().nodes),
            bvh_depth: index.map_or(0, |i| i.stats().depth),
            interactables: session.registry().len(),
            character,
            hovered: session.hovered().map(String::from),
            frames: session.frames(),
        }
    }

    /// Every node in traversal order with the role its name gives it.
    pub fn node_roles(graph: &SceneGraph, naming: &Naming) -> Vec<NodeInfo> {
        graph
            .traverse()
            .into_iter()
            .filter_map(|id| {
                let node = graph.get(id)?;
                Some(NodeInfo {
                    id,
                    name: node.name.clone(),
                    role: naming.role(&node.name),
                    world_position: graph.world_position(id),
                    triangles: node.mesh.as_ref().map_or(0, |m| m.triangle_count()),
                })
            })
            .collect()
    }

    /// Registered interactables and what clicking each one does.
    pub fn interactables(session: &Session) -> Vec<InteractableInfo> {
        session
            .registry()
            .iter()
            .map(InteractableInfo::from_entry)
            .collect()
    }
}

/// Character part of a summary.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterSummary {
    pub position: Vec3,
    pub facing: f32,
    pub phase: Phase,
    pub moving: bool,
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    /// `None` when the session is inert.
    pub scene: Option<String>,
    pub asset_id: Option<AssetId>,
    pub nodes: usize,
    pub collider_triangles: usize,
    pub bvh_nodes: usize,
    pub bvh_depth: usize,
    pub interactables: usize,
    pub character: Option<CharacterSummary>,
    pub hovered: Option<String>,
    pub frames: u64,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(scene) = &self.scene else {
            return write!(f, "Session: inert (no scene loaded)");
        };
        write!(
            f,
            "Session: scene='{scene}' nodes={} colliders={} bvh_nodes={} bvh_depth={} interactables={} frames={}",
            self.nodes,
            self.collider_triangles,
            self.bvh_nodes,
            self.bvh_depth,
            self.interactables,
            self.frames
        )?;
        if let Some(id) = &self.asset_id {
            write!(f, " asset={id}")?;
        }
        if let Some(c) = &self.character {
            write!(
                f,
                "\nCharacter: pos=({:.2}, {:.2}, {:.2}) facing={:.2} phase={:?} moving={}",
                c.position.x, c.position.y, c.position.z, c.facing, c.phase, c.moving
            )?;
        }
        if let Some(h) = &self.hovered {
            write!(f, "\nHovered: {h}")?;
        }
        Ok(())
    }
}

/// One node with its derived role.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub id: NodeId,
    pub name: String,
    pub role: NodeRole,
    pub world_position: Vec3,
    pub triangles: usize,
}

impl std::fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let p = self.world_position;
        write!(
            f,
            "{:<5} {:<24} {:<10} pos=({:.2}, {:.2}, {:.2}) tris={}",
            self.id,
            self.name,
            format!("{:?}", self.role),
            p.x,
            p.y,
            p.z,
            self.triangles
        )
    }
}

/// What a click on an interactable does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickBehavior {
    OpenLink(String),
    ShowInfo { title: String, link: Option<String> },
    Nothing,
}

#[derive(Debug, Clone)]
pub struct InteractableInfo {
    pub name: String,
    pub triangles: usize,
    pub behavior: ClickBehavior,
}

impl InteractableInfo {
    fn from_entry(entry: &Interactable) -> Self {
        let behavior = match (&entry.link, &entry.info) {
            (Some(url), _) => ClickBehavior::OpenLink(url.clone()),
            (None, Some(info)) => ClickBehavior::ShowInfo {
                title: info.title.clone(),
                link: info.link.clone(),
            },
            (None, None) => ClickBehavior::Nothing,
        };
        Self {
            name: entry.name.clone(),
            triangles: entry.triangle_count(),
            behavior,
        }
    }
}

impl std::fmt::Display for InteractableInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:<16} tris={:<4} ", self.name, self.triangles)?;
        match &self.behavior {
            ClickBehavior::OpenLink(url) => write!(f, "-> link {url}"),
            ClickBehavior::ShowInfo { title, link: None } => write!(f, "-> info \"{title}\""),
            ClickBehavior::ShowInfo {
                title,
                link: Some(link),
            } => write!(f, "-> info \"{title}\" ({link})"),
            ClickBehavior::Nothing => write!(f, "-> nothing"),
        }
    }
}
