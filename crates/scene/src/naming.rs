use serde::{Deserialize, Serialize};

/// Role a node plays, derived from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRole {
    /// Static geometry the character collides with.
    Collider,
    /// Anchor node the character controller drives.
    Character,
    /// Anything else: rendered only (interactables are decided by the registry).
    Visual,
}

/// Name conventions the exporter uses to mark special nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Naming {
    /// Exact name of the character anchor node.
    pub character: String,
    /// Any node whose name starts with this prefix is collision geometry.
    pub collider_prefix: String,
}

impl Default for Naming {
    fn default() -> Self {
        Self {
            character: "Character".into(),
            collider_prefix: "Collider".into(),
        }
    }
}

impl Naming {
    pub fn role(&self, name: &str) -> NodeRole {
        if name == self.character {
            NodeRole::Character
        } else if !self.collider_prefix.is_empty() && name.starts_with(&self.collider_prefix) {
            NodeRole::Collider
        } else {
            NodeRole::Visual
        }
    }
}
