use folio_common::{Aabb, NodeId, Ray, Triangle};
use folio_scene::SceneGraph;
use glam::{Mat4, Vec3};
use std::collections::{BTreeMap, BTreeSet};

use crate::content::{InfoContent, InteractionConfig};

/// One registered name and what clicking it does.
#[derive(Debug, Clone)]
pub struct Interactable {
    pub name: String,
    pub node: NodeId,
    /// Overlay content, if any.
    pub info: Option<InfoContent>,
    /// Direct link target; takes precedence over `info`.
    pub link: Option<String>,
    triangles: usize,
}

impl Interactable {
    /// Pickable triangles whose hits resolve to this name.
    pub fn triangle_count(&self) -> usize {
        self.triangles
    }
}

/// A mesh node inside an allow-listed subtree.
#[derive(Debug, Clone)]
struct PickTarget {
    node: NodeId,
    /// Nearest registered name at or above `node`.
    owner: String,
    /// Mesh triangles in the node's local space.
    geometry: Vec<Triangle>,
    bounds: Aabb,
}

impl PickTarget {
    /// Nearest hit of `ray` given the node's current world matrix.
    ///
    /// The ray is taken into local space without renormalizing, so the
    /// returned parameter is measured along the world ray.
    fn ray_hit(&self, world: Mat4, ray: &Ray) -> Option<f32> {
        if world.determinant().abs() <= f32::EPSILON {
            return None;
        }
        let local = ray.transformed(&world.inverse());
        self.bounds.ray_hit(&local)?;
        self.geometry
            .iter()
            .filter_map(|t| t.ray_hit(&local))
            .min_by(f32::total_cmp)
    }
}

/// Result of a pick.
#[derive(Debug, Clone, PartialEq)]
pub struct PickHit {
    /// Nearest registered name at or above the mesh that was hit.
    pub name: String,
    pub distance: f32,
    pub point: Vec3,
}

/// Name-keyed table of interactables, built once when the scene loads.
///
/// Only meshes under allow-listed nodes are ray targets. A hit resolves to
/// the closest node at or above the mesh whose name is allow-listed or a
/// direct link, so registered children win over registered ancestors and a
/// direct-link name is reachable only through allow-listed geometry.
#[derive(Debug, Clone, Default)]
pub struct InteractableRegistry {
    entries: BTreeMap<String, Interactable>,
    targets: Vec<PickTarget>,
}

impl InteractableRegistry {
    pub fn build(graph: &SceneGraph, config: &InteractionConfig) -> Self {
        let _span = tracing::info_span!("registry_build").entered();
        let mut entries = BTreeMap::new();
        let mut roots = Vec::new();

        for name in config.pickable_names() {
            let allowed = config.allow_list.iter().any(|n| n == name);
            let Some(node) = graph.find(name) else {
                if allowed {
                    tracing::warn!(name, "interactable node not found in scene");
                } else {
                    tracing::debug!(name, "direct-link node not found in scene");
                }
                continue;
            };
            if allowed {
                roots.push(node);
            }
            entries.insert(
                name.to_string(),
                Interactable {
                    name: name.to_string(),
                    node,
                    info: config.content.get(name).cloned(),
                    link: config.direct_links.get(name).cloned(),
                    triangles: 0,
                },
            );
        }

        let mut seen = BTreeSet::new();
        let mut targets = Vec::new();
        for root in roots {
            for id in graph.subtree(root) {
                if !seen.insert(id) {
                    continue;
                }
                let Some(mesh) = graph.get(id).and_then(|n| n.mesh.as_ref()) else {
                    continue;
                };
                let Some(owner) = owner_of(graph, id, &entries) else {
                    continue;
                };
                let geometry: Vec<Triangle> = mesh.triangles().collect();
                if geometry.is_empty() {
                    continue;
                }
                if let Some(entry) = entries.get_mut(&owner) {
                    entry.triangles += geometry.len();
                }
                let bounds = geometry
                    .iter()
                    .fold(Aabb::EMPTY, |acc, t| acc.union(&t.bounds()));
                targets.push(PickTarget {
                    node: id,
                    owner,
                    geometry,
                    bounds,
                });
            }
        }

        for entry in entries.values().filter(|e| e.triangles == 0) {
            tracing::debug!(name = %entry.name, "interactable has no pickable geometry");
        }
        tracing::info!(
            count = entries.len(),
            targets = targets.len(),
            "interactables registered"
        );
        Self { entries, targets }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Interactable> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interactable> {
        self.entries.values()
    }

    /// Closest pickable mesh along `ray`, evaluated at current transforms.
    /// Equal distances keep the mesh found first in scene order.
    pub fn pick(&self, graph: &SceneGraph, ray: &Ray) -> Option<PickHit> {
        let mut best: Option<(&PickTarget, f32)> = None;
        for target in &self.targets {
            let Some(t) = target.ray_hit(graph.world_matrix(target.node), ray) else {
                continue;
            };
            if best.is_none_or(|(_, bt)| t < bt) {
                best = Some((target, t));
            }
        }
        best.map(|(target, t)| PickHit {
            name: target.owner.clone(),
            distance: t,
            point: ray.at(t),
        })
    }
}

/// Walk up from `id` to the first node registered under its own name.
fn owner_of(
    graph: &SceneGraph,
    id: NodeId,
    entries: &BTreeMap<String, Interactable>,
) -> Option<String> {
    let mut cur = Some(id);
    while let Some(node_id) = cur {
        let node = graph.get(node_id)?;
        if entries.get(&node.name).is_some_and(|e| e.node == node_id) {
            return Some(node.name.clone());
        }
        cur = node.parent;
    }
    None
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use folio_common::Transform;
    use folio_scene::Mesh;

    /// Project_1 (mesh on a child) straight ahead down -Z. Project_2 to the
    /// right carries the `Scene` link sign as its only mesh. Hidden sits
    /// behind Project_1 and is not pickable.
    pub(crate) fn sample_graph() -> SceneGraph {
        let mut g = SceneGraph::new("picking");
        let p1 = g
            .add_node(
                "Project_1",
                None,
                Transform::from_position(Vec3::new(0.0, 0.0, -10.0)),
                None,
            )
            .unwrap();
        g.add_node(
            "Project_1_Board",
            Some(p1),
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            Some(Mesh::cuboid(Vec3::ONE)),
        )
        .unwrap();
        let p2 = g
            .add_node(
                "Project_2",
                None,
                Transform::from_position(Vec3::new(5.0, 0.0, -10.0)),
                None,
            )
            .unwrap();
        g.add_node(
            "Scene",
            Some(p2),
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            Some(Mesh::cuboid(Vec3::ONE)),
        )
        .unwrap();
        g.add_node(
            "Hidden",
            None,
            Transform::from_position(Vec3::new(0.0, 1.0, -20.0)),
            Some(Mesh::cuboid(Vec3::splat(3.0))),
        )
        .unwrap();
        g
    }

    /// Exporter layout: a root named `Scene` holding bare ground and an
    /// allow-listed `Shoes` mesh.
    pub(crate) fn exported_graph() -> SceneGraph {
        let mut g = SceneGraph::new("exported");
        let root = g.add_node("Scene", None, Transform::default(), None).unwrap();
        g.add_node(
            "Ground",
            Some(root),
            Transform::default(),
            Some(Mesh::quad_xz(50.0)),
        )
        .unwrap();
        g.add_node(
            "Shoes",
            Some(root),
            Transform::from_position(Vec3::new(0.0, 0.5, -10.0)),
            Some(Mesh::cuboid(Vec3::splat(0.5))),
        )
        .unwrap();
        g
    }

    fn ray_toward(target: Vec3) -> Ray {
        let origin = Vec3::new(0.0, 1.0, 0.0);
        Ray::new(origin, target - origin)
    }

    #[test]
    fn build_registers_present_names_only() {
        let reg = InteractableRegistry::build(&sample_graph(), &InteractionConfig::default());
        let names: Vec<&str> = reg.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Project_1", "Project_2", "Scene"]);
        assert_eq!(reg.get("Project_1").unwrap().triangle_count(), 12);
        assert_eq!(reg.get("Project_2").unwrap().triangle_count(), 0);
        assert_eq!(reg.get("Scene").unwrap().triangle_count(), 12);
        assert!(reg.get("Scene").unwrap().link.is_some());
        assert_eq!(reg.get("Project_1").unwrap().info.as_ref().unwrap().title, "Project One");
    }

    #[test]
    fn hit_on_child_reports_parent() {
        let g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        let hit = reg.pick(&g, &ray_toward(Vec3::new(0.0, 1.0, -10.0))).unwrap();
        assert_eq!(hit.name, "Project_1");
        assert!((hit.distance - 9.0).abs() < 1e-4);
        assert!((hit.point.z + 9.0).abs() < 1e-4);
    }

    #[test]
    fn registered_child_wins_over_registered_parent() {
        let g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        let hit = reg.pick(&g, &ray_toward(Vec3::new(5.0, 1.0, -10.0))).unwrap();
        assert_eq!(hit.name, "Scene");
    }

    #[test]
    fn non_pickable_nodes_do_not_block_or_hit() {
        let g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        // Passes beside Project_1 and into Hidden.
        assert!(reg.pick(&g, &ray_toward(Vec3::new(-2.5, 1.0, -20.0))).is_none());
    }

    #[test]
    fn exported_root_named_like_a_link_is_not_a_target() {
        let g = exported_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        assert_eq!(reg.get("Scene").unwrap().triangle_count(), 0);
        assert_eq!(reg.get("Shoes").unwrap().triangle_count(), 12);

        // Straight down onto bare ground.
        let down = Ray::new(Vec3::new(3.0, 5.0, 3.0), Vec3::NEG_Y);
        assert!(reg.pick(&g, &down).is_none());

        let hit = reg.pick(&g, &ray_toward(Vec3::new(0.0, 0.5, -10.0))).unwrap();
        assert_eq!(hit.name, "Shoes");
    }

    #[test]
    fn picking_follows_moved_nodes() {
        let mut g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        let p1 = g.find("Project_1").unwrap();
        g.set_transform(p1, Transform::from_position(Vec3::new(0.0, 0.0, -4.0)));
        let hit = reg.pick(&g, &ray_toward(Vec3::new(0.0, 1.0, -10.0))).unwrap();
        assert!((hit.distance - 3.0).abs() < 1e-4);
    }

    #[test]
    fn scaled_node_keeps_world_distances() {
        let mut g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        // Local to Project_2 at (5, 0, -10): lands at world (0, 1, -10).
        let scene = g.find("Scene").unwrap();
        g.set_transform(
            scene,
            Transform {
                position: Vec3::new(-5.0, 1.0, 0.0),
                scale: Vec3::splat(2.0),
                ..Transform::default()
            },
        );
        let p1 = g.find("Project_1").unwrap();
        g.set_transform(p1, Transform::from_position(Vec3::new(0.0, 0.0, -30.0)));
        let hit = reg.pick(&g, &ray_toward(Vec3::new(0.0, 1.0, -10.0))).unwrap();
        assert_eq!(hit.name, "Scene");
        assert!((hit.distance - 8.0).abs() < 1e-4);
    }

    #[test]
    fn nearest_wins() {
        let mut g = sample_graph();
        let reg = InteractableRegistry::build(&g, &InteractionConfig::default());
        // Put the Scene sign at world (0, 1, -5), between the eye and Project_1.
        let scene = g.find("Scene").unwrap();
        g.set_transform(scene, Transform::from_position(Vec3::new(-5.0, 1.0, 5.0)));
        let hit = reg.pick(&g, &ray_toward(Vec3::new(0.0, 1.0, -10.0))).unwrap();
        assert_eq!(hit.name, "Scene");
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }
}
