use folio_scene::Mesh;
use glam::Vec3;

use crate::document::{NodeDocument, SceneDocument};

/// Built-in portfolio scene used by the CLI and the session tests.
///
/// A ground slab with a wall and a raised platform for the character to
/// collide with, the character anchor with its shoes, and the interactables
/// named by the default interaction table.
pub fn demo_scene() -> SceneDocument {
    let cube = |h: f32| Mesh::cuboid(Vec3::splat(h));

    let nodes = vec![
        NodeDocument::new("Collider_Ground").with_mesh(Mesh::quad_xz(60.0)),
        NodeDocument::new("Collider_Wall")
            .at(Vec3::new(20.0, 3.0, 0.0))
            .with_mesh(Mesh::cuboid(Vec3::new(1.0, 3.0, 10.0))),
        NodeDocument::new("Collider_Platform")
            .at(Vec3::new(-10.0, 1.0, 0.0))
            .with_mesh(Mesh::cuboid(Vec3::new(3.0, 1.0, 3.0))),
        NodeDocument::new("Character").with_child(
            NodeDocument::new("Shoes")
                .at(Vec3::new(0.0, 0.25, 0.0))
                .with_mesh(Mesh::cuboid(Vec3::new(0.3, 0.25, 0.3))),
        ),
        // Hits land on the child mesh and report the parent's name.
        NodeDocument::new("Project_1")
            .at(Vec3::new(8.0, 0.0, 8.0))
            .with_child(
                NodeDocument::new("Project_1_Board")
                    .at(Vec3::new(0.0, 1.0, 0.0))
                    .with_mesh(cube(1.0)),
            ),
        NodeDocument::new("Project_2")
            .at(Vec3::new(8.0, 1.0, -8.0))
            .with_mesh(cube(1.0)),
        NodeDocument::new("Advertise")
            .at(Vec3::new(-8.0, 1.0, 8.0))
            .with_mesh(cube(1.0)),
        // The link sign hangs off the label so it sits in a pickable subtree;
        // hits on it resolve to `Scene`, not `Text002`.
        NodeDocument::new("Text002")
            .at(Vec3::new(-8.0, 1.0, -8.0))
            .with_mesh(cube(0.5))
            .with_child(
                NodeDocument::new("Scene")
                    .at(Vec3::new(8.0, 0.0, -7.0))
                    .with_mesh(Mesh::cuboid(Vec3::new(2.0, 1.0, 0.2))),
            ),
    ];

    SceneDocument {
        name: "portfolio-demo".into(),
        nodes,
    }
}
