use folio_scene::SceneGraph;
use std::fmt::Write;

use crate::camera::{Camera, Projection};
use crate::lighting::LightingConfig;

/// What to draw a frame with.
#[derive(Debug, Clone)]
pub struct RenderView {
    pub camera: Camera,
    pub lighting: LightingConfig,
    /// Name of the interactable under the pointer, drawn highlighted.
    pub hovered: Option<String>,
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph and a view, then produces output. It
/// never mutates the graph.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Human-readable frame dump for the CLI, logs and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        let cam = &view.camera;
        let lens = match cam.projection {
            Projection::Orthographic { frustum_size } => format!("ortho size={frustum_size:.0}"),
            Projection::Perspective { fov_y_degrees } => format!("persp fov={fov_y_degrees:.0}"),
        };
        // Writing to a String cannot fail.
        let _ = writeln!(out, "=== Scene '{}' ({} nodes) ===", scene.name(), scene.len());
        let _ = writeln!(
            out,
            "Camera: {lens} eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) aspect={:.2}",
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.target.x,
            cam.target.y,
            cam.target.z,
            cam.aspect,
        );
        let sun = &view.lighting.sun;
        let _ = writeln!(
            out,
            "Sun: #{:06x} x{:.1} dir=({:.2}, {:.2}, {:.2}) ambient=#{:06x} x{:.1}",
            sun.color,
            sun.intensity,
            sun.direction().x,
            sun.direction().y,
            sun.direction().z,
            view.lighting.ambient_color,
            view.lighting.ambient_intensity,
        );

        for id in scene.traverse() {
            let Some(node) = scene.get(id) else {
                continue;
            };
            let p = scene.world_position(id);
            let marker = if view.hovered.as_deref() == Some(node.name.as_str()) {
                '*'
            } else {
                ' '
            };
            let tris = node.mesh.as_ref().map_or(0, |m| m.triangle_count());
            let _ = writeln!(
                out,
                "{marker} {id:<5} {:<24} pos=({:.2}, {:.2}, {:.2}) tris={tris}",
                node.name, p.x, p.y, p.z
            );
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraConfig;
    use folio_common::Transform;
    use folio_scene::Mesh;
    use glam::Vec3;

    fn view(hovered: Option<&str>) -> RenderView {
        RenderView {
            camera: Camera::from_config(&CameraConfig::default(), 1.0),
            lighting: LightingConfig::default(),
            hovered: hovered.map(String::from),
        }
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = SceneGraph::new("empty");
        let output = DebugTextRenderer::new().render(&scene, &view(None));
        assert!(output.contains("Scene 'empty' (0 nodes)"));
        assert!(output.contains("ortho size=70"));
        assert!(output.contains("#404040"));
    }

    #[test]
    fn debug_renderer_lists_nodes_with_world_positions() {
        let mut scene = SceneGraph::new("s");
        let parent = scene
            .add_node("Project_1", None, Transform::from_position(Vec3::X), None)
            .unwrap();
        scene
            .add_node(
                "Board",
                Some(parent),
                Transform::from_position(Vec3::Y),
                Some(Mesh::cuboid(Vec3::ONE)),
            )
            .unwrap();
        let output = DebugTextRenderer::new().render(&scene, &view(Some("Project_1")));
        assert!(output.contains("(2 nodes)"));
        assert!(output.contains("pos=(1.00, 1.00, 0.00) tris=12"));
        assert!(output.lines().any(|l| l.starts_with('*') && l.contains("Project_1")));
        assert!(output.lines().any(|l| l.starts_with(' ') && l.contains("Board")));
    }
}
