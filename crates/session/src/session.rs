use folio_assets::{AssetError, AssetId, LoadedScene, demo_scene, load_scene};
use folio_character::{CharacterController, CharacterState, Locomotion, TweenController};
use folio_collide::{IndexConfig, SpatialIndex};
use folio_common::{NodeId, Transform, Triangle};
use folio_input::{FrameIntent, InputEvent, IntentBuffer, Viewport};
use folio_picking::{CursorStyle, InteractableRegistry, PickingDispatcher, UiEvent};
use folio_render::{Camera, FollowRig, RenderView, Renderer};
use folio_scene::{NodeRole, SceneGraph};
use glam::{EulerRot, Mat4, Quat};
use std::sync::Arc;

use crate::config::{MovementStyle, SessionConfig};

#[derive(Debug)]
struct CharacterRig {
    node: NodeId,
    mover: Box<dyn Locomotion>,
}

/// Everything that exists only when a scene loaded.
#[derive(Debug)]
struct Stage {
    asset_id: AssetId,
    graph: SceneGraph,
    index: Arc<SpatialIndex>,
    character: Option<CharacterRig>,
}

/// One running scene: owns the graph, the character, picking and the
/// camera, and advances them in a fixed order each frame.
///
/// A session whose scene failed to load is inert: it accepts input and
/// frames but does nothing with them.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    stage: Option<Stage>,
    picking: PickingDispatcher,
    input: IntentBuffer,
    camera: Camera,
    follow: Option<FollowRig>,
    accumulator: f32,
    frames: u64,
    last_substeps: u32,
}

impl Session {
    /// Load the configured scene (or the built-in demo) and set up a session.
    pub fn open(config: SessionConfig) -> Self {
        let loaded = match &config.asset_path {
            Some(path) => load_scene(path),
            None => LoadedScene::from_document(&demo_scene()),
        };
        Self::new(config, loaded)
    }

    pub fn new(config: SessionConfig, loaded: Result<LoadedScene, AssetError>) -> Self {
        let input = IntentBuffer::new(config.viewport);
        let mut camera = Camera::from_config(&config.camera, config.viewport.aspect());

        let loaded = match loaded {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::error!(%err, "scene load failed, session is inert");
                return Self {
                    config,
                    stage: None,
                    picking: PickingDispatcher::default(),
                    input,
                    camera,
                    follow: None,
                    accumulator: 0.0,
                    frames: 0,
                    last_substeps: 0,
                };
            }
        };

        let _span = tracing::info_span!("session_setup", scene = %loaded.graph.name()).entered();
        let LoadedScene { id, graph } = loaded;

        let colliders = graph.topmost_with_role(&config.naming, NodeRole::Collider);
        if colliders.is_empty() {
            tracing::warn!(prefix = %config.naming.collider_prefix, "scene has no collider nodes");
        }
        let triangles: Vec<Triangle> = colliders
            .iter()
            .flat_map(|&node| graph.subtree_triangles(node, Mat4::IDENTITY))
            .collect();
        let index = Arc::new(SpatialIndex::build(triangles, &IndexConfig::default()));

        let registry = InteractableRegistry::build(&graph, &config.interactions);
        let character = spawn_character(&config, &graph, &index);

        let mut follow = None;
        if let Some(rig) = &character {
            let anchor = rig.mover.position();
            if config.camera.follow {
                let rig = FollowRig::new(&camera, anchor);
                rig.apply(&mut camera, anchor);
                follow = Some(rig);
            }
        }

        tracing::info!(
            %id,
            nodes = graph.len(),
            colliders = index.len(),
            interactables = registry.len(),
            character = character.is_some(),
            "session ready"
        );

        Self {
            config,
            stage: Some(Stage {
                asset_id: id,
                graph,
                index,
                character,
            }),
            picking: PickingDispatcher::new(registry),
            input,
            camera,
            follow,
            accumulator: 0.0,
            frames: 0,
            last_substeps: 0,
        }
    }

    /// Queue a platform event for the next frame.
    pub fn handle_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Advance by `elapsed` seconds of wall time.
    ///
    /// Order: drain input, physics sub-steps, transform write-back, camera
    /// follow, picking, click dispatch.
    pub fn frame(&mut self, elapsed: f32) {
        let intent = self.input.drain();
        let Some(stage) = self.stage.as_mut() else {
            return;
        };
        let _span = tracing::info_span!("frame", n = self.frames).entered();

        if let Some(viewport) = intent.resized {
            self.camera.set_aspect(viewport.aspect());
        }
        self.picking.set_pointer(intent.pointer_ndc);
        if intent.close_info {
            self.picking.close_info();
        }

        self.last_substeps = 0;
        if let Some(rig) = stage.character.as_mut() {
            apply_movement(rig.mover.as_mut(), &intent);

            let physics = &self.config.physics;
            if elapsed.is_finite() && elapsed > 0.0 {
                self.accumulator += elapsed;
            }
            while self.accumulator >= physics.fixed_dt && self.last_substeps < physics.max_substeps
            {
                rig.mover.update(physics.fixed_dt);
                self.accumulator -= physics.fixed_dt;
                self.last_substeps += 1;
            }
            if self.accumulator >= physics.fixed_dt {
                tracing::debug!(dropped = self.accumulator, "sub-step cap reached, dropping time");
                self.accumulator = 0.0;
            }

            let state = rig.mover.state();
            write_back(&mut stage.graph, rig.node, state);
            if let Some(follow) = &self.follow {
                follow.apply(&mut self.camera, state.position);
            }
        }

        let ray = self.camera.ray_from_ndc(intent.pointer_ndc);
        self.picking.update(&stage.graph, &ray);
        for _ in 0..intent.clicks {
            self.picking.click();
        }

        self.frames += 1;
    }

    /// Take the UI events raised since the last drain, in order.
    pub fn drain_ui_events(&mut self) -> Vec<UiEvent> {
        self.picking.drain_events()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn is_inert(&self) -> bool {
        self.stage.is_none()
    }

    pub fn asset_id(&self) -> Option<AssetId> {
        self.stage.as_ref().map(|s| s.asset_id)
    }

    pub fn scene(&self) -> Option<&SceneGraph> {
        self.stage.as_ref().map(|s| &s.graph)
    }

    pub fn spatial_index(&self) -> Option<&SpatialIndex> {
        self.stage.as_ref().map(|s| s.index.as_ref())
    }

    pub fn registry(&self) -> &InteractableRegistry {
        self.picking.registry()
    }

    pub fn character(&self) -> Option<&CharacterState> {
        self.stage
            .as_ref()
            .and_then(|s| s.character.as_ref())
            .map(|rig| rig.mover.state())
    }

    pub fn hovered(&self) -> Option<&str> {
        self.picking.hovered()
    }

    pub fn cursor(&self) -> CursorStyle {
        self.picking.cursor()
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.input.viewport()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Physics sub-steps run by the last frame.
    pub fn last_substeps(&self) -> u32 {
        self.last_substeps
    }

    pub fn render_view(&self) -> RenderView {
        RenderView {
            camera: self.camera,
            lighting: self.config.lighting.clone(),
            hovered: self.picking.hovered().map(String::from),
        }
    }

    /// Draw the current frame. Inert sessions have nothing to draw.
    pub fn render<R: Renderer>(&self, renderer: &R) -> Option<R::Output> {
        let graph = self.scene()?;
        Some(renderer.render(graph, &self.render_view()))
    }
}

fn spawn_character(
    config: &SessionConfig,
    graph: &SceneGraph,
    index: &Arc<SpatialIndex>,
) -> Option<CharacterRig> {
    let Some(node) = graph.find(&config.naming.character) else {
        tracing::warn!(name = %config.naming.character, "no character node, movement disabled");
        return None;
    };
    let spawn = config.spawn.unwrap_or_else(|| graph.world_position(node));
    let heading = graph
        .get(node)
        .map_or(0.0, |n| n.transform.rotation.to_euler(EulerRot::YXZ).0);

    let mover: Box<dyn Locomotion> = match config.movement {
        MovementStyle::Physics => {
            match CharacterController::new(Arc::clone(index), spawn, heading, config.physics.clone())
            {
                Ok(controller) => Box::new(controller),
                Err(err) => {
                    tracing::error!(%err, "character capsule rejected, movement disabled");
                    return None;
                }
            }
        }
        MovementStyle::Tween => Box::new(TweenController::new(spawn, heading, config.tween.clone())),
    };
    Some(CharacterRig { node, mover })
}

fn apply_movement(mover: &mut dyn Locomotion, intent: &FrameIntent) {
    if intent.respawn {
        mover.respawn();
    }
    for &dir in &intent.moves {
        mover.try_move(dir);
    }
    if !mover.is_moving() {
        if let Some(&dir) = intent.held.first() {
            mover.try_move(dir);
        }
    }
}

/// Copy the character's world position and facing onto its node.
fn write_back(graph: &mut SceneGraph, node: NodeId, state: &CharacterState) {
    let Some(current) = graph.get(node) else {
        return;
    };
    let position = match current.parent {
        Some(parent) => graph
            .world_matrix(parent)
            .inverse()
            .transform_point3(state.position),
        None => state.position,
    };
    let transform = Transform {
        position,
        rotation: Quat::from_rotation_y(state.facing_angle),
        scale: current.transform.scale,
    };
    graph.set_transform(node, transform);
}
