use folio_collide::{Capsule, CapsuleError, SpatialIndex};
use folio_input::Direction;
use glam::Vec3;
use std::sync::Arc;

use crate::config::PhysicsConfig;
use crate::state::{CharacterState, smooth_facing};
use crate::Locomotion;

/// Capsule character driven by gravity, step hops and static collision.
///
/// The only writer of its `CharacterState`. Each `update` is one fixed
/// sub-step; the caller owns the accumulator.
#[derive(Debug, Clone)]
pub struct CharacterController {
    index: Arc<SpatialIndex>,
    config: PhysicsConfig,
    capsule: Capsule,
    state: CharacterState,
}

impl CharacterController {
    pub fn new(
        index: Arc<SpatialIndex>,
        spawn: Vec3,
        heading: f32,
        config: PhysicsConfig,
    ) -> Result<Self, CapsuleError> {
        let capsule = Capsule::standing_at(spawn, config.capsule_radius, config.capsule_height)?;
        tracing::info!(
            spawn = ?spawn,
            colliders = index.len(),
            "character controller ready"
        );
        Ok(Self {
            index,
            config,
            capsule,
            state: CharacterState::at_spawn(spawn, heading),
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn capsule(&self) -> &Capsule {
        &self.capsule
    }

    fn foot_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.config.capsule_radius, 0.0)
    }

    /// Push the capsule out of the static geometry. Returns whether any
    /// resolved contact faced up.
    fn resolve_collisions(&mut self) -> bool {
        let mut grounded = false;
        for _ in 0..self.config.resolve_iterations.max(1) {
            let Some(hit) = self.index.intersect_capsule(&self.capsule) else {
                break;
            };
            self.capsule.translate(hit.normal * hit.depth);
            if hit.normal.y > 0.0 {
                grounded = true;
            }
        }
        grounded
    }
}

impl Locomotion for CharacterController {
    fn try_move(&mut self, dir: Direction) -> bool {
        if self.state.moving {
            tracing::debug!(%dir, "step dropped while moving");
            return false;
        }
        let axis = dir.axis() * self.config.move_speed;
        self.state.velocity.x += axis.x;
        self.state.velocity.z += axis.z;
        self.state.velocity.y = self.config.jump_height;
        self.state.moving = true;
        self.state.target_angle = dir.heading();
        tracing::debug!(%dir, velocity = ?self.state.velocity, "step started");
        true
    }

    fn respawn(&mut self) {
        let spawn = self.state.spawn_position;
        // Same dimensions as at construction, so this cannot fail.
        if let Ok(capsule) =
            Capsule::standing_at(spawn, self.config.capsule_radius, self.config.capsule_height)
        {
            self.capsule = capsule;
        }
        self.state.position = spawn;
        self.state.velocity = Vec3::ZERO;
        self.state.moving = false;
        self.state.grounded = false;
        self.state.target_angle = self.config.respawn_heading;
        tracing::info!(spawn = ?spawn, "character respawned");
    }

    fn update(&mut self, dt: f32) {
        if !self.state.grounded {
            self.state.velocity.y -= self.config.gravity * dt;
        }

        if self.state.position.y < self.config.death_y {
            self.respawn();
            return;
        }

        self.capsule.translate(self.state.velocity * dt);

        // An up-facing contact while still rising only pushes the capsule out;
        // the hop ends on the way down.
        let contact_below = self.resolve_collisions();
        self.state.grounded = contact_below && self.state.velocity.y <= 0.0;
        if self.state.grounded {
            self.state.velocity.x = 0.0;
            self.state.velocity.z = 0.0;
            // Keep a one-step downward pull so the next query still touches
            // the ground without sinking past the segment.
            self.state.velocity.y = self.state.velocity.y.max(-self.config.gravity * dt);
            if self.state.moving {
                tracing::debug!(position = ?self.state.position, "landed");
            }
            self.state.moving = false;
        }

        self.state.position = self.capsule.start() - self.foot_offset();
        self.state.facing_angle = smooth_facing(
            self.state.facing_angle,
            self.state.target_angle,
            self.config.rotation_smoothing,
        );
        tracing::trace!(
            position = ?self.state.position,
            velocity = ?self.state.velocity,
            grounded = self.state.grounded,
            "physics sub-step"
        );
    }

    fn state(&self) -> &CharacterState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_collide::IndexConfig;
    use folio_common::Triangle;
    use std::f32::consts::PI;

    const DT: f32 = 0.035;

    fn floor_index() -> Arc<SpatialIndex> {
        let a = Vec3::new(-50.0, 0.0, -50.0);
        let b = Vec3::new(50.0, 0.0, -50.0);
        let c = Vec3::new(50.0, 0.0, 50.0);
        let d = Vec3::new(-50.0, 0.0, 50.0);
        let tris = vec![Triangle::new(a, c, b), Triangle::new(a, d, c)];
        Arc::new(SpatialIndex::build(tris, &IndexConfig::default()))
    }

    fn controller(index: Arc<SpatialIndex>, spawn: Vec3) -> CharacterController {
        CharacterController::new(index, spawn, -PI / 2.0, PhysicsConfig::default()).unwrap()
    }

    fn settle(c: &mut CharacterController) {
        for _ in 0..120 {
            c.update(DT);
        }
        assert!(c.state().grounded, "{:?}", c.state());
    }

    #[test]
    fn falls_and_settles_on_the_floor() {
        let mut c = controller(floor_index(), Vec3::new(1.0, 3.0, 2.0));
        settle(&mut c);
        let p = c.position();
        assert!(p.y.abs() < 1e-3, "{p:?}");
        assert!((p.x - 1.0).abs() < 1e-4 && (p.z - 2.0).abs() < 1e-4, "{p:?}");
        let depth = floor_index().intersect_capsule(c.capsule()).map_or(0.0, |h| h.depth);
        assert!(depth <= 1e-4);
    }

    #[test]
    fn step_hops_once_until_landing() {
        let mut c = controller(floor_index(), Vec3::ZERO);
        settle(&mut c);

        assert!(c.try_move(Direction::Forward));
        assert!(c.is_moving());
        assert_eq!(c.state().velocity.y, 11.0);
        assert_eq!(c.state().velocity.x, 7.0);

        // Held input while airborne is dropped.
        let mut landed_at = None;
        for step in 0..100 {
            assert!(!c.try_move(Direction::Forward) || landed_at.is_some());
            c.update(DT);
            if c.state().grounded {
                landed_at = Some(step);
                break;
            }
        }
        assert!(landed_at.is_some());
        assert!(!c.is_moving());
        assert!(c.position().x > 1.0);
        assert!(c.try_move(Direction::Forward));
    }

    #[test]
    fn landing_zeroes_horizontal_velocity_that_step() {
        let mut c = controller(floor_index(), Vec3::ZERO);
        settle(&mut c);
        c.try_move(Direction::Right);
        let mut was_grounded = true;
        for _ in 0..100 {
            c.update(DT);
            let s = c.state();
            if !was_grounded && s.grounded {
                assert_eq!(s.velocity.x, 0.0);
                assert_eq!(s.velocity.z, 0.0);
                return;
            }
            if !s.grounded {
                assert_eq!(s.velocity.z, 7.0);
            }
            was_grounded = s.grounded;
        }
        panic!("never landed");
    }

    #[test]
    fn rising_contact_does_not_end_the_hop() {
        let mut c = controller(floor_index(), Vec3::ZERO);
        settle(&mut c);
        assert!(c.try_move(Direction::Forward));
        // Sink the capsule so the first rising step still ends inside the floor,
        // as it would when hopping along an upward slope.
        c.capsule.translate(Vec3::new(0.0, -0.6, 0.0));
        c.update(DT);

        let s = c.state();
        assert!(!s.grounded, "{s:?}");
        assert!(s.moving);
        assert_eq!(s.velocity.x, 7.0);
        assert_eq!(s.velocity.y, 11.0);
        assert!(!c.try_move(Direction::Forward));
        let depth = floor_index().intersect_capsule(c.capsule()).map_or(0.0, |h| h.depth);
        assert!(depth <= 1e-4);
    }

    #[test]
    fn step_turns_toward_heading() {
        let mut c = controller(floor_index(), Vec3::ZERO);
        settle(&mut c);
        c.try_move(Direction::Right);
        for _ in 0..60 {
            c.update(DT);
        }
        assert!(shortest_arc_abs(c.facing(), PI) < 1e-3);
    }

    fn shortest_arc_abs(a: f32, b: f32) -> f32 {
        folio_common::shortest_arc(a, b).abs()
    }

    #[test]
    fn wall_blocks_horizontal_travel() {
        let mut tris = Vec::new();
        // Wall facing -X at x = 2.
        let a = Vec3::new(2.0, 0.0, -5.0);
        let b = Vec3::new(2.0, 10.0, -5.0);
        let cc = Vec3::new(2.0, 10.0, 5.0);
        let d = Vec3::new(2.0, 0.0, 5.0);
        tris.push(Triangle::new(a, cc, b));
        tris.push(Triangle::new(a, d, cc));
        tris.push(Triangle::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(50.0, 0.0, 50.0),
            Vec3::new(50.0, 0.0, -50.0),
        ));
        tris.push(Triangle::new(
            Vec3::new(-50.0, 0.0, -50.0),
            Vec3::new(-50.0, 0.0, 50.0),
            Vec3::new(50.0, 0.0, 50.0),
        ));
        let index = Arc::new(SpatialIndex::build(tris, &IndexConfig::default()));
        let mut c = controller(index, Vec3::ZERO);
        settle(&mut c);
        for _ in 0..5 {
            c.try_move(Direction::Forward);
            for _ in 0..60 {
                c.update(DT);
            }
        }
        assert!(c.position().x <= 2.0 - 0.35 + 1e-3, "{:?}", c.position());
    }

    #[test]
    fn falling_out_of_the_world_respawns() {
        let empty = Arc::new(SpatialIndex::build(Vec::new(), &IndexConfig::default()));
        let spawn = Vec3::new(3.0, 5.0, -1.0);
        let mut c = controller(empty, spawn);
        c.try_move(Direction::Left);
        let mut respawned = false;
        for _ in 0..200 {
            let before = c.position().y;
            c.update(DT);
            if before < -20.0 {
                respawned = true;
                break;
            }
        }
        assert!(respawned);
        let s = c.state();
        assert_eq!(s.position, spawn);
        assert_eq!(s.velocity, Vec3::ZERO);
        assert!(!s.moving);
        assert_eq!(s.target_angle, -PI / 2.0);
    }

    #[test]
    fn explicit_respawn_restores_spawn() {
        let mut c = controller(floor_index(), Vec3::new(0.0, 1.0, 0.0));
        settle(&mut c);
        c.try_move(Direction::Backward);
        c.update(DT);
        c.respawn();
        assert_eq!(c.position(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(c.state().velocity, Vec3::ZERO);
        assert!(!c.is_moving());
        assert!((c.capsule().start().y - 1.35).abs() < 1e-5);
    }
}
