//! Character locomotion: the capsule physics controller and the tween
//! stepping alternative, both behind [`Locomotion`].
//!
//! # Invariants
//! - The controller is the only writer of its `CharacterState`.
//! - Directional input is dropped while a step is in flight.
//! - Facing stays within `(-PI, PI]` and turns along the shorter arc.

mod config;
mod physics;
mod state;
mod tween;

pub use config::{PhysicsConfig, TweenConfig};
pub use physics::CharacterController;
pub use state::{CharacterState, Phase, smooth_facing};
pub use tween::{TweenController, ease_out_quad};

use folio_input::Direction;
use glam::Vec3;

/// A way of moving the character. The session picks one from configuration
/// and drives it without knowing which.
pub trait Locomotion: std::fmt::Debug {
    /// Start a step. Returns false when input is locked.
    fn try_move(&mut self, dir: Direction) -> bool;

    fn respawn(&mut self);

    /// Advance one fixed sub-step.
    fn update(&mut self, dt: f32);

    fn state(&self) -> &CharacterState;

    fn is_moving(&self) -> bool {
        self.state().moving
    }

    fn position(&self) -> Vec3 {
        self.state().position
    }

    fn facing(&self) -> f32 {
        self.state().facing_angle
    }
}

pub fn crate_info() -> &'static str {
    "folio-character v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("character"));
    }

    #[test]
    fn strategies_share_the_trait() {
        let index = std::sync::Arc::new(folio_collide::SpatialIndex::default());
        let movers: Vec<Box<dyn Locomotion>> = vec![
            Box::new(
                CharacterController::new(index, Vec3::ZERO, 0.0, PhysicsConfig::default())
                    .unwrap(),
            ),
            Box::new(TweenController::new(Vec3::ZERO, 0.0, TweenConfig::default())),
        ];
        for mut m in movers {
            assert!(m.try_move(Direction::Forward));
            assert!(!m.try_move(Direction::Left));
            m.respawn();
            assert!(!m.is_moving());
            assert_eq!(m.position(), Vec3::ZERO);
        }
    }
}
