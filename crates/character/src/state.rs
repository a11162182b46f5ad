use folio_common::{shortest_arc, wrap_angle};
use glam::Vec3;

/// Coarse movement phase derived from `grounded` and vertical velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Grounded,
    Jumping,
    Falling,
}

/// Everything observable about the character.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    /// Feet position in world space.
    pub position: Vec3,
    pub velocity: Vec3,
    /// Current yaw, always within `(-PI, PI]`.
    pub facing_angle: f32,
    pub target_angle: f32,
    pub grounded: bool,
    /// Set while a step is in flight; directional input is dropped meanwhile.
    pub moving: bool,
    pub spawn_position: Vec3,
}

impl CharacterState {
    pub fn at_spawn(spawn: Vec3, heading: f32) -> Self {
        let heading = wrap_angle(heading);
        Self {
            position: spawn,
            velocity: Vec3::ZERO,
            facing_angle: heading,
            target_angle: heading,
            grounded: false,
            moving: false,
            spawn_position: spawn,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.grounded {
            Phase::Grounded
        } else if self.velocity.y > 0.0 {
            Phase::Jumping
        } else {
            Phase::Falling
        }
    }
}

/// One smoothing step: cover `factor` of the shorter arc toward `target`.
pub fn smooth_facing(facing: f32, target: f32, factor: f32) -> f32 {
    wrap_angle(facing + factor * shortest_arc(facing, target))
}
