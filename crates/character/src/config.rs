use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

/// Tunables for the capsule physics controller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration, units/s².
    pub gravity: f32,
    /// Upward velocity applied by each step's hop.
    pub jump_height: f32,
    /// Horizontal speed added along the step axis.
    pub move_speed: f32,
    pub capsule_radius: f32,
    /// Top of the capsule segment above the feet.
    pub capsule_height: f32,
    /// Falling below this height triggers a respawn.
    pub death_y: f32,
    /// Fixed sub-step length in seconds.
    pub fixed_dt: f32,
    /// Fraction of the remaining turn covered each sub-step.
    pub rotation_smoothing: f32,
    /// Heading restored on respawn.
    pub respawn_heading: f32,
    /// Sub-steps run per frame at most; surplus time is dropped.
    pub max_substeps: u32,
    /// Collision queries per sub-step.
    pub resolve_iterations: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            jump_height: 11.0,
            move_speed: 7.0,
            capsule_radius: 0.35,
            capsule_height: 1.0,
            death_y: -20.0,
            fixed_dt: 0.035,
            rotation_smoothing: 0.2,
            respawn_heading: -FRAC_PI_2,
            max_substeps: 5,
            resolve_iterations: 4,
        }
    }
}

/// Tunables for the tween stepping strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TweenConfig {
    /// Distance covered by one step.
    pub move_distance: f32,
    /// Peak height of the hop.
    pub jump_height: f32,
    /// Seconds per step. The hop rises for half of it and falls for the rest.
    pub move_duration: f32,
    pub respawn_heading: f32,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self {
            move_distance: 10.0,
            jump_height: 2.5,
            move_duration: 0.2,
            respawn_heading: -FRAC_PI_2,
        }
    }
}
