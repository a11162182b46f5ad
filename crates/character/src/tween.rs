use folio_common::{shortest_arc, wrap_angle};
use folio_input::Direction;
use glam::Vec3;

use crate::config::TweenConfig;
use crate::state::CharacterState;
use crate::Locomotion;

/// Quadratic ease-out on `[0, 1]`.
pub fn ease_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t) * (1.0 - t)
}

#[derive(Debug, Clone, Copy)]
struct Step {
    from: Vec3,
    to: Vec3,
    from_yaw: f32,
    /// Unwrapped, within PI of `from_yaw`.
    to_yaw: f32,
    elapsed: f32,
}

/// Collision-free stepping: each accepted direction animates a fixed-length
/// hop. Input is locked until the hop finishes.
#[derive(Debug, Clone)]
pub struct TweenController {
    config: TweenConfig,
    state: CharacterState,
    active: Option<Step>,
}

impl TweenController {
    pub fn new(spawn: Vec3, heading: f32, config: TweenConfig) -> Self {
        let mut state = CharacterState::at_spawn(spawn, heading);
        state.grounded = true;
        Self {
            config,
            state,
            active: None,
        }
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }

    /// Height above the step's base at normalized time `t`: up for the first
    /// half, then the same curve played back.
    fn hop_height(&self, t: f32) -> f32 {
        let u = if t < 0.5 { t * 2.0 } else { (1.0 - t) * 2.0 };
        self.config.jump_height * ease_out_quad(u)
    }
}

impl Locomotion for TweenController {
    fn try_move(&mut self, dir: Direction) -> bool {
        if self.state.moving {
            tracing::debug!(%dir, "step dropped while tweening");
            return false;
        }
        let from = self.state.position;
        let from_yaw = self.state.facing_angle;
        self.active = Some(Step {
            from,
            to: from + dir.axis() * self.config.move_distance,
            from_yaw,
            to_yaw: from_yaw + shortest_arc(from_yaw, dir.heading()),
            elapsed: 0.0,
        });
        self.state.target_angle = wrap_angle(dir.heading());
        self.state.moving = true;
        self.state.grounded = false;
        tracing::debug!(%dir, "tween step started");
        true
    }

    fn respawn(&mut self) {
        self.active = None;
        self.state = CharacterState {
            grounded: true,
            ..CharacterState::at_spawn(self.state.spawn_position, self.config.respawn_heading)
        };
        tracing::info!(spawn = ?self.state.spawn_position, "character respawned");
    }

    fn update(&mut self, dt: f32) {
        let Some(mut step) = self.active else {
            self.state.velocity = Vec3::ZERO;
            return;
        };
        step.elapsed += dt;
        let duration = self.config.move_duration;
        let t = if duration > 0.0 {
            (step.elapsed / duration).min(1.0)
        } else {
            1.0
        };

        let prev = self.state.position;
        let e = ease_out_quad(t);
        let mut pos = step.from.lerp(step.to, e);
        pos.y = step.from.y + self.hop_height(t);
        let yaw = step.from_yaw + (step.to_yaw - step.from_yaw) * e;

        if t >= 1.0 {
            self.state.position = step.to;
            self.state.facing_angle = wrap_angle(step.to_yaw);
            self.state.moving = false;
            self.state.grounded = true;
            self.active = None;
        } else {
            self.state.position = pos;
            self.state.facing_angle = wrap_angle(yaw);
            self.active = Some(step);
        }
        self.state.velocity = if dt > 0.0 {
            (self.state.position - prev) / dt
        } else {
            Vec3::ZERO
        };
    }

    fn state(&self) -> &CharacterState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn tween() -> TweenController {
        TweenController::new(Vec3::new(1.0, 2.0, 3.0), -FRAC_PI_2, TweenConfig::default())
    }

    #[test]
    fn ease_out_endpoints() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert_eq!(ease_out_quad(0.5), 0.75);
        assert_eq!(ease_out_quad(2.0), 1.0);
    }

    #[test]
    fn step_lands_one_move_distance_away() {
        let mut c = tween();
        assert!(c.try_move(Direction::Forward));
        for _ in 0..10 {
            c.update(0.025);
        }
        assert!(!c.is_moving());
        assert_eq!(c.position(), Vec3::new(11.0, 2.0, 3.0));
    }

    #[test]
    fn hop_peaks_halfway_and_returns() {
        let mut c = tween();
        c.try_move(Direction::Left);
        c.update(0.1);
        assert!((c.position().y - 4.5).abs() < 1e-4, "{:?}", c.position());
        assert!(c.is_moving());
        c.update(0.1);
        assert_eq!(c.position().y, 2.0);
    }

    #[test]
    fn input_is_locked_during_a_step() {
        let mut c = tween();
        assert!(c.try_move(Direction::Forward));
        c.update(0.05);
        assert!(!c.try_move(Direction::Backward));
        c.update(0.2);
        assert!(c.try_move(Direction::Backward));
    }

    #[test]
    fn rotation_takes_the_short_way() {
        // Facing -π/2, turning to π: a quarter turn through -π, not three quarters.
        let mut c = tween();
        c.try_move(Direction::Right);
        c.update(0.05);
        let mid = c.facing();
        assert!(mid < -FRAC_PI_2, "{mid}");
        c.update(0.2);
        assert!((c.facing() - PI).abs() < 1e-5 || (c.facing() + PI).abs() < 1e-5);
    }

    #[test]
    fn respawn_cancels_the_step() {
        let mut c = tween();
        c.try_move(Direction::Forward);
        c.update(0.05);
        c.respawn();
        assert_eq!(c.position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(!c.is_moving());
        c.update(0.2);
        assert_eq!(c.position(), Vec3::new(1.0, 2.0, 3.0));
    }
}
