use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, PI};
use std::str::FromStr;

/// Errors from parsing input names.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("unknown direction '{0}' (expected forward, backward, left or right)")]
    UnknownDirection(String),
}

/// One of the four step directions shared by keys and on-screen buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Forward,
        Direction::Backward,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit world-space step axis.
    pub fn axis(self) -> Vec3 {
        match self {
            Direction::Forward => Vec3::X,
            Direction::Backward => Vec3::NEG_X,
            Direction::Left => Vec3::NEG_Z,
            Direction::Right => Vec3::Z,
        }
    }

    /// Yaw the character turns to when stepping this way.
    pub fn heading(self) -> f32 {
        match self {
            Direction::Forward => -FRAC_PI_2,
            Direction::Backward => FRAC_PI_2,
            Direction::Left => 0.0,
            Direction::Right => PI,
        }
    }
}

impl FromStr for Direction {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "forward" | "up" => Ok(Direction::Forward),
            "backward" | "back" | "down" => Ok(Direction::Backward),
            "left" => Ok(Direction::Left),
            "right" => Ok(Direction::Right),
            _ => Err(InputError::UnknownDirection(s.to_string())),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Direction::Forward => "forward",
            Direction::Backward => "backward",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(name)
    }
}

/// A high-level action decoded from a key press.
///
/// The session consumes actions, never raw key names, so keyboard and touch
/// buttons drive the character through the same path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Step the character one way.
    Move(Direction),
    /// Return the character to its spawn point.
    Respawn,
    /// Dismiss the info overlay.
    CloseInfo,
    /// Key with no binding.
    Noop,
}

impl Action {
    /// Decode a platform key name. Letter keys match case-insensitively.
    pub fn from_key(key: &str) -> Action {
        match key.to_ascii_lowercase().as_str() {
            "w" | "arrowup" => Action::Move(Direction::Forward),
            "s" | "arrowdown" => Action::Move(Direction::Backward),
            "a" | "arrowleft" => Action::Move(Direction::Left),
            "d" | "arrowright" => Action::Move(Direction::Right),
            "r" => Action::Respawn,
            "escape" => Action::CloseInfo,
            _ => Action::Noop,
        }
    }
}
