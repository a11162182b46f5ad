use folio_character::{PhysicsConfig, TweenConfig};
use folio_input::Viewport;
use folio_picking::InteractionConfig;
use folio_render::{CameraConfig, LightingConfig, Projection};
use folio_scene::Naming;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or checking a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// How the character moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementStyle {
    /// Capsule physics with gravity, hops and collision.
    #[default]
    Physics,
    /// Fixed-length animated hops without collision.
    Tween,
}

/// One description of a session: what to load, how the character moves,
/// how the scene is framed and lit, and what the pointer can interact with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Scene document to load. `None` uses the built-in demo scene.
    pub asset_path: Option<PathBuf>,
    pub naming: Naming,
    pub movement: MovementStyle,
    pub physics: PhysicsConfig,
    pub tween: TweenConfig,
    pub camera: CameraConfig,
    pub lighting: LightingConfig,
    pub interactions: InteractionConfig,
    /// Overrides the character node's position as the spawn point.
    pub spawn: Option<Vec3>,
    pub viewport: Viewport,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            asset_path: None,
            naming: Naming::default(),
            movement: MovementStyle::default(),
            physics: PhysicsConfig::default(),
            tween: TweenConfig::default(),
            camera: CameraConfig::default(),
            lighting: LightingConfig::default(),
            interactions: InteractionConfig::default(),
            spawn: None,
            viewport: Viewport::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults with the camera framed on the built-in demo scene, which is
    /// far smaller than the exported portfolio scene.
    pub fn demo() -> Self {
        Self {
            camera: CameraConfig {
                projection: Projection::Orthographic { frustum_size: 20.0 },
                position: Vec3::new(-32.0, 34.0, -38.0),
                target: Vec3::ZERO,
                ..CameraConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Read a YAML config. A relative `asset_path` resolves against the
    /// config file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&text)?;
        if let (Some(asset), Some(dir)) = (&config.asset_path, path.parent()) {
            if asset.is_relative() {
                config.asset_path = Some(dir.join(asset));
            }
        }
        tracing::info!(path = %path.display(), movement = ?config.movement, "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.physics;
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };
        if !(p.fixed_dt.is_finite() && p.fixed_dt > 0.0) {
            return invalid(format!("physics.fixed_dt must be positive, got {}", p.fixed_dt));
        }
        if !(p.capsule_radius.is_finite() && p.capsule_radius > 0.0) {
            return invalid(format!(
                "physics.capsule_radius must be positive, got {}",
                p.capsule_radius
            ));
        }
        if p.capsule_height.is_nan() || p.capsule_height <= p.capsule_radius {
            return invalid(format!(
                "physics.capsule_height ({}) must exceed capsule_radius ({})",
                p.capsule_height, p.capsule_radius
            ));
        }
        if !(p.rotation_smoothing > 0.0 && p.rotation_smoothing <= 1.0) {
            return invalid(format!(
                "physics.rotation_smoothing must be in (0, 1], got {}",
                p.rotation_smoothing
            ));
        }
        if p.max_substeps == 0 {
            return invalid("physics.max_substeps must be at least 1".into());
        }
        if self.tween.move_duration.is_nan() || self.tween.move_duration < 0.0 {
            return invalid(format!(
                "tween.move_duration must not be negative, got {}",
                self.tween.move_duration
            ));
        }
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return invalid("viewport must have a non-zero size".into());
        }
        Ok(())
    }
}
