use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Directional sun with a shadow camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunLight {
    /// RGB hex, e.g. `0xffffff`.
    pub color: u32,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub cast_shadow: bool,
    /// Half extent of the square shadow frustum.
    pub shadow_extent: f32,
    pub shadow_map_size: u32,
    pub shadow_normal_bias: f32,
}

impl Default for SunLight {
    fn default() -> Self {
        Self {
            color: 0xffffff,
            intensity: 2.0,
            position: Vec3::new(-65.0, 250.0, -90.0),
            target: Vec3::new(-150.0, -200.0, 250.0),
            cast_shadow: true,
            shadow_extent: 450.0,
            shadow_map_size: 4096,
            shadow_normal_bias: 0.6,
        }
    }
}

impl SunLight {
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }
}

/// Scene lighting handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    pub sun: SunLight,
    pub ambient_color: u32,
    pub ambient_intensity: f32,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            sun: SunLight::default(),
            ambient_color: 0x404040,
            ambient_intensity: 4.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sun_points_down() {
        let l = LightingConfig::default();
        assert!(l.sun.direction().y < 0.0);
        assert!((l.sun.direction().length() - 1.0).abs() < 1e-5);
        assert_eq!(l.ambient_color, 0x404040);
    }

    #[test]
    fn partial_override() {
        let l: LightingConfig =
            serde_json::from_str(r#"{"sun": {"intensity": 3.5}, "ambient_intensity": 1}"#).unwrap();
        assert_eq!(l.sun.intensity, 3.5);
        assert_eq!(l.sun.shadow_map_size, 4096);
        assert_eq!(l.ambient_intensity, 1.0);
    }
}
