use folio_common::Ray;
use glam::{Mat4, Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Camera lens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Projection {
    /// Parallel projection. `frustum_size` is half the visible height; the
    /// visible width follows the aspect ratio.
    Orthographic { frustum_size: f32 },
    /// Vertical field of view in degrees.
    Perspective { fov_y_degrees: f32 },
}

/// Camera setup as written in configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub projection: Projection,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    /// Translate the camera with the character, keeping the initial framing.
    pub follow: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Orthographic { frustum_size: 70.0 },
            near: -30.0,
            far: 1000.0,
            position: Vec3::new(-130.0, 41.0, -315.0),
            target: Vec3::new(50.0, -150.0, -100.0),
            follow: true,
        }
    }
}

/// A look-at camera.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub projection: Projection,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl Camera {
    pub fn from_config(config: &CameraConfig, aspect: f32) -> Self {
        Self {
            projection: config.projection,
            aspect,
            near: config.near,
            far: config.far,
            position: config.position,
            target: config.target,
        }
    }

    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        } else {
            tracing::debug!(aspect, "ignored invalid aspect ratio");
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Orthographic { frustum_size } => {
                let h = frustum_size;
                let w = frustum_size * self.aspect;
                Mat4::orthographic_rh(-w, w, -h, h, self.near, self.far)
            }
            Projection::Perspective { fov_y_degrees } => Mat4::perspective_rh(
                fov_y_degrees.to_radians(),
                self.aspect,
                self.near.max(1e-3),
                self.far,
            ),
        }
    }

    /// Where a world point lands in normalized device coordinates.
    pub fn world_to_ndc(&self, point: Vec3) -> Vec3 {
        (self.projection_matrix() * self.view_matrix()).project_point3(point)
    }

    /// World-space ray through a point in normalized device coordinates.
    ///
    /// Runs from the near plane toward the far plane, so orthographic rays
    /// are parallel and perspective rays fan out from the eye.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> Ray {
        let inv = (self.projection_matrix() * self.view_matrix()).inverse();
        let near = inv.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
        let far = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        tracing::trace!(?ndc, ?near, ?far, "pointer ray");
        Ray::new(near, far - near)
    }
}

/// Keeps the camera's initial offset from a moving anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowRig {
    anchor: Vec3,
    position: Vec3,
    target: Vec3,
}

impl FollowRig {
    /// Record the framing of `camera` relative to `anchor`.
    pub fn new(camera: &Camera, anchor: Vec3) -> Self {
        Self {
            anchor,
            position: camera.position,
            target: camera.target,
        }
    }

    pub fn apply(&self, camera: &mut Camera, anchor: Vec3) {
        let delta = anchor - self.anchor;
        camera.position = self.position + delta;
        camera.target = self.target + delta;
    }
}
