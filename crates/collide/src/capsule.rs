use folio_common::{Aabb, Triangle, closest_points_segment_segment};
use glam::Vec3;

/// Errors from building a capsule.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CapsuleError {
    #[error("capsule radius must be positive, got {0}")]
    NonPositiveRadius(f32),
    #[error("capsule end must be above its start (start.y={start}, end.y={end})")]
    NotUpright { start: f32, end: f32 },
}

/// Contact produced by a capsule query. Push the capsule by `normal * depth`
/// to separate it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub normal: Vec3,
    pub depth: f32,
}

/// Segment-with-radius collision volume.
///
/// Always upright: `end` sits directly above `start`. Only translation is
/// supported, so the invariant holds for the capsule's whole life.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capsule {
    start: Vec3,
    end: Vec3,
    radius: f32,
}

impl Capsule {
    pub fn new(start: Vec3, end: Vec3, radius: f32) -> Result<Self, CapsuleError> {
        if radius.is_nan() || radius <= 0.0 {
            return Err(CapsuleError::NonPositiveRadius(radius));
        }
        if start.y.is_nan() || end.y.is_nan() || end.y <= start.y {
            return Err(CapsuleError::NotUpright {
                start: start.y,
                end: end.y,
            });
        }
        Ok(Self { start, end, radius })
    }

    /// Capsule standing on `base`: the segment runs from `base + radius` to
    /// `base + height` along +Y.
    pub fn standing_at(base: Vec3, radius: f32, height: f32) -> Result<Self, CapsuleError> {
        Self::new(
            base + Vec3::new(0.0, radius, 0.0),
            base + Vec3::new(0.0, height, 0.0),
            radius,
        )
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.start += delta;
        self.end += delta;
    }

    /// Bounding box of the swept sphere.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points([self.start, self.end]).expanded(self.radius)
    }

    /// Penetration against one triangle, if any.
    ///
    /// When the segment pierces the triangle the contact uses the face normal
    /// and the depth of the deeper endpoint. Otherwise the contact runs from
    /// the closest point on the triangle to the closest point on the segment.
    pub fn intersect_triangle(&self, tri: &Triangle) -> Option<CollisionResult> {
        let n = tri.normal();
        if n == Vec3::ZERO {
            return None;
        }

        let ds = n.dot(self.start - tri.a);
        let de = n.dot(self.end - tri.a);
        if (ds < 0.0 && de > 0.0) || (ds > 0.0 && de < 0.0) {
            let t = ds / (ds - de);
            let pierce = self.start + (self.end - self.start) * t;
            if tri.contains_coplanar(pierce) {
                return Some(CollisionResult {
                    normal: n,
                    depth: self.radius - ds.min(de),
                });
            }
        }

        let (seg_pt, tri_pt) = self.closest_points(tri);
        let offset = seg_pt - tri_pt;
        let dist = offset.length();
        if dist >= self.radius {
            return None;
        }
        let normal = if dist > 1e-6 {
            offset / dist
        } else if ds + de >= 0.0 {
            n
        } else {
            -n
        };
        Some(CollisionResult {
            normal,
            depth: self.radius - dist,
        })
    }

    /// Closest pair (segment point, triangle point) for a non-piercing segment.
    fn closest_points(&self, tri: &Triangle) -> (Vec3, Vec3) {
        let mut best = (self.start, tri.closest_point(self.start));
        let mut best_d2 = best.0.distance_squared(best.1);

        let mut consider = |seg_pt: Vec3, tri_pt: Vec3| {
            let d2 = seg_pt.distance_squared(tri_pt);
            if d2 < best_d2 {
                best_d2 = d2;
                best = (seg_pt, tri_pt);
            }
        };

        consider(self.end, tri.closest_point(self.end));
        for (e0, e1) in tri.edges() {
            let (seg_pt, edge_pt) = closest_points_segment_segment(self.start, self.end, e0, e1);
            consider(seg_pt, edge_pt);
        }
        best
    }
}
