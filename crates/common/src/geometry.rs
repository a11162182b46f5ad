use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

const EPS: f32 = 1e-8;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any `grow` call will replace.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_points<I: IntoIterator<Item = Vec3>>(points: I) -> Self {
        let mut b = Self::EMPTY;
        for p in points {
            b.grow(p);
        }
        b
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    pub fn grow(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn expanded(&self, margin: f32) -> Aabb {
        Aabb {
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y
            || self.max.z < other.min.z
            || self.min.z > other.max.z)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Index (0 = x, 1 = y, 2 = z) of the widest axis.
    pub fn longest_axis(&self) -> usize {
        let e = self.extent();
        if e.x >= e.y && e.x >= e.z {
            0
        } else if e.y >= e.z {
            1
        } else {
            2
        }
    }

    /// Bounds of this box after an affine transform (all eight corners).
    pub fn transformed(&self, m: &Mat4) -> Aabb {
        if self.is_empty() {
            return *self;
        }
        let (lo, hi) = (self.min, self.max);
        Aabb::from_points((0..8).map(|i| {
            let corner = Vec3::new(
                if i & 1 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 4 == 0 { lo.z } else { hi.z },
            );
            m.transform_point3(corner)
        }))
    }

    /// Slab test. Returns the entry parameter along `ray` (0 when the origin is inside).
    pub fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        if self.is_empty() {
            return None;
        }
        let inv = ray.direction.recip();
        let t1 = (self.min - ray.origin) * inv;
        let t2 = (self.max - ray.origin) * inv;
        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();
        if t_far < 0.0 || t_near > t_far {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// A ray with an origin and a direction.
///
/// `Ray::new` normalizes the direction. `transformed` deliberately keeps the
/// transformed direction unnormalized so hit parameters stay comparable
/// across spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    pub fn transformed(&self, m: &Mat4) -> Ray {
        Ray {
            origin: m.transform_point3(self.origin),
            direction: m.transform_vector3(self.direction),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub a: Vec3,
    pub b: Vec3,
    pub c: Vec3,
}

impl Triangle {
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Unit face normal following counter-clockwise winding. Zero for degenerate triangles.
    pub fn normal(&self) -> Vec3 {
        (self.b - self.a).cross(self.c - self.a).normalize_or_zero()
    }

    pub fn area(&self) -> f32 {
        (self.b - self.a).cross(self.c - self.a).length() * 0.5
    }

    pub fn is_degenerate(&self) -> bool {
        self.area() <= 1e-10
    }

    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points([self.a, self.b, self.c])
    }

    pub fn transformed(&self, m: &Mat4) -> Triangle {
        Triangle {
            a: m.transform_point3(self.a),
            b: m.transform_point3(self.b),
            c: m.transform_point3(self.c),
        }
    }

    pub fn edges(&self) -> [(Vec3, Vec3); 3] {
        [(self.a, self.b), (self.b, self.c), (self.c, self.a)]
    }

    /// Closest point on the triangle to `p` (Voronoi region walk).
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        let (a, b, c) = (self.a, self.b, self.c);
        let ab = b - a;
        let ac = c - a;
        let ap = p - a;
        let d1 = ab.dot(ap);
        let d2 = ac.dot(ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(bp);
        let d4 = ac.dot(bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(cp);
        let d6 = ac.dot(cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }

    /// Whether `p`, assumed on the triangle's plane, lies inside the triangle.
    pub fn contains_coplanar(&self, p: Vec3) -> bool {
        let n = (self.b - self.a).cross(self.c - self.a);
        let e0 = (self.b - self.a).cross(p - self.a).dot(n);
        let e1 = (self.c - self.b).cross(p - self.b).dot(n);
        let e2 = (self.a - self.c).cross(p - self.c).dot(n);
        e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0
    }

    /// Double-sided ray intersection. Returns the ray parameter of the hit.
    pub fn ray_hit(&self, ray: &Ray) -> Option<f32> {
        let e1 = self.b - self.a;
        let e2 = self.c - self.a;
        let pvec = ray.direction.cross(e2);
        let det = e1.dot(pvec);
        if det.abs() < EPS {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.origin - self.a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(e1);
        let v = ray.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(qvec) * inv_det;
        (t >= 0.0).then_some(t)
    }
}

/// Closest points between segments `p1q1` and `p2q2`.
pub fn closest_points_segment_segment(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let f = d2.dot(r);

    if a <= EPS && e <= EPS {
        return (p1, p2);
    }

    let (s, t);
    if a <= EPS {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e <= EPS {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let mut s_tmp = if denom > EPS {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let mut t_tmp = (b * s_tmp + f) / e;
            if t_tmp < 0.0 {
                t_tmp = 0.0;
                s_tmp = (-c / a).clamp(0.0, 1.0);
            } else if t_tmp > 1.0 {
                t_tmp = 1.0;
                s_tmp = ((b - c) / a).clamp(0.0, 1.0);
            }
            s = s_tmp;
            t = t_tmp;
        }
    }
    (p1 + d1 * s, p2 + d2 * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor_tri() -> Triangle {
        // Counter-clockwise seen from +Y, so the normal points up.
        Triangle::new(
            Vec3::new(-1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, -1.0),
        )
    }

    #[test]
    fn triangle_normal_points_up() {
        let n = floor_tri().normal();
        assert!((n - Vec3::Y).length() < 1e-6, "{n}");
    }

    #[test]
    fn closest_point_inside_projects_onto_plane() {
        let p = floor_tri().closest_point(Vec3::new(0.0, 2.0, 0.0));
        assert!((p - Vec3::ZERO).length() < 1e-6);
    }

    #[test]
    fn closest_point_outside_clamps_to_vertex() {
        let p = floor_tri().closest_point(Vec3::new(-5.0, 1.0, -5.0));
        assert!((p - Vec3::new(-1.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn ray_hits_triangle_from_above_and_below() {
        let tri = floor_tri();
        let down = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        assert!((tri.ray_hit(&down).unwrap() - 5.0).abs() < 1e-5);
        let up = Ray::new(Vec3::new(0.0, -2.0, 0.0), Vec3::Y);
        assert!((tri.ray_hit(&up).unwrap() - 2.0).abs() < 1e-5);
        let away = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(tri.ray_hit(&away).is_none());
    }

    #[test]
    fn aabb_ray_slab() {
        let b = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let r = Ray::new(Vec3::new(-5.0, 0.0, 0.0), Vec3::X);
        assert!((b.ray_hit(&r).unwrap() - 4.0).abs() < 1e-5);
        let miss = Ray::new(Vec3::new(-5.0, 3.0, 0.0), Vec3::X);
        assert!(b.ray_hit(&miss).is_none());
        let inside = Ray::new(Vec3::ZERO, Vec3::Z);
        assert_eq!(inside.origin, Vec3::ZERO);
        assert_eq!(b.ray_hit(&inside), Some(0.0));
    }

    #[test]
    fn transformed_ray_keeps_parameter() {
        let m = Mat4::from_scale(Vec3::splat(2.0));
        let r = Ray::new(Vec3::new(0.0, 10.0, 0.0), -Vec3::Y);
        let local = r.transformed(&m.inverse());
        let tri = floor_tri();
        let t = tri.ray_hit(&local).unwrap();
        assert!((t - 10.0).abs() < 1e-4);
    }

    #[test]
    fn empty_aabb_grows() {
        let mut b = Aabb::EMPTY;
        assert!(b.is_empty());
        b.grow(Vec3::ONE);
        assert!(!b.is_empty());
        assert_eq!(b.center(), Vec3::ONE);
    }

    #[test]
    fn segment_segment_crossing() {
        let (a, b) = closest_points_segment_segment(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 1.0, 1.0),
        );
        assert!((a - Vec3::ZERO).length() < 1e-6);
        assert!((b - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn segment_segment_parallel() {
        let (a, b) = closest_points_segment_segment(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        );
        assert!(((a - b).length() - 1.0).abs() < 1e-6);
    }
}
