use folio_common::{Aabb, Triangle};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Triangle mesh in the owning node's local space.
///
/// An empty index list means `positions` is a plain triangle list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    #[serde(default)]
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    /// Axis-aligned box mesh centred on the origin, 12 outward-facing triangles.
    pub fn cuboid(half_extents: Vec3) -> Self {
        let h = half_extents;
        let positions = vec![
            Vec3::new(-h.x, -h.y, -h.z),
            Vec3::new(h.x, -h.y, -h.z),
            Vec3::new(h.x, h.y, -h.z),
            Vec3::new(-h.x, h.y, -h.z),
            Vec3::new(-h.x, -h.y, h.z),
            Vec3::new(h.x, -h.y, h.z),
            Vec3::new(h.x, h.y, h.z),
            Vec3::new(-h.x, h.y, h.z),
        ];
        #[rustfmt::skip]
        let indices = vec![
            0, 2, 1, 0, 3, 2, // -z
            4, 5, 6, 4, 6, 7, // +z
            0, 1, 5, 0, 5, 4, // -y
            3, 7, 6, 3, 6, 2, // +y
            0, 4, 7, 0, 7, 3, // -x
            1, 2, 6, 1, 6, 5, // +x
        ];
        Self { positions, indices }
    }

    /// Upward-facing square in the XZ plane.
    pub fn quad_xz(half_size: f32) -> Self {
        let s = half_size;
        Self {
            positions: vec![
                Vec3::new(-s, 0.0, -s),
                Vec3::new(s, 0.0, -s),
                Vec3::new(s, 0.0, s),
                Vec3::new(-s, 0.0, s),
            ],
            indices: vec![0, 2, 1, 0, 3, 2],
        }
    }

    pub fn triangle_count(&self) -> usize {
        if self.indices.is_empty() {
            self.positions.len() / 3
        } else {
            self.indices.len() / 3
        }
    }

    /// Check index ranges and triangle-list lengths.
    pub fn validate(&self) -> Result<(), String> {
        if self.positions.iter().any(|p| !p.is_finite()) {
            return Err("non-finite vertex position".into());
        }
        if self.indices.is_empty() {
            if self.positions.len() % 3 != 0 {
                return Err(format!(
                    "non-indexed mesh has {} positions, not a multiple of 3",
                    self.positions.len()
                ));
            }
            return Ok(());
        }
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "index count {} is not a multiple of 3",
                self.indices.len()
            ));
        }
        if let Some(bad) = self
            .indices
            .iter()
            .find(|&&i| i as usize >= self.positions.len())
        {
            return Err(format!(
                "index {bad} out of range for {} positions",
                self.positions.len()
            ));
        }
        Ok(())
    }

    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        let count = self.triangle_count();
        (0..count).map(move |i| {
            let (a, b, c) = if self.indices.is_empty() {
                (3 * i, 3 * i + 1, 3 * i + 2)
            } else {
                (
                    self.indices[3 * i] as usize,
                    self.indices[3 * i + 1] as usize,
                    self.indices[3 * i + 2] as usize,
                )
            };
            Triangle::new(self.positions[a], self.positions[b], self.positions[c])
        })
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter().copied())
    }
}
