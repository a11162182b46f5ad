use folio_common::{Aabb, Triangle};

use crate::capsule::{Capsule, CollisionResult};

/// Build parameters for the spatial index.
#[derive(Debug, Clone)]
pub struct IndexConfig {
    /// Maximum triangles stored in one leaf.
    pub max_leaf_triangles: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            max_leaf_triangles: 4,
        }
    }
}

/// Build statistics for instrumentation.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    pub triangles: usize,
    pub dropped_degenerate: usize,
    pub nodes: usize,
    pub depth: usize,
}

#[derive(Debug, Clone)]
enum BvhNode {
    Leaf { bounds: Aabb, first: u32, count: u32 },
    Branch { bounds: Aabb, left: u32, right: u32 },
}

impl BvhNode {
    fn bounds(&self) -> &Aabb {
        match self {
            BvhNode::Leaf { bounds, .. } | BvhNode::Branch { bounds, .. } => bounds,
        }
    }
}

/// Bounding volume hierarchy over static collider triangles.
///
/// Built once at load. Triangles are reordered during the build so each leaf
/// owns a contiguous range. There is no way to insert or remove after
/// construction; a new scene means a new index.
#[derive(Debug, Clone, Default)]
pub struct SpatialIndex {
    triangles: Vec<Triangle>,
    nodes: Vec<BvhNode>,
    stats: IndexStats,
}

impl SpatialIndex {
    pub fn build<I>(triangles: I, config: &IndexConfig) -> Self
    where
        I: IntoIterator<Item = Triangle>,
    {
        let _span = tracing::info_span!("spatial_index_build").entered();

        let mut dropped = 0;
        let tris: Vec<Triangle> = triangles
            .into_iter()
            .filter(|t| {
                let keep = !t.is_degenerate();
                if !keep {
                    dropped += 1;
                }
                keep
            })
            .collect();

        let mut builder = Builder {
            tris,
            nodes: Vec::new(),
            max_leaf: config.max_leaf_triangles.max(1),
            depth: 0,
        };
        if !builder.tris.is_empty() {
            let n = builder.tris.len();
            builder.build_range(0, n, 1);
        }

        let stats = IndexStats {
            triangles: builder.tris.len(),
            dropped_degenerate: dropped,
            nodes: builder.nodes.len(),
            depth: builder.depth,
        };
        tracing::info!(
            triangles = stats.triangles,
            dropped = stats.dropped_degenerate,
            nodes = stats.nodes,
            depth = stats.depth,
            "spatial index built"
        );

        Self {
            triangles: builder.tris,
            nodes: builder.nodes,
            stats,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Bounds of all indexed geometry (empty box for an empty index).
    pub fn bounds(&self) -> Aabb {
        self.nodes.first().map_or(Aabb::EMPTY, |n| *n.bounds())
    }

    /// Deepest penetration of `capsule` into the indexed geometry.
    ///
    /// Subtrees whose bounds miss the capsule's swept box are skipped. Among
    /// all contacts the deepest wins; equal depths keep the first visited.
    pub fn intersect_capsule(&self, capsule: &Capsule) -> Option<CollisionResult> {
        if self.nodes.is_empty() {
            return None;
        }
        let query = capsule.bounds();
        let mut best: Option<CollisionResult> = None;
        let mut stack = vec![0u32];

        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx as usize];
            if !node.bounds().intersects(&query) {
                continue;
            }
            match *node {
                BvhNode::Leaf { first, count, .. } => {
                    let range = first as usize..(first + count) as usize;
                    for tri in &self.triangles[range] {
                        if !tri.bounds().intersects(&query) {
                            continue;
                        }
                        if let Some(hit) = capsule.intersect_triangle(tri) {
                            if best.is_none_or(|b| hit.depth > b.depth) {
                                best = Some(hit);
                            }
                        }
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    // Right first so the left child is visited first.
                    stack.push(right);
                    stack.push(left);
                }
            }
        }

        if let Some(hit) = best {
            tracing::trace!(depth = hit.depth, normal = ?hit.normal, "capsule contact");
        }
        best
    }
}

struct Builder {
    tris: Vec<Triangle>,
    nodes: Vec<BvhNode>,
    max_leaf: usize,
    depth: usize,
}

impl Builder {
    fn build_range(&mut self, start: usize, end: usize, depth: usize) -> u32 {
        self.depth = self.depth.max(depth);
        let slice = &self.tris[start..end];
        let bounds = slice
            .iter()
            .fold(Aabb::EMPTY, |acc, t| acc.union(&t.bounds()));
        let id = self.nodes.len() as u32;

        let centroid_bounds = Aabb::from_points(slice.iter().map(Triangle::centroid));
        let axis = centroid_bounds.longest_axis();
        let spread = centroid_bounds.extent()[axis];

        // Small ranges, and ranges whose centroids coincide, become leaves.
        if end - start <= self.max_leaf || spread <= 0.0 {
            self.nodes.push(BvhNode::Leaf {
                bounds,
                first: start as u32,
                count: (end - start) as u32,
            });
            return id;
        }

        let mid = start + (end - start) / 2;
        self.tris[start..end].select_nth_unstable_by(mid - start, |a, b| {
            a.centroid()[axis].total_cmp(&b.centroid()[axis])
        });

        self.nodes.push(BvhNode::Branch {
            bounds,
            left: 0,
            right: 0,
        });
        let left = self.build_range(start, mid, depth + 1);
        let right = self.build_range(mid, end, depth + 1);
        self.nodes[id as usize] = BvhNode::Branch {
            bounds,
            left,
            right,
        };
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    /// Flat floor at y = 0 made of a grid of upward-facing quads.
    fn floor_grid(cells: i32, size: f32) -> Vec<Triangle> {
        let mut tris = Vec::new();
        for i in -cells..cells {
            for j in -cells..cells {
                let x0 = i as f32 * size;
                let z0 = j as f32 * size;
                let (x1, z1) = (x0 + size, z0 + size);
                let a = Vec3::new(x0, 0.0, z0);
                let b = Vec3::new(x1, 0.0, z0);
                let c = Vec3::new(x1, 0.0, z1);
                let d = Vec3::new(x0, 0.0, z1);
                tris.push(Triangle::new(a, c, b));
                tris.push(Triangle::new(a, d, c));
            }
        }
        tris
    }

    fn wall_at_x(x: f32) -> Vec<Triangle> {
        let a = Vec3::new(x, 0.0, -5.0);
        let b = Vec3::new(x, 5.0, -5.0);
        let c = Vec3::new(x, 5.0, 5.0);
        let d = Vec3::new(x, 0.0, 5.0);
        // Facing -X.
        vec![Triangle::new(a, c, b), Triangle::new(a, d, c)]
    }

    #[test]
    fn empty_index_answers_none() {
        let index = SpatialIndex::build(Vec::new(), &IndexConfig::default());
        assert!(index.is_empty());
        assert!(index.bounds().is_empty());
        let cap = Capsule::standing_at(Vec3::ZERO, 0.35, 1.0).unwrap();
        assert!(index.intersect_capsule(&cap).is_none());
    }

    #[test]
    fn build_splits_into_a_tree() {
        let index = SpatialIndex::build(floor_grid(8, 1.0), &IndexConfig::default());
        assert_eq!(index.len(), 512);
        assert!(index.stats().nodes > 1);
        assert!(index.stats().depth > 1);
        assert_eq!(index.bounds().min, Vec3::new(-8.0, 0.0, -8.0));
    }

    #[test]
    fn degenerate_triangles_are_dropped() {
        let mut tris = floor_grid(1, 1.0);
        tris.push(Triangle::new(Vec3::ZERO, Vec3::X, Vec3::X * 2.0));
        let index = SpatialIndex::build(tris, &IndexConfig::default());
        assert_eq!(index.stats().dropped_degenerate, 1);
        assert_eq!(index.len(), 8);
    }

    #[test]
    fn capsule_far_away_misses() {
        let index = SpatialIndex::build(floor_grid(4, 1.0), &IndexConfig::default());
        let cap = Capsule::standing_at(Vec3::new(0.0, 10.0, 0.0), 0.35, 1.0).unwrap();
        assert!(index.intersect_capsule(&cap).is_none());
    }

    #[test]
    fn sunk_capsule_reports_floor_contact() {
        let index = SpatialIndex::build(floor_grid(4, 1.0), &IndexConfig::default());
        // Straddles four cells so several triangles report the same depth.
        let cap = Capsule::standing_at(Vec3::new(0.0, -0.1, 0.0), 0.35, 1.0).unwrap();
        let hit = index.intersect_capsule(&cap).unwrap();
        assert!(hit.normal.y > 0.99);
        assert!((hit.depth - 0.1).abs() < 1e-5);
    }

    #[test]
    fn deepest_contact_wins() {
        let mut tris = floor_grid(6, 1.0);
        tris.extend(wall_at_x(0.5));
        let index = SpatialIndex::build(tris, &IndexConfig::default());
        // 0.05 into the floor, 0.3 into the wall.
        let cap = Capsule::new(Vec3::new(0.45, 0.3, 0.0), Vec3::new(0.45, 0.95, 0.0), 0.35).unwrap();
        let hit = index.intersect_capsule(&cap).unwrap();
        assert!(hit.normal.x < -0.99, "{hit:?}");
        assert!((hit.depth - 0.3).abs() < 1e-4, "{hit:?}");
    }

    #[test]
    fn one_resolution_pass_leaves_no_deep_penetration() {
        let index = SpatialIndex::build(floor_grid(4, 1.0), &IndexConfig::default());
        for k in 0..20 {
            let x = -2.0 + k as f32 * 0.2;
            let sink = 0.02 * k as f32;
            let mut cap =
                Capsule::standing_at(Vec3::new(x, -sink, 0.3 * x), 0.35, 1.0).unwrap();
            if let Some(hit) = index.intersect_capsule(&cap) {
                cap.translate(hit.normal * hit.depth);
            }
            let residual = index.intersect_capsule(&cap).map_or(0.0, |h| h.depth);
            assert!(residual <= 1e-4, "x={x} sink={sink} residual={residual}");
        }
    }
}
