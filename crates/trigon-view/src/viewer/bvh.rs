use std::cmp::Ordering;

use super::math::{Vec3, bounds_of};
use super::pick::ray_intersect_triangle;

const BVH_LEAF_SIZE: usize = 8;

type Aabb = (Vec3, Vec3);

#[derive(Clone, Copy, Debug)]
struct BvhNode {
    bounds: Aabb,
    left: Option<usize>,
    right: Option<usize>,
    start: usize,
    count: usize,
}

/// Median-split bounding volume hierarchy over a triangle soup. Stores only
/// face indices; vertex data stays with the owner and is read back through
/// the `triangle` lookup passed to queries.
#[derive(Clone, Debug, Default)]
pub struct TriangleBvh {
    nodes: Vec<BvhNode>,
    faces: Vec<usize>,
}

impl TriangleBvh {
    pub fn build(triangles: &[[Vec3; 3]]) -> Self {
        if triangles.is_empty() {
            return Self::default();
        }
        let mut tri_bounds = Vec::with_capacity(triangles.len());
        let mut centroids = Vec::with_capacity(triangles.len());
        for tri in triangles {
            // three points always yield bounds
            let bounds = bounds_of(tri.iter().copied()).unwrap_or((tri[0], tri[0]));
            tri_bounds.push(bounds);
            centroids.push((tri[0] + tri[1] + tri[2]) / 3.0);
        }

        let mut indices: Vec<usize> = (0..triangles.len()).collect();
        let mut bvh = Self {
            nodes: Vec::new(),
            faces: Vec::with_capacity(triangles.len()),
        };
        bvh.build_node(&mut indices, &tri_bounds, &centroids);
        bvh
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Closest face hit by the ray, as `(face_index, t)`. Ties on `t` go to the
    /// lower face index so the result does not depend on traversal order.
    pub fn closest_hit(
        &self,
        triangle: impl Fn(usize) -> [Vec3; 3],
        origin: Vec3,
        dir: Vec3,
        eps: f64,
    ) -> Option<(usize, f64)> {
        if self.nodes.is_empty() {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        let mut stack = vec![0usize];

        while let Some(node_idx) = stack.pop() {
            let node = &self.nodes[node_idx];
            let max_t = best.map_or(f64::INFINITY, |(_, t)| t);
            if ray_aabb_interval(origin, dir, node.bounds, max_t).is_none() {
                continue;
            }

            if node.count > 0 {
                for &face in &self.faces[node.start..node.start + node.count] {
                    let [a, b, c] = triangle(face);
                    let Some(t) = ray_intersect_triangle(origin, dir, a, b, c, eps) else {
                        continue;
                    };
                    let better = match best {
                        None => true,
                        Some((best_face, best_t)) => t < best_t || (t == best_t && face < best_face),
                    };
                    if better {
                        best = Some((face, t));
                    }
                }
                continue;
            }

            let near_first = |idx: usize| {
                ray_aabb_interval(origin, dir, self.nodes[idx].bounds, max_t)
                    .map(|(tmin, _)| (idx, tmin))
            };
            match (node.left.and_then(near_first), node.right.and_then(near_first)) {
                (Some((left, left_t)), Some((right, right_t))) => {
                    if left_t <= right_t {
                        stack.push(right);
                        stack.push(left);
                    } else {
                        stack.push(left);
                        stack.push(right);
                    }
                }
                (Some((idx, _)), None) | (None, Some((idx, _))) => stack.push(idx),
                (None, None) => {}
            }
        }

        best
    }

    fn build_node(&mut self, indices: &mut [usize], tri_bounds: &[Aabb], centroids: &[Vec3]) -> usize {
        let node_index = self.nodes.len();
        let bounds = bounds_of(indices.iter().flat_map(|&i| [tri_bounds[i].0, tri_bounds[i].1]))
            .unwrap_or(tri_bounds[0]);
        self.nodes.push(BvhNode {
            bounds,
            left: None,
            right: None,
            start: 0,
            count: 0,
        });

        if indices.len() <= BVH_LEAF_SIZE {
            self.nodes[node_index].start = self.faces.len();
            self.nodes[node_index].count = indices.len();
            self.faces.extend_from_slice(indices);
            return node_index;
        }

        let (cmin, cmax) = bounds_of(indices.iter().map(|&i| centroids[i])).unwrap_or(bounds);
        let extent = cmax - cmin;
        let axis = if extent.x >= extent.y && extent.x >= extent.z {
            0
        } else if extent.y >= extent.z {
            1
        } else {
            2
        };
        indices.sort_unstable_by(|a, b| {
            centroids[*a][axis]
                .partial_cmp(&centroids[*b][axis])
                .unwrap_or(Ordering::Equal)
        });
        let mid = indices.len() / 2;
        let (left, right) = indices.split_at_mut(mid);
        let left_idx = self.build_node(left, tri_bounds, centroids);
        let right_idx = self.build_node(right, tri_bounds, centroids);
        self.nodes[node_index].left = Some(left_idx);
        self.nodes[node_index].right = Some(right_idx);
        node_index
    }
}

fn ray_aabb_interval(origin: Vec3, dir: Vec3, bounds: Aabb, max_t: f64) -> Option<(f64, f64)> {
    let (min, max) = bounds;
    let mut tmin: f64 = 0.0;
    let mut tmax: f64 = max_t;

    for axis in 0..3 {
        let (o, d) = (origin[axis], dir[axis]);
        if d.abs() <= 1.0e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let t1 = (min[axis] - o) * inv;
        let t2 = (max[axis] - o) * inv;
        tmin = tmin.max(t1.min(t2));
        tmax = tmax.min(t1.max(t2));
        if tmax < tmin {
            return None;
        }
    }
    Some((tmin, tmax))
}
