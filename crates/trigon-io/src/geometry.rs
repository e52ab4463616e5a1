use trigon_base::{Error, Result};

/// Default surface color for loaded meshes.
pub const MESH_RGB: [u8; 3] = [233, 30, 99];

/// Non-indexed triangle soup: every 9 floats in `positions` form one face.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub positions: Vec<f64>,
    pub normals: Vec<f64>,
    pub colors: Option<Vec<f64>>,
}

impl Geometry {
    pub fn from_positions(positions: Vec<f64>) -> Result<Self> {
        if positions.is_empty() {
            return Err(Error::EmptyGeometry);
        }
        if positions.len() % 9 != 0 {
            return Err(Error::InvalidBuffer {
                name: "position",
                reason: format!("length {} is not a multiple of 9", positions.len()),
            });
        }
        Ok(Self {
            positions,
            normals: Vec::new(),
            colors: None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 9
    }

    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let mut chunks = self.positions.chunks_exact(3);
        let first = chunks.next()?;
        let mut min = [first[0], first[1], first[2]];
        let mut max = min;
        for p in chunks {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
        }
        Some((min, max))
    }

    /// Moves the bounding box center to the origin and returns the applied offset.
    pub fn center(&mut self) -> [f64; 3] {
        let Some((min, max)) = self.bounds() else {
            return [0.0; 3];
        };
        let offset = [
            -(min[0] + max[0]) * 0.5,
            -(min[1] + max[1]) * 0.5,
            -(min[2] + max[2]) * 0.5,
        ];
        for p in self.positions.chunks_exact_mut(3) {
            p[0] += offset[0];
            p[1] += offset[1];
            p[2] += offset[2];
        }
        offset
    }

    /// Flat normals: each vertex of a face gets the face normal. Degenerate
    /// faces get a zero normal.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = Vec::with_capacity(self.positions.len());
        for tri in self.positions.chunks_exact(9) {
            let e1 = [tri[3] - tri[0], tri[4] - tri[1], tri[5] - tri[2]];
            let e2 = [tri[6] - tri[0], tri[7] - tri[1], tri[8] - tri[2]];
            let mut n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
            if len > f64::EPSILON {
                n = [n[0] / len, n[1] / len, n[2] / len];
            } else {
                n = [0.0; 3];
            }
            for _ in 0..3 {
                normals.extend_from_slice(&n);
            }
        }
        self.normals = normals;
    }

    pub fn paint_uniform(&mut self, rgb: [u8; 3]) {
        let color = rgb.map(|c| c as f64 / 255.0);
        let mut colors = Vec::with_capacity(self.positions.len());
        for _ in 0..self.vertex_count() {
            colors.extend_from_slice(&color);
        }
        self.colors = Some(colors);
    }
}
