use cgmath::{EuclideanSpace, Matrix4, Point3, Transform};
use trigon_base::{Error, Result};

use super::bvh::TriangleBvh;
use super::math::{Mat4, Vec3, bounds_of, quat_from_euler_xyz};

/// Uniform scale applied to the mesh root.
pub const ROOT_SCALE: f64 = 2.0;

/// Drawable triangle soup. Face `i` uses vertices `3i`, `3i + 1`, `3i + 2`.
/// The flat position buffer is the only copy of the vertex data.
#[derive(Clone, Debug)]
pub struct Surface {
    positions: Vec<f64>,
    colors: Option<Vec<f64>>,
    bvh: TriangleBvh,
}

impl Surface {
    pub fn new(positions: Vec<f64>, colors: Option<Vec<f64>>) -> Result<Self> {
        if positions.is_empty() {
            return Err(Error::EmptyGeometry);
        }
        if positions.len() % 9 != 0 {
            return Err(Error::InvalidBuffer {
                name: "position",
                reason: format!("length {} is not a multiple of 9", positions.len()),
            });
        }
        if let Some(colors) = &colors {
            if colors.len() != positions.len() {
                return Err(Error::InvalidBuffer {
                    name: "color",
                    reason: format!(
                        "{} values for {} vertices",
                        colors.len(),
                        positions.len() / 3
                    ),
                });
            }
        }

        let bvh = {
            let triangles: Vec<[Vec3; 3]> = (0..positions.len() / 9)
                .map(|face| face_vertices(&positions, face))
                .collect();
            TriangleBvh::build(&triangles)
        };
        Ok(Self {
            positions,
            colors,
            bvh,
        })
    }

    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    pub fn colors(&self) -> Option<&[f64]> {
        self.colors.as_deref()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    pub fn face_count(&self) -> usize {
        self.positions.len() / 9
    }

    /// Local-space vertices of a face.
    ///
    /// # Panics
    ///
    /// Panics if `face` is out of range; face indices only come from this
    /// surface's own intersection queries.
    pub fn triangle(&self, face: usize) -> [Vec3; 3] {
        assert!(
            face < self.face_count(),
            "face index {face} out of range for surface with {} faces",
            self.face_count()
        );
        face_vertices(&self.positions, face)
    }

    pub fn closest_hit(&self, origin: Vec3, dir: Vec3, eps: f64) -> Option<(usize, f64)> {
        self.bvh
            .closest_hit(|face| face_vertices(&self.positions, face), origin, dir, eps)
    }

    pub fn local_bounds(&self) -> Option<(Vec3, Vec3)> {
        bounds_of(self.points())
    }

    fn points(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|p| Vec3::new(p[0], p[1], p[2]))
    }
}

fn face_vertices(positions: &[f64], face: usize) -> [Vec3; 3] {
    let t = &positions[face * 9..face * 9 + 9];
    [
        Vec3::new(t[0], t[1], t[2]),
        Vec3::new(t[3], t[4], t[5]),
        Vec3::new(t[6], t[7], t[8]),
    ]
}

/// Root transform node owning the single drawable surface.
#[derive(Clone, Debug)]
pub struct MeshObject {
    pub position: Vec3,
    /// XYZ Euler angles in radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    surface: Surface,
}

impl MeshObject {
    pub fn new(surface: Surface) -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 0.0, 0.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
            surface,
        }
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn world_matrix(&self) -> Mat4 {
        Matrix4::from_translation(self.position)
            * Matrix4::from(quat_from_euler_xyz(self.rotation))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    /// Axis-aligned bounds of the transformed vertices.
    pub fn world_bounds(&self) -> Option<(Vec3, Vec3)> {
        let world = self.world_matrix();
        bounds_of(
            self.surface
                .points()
                .map(|p| world.transform_point(Point3::from_vec(p)).to_vec()),
        )
    }
}
