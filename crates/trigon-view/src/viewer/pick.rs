use cgmath::{EuclideanSpace, InnerSpace, Point3, SquareMatrix, Transform};

use super::camera::Camera;
use super::math::Vec3;
use super::scene::MeshObject;

/// Möller–Trumbore. Returns the ray parameter of the hit; near-parallel rays,
/// zero-area triangles and hits behind the origin are misses.
///
/// The determinant is compared against `eps` relative to the triangle area
/// and ray length, so the test does not depend on the mesh's scale.
pub fn ray_intersect_triangle(origin: Vec3, dir: Vec3, a: Vec3, b: Vec3, c: Vec3, eps: f64) -> Option<f64> {
    let edge1 = b - a;
    let edge2 = c - a;
    let pvec = dir.cross(edge2);
    let det = edge1.dot(pvec);
    let scale = edge1.cross(edge2).magnitude() * dir.magnitude();
    if !det.is_finite() || det.abs() <= eps * scale {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = origin - a;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    if t > eps { Some(t) } else { None }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FaceHit {
    pub face_index: usize,
    /// Distance along the (unit) pick ray, in world units.
    pub distance: f64,
    pub point: Vec3,
    pub triangle: [Vec3; 3],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PickPhase {
    Idle,
    Armed,
    Hit,
}

#[derive(Clone, Debug, Default)]
pub struct PickState {
    cursor_ndc: [f64; 2],
    tool_active: bool,
    last_intersection: Option<FaceHit>,
}

impl PickState {
    pub fn phase(&self) -> PickPhase {
        match (self.tool_active, self.last_intersection.is_some()) {
            (false, _) => PickPhase::Idle,
            (true, false) => PickPhase::Armed,
            (true, true) => PickPhase::Hit,
        }
    }

    pub fn cursor_ndc(&self) -> [f64; 2] {
        self.cursor_ndc
    }

    pub fn set_cursor(&mut self, ndc: [f64; 2]) {
        self.cursor_ndc = ndc;
    }

    pub fn tool_active(&self) -> bool {
        self.tool_active
    }

    pub fn set_tool_active(&mut self, active: bool) {
        self.tool_active = active;
        if !active {
            self.last_intersection = None;
        }
    }

    pub fn last_intersection(&self) -> Option<&FaceHit> {
        self.last_intersection.as_ref()
    }

    pub fn record(&mut self, hit: Option<FaceHit>) {
        if self.tool_active {
            self.last_intersection = hit;
        }
    }
}

/// Face of `mesh` under the cursor, closest to the camera.
///
/// The camera ray is moved into the mesh's local space with the inverse world
/// matrix. The local direction is not renormalised, so the parameter found
/// locally is the world distance along the unit world ray.
pub fn pick(cursor_ndc: [f64; 2], camera: &Camera, mesh: &MeshObject, eps: f64) -> Option<FaceHit> {
    let ray = camera.screen_ray(cursor_ndc[0], cursor_ndc[1])?;
    let world = mesh.world_matrix();
    let inverse = world.invert()?;
    let local_origin = inverse.transform_point(Point3::from_vec(ray.origin)).to_vec();
    let local_dir = inverse.transform_vector(ray.direction);

    let (face_index, t) = mesh.surface().closest_hit(local_origin, local_dir, eps)?;
    let triangle = mesh
        .surface()
        .triangle(face_index)
        .map(|p| world.transform_point(Point3::from_vec(p)).to_vec());
    Some(FaceHit {
        face_index,
        distance: t,
        point: ray.at(t),
        triangle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri() -> (Vec3, Vec3, Vec3) {
        (
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        )
    }

    #[test]
    fn hits_front_triangle() {
        let (a, b, c) = tri();
        let t = ray_intersect_triangle(
            Vec3::new(0.25, 0.25, 3.0),
            Vec3::new(0.0, 0.0, -1.0),
            a,
            b,
            c,
            1.0e-9,
        );
        assert_eq!(t, Some(3.0));
    }

    #[test]
    fn behind_origin_is_a_miss() {
        let (a, b, c) = tri();
        let t = ray_intersect_triangle(
            Vec3::new(0.25, 0.25, -3.0),
            Vec3::new(0.0, 0.0, -1.0),
            a,
            b,
            c,
            1.0e-9,
        );
        assert_eq!(t, None);
    }

    #[test]
    fn tiny_triangles_still_hit() {
        let s = 1.0e-5;
        let t = ray_intersect_triangle(
            Vec3::new(0.0, 0.0, 20.0),
            Vec3::new(0.0, 0.0, -0.5),
            Vec3::new(-s, -s, 0.0),
            Vec3::new(s, -s, 0.0),
            Vec3::new(0.0, s, 0.0),
            1.0e-9,
        );
        // local direction has length 0.5, so t is twice the distance
        assert!(t.is_some_and(|t| (t - 40.0).abs() < 1.0e-9));
    }

    #[test]
    fn grazing_ray_is_a_miss() {
        let (a, b, c) = tri();
        let t = ray_intersect_triangle(
            Vec3::new(-1.0, 0.25, 0.0),
            Vec3::new(1.0, 0.0, 1.0e-12),
            a,
            b,
            c,
            1.0e-9,
        );
        assert_eq!(t, None);
    }

    #[test]
    fn degenerate_inputs_are_misses() {
        let (a, b, _) = tri();
        let origin = Vec3::new(0.25, 0.0, 3.0);
        let down = Vec3::new(0.0, 0.0, -1.0);
        // collinear vertices
        assert_eq!(ray_intersect_triangle(origin, down, a, b, b * 2.0, 1.0e-9), None);
        // zero direction
        let (a, b, c) = tri();
        assert_eq!(
            ray_intersect_triangle(origin, Vec3::new(0.0, 0.0, 0.0), a, b, c, 1.0e-9),
            None
        );
    }

    #[test]
    fn phase_follows_tool_and_hits() {
        let mut state = PickState::default();
        assert_eq!(state.phase(), PickPhase::Idle);
        state.record(Some(FaceHit {
            face_index: 0,
            distance: 1.0,
            point: Vec3::new(0.0, 0.0, 0.0),
            triangle: [Vec3::new(0.0, 0.0, 0.0); 3],
        }));
        assert_eq!(state.phase(), PickPhase::Idle);

        state.set_tool_active(true);
        assert_eq!(state.phase(), PickPhase::Armed);
        state.record(Some(FaceHit {
            face_index: 2,
            distance: 1.0,
            point: Vec3::new(0.0, 0.0, 0.0),
            triangle: [Vec3::new(0.0, 0.0, 0.0); 3],
        }));
        assert_eq!(state.phase(), PickPhase::Hit);
        state.record(None);
        assert_eq!(state.phase(), PickPhase::Armed);

        state.set_tool_active(false);
        assert_eq!(state.phase(), PickPhase::Idle);
        assert!(state.last_intersection().is_none());
    }
}
