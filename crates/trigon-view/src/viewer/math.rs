use cgmath::{InnerSpace, Matrix3, Quaternion, Rad, Rotation3, Vector3};

pub type Vec3 = Vector3<f64>;
pub type Quat = Quaternion<f64>;
pub type Mat3 = Matrix3<f64>;
pub type Mat4 = cgmath::Matrix4<f64>;

pub const ORIGIN: Vec3 = Vector3 { x: 0.0, y: 0.0, z: 0.0 };
pub const WORLD_UP: Vec3 = Vector3 { x: 0.0, y: 0.0, z: 1.0 };

pub const IDENTITY: Quat = Quaternion {
    s: 1.0,
    v: Vector3 { x: 0.0, y: 0.0, z: 0.0 },
};

/// Rotation described by XYZ Euler angles (radians), applied as Rx * Ry * Rz.
pub fn quat_from_euler_xyz(angles: Vec3) -> Quat {
    let qx = Quat::from_angle_x(Rad(angles.x));
    let qy = Quat::from_angle_y(Rad(angles.y));
    let qz = Quat::from_angle_z(Rad(angles.z));
    (qx * qy * qz).normalize()
}

/// Orientation of an object at `eye` whose local -Z points at `target`,
/// with local +Y as close to `up` as possible.
pub fn look_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.magnitude2() <= f64::EPSILON {
        z = Vec3::unit_z();
    }
    let z = z.normalize();
    let mut x = up.cross(z);
    if x.magnitude2() <= 1.0e-12 {
        let alt = if up.z.abs() > 0.9 {
            Vec3::unit_y()
        } else {
            Vec3::unit_z()
        };
        x = alt.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    Quat::from(Mat3::from_cols(x, y, z)).normalize()
}

/// Shortest-arc spherical interpolation.
pub fn slerp_shortest(from: Quat, to: Quat, t: f64) -> Quat {
    let to = if from.dot(to) < 0.0 { -to } else { to };
    from.slerp(to, t).normalize()
}

/// Circular ease-out, `sqrt(1 - (t - 1)^2)` on `[0, 1]`.
pub fn circular_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0) - 1.0;
    (1.0 - t * t).sqrt()
}

pub fn flush_epsilon(value: f64) -> f64 {
    if value.abs() < 1.0e-10 { 0.0 } else { value }
}

pub fn bounds_of(points: impl IntoIterator<Item = Vec3>) -> Option<(Vec3, Vec3)> {
    let mut iter = points.into_iter();
    let first = iter.next()?;
    let mut min = first;
    let mut max = first;
    for p in iter {
        min = Vec3::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Vec3::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
    }
    Some((min, max))
}
