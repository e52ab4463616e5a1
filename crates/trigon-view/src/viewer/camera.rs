use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rotation, SquareMatrix, Transform, Vector4};
use tracing::debug;
use trigon_base::{Error, Result, ensure_positive};

use super::math::{Mat3, Mat4, ORIGIN, Quat, Vec3, WORLD_UP, flush_epsilon, look_rotation};

pub const DEFAULT_POSITION: Vec3 = Vec3 {
    x: 20.0,
    y: -20.0,
    z: 20.0,
};
pub const DEFAULT_NEAR: f64 = 0.1;
pub const DEFAULT_FAR: f64 = 2000.0;
pub const FIT_MARGIN: f64 = 0.4;

#[derive(Clone, Copy, Debug)]
pub struct CameraBasis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn at(&self, t: f64) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Orthographic camera. Looks down its local -Z axis; `up` is the hint used
/// when re-aiming at a target.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub orientation: Quat,
    pub up: Vec3,
    left: f64,
    right: f64,
    top: f64,
    bottom: f64,
    near: f64,
    far: f64,
    zoom: f64,
}

impl Camera {
    pub fn initialize(width: f64, height: f64) -> Result<Self> {
        let mut camera = Self {
            position: DEFAULT_POSITION,
            orientation: look_rotation(DEFAULT_POSITION, ORIGIN, WORLD_UP),
            up: WORLD_UP,
            left: 0.0,
            right: 0.0,
            top: 0.0,
            bottom: 0.0,
            near: DEFAULT_NEAR,
            far: DEFAULT_FAR,
            zoom: 1.0,
        };
        camera.resize(width, height)?;
        Ok(camera)
    }

    /// Recomputes the orthographic bounds only; position, orientation and zoom
    /// are left alone so a running transition is not disturbed.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(Error::InvalidViewport { width, height });
        }
        self.left = -width / 2.0;
        self.right = width / 2.0;
        self.top = height / 2.0;
        self.bottom = -height / 2.0;
        Ok(())
    }

    pub fn viewport_size(&self) -> (f64, f64) {
        (self.right - self.left, self.top - self.bottom)
    }

    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.left, self.right, self.top, self.bottom)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f64) -> Result<()> {
        ensure_positive("zoom", zoom)?;
        self.zoom = zoom;
        Ok(())
    }

    /// Zooms so a world-space box fills the viewport scaled by `margin`.
    /// Flat extents are ignored; a box flat on both screen axes keeps the
    /// current zoom.
    pub fn fit_to_bounds(&mut self, min: Vec3, max: Vec3, margin: f64) {
        let (width, height) = self.viewport_size();
        let box_w = max.x - min.x;
        let box_h = max.y - min.y;
        let mut fit = f64::INFINITY;
        if box_w > f64::EPSILON {
            fit = fit.min(width / box_w);
        }
        if box_h > f64::EPSILON {
            fit = fit.min(height / box_h);
        }
        let zoom = fit * margin;
        if zoom.is_finite() && zoom > 0.0 {
            self.zoom = zoom;
            debug!(zoom, "camera fitted to bounds");
        }
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.orientation = look_rotation(self.position, target, self.up);
    }

    pub fn distance_to(&self, target: Vec3) -> f64 {
        (self.position - target).magnitude()
    }

    pub fn basis(&self) -> CameraBasis {
        CameraBasis {
            right: self.orientation.rotate_vector(Vec3::unit_x()),
            up: self.orientation.rotate_vector(Vec3::unit_y()),
            forward: self.orientation.rotate_vector(-Vec3::unit_z()),
        }
    }

    pub fn world_matrix(&self) -> Mat4 {
        Matrix4::from_translation(self.position) * Matrix4::from(self.orientation)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Matrix4::from(self.orientation.conjugate()) * Matrix4::from_translation(-self.position)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        let dx = (self.right - self.left) / (2.0 * self.zoom);
        let dy = (self.top - self.bottom) / (2.0 * self.zoom);
        let cx = (self.right + self.left) / 2.0;
        let cy = (self.top + self.bottom) / 2.0;
        cgmath::ortho(cx - dx, cx + dx, cy - dy, cy + dy, self.near, self.far)
    }

    /// Rotation part of the view matrix with float noise flushed to zero,
    /// suitable for driving an orientation indicator.
    pub fn view_rotation(&self) -> Mat3 {
        let m = Mat3::from(self.orientation.conjugate());
        Mat3::from_cols(
            m.x.map(flush_epsilon),
            m.y.map(flush_epsilon),
            m.z.map(flush_epsilon),
        )
    }

    /// Ray through a cursor position in normalised device coordinates. The
    /// origin lies on the near plane under the cursor and the direction is the
    /// camera forward axis, so parallel rays for every cursor position.
    pub fn screen_ray(&self, ndc_x: f64, ndc_y: f64) -> Option<Ray> {
        if !(ndc_x.is_finite() && ndc_y.is_finite()) {
            return None;
        }
        let inverse_projection = self.projection_matrix().invert()?;
        let camera_space = inverse_projection * Vector4::new(ndc_x, ndc_y, -1.0, 1.0);
        if camera_space.w.abs() <= f64::EPSILON {
            return None;
        }
        let camera_point = Point3::from_homogeneous(camera_space);
        let origin = self.world_matrix().transform_point(camera_point).to_vec();
        let direction = self.basis().forward;
        if direction.magnitude2() <= f64::EPSILON {
            return None;
        }
        Some(Ray {
            origin,
            direction: direction.normalize(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).magnitude() < 1.0e-9
    }

    #[test]
    fn initialize_sets_symmetric_bounds() -> Result<()> {
        let camera = Camera::initialize(800.0, 600.0)?;
        assert_eq!(camera.bounds(), (-400.0, 400.0, 300.0, -300.0));
        assert_eq!(camera.position, DEFAULT_POSITION);
        assert_eq!(camera.zoom(), 1.0);
        let forward = camera.basis().forward;
        assert!(close(forward, (-DEFAULT_POSITION).normalize()));
        Ok(())
    }

    #[test]
    fn resize_is_idempotent_and_rejects_empty() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        camera.resize(1024.0, 768.0)?;
        let once = camera.bounds();
        camera.resize(1024.0, 768.0)?;
        assert_eq!(camera.bounds(), once);
        assert!(matches!(
            camera.resize(0.0, 768.0),
            Err(Error::InvalidViewport { .. })
        ));
        assert_eq!(camera.bounds(), once);
        Ok(())
    }

    #[test]
    fn fit_uses_smaller_ratio_with_margin() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        camera.fit_to_bounds(Vec3::new(-10.0, -5.0, -1.0), Vec3::new(10.0, 5.0, 1.0), FIT_MARGIN);
        // min(800 / 20, 600 / 10) * 0.4
        assert!((camera.zoom() - 16.0).abs() < 1.0e-12);
        Ok(())
    }

    #[test]
    fn zoom_must_stay_positive() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        assert!(camera.set_zoom(0.0).is_err());
        assert!(camera.set_zoom(-2.0).is_err());
        assert_eq!(camera.zoom(), 1.0);
        Ok(())
    }

    #[test]
    fn ortho_rays_are_parallel_with_shifted_origins() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        camera.position = Vec3::new(0.0, 0.0, 20.0);
        camera.look_at(ORIGIN);
        camera.set_zoom(2.0)?;

        let center = camera.screen_ray(0.0, 0.0).unwrap();
        let corner = camera.screen_ray(1.0, 1.0).unwrap();
        assert!(close(center.direction, -Vec3::unit_z()));
        assert!(close(corner.direction, center.direction));
        assert!(close(center.origin, Vec3::new(0.0, 0.0, 20.0 - DEFAULT_NEAR)));
        // half extents: 400 / 2, 300 / 2
        assert!(close(corner.origin, Vec3::new(200.0, 150.0, 20.0 - DEFAULT_NEAR)));
        Ok(())
    }

    #[test]
    fn view_rotation_flushes_noise() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        camera.position = Vec3::new(0.0, 0.0, 20.0);
        camera.look_at(ORIGIN);
        let m = camera.view_rotation();
        assert_eq!(m, Mat3::from_cols(Vec3::unit_x(), Vec3::unit_y(), Vec3::unit_z()));
        Ok(())
    }
}
