use cgmath::{InnerSpace, Rad, Rotation, Rotation3};
use serde::Deserialize;
use std::f64::consts::TAU;
use trigon_base::{Error, Result, ensure_positive};

use super::camera::Camera;
use super::math::{ORIGIN, Quat, Vec3, WORLD_UP};

const ZOOM_BASE: f64 = 0.95;
const SETTLE_EPS: f64 = 1.0e-6;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct OrbitConfig {
    pub rotate_speed: f64,
    pub zoom_speed: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub min_distance: f64,
    pub max_distance: f64,
    pub enable_damping: bool,
    pub damping_factor: f64,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            min_zoom: 1.0e-6,
            max_zoom: 1.0e9,
            min_distance: 1.0,
            max_distance: 1.0e4,
            enable_damping: false,
            damping_factor: 0.05,
        }
    }
}

impl OrbitConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_positive("orbit.min_zoom", self.min_zoom)?;
        ensure_positive("orbit.max_zoom", self.max_zoom)?;
        ensure_positive("orbit.min_distance", self.min_distance)?;
        ensure_positive("orbit.max_distance", self.max_distance)?;
        ensure_positive("orbit.zoom_speed", self.zoom_speed)?;
        if self.min_zoom > self.max_zoom {
            return Err(Error::InvalidParameter("orbit.min_zoom exceeds orbit.max_zoom".into()));
        }
        if self.min_distance > self.max_distance {
            return Err(Error::InvalidParameter(
                "orbit.min_distance exceeds orbit.max_distance".into(),
            ));
        }
        if !self.rotate_speed.is_finite() {
            return Err(Error::InvalidParameter("orbit.rotate_speed must be finite".into()));
        }
        if !(self.damping_factor > 0.0 && self.damping_factor <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "orbit.damping_factor must be in (0, 1], got {}",
                self.damping_factor
            )));
        }
        Ok(())
    }
}

/// Turntable orbit around the scene origin. Input is accumulated between
/// frames and applied by `update`; there is no panning, the pivot is fixed.
#[derive(Clone, Debug)]
pub struct OrbitController {
    config: OrbitConfig,
    pending_yaw: f64,
    pending_pitch: f64,
    pending_zoom: f64,
}

impl OrbitController {
    pub fn new(config: OrbitConfig) -> Self {
        Self {
            config,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 1.0,
        }
    }

    pub fn config(&self) -> &OrbitConfig {
        &self.config
    }

    /// Zoom limited to the configured range. Also applied to the fitted
    /// zoom so the first wheel step moves in the requested direction.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.max(self.config.min_zoom).min(self.config.max_zoom)
    }

    pub fn pivot(&self) -> Vec3 {
        ORIGIN
    }

    /// Pointer drag in pixels; a drag across the full viewport height turns
    /// the camera once around.
    pub fn rotate(&mut self, dx: f64, dy: f64, viewport_height: f64) {
        if !(dx.is_finite() && dy.is_finite()) || viewport_height <= 0.0 {
            return;
        }
        let scale = TAU / viewport_height * self.config.rotate_speed;
        self.pending_yaw -= dx * scale;
        self.pending_pitch -= dy * scale;
    }

    /// Wheel or pinch steps; positive zooms in.
    pub fn zoom(&mut self, steps: f64) {
        if !steps.is_finite() {
            return;
        }
        self.pending_zoom *= ZOOM_BASE.powf(-steps * self.config.zoom_speed);
    }

    pub fn has_pending(&self) -> bool {
        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_zoom != 1.0
    }

    /// Applies accumulated input. Called once per frame; returns whether the
    /// camera moved. With damping the remaining rotation decays over frames.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        if !self.has_pending() {
            return false;
        }

        let (yaw, pitch) = if self.config.enable_damping {
            let factor = self.config.damping_factor;
            let step = (self.pending_yaw * factor, self.pending_pitch * factor);
            self.pending_yaw -= step.0;
            self.pending_pitch -= step.1;
            if self.pending_yaw.abs() < SETTLE_EPS {
                self.pending_yaw = 0.0;
            }
            if self.pending_pitch.abs() < SETTLE_EPS {
                self.pending_pitch = 0.0;
            }
            step
        } else {
            let step = (self.pending_yaw, self.pending_pitch);
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
            step
        };

        let pivot = self.pivot();
        if yaw != 0.0 || pitch != 0.0 {
            let q_yaw = Quat::from_axis_angle(WORLD_UP, Rad(yaw));
            let right = q_yaw.rotate_vector(camera.basis().right);
            let q_pitch = Quat::from_axis_angle(right.normalize(), Rad(pitch));
            let q = q_pitch * q_yaw;
            camera.position = pivot + q.rotate_vector(camera.position - pivot);
            camera.orientation = (q * camera.orientation).normalize();
        }
        self.clamp_distance(camera);

        let zoom = self.clamp_zoom(camera.zoom() * self.pending_zoom);
        self.pending_zoom = 1.0;
        // a rejected zoom leaves the previous, valid one in place
        let _ = camera.set_zoom(zoom);
        true
    }

    fn clamp_distance(&self, camera: &mut Camera) {
        let pivot = self.pivot();
        let offset = camera.position - pivot;
        let distance = offset.magnitude();
        if distance <= f64::EPSILON {
            return;
        }
        let clamped = distance.max(self.config.min_distance).min(self.config.max_distance);
        if clamped != distance {
            camera.position = pivot + offset * (clamped / distance);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotation_keeps_distance_and_aims_at_pivot() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut orbit = OrbitController::new(OrbitConfig::default());
        let before = camera.distance_to(ORIGIN);
        orbit.rotate(120.0, -45.0, 600.0);
        assert!(orbit.update(&mut camera));
        assert!((camera.distance_to(ORIGIN) - before).abs() < 1.0e-9);
        let forward = camera.basis().forward;
        let to_pivot = (ORIGIN - camera.position).normalize();
        assert!((forward - to_pivot).magnitude() < 1.0e-9);
        Ok(())
    }

    #[test]
    fn idle_update_is_a_no_op() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut orbit = OrbitController::new(OrbitConfig::default());
        let position = camera.position;
        assert!(!orbit.update(&mut camera));
        assert_eq!(camera.position, position);
        Ok(())
    }

    #[test]
    fn zoom_is_clamped() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut orbit = OrbitController::new(OrbitConfig {
            min_zoom: 0.5,
            max_zoom: 2.0,
            ..OrbitConfig::default()
        });
        orbit.zoom(500.0);
        orbit.update(&mut camera);
        assert_eq!(camera.zoom(), 2.0);
        orbit.zoom(-1000.0);
        orbit.update(&mut camera);
        assert_eq!(camera.zoom(), 0.5);
        Ok(())
    }

    #[test]
    fn distance_is_pulled_into_range() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let start = camera.distance_to(ORIGIN);
        let mut orbit = OrbitController::new(OrbitConfig {
            min_distance: 50.0,
            ..OrbitConfig::default()
        });
        orbit.rotate(10.0, 0.0, 600.0);
        orbit.update(&mut camera);
        assert!(start < 50.0);
        assert!((camera.distance_to(ORIGIN) - 50.0).abs() < 1.0e-9);

        let mut orbit = OrbitController::new(OrbitConfig {
            max_distance: 10.0,
            ..OrbitConfig::default()
        });
        orbit.rotate(0.0, 10.0, 600.0);
        orbit.update(&mut camera);
        assert!((camera.distance_to(ORIGIN) - 10.0).abs() < 1.0e-9);
        let forward = camera.basis().forward;
        assert!((forward + camera.position.normalize()).magnitude() < 1.0e-9);
        Ok(())
    }

    #[test]
    fn validate_rejects_nan_and_bad_damping() {
        assert!(OrbitConfig::default().validate().is_ok());
        let bad = [
            OrbitConfig { max_zoom: f64::NAN, ..OrbitConfig::default() },
            OrbitConfig { max_distance: f64::NAN, ..OrbitConfig::default() },
            OrbitConfig { damping_factor: f64::NAN, ..OrbitConfig::default() },
            OrbitConfig { damping_factor: 0.0, ..OrbitConfig::default() },
            OrbitConfig { damping_factor: 1.5, ..OrbitConfig::default() },
            OrbitConfig { rotate_speed: f64::INFINITY, ..OrbitConfig::default() },
            OrbitConfig { zoom_speed: f64::NAN, ..OrbitConfig::default() },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "{config:?}");
        }
    }

    #[test]
    fn damping_spreads_rotation_over_frames() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut orbit = OrbitController::new(OrbitConfig {
            enable_damping: true,
            damping_factor: 0.5,
            ..OrbitConfig::default()
        });
        orbit.rotate(100.0, 0.0, 600.0);
        orbit.update(&mut camera);
        assert!(orbit.has_pending());
        for _ in 0..64 {
            orbit.update(&mut camera);
        }
        assert!(!orbit.has_pending());
        Ok(())
    }
}
