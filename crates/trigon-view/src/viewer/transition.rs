use cgmath::{InnerSpace, VectorSpace};
use tracing::{debug, info};

use super::camera::Camera;
use super::math::{ORIGIN, Quat, Vec3, circular_out, quat_from_euler_xyz, slerp_shortest};
use super::orientation::OrientationRequest;

pub const DURATION: f64 = 0.3;

#[derive(Clone, Copy, Debug)]
pub struct Track<T> {
    pub start: T,
    pub target: T,
    pub elapsed: f64,
    pub duration: f64,
}

impl<T: Copy> Track<T> {
    fn new(start: T, target: T, duration: f64) -> Self {
        Self {
            start,
            target,
            elapsed: 0.0,
            duration,
        }
    }

    /// Advances and returns the eased progress in `[0, 1]`.
    fn advance(&mut self, dt: f64) -> f64 {
        self.elapsed += dt;
        if self.duration <= 0.0 {
            return 1.0;
        }
        circular_out(self.elapsed / self.duration)
    }
}

/// Animates the camera towards requested orientations. Position and
/// orientation run on separate tracks started together; a new request
/// replaces both, starting from wherever the camera currently is.
#[derive(Clone, Debug)]
pub struct TransitionEngine {
    duration: f64,
    position: Option<Track<Vec3>>,
    orientation: Option<Track<Quat>>,
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(DURATION)
    }
}

impl TransitionEngine {
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() { duration.max(0.0) } else { DURATION };
        Self {
            duration,
            position: None,
            orientation: None,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn is_active(&self) -> bool {
        self.position.is_some() || self.orientation.is_some()
    }

    pub fn position_track(&self) -> Option<&Track<Vec3>> {
        self.position.as_ref()
    }

    pub fn orientation_track(&self) -> Option<&Track<Quat>> {
        self.orientation.as_ref()
    }

    pub fn request(&mut self, request: &OrientationRequest, camera: &Camera) {
        let distance = (camera.position - ORIGIN).magnitude();
        let factor: Vec3 = request.offset_factor.into();
        let target_position = ORIGIN + factor * distance;
        let target_orientation = quat_from_euler_xyz(request.axis_angle.into());

        if self.is_active() {
            debug!("restarting orientation transition");
        }
        self.position = Some(Track::new(camera.position, target_position, self.duration));
        self.orientation = Some(Track::new(camera.orientation, target_orientation, self.duration));
        info!(
            target_x = target_position.x,
            target_y = target_position.y,
            target_z = target_position.z,
            duration = self.duration,
            "orientation transition started"
        );
    }

    pub fn cancel(&mut self) {
        self.position = None;
        self.orientation = None;
    }

    /// Moves the camera along the active tracks. Returns whether anything was
    /// animated this tick. The final tick lands exactly on the targets.
    pub fn tick(&mut self, dt: f64, camera: &mut Camera) -> bool {
        if !self.is_active() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        if let Some(track) = self.position.as_mut() {
            let t = track.advance(dt);
            if t >= 1.0 {
                camera.position = track.target;
                self.position = None;
            } else {
                camera.position = track.start.lerp(track.target, t);
            }
        }
        if let Some(track) = self.orientation.as_mut() {
            let t = track.advance(dt);
            if t >= 1.0 {
                camera.orientation = track.target;
                self.orientation = None;
            } else {
                camera.orientation = slerp_shortest(track.start, track.target, t);
            }
        }

        if !self.is_active() {
            info!("orientation transition finished");
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viewer::orientation::{ViewFace, Xyz};
    use trigon_base::Result;

    #[test]
    fn finishes_exactly_on_target() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut engine = TransitionEngine::default();
        let request = OrientationRequest::from_face(ViewFace::Front);
        engine.request(&request, &camera);
        let distance = camera.distance_to(ORIGIN);

        for _ in 0..5 {
            assert!(engine.tick(0.05, &mut camera));
            assert!(engine.is_active());
        }
        engine.tick(0.1, &mut camera);
        assert!(!engine.is_active());
        assert_eq!(camera.position, Vec3::new(0.0, -distance, 0.0));
        assert_eq!(camera.orientation, quat_from_euler_xyz(request.axis_angle.into()));
        Ok(())
    }

    #[test]
    fn idle_tick_does_nothing() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut engine = TransitionEngine::default();
        let position = camera.position;
        assert!(!engine.tick(1.0, &mut camera));
        assert_eq!(camera.position, position);
        Ok(())
    }

    #[test]
    fn bad_dt_does_not_advance() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        let mut engine = TransitionEngine::default();
        engine.request(&OrientationRequest::from_face(ViewFace::Top), &camera);
        let start = camera.position;
        engine.tick(-1.0, &mut camera);
        engine.tick(f64::NAN, &mut camera);
        assert_eq!(camera.position, start);
        assert_eq!(engine.position_track().map(|t| t.elapsed), Some(0.0));
        Ok(())
    }

    #[test]
    fn offset_factor_scales_each_axis() -> Result<()> {
        let mut camera = Camera::initialize(800.0, 600.0)?;
        camera.position = Vec3::new(0.0, 0.0, 10.0);
        let mut engine = TransitionEngine::default();
        let request = OrientationRequest {
            offset_factor: Xyz::new(1.0, -0.5, 2.0),
            axis_angle: Xyz::default(),
        };
        engine.request(&request, &camera);
        assert_eq!(
            engine.position_track().map(|t| t.target),
            Some(Vec3::new(10.0, -5.0, 20.0))
        );
        Ok(())
    }
}
