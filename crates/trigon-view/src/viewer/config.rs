use serde::Deserialize;
use trigon_base::{Error, Result, Tolerance, ensure_positive};

use super::camera::{DEFAULT_POSITION, FIT_MARGIN};
use super::orbit::OrbitConfig;
use super::orientation::Xyz;
use super::scene::ROOT_SCALE;
use super::transition::DURATION;

pub const AUTO_ROTATE_STEP: f64 = 0.01;

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub width: f64,
    pub height: f64,
    pub camera_position: Xyz,
    pub fit_margin: f64,
    pub root_scale: f64,
    pub transition_duration: f64,
    /// Radians added to the root's X and Y rotation per auto-rotate frame.
    pub auto_rotate_step: f64,
    pub orbit: OrbitConfig,
    pub tolerance: Tolerance,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            camera_position: Xyz::new(DEFAULT_POSITION.x, DEFAULT_POSITION.y, DEFAULT_POSITION.z),
            fit_margin: FIT_MARGIN,
            root_scale: ROOT_SCALE,
            transition_duration: DURATION,
            auto_rotate_step: AUTO_ROTATE_STEP,
            orbit: OrbitConfig::default(),
            tolerance: Tolerance::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|err| Error::InvalidParameter(format!("viewer config: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0) {
            return Err(Error::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        ensure_positive("fit_margin", self.fit_margin)?;
        ensure_positive("root_scale", self.root_scale)?;
        ensure_positive("tolerance.linear", self.tolerance.linear)?;
        self.orbit.validate()?;
        if !self.auto_rotate_step.is_finite() {
            return Err(Error::InvalidParameter("auto_rotate_step must be finite".into()));
        }
        let p = self.camera_position;
        if !(p.x.is_finite() && p.y.is_finite() && p.z.is_finite()) {
            return Err(Error::InvalidParameter("camera_position must be finite".into()));
        }
        if !(self.transition_duration.is_finite() && self.transition_duration >= 0.0) {
            return Err(Error::InvalidParameter(format!(
                "transition_duration must be non-negative, got {}",
                self.transition_duration
            )));
        }
        Ok(())
    }
}
