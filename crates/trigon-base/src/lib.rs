use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Tolerance {
    /// Smallest ray parameter accepted as a hit, and the relative
    /// determinant threshold below which a triangle counts as degenerate.
    pub linear: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            linear: 1.0e-9,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("invalid viewport size {width}x{height}")]
    InvalidViewport { width: f64, height: f64 },
    #[error("geometry provider yielded no triangles")]
    EmptyGeometry,
    #[error("invalid {name} buffer: {reason}")]
    InvalidBuffer { name: &'static str, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidParameter(format!("{name} must be > 0")));
    }
    Ok(())
}
