use std::f64::consts::{FRAC_PI_2, PI};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::math::Vec3;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Xyz {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Xyz {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<Xyz> for Vec3 {
    fn from(v: Xyz) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Target view sent by an orientation widget.
///
/// `offset_factor` scales the camera's current distance from the origin per
/// axis to give the target position. `axis_angle` is the absolute target
/// orientation as XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrientationRequest {
    pub offset_factor: Xyz,
    pub axis_angle: Xyz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ViewFace {
    Top,
    Bottom,
    Left,
    Right,
    Front,
    Back,
}

impl ViewFace {
    pub const ALL: [ViewFace; 6] = [
        ViewFace::Top,
        ViewFace::Bottom,
        ViewFace::Left,
        ViewFace::Right,
        ViewFace::Front,
        ViewFace::Back,
    ];

    /// Outward normal of the face in the Z-up world; front looks along +Y.
    pub fn normal(self) -> Vec3 {
        match self {
            ViewFace::Top => Vec3::unit_z(),
            ViewFace::Bottom => -Vec3::unit_z(),
            ViewFace::Left => -Vec3::unit_x(),
            ViewFace::Right => Vec3::unit_x(),
            ViewFace::Front => -Vec3::unit_y(),
            ViewFace::Back => Vec3::unit_y(),
        }
    }

    fn euler(self) -> Xyz {
        match self {
            ViewFace::Top => Xyz::new(0.0, 0.0, 0.0),
            ViewFace::Bottom => Xyz::new(PI, 0.0, 0.0),
            ViewFace::Left => Xyz::new(FRAC_PI_2, -FRAC_PI_2, 0.0),
            ViewFace::Right => Xyz::new(FRAC_PI_2, FRAC_PI_2, 0.0),
            ViewFace::Front => Xyz::new(FRAC_PI_2, 0.0, 0.0),
            ViewFace::Back => Xyz::new(FRAC_PI_2, PI, 0.0),
        }
    }
}

impl OrientationRequest {
    pub fn from_json(text: &str) -> trigon_base::Result<Self> {
        serde_json::from_str(text)
            .map_err(|err| trigon_base::Error::InvalidParameter(format!("orientation request: {err}")))
    }

    pub fn from_face(face: ViewFace) -> Self {
        let n = face.normal();
        Self {
            offset_factor: Xyz::new(n.x, n.y, n.z),
            axis_angle: face.euler(),
        }
    }
}
