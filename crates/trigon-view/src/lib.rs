//! Orthographic single-mesh viewer core: camera rig, turntable orbit,
//! animated view changes and face picking with a highlight overlay.

pub mod viewer;

pub use viewer::{
    Camera, FaceHit, HighlightOverlay, OrientationRequest, RotationMode, ViewFace, ViewerConfig,
    ViewerContext,
};
