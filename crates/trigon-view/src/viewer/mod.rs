mod bvh;
pub mod camera;
pub mod config;
pub mod context;
pub mod math;
pub mod orbit;
pub mod orientation;
pub mod overlay;
pub mod pick;
pub mod scene;
pub mod transition;

pub use camera::{Camera, CameraBasis, Ray};
pub use config::ViewerConfig;
pub use context::{RotationMode, ViewerContext};
pub use orbit::{OrbitConfig, OrbitController};
pub use orientation::{OrientationRequest, ViewFace, Xyz};
pub use overlay::HighlightOverlay;
pub use pick::{FaceHit, PickPhase, PickState, pick};
pub use scene::{MeshObject, ROOT_SCALE, Surface};
pub use transition::TransitionEngine;
