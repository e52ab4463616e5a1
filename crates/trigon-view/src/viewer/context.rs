use tracing::{debug, info};
use trigon_base::{Error, Result};
use trigon_io::Geometry;

use super::camera::Camera;
use super::config::ViewerConfig;
use super::math::{ORIGIN, Vec3};
use super::orbit::OrbitController;
use super::orientation::OrientationRequest;
use super::overlay::HighlightOverlay;
use super::pick::{FaceHit, PickPhase, PickState, pick};
use super::scene::{MeshObject, Surface};
use super::transition::TransitionEngine;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RotationMode {
    #[default]
    Off,
    On,
}

/// Owns everything one viewer session needs: the camera, the single mesh,
/// the highlight overlay and the controllers driving them.
#[derive(Debug)]
pub struct ViewerContext {
    config: ViewerConfig,
    camera: Camera,
    mesh: MeshObject,
    overlay: HighlightOverlay,
    pick_state: PickState,
    orbit: OrbitController,
    transitions: TransitionEngine,
    rotation_mode: RotationMode,
}

impl ViewerContext {
    pub fn new(geometry: Geometry, config: ViewerConfig) -> Result<Self> {
        config.validate()?;
        let surface = Surface::new(geometry.positions, geometry.colors)?;
        let mut mesh = MeshObject::new(surface);
        mesh.scale = Vec3::new(config.root_scale, config.root_scale, config.root_scale);

        let mut camera = Camera::initialize(config.width, config.height)?;
        camera.position = config.camera_position.into();
        camera.look_at(ORIGIN);
        let (min, max) = mesh.world_bounds().ok_or(Error::EmptyGeometry)?;
        camera.fit_to_bounds(min, max, config.fit_margin);
        let orbit = OrbitController::new(config.orbit.clone());
        camera.set_zoom(orbit.clamp_zoom(camera.zoom()))?;

        info!(
            faces = mesh.surface().face_count(),
            width = config.width,
            height = config.height,
            zoom = camera.zoom(),
            "viewer context created"
        );
        Ok(Self {
            orbit,
            transitions: TransitionEngine::new(config.transition_duration),
            config,
            camera,
            mesh,
            overlay: HighlightOverlay::default(),
            pick_state: PickState::default(),
            rotation_mode: RotationMode::Off,
        })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn mesh(&self) -> &MeshObject {
        &self.mesh
    }

    pub fn overlay(&self) -> &HighlightOverlay {
        &self.overlay
    }

    /// Lets the renderer consume the overlay's dirty flag.
    pub fn overlay_mut(&mut self) -> &mut HighlightOverlay {
        &mut self.overlay
    }

    pub fn pick_state(&self) -> &PickState {
        &self.pick_state
    }

    pub fn rotation_mode(&self) -> RotationMode {
        self.rotation_mode
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitions.is_active()
    }

    pub fn transition_duration(&self) -> f64 {
        self.transitions.duration()
    }

    /// One display frame: orbit input, then the orientation transition, then
    /// auto-rotation of the mesh root.
    pub fn frame(&mut self, dt: f64) {
        self.orbit.update(&mut self.camera);
        self.transitions.tick(dt, &mut self.camera);
        if self.rotation_mode == RotationMode::On {
            self.mesh.rotation.x += self.config.auto_rotate_step;
            self.mesh.rotation.y += self.config.auto_rotate_step;
        }
    }

    pub fn drag(&mut self, dx: f64, dy: f64) {
        let (_, height) = self.camera.viewport_size();
        self.orbit.rotate(dx, dy, height);
    }

    pub fn scroll(&mut self, steps: f64) {
        self.orbit.zoom(steps);
    }

    pub fn resize(&mut self, width: f64, height: f64) -> Result<()> {
        self.camera.resize(width, height)?;
        debug!(width, height, "viewport resized");
        Ok(())
    }

    pub fn request_orientation(&mut self, request: &OrientationRequest) {
        self.transitions.request(request, &self.camera);
    }

    /// Records the cursor and, while the pick tool is active, updates the
    /// highlighted face under it.
    pub fn pointer_moved(&mut self, ndc: [f64; 2]) -> Option<&FaceHit> {
        self.pick_state.set_cursor(ndc);
        if self.pick_state.tool_active() {
            self.refresh_pick();
        }
        self.pick_state.last_intersection()
    }

    pub fn set_tool_active(&mut self, active: bool) {
        if self.pick_state.tool_active() == active {
            return;
        }
        self.pick_state.set_tool_active(active);
        info!(active, "pick tool toggled");
        if active {
            self.refresh_pick();
        } else {
            self.overlay.hide();
        }
    }

    pub fn set_auto_rotate(&mut self, enabled: bool) {
        let mode = if enabled { RotationMode::On } else { RotationMode::Off };
        if mode != self.rotation_mode {
            info!(?mode, "auto-rotate changed");
            self.rotation_mode = mode;
        }
    }

    fn refresh_pick(&mut self) {
        let before = self.pick_state.phase();
        let hit = pick(
            self.pick_state.cursor_ndc(),
            &self.camera,
            &self.mesh,
            self.config.tolerance.linear,
        );
        match &hit {
            Some(hit) => self.overlay.show(hit.triangle),
            None => self.overlay.hide(),
        }
        self.pick_state.record(hit);

        let after = self.pick_state.phase();
        if before != after {
            match (after, self.pick_state.last_intersection()) {
                (PickPhase::Hit, Some(hit)) => {
                    debug!(face = hit.face_index, distance = hit.distance, "face picked")
                }
                _ => debug!(?after, "pick phase changed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Geometry {
        Geometry {
            positions: vec![-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0],
            normals: Vec::new(),
            colors: None,
        }
    }

    #[test]
    fn new_scales_root_and_fits_camera() -> Result<()> {
        let ctx = ViewerContext::new(triangle(), ViewerConfig::default())?;
        assert_eq!(ctx.mesh().scale, Vec3::new(2.0, 2.0, 2.0));
        // world box 4 x 4: min(800 / 4, 600 / 4) * 0.4
        assert!((ctx.camera().zoom() - 60.0).abs() < 1.0e-9);
        assert_eq!(ctx.pick_state().phase(), PickPhase::Idle);
        Ok(())
    }

    #[test]
    fn fitted_zoom_respects_orbit_range() -> Result<()> {
        let mut config = ViewerConfig::default();
        config.orbit.max_zoom = 20.0;
        let mut ctx = ViewerContext::new(triangle(), config)?;
        assert_eq!(ctx.camera().zoom(), 20.0);
        ctx.scroll(1.0);
        ctx.frame(1.0 / 60.0);
        assert_eq!(ctx.camera().zoom(), 20.0);
        ctx.scroll(-1.0);
        ctx.frame(1.0 / 60.0);
        assert!(ctx.camera().zoom() < 20.0);
        Ok(())
    }

    #[test]
    fn empty_geometry_is_fatal() {
        let result = ViewerContext::new(Geometry::default(), ViewerConfig::default());
        assert!(matches!(result, Err(Error::EmptyGeometry)));
    }

    #[test]
    fn pointer_is_ignored_until_tool_is_active() -> Result<()> {
        let mut ctx = ViewerContext::new(triangle(), ViewerConfig::default())?;
        assert!(ctx.pointer_moved([0.0, 0.0]).is_none());
        assert!(!ctx.overlay().is_visible());

        ctx.set_tool_active(true);
        assert_eq!(ctx.pick_state().phase(), PickPhase::Hit);
        assert!(ctx.overlay().is_visible());

        ctx.set_tool_active(false);
        assert_eq!(ctx.pick_state().phase(), PickPhase::Idle);
        assert!(!ctx.overlay().is_visible());
        Ok(())
    }

    #[test]
    fn auto_rotate_steps_root_each_frame() -> Result<()> {
        let mut ctx = ViewerContext::new(triangle(), ViewerConfig::default())?;
        ctx.frame(1.0 / 60.0);
        assert_eq!(ctx.mesh().rotation, Vec3::new(0.0, 0.0, 0.0));
        ctx.set_auto_rotate(true);
        ctx.frame(1.0 / 60.0);
        ctx.frame(1.0 / 60.0);
        assert!((ctx.mesh().rotation.x - 0.02).abs() < 1.0e-12);
        assert!((ctx.mesh().rotation.y - 0.02).abs() < 1.0e-12);
        assert_eq!(ctx.mesh().rotation.z, 0.0);
        Ok(())
    }
}
