use super::math::Vec3;

/// Three-vertex wireframe drawn over the picked face. The vertex buffer is a
/// fixed array rewritten in place; `needs_update` tells the renderer to
/// re-upload it.
#[derive(Clone, Debug, Default)]
pub struct HighlightOverlay {
    positions: [f64; 9],
    visible: bool,
    needs_update: bool,
}

impl HighlightOverlay {
    pub fn show(&mut self, triangle: [Vec3; 3]) {
        for (slot, vertex) in self.positions.chunks_exact_mut(3).zip(triangle) {
            slot.copy_from_slice(&[vertex.x, vertex.y, vertex.z]);
        }
        self.visible = true;
        self.needs_update = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn positions(&self) -> &[f64; 9] {
        &self.positions
    }

    pub fn vertices(&self) -> [Vec3; 3] {
        let p = &self.positions;
        [
            Vec3::new(p[0], p[1], p[2]),
            Vec3::new(p[3], p[4], p[5]),
            Vec3::new(p[6], p[7], p[8]),
        ]
    }

    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// Returns and clears the dirty flag.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }
}
