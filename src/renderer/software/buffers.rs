use glam::Vec3;

use crate::renderer::{MAX_RENDER_DISTANCE, OPAQUE_BLACK, Rgba};

/// Engine-owned frame storage, sized to the screen resolution.
///
/// * `color` – row-major ARGB pixels.
/// * `depth` – one value per **column**.
/// * `light` – per-pixel light factor written by the lighting pass.
/// * two post-process scratch frames, so a separable blur can ping-pong.
#[derive(Default)]
pub struct RenderBuffers {
    pub width: usize,
    pub height: usize,
    pub color: Vec<Rgba>,
    pub depth: Vec<f32>,
    pub light: Vec<Vec3>,
    scratch: [Vec<Rgba>; 2],
    /// One value per column, free for any pass to use.
    pub(super) column: Vec<f32>,
}

impl RenderBuffers {
    pub fn new(width: usize, height: usize) -> Self {
        let mut b = Self::default();
        b.resize(width, height);
        b
    }

    /// Reallocate if the resolution changed; returns whether it did.
    pub fn resize(&mut self, width: usize, height: usize) -> bool {
        if width == self.width && height == self.height {
            return false;
        }
        let n = width * height;
        self.width = width;
        self.height = height;
        self.color.resize(n, OPAQUE_BLACK);
        self.depth.resize(width, MAX_RENDER_DISTANCE);
        self.light.resize(n, Vec3::ONE);
        for s in &mut self.scratch {
            s.resize(n, 0);
        }
        self.column.resize(width, 0.0);
        true
    }

    /// Black frame, every column at the far plane, neutral light.
    pub fn clear(&mut self) {
        self.color.fill(OPAQUE_BLACK);
        self.depth.fill(MAX_RENDER_DISTANCE);
        self.light.fill(Vec3::ONE);
    }

    #[inline(always)]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Colour buffer plus both scratch frames, borrowed together.
    pub(super) fn split(&mut self) -> (&mut [Rgba], &mut [Rgba], &mut [Rgba]) {
        let [a, b] = &mut self.scratch;
        (self.color.as_mut_slice(), a.as_mut_slice(), b.as_mut_slice())
    }

    /// Copy the colour buffer into the first scratch frame and return
    /// `(snapshot, color)` for passes that must not read what they write.
    pub(super) fn snapshot(&mut self) -> (&[Rgba], &mut [Rgba]) {
        let [a, _] = &mut self.scratch;
        a.copy_from_slice(&self.color);
        (a.as_slice(), self.color.as_mut_slice())
    }
}
