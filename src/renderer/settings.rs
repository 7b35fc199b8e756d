use super::{ColorF, MAX_RENDER_DISTANCE};

/// Exponential depth fog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fog {
    pub color: ColorF,
    /// Must be `>= 0`.
    pub density: f32,
    /// Columns nearer than this are left untouched.
    pub start: f32,
    pub end: f32,
}

impl Default for Fog {
    fn default() -> Self {
        Self {
            color: ColorF::rgb(0.5, 0.5, 0.6),
            density: 0.02,
            start: 5.0,
            end: MAX_RENDER_DISTANCE,
        }
    }
}

impl Fog {
    /// Blend weight toward the fog colour at `depth`.
    #[inline]
    pub fn factor(&self, depth: f32) -> f32 {
        if depth < self.start {
            0.0
        } else {
            1.0 - (-self.density * depth).exp()
        }
    }
}

/// Post-processing toggles and parameters, read once per pass.
///
/// Tone mapping has no switch: it always runs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PostProcessing {
    pub bloom: bool,
    /// Luma in `[0, 1]` above which a pixel feeds the bloom.
    pub bloom_threshold: f32,
    pub bloom_intensity: f32,
    pub motion_blur: bool,
    pub motion_blur_strength: f32,
    pub chromatic_aberration: bool,
    pub aberration_strength: f32,
    pub gamma: f32,
    pub exposure: f32,
    pub vignette: bool,
    /// In `[0, 1]`; 1 blacks out the corners.
    pub vignette_intensity: f32,
    pub fxaa: bool,
}

impl Default for PostProcessing {
    fn default() -> Self {
        Self {
            bloom: true,
            bloom_threshold: 0.8,
            bloom_intensity: 0.3,
            motion_blur: false,
            motion_blur_strength: 0.5,
            chromatic_aberration: false,
            aberration_strength: 1.0,
            gamma: 2.2,
            exposure: 1.0,
            vignette: true,
            vignette_intensity: 0.4,
            fxaa: true,
        }
    }
}
