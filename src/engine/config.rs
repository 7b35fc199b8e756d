use thiserror::Error;

use crate::renderer::{Fog, PostProcessing};

/// Largest accepted frame-buffer side, in pixels.
pub const MAX_RESOLUTION: usize = 8192;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("resolution must be non-zero")]
    ZeroResolution,
    #[error("resolution {w}x{h} exceeds {MAX_RESOLUTION} per side")]
    ResolutionTooLarge { w: usize, h: usize },
    #[error("fog density {0} is negative")]
    NegativeFogDensity(f32),
    #[error("fog range {start}..{end} is invalid")]
    FogRange { start: f32, end: f32 },
    #[error("{0} = {1} is outside [0, 1]")]
    ThresholdOutOfRange(&'static str, f32),
    #[error("gamma {0} must be positive")]
    NonPositiveGamma(f32),
    #[error("exposure {0} must be positive")]
    NonPositiveExposure(f32),
    #[error("at least one render thread is required")]
    ZeroThreads,
}

/// Everything the engine is configured with up front.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EngineConfig {
    pub width: usize,
    pub height: usize,
    /// Column workers for the wall pass; 1 = serial. More than
    /// `MAX_THREADS` is accepted and clamped at render time.
    pub threads: usize,
    pub fog: Fog,
    pub post: PostProcessing,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            threads: 1,
            fog: Fog::default(),
            post: PostProcessing::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (w, h) = (self.width, self.height);
        if w == 0 || h == 0 {
            return Err(ConfigError::ZeroResolution);
        }
        if w > MAX_RESOLUTION || h > MAX_RESOLUTION {
            return Err(ConfigError::ResolutionTooLarge { w, h });
        }
        if self.threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        let fog = &self.fog;
        if fog.density < 0.0 {
            return Err(ConfigError::NegativeFogDensity(fog.density));
        }
        if fog.start < 0.0 || fog.start > fog.end {
            return Err(ConfigError::FogRange {
                start: fog.start,
                end: fog.end,
            });
        }

        let post = &self.post;
        for (name, v) in [
            ("bloom_threshold", post.bloom_threshold),
            ("vignette_intensity", post.vignette_intensity),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(ConfigError::ThresholdOutOfRange(name, v));
            }
        }
        if post.gamma <= 0.0 {
            return Err(ConfigError::NonPositiveGamma(post.gamma));
        }
        if post.exposure <= 0.0 {
            return Err(ConfigError::NonPositiveExposure(post.exposure));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::MAX_RENDER_DISTANCE;

    #[test]
    fn defaults_are_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.validate(), Ok(()));
        assert_eq!((cfg.width, cfg.height, cfg.threads), (1280, 720, 1));
        assert_eq!(cfg.fog.end, MAX_RENDER_DISTANCE);
        assert!(cfg.post.bloom && cfg.post.fxaa && cfg.post.vignette);
        assert!(!cfg.post.motion_blur && !cfg.post.chromatic_aberration);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = EngineConfig::default();

        let cfg = EngineConfig { width: 0, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroResolution));

        let cfg = EngineConfig { height: MAX_RESOLUTION + 1, ..base };
        assert!(matches!(cfg.validate(), Err(ConfigError::ResolutionTooLarge { .. })));

        let cfg = EngineConfig { threads: 0, ..base };
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroThreads));

        let mut cfg = base;
        cfg.fog.density = -0.1;
        assert_eq!(cfg.validate(), Err(ConfigError::NegativeFogDensity(-0.1)));

        let mut cfg = base;
        cfg.fog.start = 60.0;
        assert!(matches!(cfg.validate(), Err(ConfigError::FogRange { .. })));

        let mut cfg = base;
        cfg.post.bloom_threshold = 1.5;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::ThresholdOutOfRange("bloom_threshold", 1.5))
        );

        let mut cfg = base;
        cfg.post.gamma = 0.0;
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveGamma(0.0)));

        let mut cfg = base;
        cfg.post.exposure = -1.0;
        assert_eq!(cfg.validate(), Err(ConfigError::NonPositiveExposure(-1.0)));
    }
}
