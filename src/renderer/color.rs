/// Pixel format of the software frame-buffer (0xAARRGGBB).
pub type Rgba = u32;

pub const OPAQUE_BLACK: Rgba = 0xFF_00_00_00;

/// 8-bit per channel colour, unpacked from / packed to [`Rgba`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    #[inline(always)]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline(always)]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline(always)]
    pub const fn from_argb(c: Rgba) -> Self {
        Self {
            r: (c >> 16) as u8,
            g: (c >> 8) as u8,
            b: c as u8,
            a: (c >> 24) as u8,
        }
    }

    #[inline(always)]
    pub const fn to_argb(self) -> Rgba {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }

    /// Average of the three channels in `[0, 1]`.
    #[inline(always)]
    pub fn luma(self) -> f32 {
        (self.r as f32 + self.g as f32 + self.b as f32) / (3.0 * 255.0)
    }

    /// Scale RGB by `f`, saturating at 255; alpha is kept.
    #[inline(always)]
    pub fn scaled(self, f: f32) -> Self {
        Self {
            r: channel(self.r as f32 * f),
            g: channel(self.g as f32 * f),
            b: channel(self.b as f32 * f),
            a: self.a,
        }
    }

    /// Per-channel multiply by a float colour, saturating at 255.
    #[inline(always)]
    pub fn modulate(self, c: ColorF) -> Self {
        Self {
            r: channel(self.r as f32 * c.r),
            g: channel(self.g as f32 * c.g),
            b: channel(self.b as f32 * c.b),
            a: self.a,
        }
    }

    /// `self * (1 - t) + other * t`, result is opaque.
    #[inline(always)]
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let mix = |a: u8, b: u8| channel(a as f32 * (1.0 - t) + b as f32 * t);
        Self::rgb(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
        )
    }
}

/// Float-per-channel colour; RGB nominally in `[0, 1]` but may exceed it
/// while light is being accumulated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorF {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for ColorF {
    fn default() -> Self {
        Self::WHITE
    }
}

impl ColorF {
    pub const WHITE: ColorF = ColorF::new(1.0, 1.0, 1.0, 1.0);
    pub const BLACK: ColorF = ColorF::new(0.0, 0.0, 0.0, 1.0);

    #[inline(always)]
    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline(always)]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// `[0, 1]` floats to bytes; values outside saturate.
    #[inline(always)]
    pub fn to_color(self) -> Color {
        Color::new(
            channel(self.r * 255.0),
            channel(self.g * 255.0),
            channel(self.b * 255.0),
            channel(self.a * 255.0),
        )
    }

    /// Clamp each RGB channel to `max`.
    #[inline(always)]
    pub fn min(self, max: f32) -> Self {
        Self::new(self.r.min(max), self.g.min(max), self.b.min(max), self.a)
    }
}

/// Float → byte with truncation, saturating to `[0, 255]`.
#[inline(always)]
pub fn channel(v: f32) -> u8 {
    v.clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing() {
        let c = Color::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_argb(), 0x78_12_34_56);
        assert_eq!(Color::from_argb(0x78_12_34_56), c);
    }

    #[test]
    fn scaling_saturates() {
        let c = Color::rgb(200, 100, 0).scaled(2.0);
        assert_eq!((c.r, c.g, c.b), (255, 200, 0));
    }

    #[test]
    fn lerp_endpoints() {
        let a = Color::rgb(10, 20, 30);
        let b = Color::rgb(250, 240, 230);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
    }
}
