// Format-agnostic repository of textures produced by the placeholder
// generators (or any other loader). The renderer and world logic interact
// through `TextureId` only.

use std::collections::HashMap;

use glam::Vec3;

use crate::renderer::{Color, Rgba};

/// Runtime handle for a texture in this bank.
///
/// *Guaranteed* to remain stable for the lifetime of the bank.
pub type TextureId = u16;

/// Side length of the generated placeholder textures.
pub const TEXTURE_SIZE: usize = 64;

pub const MAX_TEXTURES: usize = 32;

/// Sentinel returned for ids the bank does not know.
pub const MAGENTA: Color = Color::rgb(255, 0, 255);

/// CPU-side storage: 32-bit **ARGB** (0xAARRGGBB) in row-major order.
///
/// Width and height are powers of two so wrap-around addressing is a mask.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    pub name: String,
    pub w: usize,
    pub h: usize,
    pub pixels: Vec<Rgba>,
    /// Tangent-space normals, RGB8 per texel.
    pub normal_map: Option<Vec<[u8; 3]>>,
    pub specular_map: Option<Vec<u8>>,
    /// Self-illumination per texel; 255 ignores distance shading entirely.
    pub emission_map: Option<Vec<u8>>,
}

/// Things that can go wrong when building or using the bank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    /// Attempted to insert a second texture with an existing name.
    #[error("texture name `{0}` already present in bank")]
    Duplicate(String),

    /// Requested ID is outside `0 .. bank.len()`.
    #[error("texture id {0} out of range")]
    BadId(TextureId),

    #[error("texture size {w}x{h} is not a power of two")]
    NotPowerOfTwo { w: usize, h: usize },

    #[error("expected {expected} texels, got {got}")]
    SizeMismatch { expected: usize, got: usize },

    #[error("texture bank is full ({MAX_TEXTURES} entries)")]
    Full,
}

impl Texture {
    pub fn new<S: Into<String>>(
        name: S,
        w: usize,
        h: usize,
        pixels: Vec<Rgba>,
    ) -> Result<Self, TextureError> {
        if !w.is_power_of_two() || !h.is_power_of_two() {
            return Err(TextureError::NotPowerOfTwo { w, h });
        }
        if pixels.len() != w * h {
            return Err(TextureError::SizeMismatch {
                expected: w * h,
                got: pixels.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            w,
            h,
            pixels,
            normal_map: None,
            specular_map: None,
            emission_map: None,
        })
    }

    /// Build a texture by evaluating `f(x, y)` for every texel.
    pub fn from_fn<S, F>(name: S, w: usize, h: usize, mut f: F) -> Result<Self, TextureError>
    where
        S: Into<String>,
        F: FnMut(usize, usize) -> Color,
    {
        let mut pixels = Vec::with_capacity(w * h);
        for y in 0..h {
            for x in 0..w {
                pixels.push(f(x, y).to_argb());
            }
        }
        Self::new(name, w, h, pixels)
    }

    pub fn with_normal_map(mut self, map: Vec<[u8; 3]>) -> Result<Self, TextureError> {
        self.check_len(map.len())?;
        self.normal_map = Some(map);
        Ok(self)
    }

    pub fn with_specular_map(mut self, map: Vec<u8>) -> Result<Self, TextureError> {
        self.check_len(map.len())?;
        self.specular_map = Some(map);
        Ok(self)
    }

    pub fn with_emission_map(mut self, map: Vec<u8>) -> Result<Self, TextureError> {
        self.check_len(map.len())?;
        self.emission_map = Some(map);
        Ok(self)
    }

    fn check_len(&self, got: usize) -> Result<(), TextureError> {
        let expected = self.w * self.h;
        if got != expected {
            return Err(TextureError::SizeMismatch { expected, got });
        }
        Ok(())
    }

    /*──────────────────────── addressing ────────────────────────*/

    /// Wrapped texel index for integer texel coordinates.
    #[inline(always)]
    pub fn index(&self, tx: i32, ty: i32) -> usize {
        let x = tx as usize & (self.w - 1);
        let y = ty as usize & (self.h - 1);
        y * self.w + x
    }

    /// Texel index for normalised `(u, v)` with wrap-around.
    #[inline(always)]
    fn uv_index(&self, u: f32, v: f32) -> usize {
        let tx = (u * self.w as f32).floor() as i32;
        let ty = (v * self.h as f32).floor() as i32;
        self.index(tx, ty)
    }

    #[inline(always)]
    pub fn texel(&self, tx: i32, ty: i32) -> Rgba {
        self.pixels[self.index(tx, ty)]
    }

    /*──────────────────────── sampling ──────────────────────────*/

    /// Nearest-neighbour sample at normalised `(u, v)`.
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> Color {
        Color::from_argb(self.pixels[self.uv_index(u, v)])
    }

    /// Bilinear sample at normalised `(u, v)`, texel centres at +0.5.
    pub fn sample_bilinear(&self, u: f32, v: f32) -> Color {
        let x = u * self.w as f32 - 0.5;
        let y = v * self.h as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let (x0, y0) = (x0 as i32, y0 as i32);

        let c00 = Color::from_argb(self.texel(x0, y0));
        let c10 = Color::from_argb(self.texel(x0 + 1, y0));
        let c01 = Color::from_argb(self.texel(x0, y0 + 1));
        let c11 = Color::from_argb(self.texel(x0 + 1, y0 + 1));

        let mix = |a: u8, b: u8, c: u8, d: u8| {
            (a as f32 * (1.0 - fx) * (1.0 - fy)
                + b as f32 * fx * (1.0 - fy)
                + c as f32 * (1.0 - fx) * fy
                + d as f32 * fx * fy) as u8
        };
        Color::rgb(
            mix(c00.r, c10.r, c01.r, c11.r),
            mix(c00.g, c10.g, c01.g, c11.g),
            mix(c00.b, c10.b, c01.b, c11.b),
        )
    }

    /// Unit normal from the normal map, `+Z` when there is none.
    pub fn sample_normal(&self, u: f32, v: f32) -> Vec3 {
        match &self.normal_map {
            None => Vec3::Z,
            Some(map) => {
                let n = map[self.uv_index(u, v)];
                let decode = |c: u8| c as f32 / 255.0 * 2.0 - 1.0;
                Vec3::new(decode(n[0]), decode(n[1]), decode(n[2])).normalize_or(Vec3::Z)
            }
        }
    }

    /// Specular strength in `[0, 1]`, zero without a map.
    pub fn specular(&self, u: f32, v: f32) -> f32 {
        self.specular_map
            .as_ref()
            .map_or(0.0, |m| m[self.uv_index(u, v)] as f32 / 255.0)
    }

    /// Emission strength in `[0, 1]` for integer texel coordinates.
    #[inline]
    pub fn emission(&self, tx: i32, ty: i32) -> f32 {
        self.emission_map
            .as_ref()
            .map_or(0.0, |m| m[self.index(tx, ty)] as f32 / 255.0)
    }
}

/// Name-indexed cache of textures, at most [`MAX_TEXTURES`] entries.
///
/// Unknown ids never fail a frame: the sampling helpers answer [`MAGENTA`].
#[derive(Default)]
pub struct TextureBank {
    by_name: HashMap<String, TextureId>,
    data: Vec<Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    // ---------------------------------------------------------------------
    // Query helpers
    // ---------------------------------------------------------------------

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Obtain the id for a *loaded* texture by name.
    pub fn id(&self, name: &str) -> Option<TextureId> {
        self.by_name.get(name).copied()
    }

    /// Borrow a texture by id, with bounds-checking.
    pub fn texture(&self, id: TextureId) -> Result<&Texture, TextureError> {
        self.data.get(id as usize).ok_or(TextureError::BadId(id))
    }

    #[inline]
    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.data.get(id as usize)
    }

    /// Nearest sample; unknown ids answer [`MAGENTA`].
    #[inline]
    pub fn sample(&self, id: TextureId, u: f32, v: f32) -> Color {
        self.get(id).map_or(MAGENTA, |t| t.sample(u, v))
    }

    /// Bilinear sample; unknown ids answer [`MAGENTA`].
    #[inline]
    pub fn sample_bilinear(&self, id: TextureId, u: f32, v: f32) -> Color {
        self.get(id).map_or(MAGENTA, |t| t.sample_bilinear(u, v))
    }

    // ---------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------

    /// Insert a texture under `name`.
    ///
    /// * Returns the newly assigned `TextureId`.
    /// * Fails if the name already exists (`Duplicate`) or the bank is full.
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        tex: Texture,
    ) -> Result<TextureId, TextureError> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return Err(TextureError::Duplicate(name));
        }
        if self.data.len() >= MAX_TEXTURES {
            return Err(TextureError::Full);
        }
        let id = self.data.len() as TextureId;
        self.data.push(tex);
        self.by_name.insert(name, id);
        Ok(id)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Texture {
        // 2×2: red, green / blue, white
        Texture::new(
            "QUAD",
            2,
            2,
            vec![0xFF_FF0000, 0xFF_00FF00, 0xFF_0000FF, 0xFF_FFFFFF],
        )
        .unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let mut bank = TextureBank::new();
        let a = bank.insert("A", quad()).unwrap();
        let b = bank.insert("B", quad()).unwrap();
        assert_ne!(a, b);
        assert_eq!(bank.id("A"), Some(a));
        assert_eq!(bank.id("NOPE"), None);
        assert_eq!(bank.len(), 2);
    }

    #[test]
    fn duplicate_name_rejected() {
        let mut bank = TextureBank::new();
        bank.insert("WOOD", quad()).unwrap();
        let err = bank.insert("WOOD", quad()).unwrap_err();
        assert_eq!(err, TextureError::Duplicate("WOOD".into()));
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn bank_is_bounded() {
        let mut bank = TextureBank::new();
        for i in 0..MAX_TEXTURES {
            bank.insert(format!("T{i}"), quad()).unwrap();
        }
        assert_eq!(bank.insert("LAST", quad()), Err(TextureError::Full));
    }

    #[test]
    fn bad_id_guard_and_magenta_fallback() {
        let bank = TextureBank::new();
        let bad = TextureId::MAX;
        assert_eq!(bank.texture(bad).unwrap_err(), TextureError::BadId(bad));
        assert_eq!(bank.sample(bad, 0.5, 0.5), MAGENTA);
        assert_eq!(bank.sample_bilinear(3, 0.1, 0.9), MAGENTA);
    }

    #[test]
    fn non_power_of_two_rejected() {
        let err = Texture::new("X", 3, 4, vec![0; 12]).unwrap_err();
        assert_eq!(err, TextureError::NotPowerOfTwo { w: 3, h: 4 });
        let err = Texture::new("X", 4, 4, vec![0; 3]).unwrap_err();
        assert_eq!(err, TextureError::SizeMismatch { expected: 16, got: 3 });
    }

    #[test]
    fn nearest_sample_wraps() {
        let t = quad();
        assert_eq!(t.sample(0.25, 0.25), Color::rgb(255, 0, 0));
        assert_eq!(t.sample(0.75, 0.25), Color::rgb(0, 255, 0));
        assert_eq!(t.sample(1.25, 0.75), Color::rgb(0, 0, 255));
        assert_eq!(t.sample(-0.25, -0.25), Color::rgb(255, 255, 255));
    }

    #[test]
    fn bilinear_hits_texel_centres_exactly() {
        let t = quad();
        assert_eq!(t.sample_bilinear(0.25, 0.25), Color::rgb(255, 0, 0));
        assert_eq!(t.sample_bilinear(0.75, 0.75), Color::rgb(255, 255, 255));
        // halfway between red and green
        let mid = t.sample_bilinear(0.5, 0.25);
        assert_eq!((mid.r, mid.g, mid.b), (127, 127, 0));
    }

    #[test]
    fn auxiliary_maps() {
        let t = quad()
            .with_normal_map(vec![[255, 128, 128]; 4])
            .unwrap()
            .with_specular_map(vec![0, 255, 0, 0])
            .unwrap()
            .with_emission_map(vec![255, 0, 0, 0])
            .unwrap();
        assert!(t.sample_normal(0.1, 0.1).x > 0.9);
        assert_eq!(t.specular(0.75, 0.25), 1.0);
        assert_eq!(t.emission(0, 0), 1.0);
        assert_eq!(t.emission(1, 0), 0.0);
        assert_eq!(quad().sample_normal(0.5, 0.5), Vec3::Z);
        assert!(quad().with_emission_map(vec![0; 3]).is_err());
    }
}
