//! Placeholder texture set, generated at start-up so the engine runs without
//! any asset files.

use log::info;

use super::texture::{TEXTURE_SIZE, Texture, TextureBank, TextureError};
use crate::{math::NoiseGen, renderer::Color};

pub const BRICK: &str = "BRICK";
pub const STONE: &str = "STONE";
pub const WOOD: &str = "WOOD";
pub const METAL: &str = "METAL";
/// Round alpha-masked sprite.
pub const ORB: &str = "ORB";

const N: usize = TEXTURE_SIZE;

fn brick() -> Result<Texture, TextureError> {
    let tex = Texture::from_fn(BRICK, N, N, |x, y| {
        let row = y / 16;
        let offset = if row % 2 == 1 { 16 } else { 0 };
        let mortar = y % 16 < 2 || (x + offset) % 32 < 2;
        if mortar {
            Color::rgb(160, 160, 150)
        } else {
            let grain = ((x * 7 + y * 13) % 23) as u8;
            Color::rgb(140 + grain, 50 + grain / 2, 40)
        }
    })?;
    // mortar lines stand out slightly in the normal map
    let normals = (0..N * N)
        .map(|i| {
            let (x, y) = (i % N, i / N);
            if y % 16 < 2 {
                [128, 200, 200]
            } else if x % 32 < 2 {
                [200, 128, 200]
            } else {
                [128, 128, 255]
            }
        })
        .collect();
    tex.with_normal_map(normals)
}

fn stone() -> Result<Texture, TextureError> {
    Texture::from_fn(STONE, N, N, |x, y| {
        let v = 96 + ((x * y) % 50) as u8;
        Color::rgb(v, v, v + 8)
    })
}

fn wood(noise: &NoiseGen) -> Result<Texture, TextureError> {
    Texture::from_fn(WOOD, N, N, |x, y| {
        let n = noise.perlin2(x as f32 * 0.1, y as f32 * 0.5);
        let rings = ((x as f32 * 0.3 + n * 4.0).sin() * 0.5 + 0.5) * 40.0;
        Color::rgb(110 + rings as u8, 70 + (rings * 0.6) as u8, 35)
    })
}

fn metal(noise: &NoiseGen) -> Result<Texture, TextureError> {
    let tex = Texture::from_fn(METAL, N, N, |x, y| {
        let n = noise.perlin2(x as f32 * 0.2, y as f32 * 0.2);
        let v = (150.0 + n * 40.0) as u8;
        Color::rgb(v, v, v.saturating_add(10))
    })?;
    // rivets glow faintly
    let rivet = |x: usize, y: usize| x % 16 == 8 && y % 16 == 8;
    let specular = (0..N * N).map(|_| 200).collect();
    let emission = (0..N * N)
        .map(|i| if rivet(i % N, i / N) { 255 } else { 0 })
        .collect();
    tex.with_specular_map(specular)?.with_emission_map(emission)
}

fn orb() -> Result<Texture, TextureError> {
    let c = (N as f32 - 1.0) * 0.5;
    Texture::from_fn(ORB, N, N, |x, y| {
        let d = ((x as f32 - c).powi(2) + (y as f32 - c).powi(2)).sqrt() / c;
        if d > 1.0 {
            Color::new(0, 0, 0, 0)
        } else {
            let glow = (1.0 - d) * 155.0;
            Color::rgb(100 + glow as u8, 180 + (glow * 0.4) as u8, 255)
        }
    })
}

impl TextureBank {
    /// Bank pre-filled with the placeholder set: brick, stone, wood, metal
    /// and an orb sprite.
    pub fn with_placeholders(noise: &NoiseGen) -> Result<Self, TextureError> {
        let mut bank = Self::new();
        bank.insert(BRICK, brick()?)?;
        bank.insert(STONE, stone()?)?;
        bank.insert(WOOD, wood(noise)?)?;
        bank.insert(METAL, metal(noise)?)?;
        bank.insert(ORB, orb()?)?;
        info!("generated {} placeholder textures", bank.len());
        Ok(bank)
    }
}
