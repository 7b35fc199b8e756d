//! Lighting, shadow and fog passes.
//!
//! All three run over the finished colour buffer, one value per column
//! applied to every row. Light falloff uses the column's z-buffer depth as
//! the distance term; the shadow test reconstructs a world position from it.

use glam::{Vec2, Vec3};

use super::buffers::RenderBuffers;
use crate::{
    renderer::{Color, ColorF, Fog, Frame, MAX_RENDER_DISTANCE, channel},
    world::{Camera, Light, WorldMap},
};

pub const AMBIENT: ColorF = ColorF::rgb(0.2, 0.2, 0.25);
/// Upper bound of every light-factor channel.
pub const LIGHT_CLAMP: f32 = 2.0;
pub const SHADOW_MARCH_STEP: f32 = 0.1;
/// Colour multiplier for a pixel a shadow-casting light cannot see.
pub const SHADOW_FACTOR: f32 = 0.3;
/// Attenuated contributions below this are ignored.
const MIN_CONTRIBUTION: f32 = 0.01;

/// World position seen by column `x` at `depth`.
#[inline]
fn surface_point(cam: &Camera, x: usize, width: usize, depth: f32) -> Vec2 {
    cam.pos() + cam.ray_dir(x, width) * depth
}

/// Ambient plus every light attenuated by `depth`, each channel clamped to
/// [`LIGHT_CLAMP`].
pub fn light_factor(lights: &[Light], depth: f32) -> Vec3 {
    let mut sum = Vec3::new(AMBIENT.r, AMBIENT.g, AMBIENT.b);
    let falloff = 1.0 + depth * depth * 0.01;
    for light in lights {
        let attenuation = light.level / falloff;
        if attenuation > MIN_CONTRIBUTION {
            sum += Vec3::new(light.color.r, light.color.g, light.color.b) * attenuation;
        }
    }
    sum.min(Vec3::splat(LIGHT_CLAMP))
}

/// March from `from` toward `to` in fixed steps; any solid in-bounds cell
/// on the way blocks the light.
pub fn occluded(map: &WorldMap, from: Vec2, to: Vec2) -> bool {
    let delta = to - from;
    let dist = delta.length();
    if dist <= SHADOW_MARCH_STEP {
        return false;
    }
    let dir = delta / dist;
    let mut d = SHADOW_MARCH_STEP;
    while d < dist {
        let p = (from + dir * d).floor();
        let (x, y) = (p.x as i32, p.y as i32);
        if map.in_bounds(x, y) && map.is_solid(x, y) {
            return true;
        }
        d += SHADOW_MARCH_STEP;
    }
    false
}

#[inline(always)]
fn apply(c: u32, f: Vec3) -> u32 {
    let c = Color::from_argb(c);
    Color::rgb(
        channel(c.r as f32 * f.x),
        channel(c.g as f32 * f.y),
        channel(c.b as f32 * f.z),
    )
    .to_argb()
}

/// Multiply every pixel by its light factor; the factor is also stored in
/// the light buffer. Columns at the far plane stay unlit.
pub fn apply_lights(frame: &Frame<'_>, buf: &mut RenderBuffers) {
    let (w, h) = (buf.width, buf.height);
    if h == 0 {
        return;
    }
    let lights = frame.scene.lights.as_slice();

    // row 0 of the light buffer holds the per-column factor
    for x in 0..w {
        let depth = buf.depth[x];
        buf.light[x] = if depth >= MAX_RENDER_DISTANCE {
            Vec3::ONE
        } else {
            light_factor(lights, depth)
        };
    }
    let (first, rest) = buf.light.split_at_mut(w);
    for row in rest.chunks_exact_mut(w) {
        row.copy_from_slice(first);
    }
    for (c, f) in buf.color.iter_mut().zip(&buf.light) {
        *c = apply(*c, *f);
    }
}

/// Darken pixels hidden from any shadow-casting light.
pub fn apply_shadows(frame: &Frame<'_>, buf: &mut RenderBuffers) {
    let w = buf.width;
    buf.column.fill(1.0);
    let mut any = false;
    for light in frame.scene.lights.iter().filter(|l| l.cast_shadows) {
        let target = light.pos.truncate();
        for x in 0..w {
            let depth = buf.depth[x];
            if depth >= MAX_RENDER_DISTANCE {
                continue;
            }
            let p = surface_point(frame.camera, x, w, depth);
            if occluded(frame.map, p, target) {
                buf.column[x] *= SHADOW_FACTOR;
                any = true;
            }
        }
    }
    if !any {
        return;
    }
    for row in buf.color.chunks_exact_mut(w) {
        for (c, &k) in row.iter_mut().zip(&buf.column) {
            if k < 1.0 {
                *c = apply(*c, Vec3::splat(k));
            }
        }
    }
}

/// Blend every column from `fog.start` outward toward the fog colour.
pub fn apply_fog(fog: &Fog, buf: &mut RenderBuffers) {
    let w = buf.width;
    for (k, &depth) in buf.column.iter_mut().zip(&buf.depth) {
        *k = fog.factor(depth);
    }
    let fog_rgb = Vec3::new(fog.color.r, fog.color.g, fog.color.b) * 255.0;
    for row in buf.color.chunks_exact_mut(w) {
        for (c, &f) in row.iter_mut().zip(&buf.column) {
            if f <= 0.0 {
                continue;
            }
            let src = Color::from_argb(*c);
            let px = Vec3::new(src.r as f32, src.g as f32, src.b as f32);
            let out = px * (1.0 - f) + fog_rgb * f;
            *c = Color::rgb(channel(out.x), channel(out.y), channel(out.z)).to_argb();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::PostProcessing,
        world::{Scene, TextureBank},
    };

    fn white_light(pos: Vec3, intensity: f32) -> Light {
        Light::new(pos, ColorF::WHITE, intensity, 15.0)
    }

    #[test]
    fn light_at_zero_distance_is_clamped() {
        let f = light_factor(&[white_light(Vec3::new(3.0, 3.0, 2.0), 5.0)], 0.0);
        // 0.2 + 5 clamps to 2
        assert_eq!(f, Vec3::splat(LIGHT_CLAMP));
    }

    #[test]
    fn falloff_ignores_light_position() {
        // far from the lit surface, yet 5 / (1 + 0.01) still clamps
        let f = light_factor(&[white_light(Vec3::new(40.0, 40.0, 2.0), 5.0)], 1.0);
        assert_eq!(f, Vec3::splat(LIGHT_CLAMP));
    }

    #[test]
    fn attenuation_follows_inverse_square_falloff() {
        let f = light_factor(&[white_light(Vec3::ZERO, 1.0)], 10.0);
        // 0.2 + 1 / (1 + 100 * 0.01)
        assert!((f.x - 0.7).abs() < 1e-6);
        assert!((f.z - 0.75).abs() < 1e-6);
    }

    #[test]
    fn faint_contributions_are_dropped() {
        // 0.01 / 2 is below the cutoff
        let f = light_factor(&[white_light(Vec3::ZERO, 0.01)], 10.0);
        assert_eq!(f, Vec3::new(0.2, 0.2, 0.25));
    }

    #[test]
    fn wall_between_blocks_light() {
        let mut map = WorldMap::bordered(10, 10);
        map.set_tile(5, 5, 1);
        assert!(occluded(&map, Vec2::new(2.5, 5.5), Vec2::new(8.5, 5.5)));
        assert!(!occluded(&map, Vec2::new(2.5, 2.5), Vec2::new(8.5, 2.5)));
        // out-of-bounds cells never block
        assert!(!occluded(&map, Vec2::new(-3.0, -3.0), Vec2::new(-1.0, -1.0)));
    }

    fn frame_buffers(depth: f32) -> RenderBuffers {
        let mut buf = RenderBuffers::new(4, 3);
        buf.clear();
        buf.color.fill(0xFF_646464);
        buf.depth.fill(depth);
        buf
    }

    #[test]
    fn lighting_multiplies_and_fills_light_buffer() {
        let map = WorldMap::bordered(10, 10);
        let cam = Camera::new(Vec2::new(2.5, 2.5), Vec2::X, Vec2::new(0.0, -0.66));
        let bank = TextureBank::new();
        let scene = Scene::new();
        let (fog, post) = (Fog::default(), PostProcessing::default());
        let frame = Frame {
            map: &map,
            camera: &cam,
            textures: &bank,
            scene: &scene,
            fog: &fog,
            post: &post,
            threads: 1,
        };
        let mut buf = frame_buffers(2.0);
        buf.depth[3] = MAX_RENDER_DISTANCE;
        apply_lights(&frame, &mut buf);

        // 100 * 0.2 = 20, 100 * 0.25 = 25
        assert_eq!(Color::from_argb(buf.color[0]), Color::rgb(20, 20, 25));
        assert_eq!(buf.light[4 + 1], Vec3::new(0.2, 0.2, 0.25));
        // far column untouched
        assert_eq!(buf.color[3], 0xFF_646464);
        assert_eq!(buf.light[2 * 4 + 3], Vec3::ONE);
    }

    #[test]
    fn shadowed_columns_are_darkened() {
        let mut map = WorldMap::bordered(10, 10);
        for y in 1..9 {
            map.set_tile(6, y, 1);
        }
        let cam = Camera::new(Vec2::new(2.5, 5.5), Vec2::X, Vec2::new(0.0, -0.66));
        let bank = TextureBank::new();
        let mut scene = Scene::new();
        scene.add_light(white_light(Vec3::new(8.5, 5.5, 1.0), 5.0).with_shadows());
        let (fog, post) = (Fog::default(), PostProcessing::default());
        let frame = Frame {
            map: &map,
            camera: &cam,
            textures: &bank,
            scene: &scene,
            fog: &fog,
            post: &post,
            threads: 1,
        };
        let mut buf = frame_buffers(1.0);
        apply_shadows(&frame, &mut buf);
        // 100 * 0.3
        assert!(buf.color.iter().all(|&c| c == 0xFF_1E1E1E));
    }

    #[test]
    fn fog_blends_toward_fog_colour() {
        let fog = Fog::default();
        let mut buf = frame_buffers(fog.end);
        buf.depth[0] = 1.0;
        apply_fog(&fog, &mut buf);
        let f = 1.0 - (-0.02_f32 * fog.end).exp();
        let expected = (100.0 * (1.0 - f) + 0.5 * 255.0 * f) as u8;
        let c = Color::from_argb(buf.color[1]);
        assert!((c.r as i32 - expected as i32).abs() <= 1);
        // nearer than fog.start: untouched
        assert_eq!(buf.color[0], 0xFF_646464);
    }
}
