//! Billboard sprites and particles.
//!
//! Both are projected through the inverse of the camera's `[plane, dir]`
//! basis, culled when behind the camera, sorted far to near and drawn
//! column by column only where they are nearer than the z-buffer. Heights
//! are world `z` relative to the camera's eye height.

use glam::Vec2;

use super::buffers::RenderBuffers;
use crate::{
    renderer::{Color, ColorF, Frame, channel},
    world::{MAGENTA, TextureId},
};

/// Particles nearer than this to the camera plane are not drawn.
const NEAR_PLANE: f32 = 0.05;

/// A sprite projected to screen space for this frame.
#[derive(Clone, Copy, Debug)]
pub struct VisSprite {
    /// Squared x/y distance to the camera; the sort key.
    pub dist_sq: f32,
    /// Camera-space depth, always `> 0`.
    pub depth: f32,
    pub screen_x: f32,
    pub center_y: f32,
    pub width: f32,
    pub height: f32,
    pub tex: TextureId,
    pub tint: ColorF,
}

/// A particle projected to screen space for this frame.
#[derive(Clone, Copy, Debug)]
pub struct VisParticle {
    pub dist_sq: f32,
    pub depth: f32,
    pub x: i32,
    pub y: i32,
    pub radius: i32,
    pub color: ColorF,
    pub tex: Option<TextureId>,
}

/// Project and sort every sprite of the scene into `out` (farthest first).
pub fn collect_sprites(frame: &Frame<'_>, width: usize, height: usize, out: &mut Vec<VisSprite>) {
    out.clear();
    let cam = frame.camera;
    let (w, h) = (width as f32, height as f32);
    let horizon = cam.horizon(height) as f32;

    for s in frame.scene.sprites.iter() {
        let Some(t) = cam.to_camera_space(s.pos) else {
            continue;
        };
        if t.y <= 0.0 {
            continue;
        }
        let scale = (h / t.y).abs();
        out.push(VisSprite {
            dist_sq: (s.pos - cam.pos()).length_squared(),
            depth: t.y,
            screen_x: w * 0.5 * (1.0 + t.x / t.y),
            center_y: horizon - (s.z - cam.z) * scale,
            width: scale * s.scale.x,
            height: scale * s.scale.y,
            tex: s.current_tex(),
            tint: s.tint,
        });
    }
    out.sort_by(|a, b| b.dist_sq.total_cmp(&a.dist_sq));
}

/// Project and sort every live particle into `out` (farthest first).
pub fn collect_particles(
    frame: &Frame<'_>,
    width: usize,
    height: usize,
    out: &mut Vec<VisParticle>,
) {
    out.clear();
    let cam = frame.camera;
    let (w, h) = (width as f32, height as f32);
    let horizon = cam.horizon(height) as f32;
    let max_radius = w.max(h);

    for p in frame.scene.particles.iter() {
        let pos = p.pos.truncate();
        let Some(t) = cam.to_camera_space(pos) else {
            continue;
        };
        if t.y < NEAR_PLANE {
            continue;
        }
        let scale = h / t.y;
        out.push(VisParticle {
            dist_sq: (pos - cam.pos()).length_squared(),
            depth: t.y,
            x: (w * 0.5 * (1.0 + t.x / t.y)) as i32,
            y: (horizon - scale * (p.pos.z - cam.z)) as i32,
            radius: (p.size * scale).min(max_radius) as i32,
            color: p.color,
            tex: p.tex,
        });
    }
    out.sort_by(|a, b| b.dist_sq.total_cmp(&a.dist_sq));
}

pub fn draw_sprites(frame: &Frame<'_>, sprites: &[VisSprite], buf: &mut RenderBuffers) {
    let (w, h) = (buf.width as i32, buf.height as i32);
    for s in sprites {
        let left = s.screen_x - s.width * 0.5;
        let top = s.center_y - s.height * 0.5;
        let x0 = (left as i32).max(0);
        let x1 = ((s.screen_x + s.width * 0.5) as i32).min(w);
        let y0 = (top as i32).max(0);
        let y1 = ((s.center_y + s.height * 0.5) as i32).min(h);
        if x0 >= x1 || y0 >= y1 {
            continue;
        }
        let tex = frame.textures.get(s.tex);

        for x in x0..x1 {
            if s.depth >= buf.depth[x as usize] {
                continue;
            }
            let u = (x as f32 - left) / s.width;
            for y in y0..y1 {
                let texel = match tex {
                    Some(t) => t.sample(u, (y as f32 - top) / s.height),
                    None => MAGENTA,
                };
                if texel.a == 0 {
                    continue;
                }
                let c = texel.modulate(s.tint);
                let i = y as usize * buf.width + x as usize;
                buf.color[i] = Color { a: 255, ..c }.to_argb();
            }
        }
    }
}

pub fn draw_particles(frame: &Frame<'_>, particles: &[VisParticle], buf: &mut RenderBuffers) {
    let (w, h) = (buf.width as i64, buf.height as i64);
    for p in particles {
        let r = p.radius.max(0) as i64;
        let (cx, cy) = (p.x as i64, p.y as i64);
        let alpha = p.color.a.clamp(0.0, 1.0);
        let tex = p.tex.and_then(|id| frame.textures.get(id));
        let span = (2 * r + 1) as f32;

        // clip the disc's bounding box to the screen first
        for py in (cy - r).max(0)..=(cy + r).min(h - 1) {
            let dy = py - cy;
            for px in (cx - r).max(0)..=(cx + r).min(w - 1) {
                let dx = px - cx;
                if dx * dx + dy * dy > r * r {
                    continue;
                }
                if p.depth >= buf.depth[px as usize] {
                    continue;
                }
                let src = match tex {
                    Some(t) => {
                        let uv = Vec2::new((dx + r) as f32, (dy + r) as f32) / span;
                        t.sample(uv.x, uv.y).modulate(p.color)
                    }
                    None => p.color.to_color(),
                };
                let i = py as usize * buf.width + px as usize;
                let dst = Color::from_argb(buf.color[i]);
                let mix = |d: u8, s: u8| channel(d as f32 * (1.0 - alpha) + s as f32 * alpha);
                buf.color[i] = Color::rgb(mix(dst.r, src.r), mix(dst.g, src.g), mix(dst.b, src.b))
                    .to_argb();
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::{Fog, MAX_RENDER_DISTANCE, OPAQUE_BLACK, PostProcessing},
        world::{Camera, Particle, Scene, Sprite, Texture, TextureBank, WorldMap},
    };
    use glam::Vec3;

    const W: usize = 32;
    const H: usize = 24;

    fn camera() -> Camera {
        Camera::new(Vec2::new(2.5, 2.5), Vec2::X, Vec2::new(0.0, -0.66))
    }

    fn with_frame<T>(scene: &Scene, cam: &Camera, f: impl FnOnce(&Frame<'_>) -> T) -> T {
        let map = WorldMap::bordered(16, 16);
        let bank = bank();
        let (fog, post) = (Fog::default(), PostProcessing::default());
        let frame = Frame {
            map: &map,
            camera: cam,
            textures: &bank,
            scene,
            fog: &fog,
            post: &post,
            threads: 1,
        };
        f(&frame)
    }

    fn bank() -> TextureBank {
        let mut bank = TextureBank::new();
        let red = Texture::new("RED", 2, 2, vec![0xFF_FF0000; 4]).unwrap();
        bank.insert("RED", red).unwrap();
        let clear = Texture::new("CLEAR", 2, 2, vec![0x00_FF0000; 4]).unwrap();
        bank.insert("CLEAR", clear).unwrap();
        bank
    }

    /// Draw `scene` over a black frame whose every column has depth `z`.
    fn draw(scene: &Scene, z: f32) -> RenderBuffers {
        with_frame(scene, &camera(), |frame| {
            let mut buf = RenderBuffers::new(W, H);
            buf.clear();
            buf.depth.fill(z);

            let mut vis = Vec::new();
            collect_sprites(frame, W, H, &mut vis);
            draw_sprites(frame, &vis, &mut buf);
            let mut parts = Vec::new();
            collect_particles(frame, W, H, &mut parts);
            draw_particles(frame, &parts, &mut buf);
            buf
        })
    }

    fn scene_with_sprite_at(pos: Vec2) -> Scene {
        let mut scene = Scene::new();
        scene.add_sprite(Sprite::new(pos, 0));
        scene
    }

    #[test]
    fn sprite_in_front_is_drawn() {
        let buf = draw(&scene_with_sprite_at(Vec2::new(5.5, 2.5)), MAX_RENDER_DISTANCE);
        let centre = buf.color[(H / 2) * W + W / 2];
        assert_eq!(centre, 0xFF_FF0000);
    }

    #[test]
    fn sprite_behind_camera_is_culled() {
        let buf = draw(&scene_with_sprite_at(Vec2::new(0.5, 2.5)), MAX_RENDER_DISTANCE);
        assert!(buf.color.iter().all(|&c| c == OPAQUE_BLACK));
    }

    #[test]
    fn sprite_behind_wall_is_occluded() {
        // depth 3 == z-buffer 3 is not in front
        let buf = draw(&scene_with_sprite_at(Vec2::new(5.5, 2.5)), 3.0);
        assert!(buf.color.iter().all(|&c| c == OPAQUE_BLACK));
    }

    #[test]
    fn sprites_sort_far_to_near() {
        let mut scene = Scene::new();
        for x in [4.5, 9.5, 6.5] {
            scene.add_sprite(Sprite::new(Vec2::new(x, 2.5), 0));
        }
        let vis = with_frame(&scene, &camera(), |frame| {
            let mut vis = Vec::new();
            collect_sprites(frame, W, H, &mut vis);
            vis
        });
        let keys: Vec<f32> = vis.iter().map(|v| v.dist_sq).collect();
        assert_eq!(keys, vec![49.0, 16.0, 4.0]);
    }

    #[test]
    fn unknown_texture_draws_magenta() {
        let mut scene = Scene::new();
        scene.add_sprite(Sprite::new(Vec2::new(5.5, 2.5), 7));
        let buf = draw(&scene, MAX_RENDER_DISTANCE);
        assert_eq!(buf.color[(H / 2) * W + W / 2], MAGENTA.to_argb());
    }

    #[test]
    fn transparent_texels_are_skipped() {
        let mut scene = Scene::new();
        scene.add_sprite(Sprite::new(Vec2::new(5.5, 2.5), 1));
        let buf = draw(&scene, MAX_RENDER_DISTANCE);
        assert!(buf.color.iter().all(|&c| c == OPAQUE_BLACK));
    }

    #[test]
    fn particle_blends_and_respects_depth() {
        let mut scene = Scene::new();
        let mut p = Particle::new(Vec3::new(4.5, 2.5, 0.5), Vec3::ZERO, ColorF::WHITE, 0.5);
        p.size = 0.3;
        p.color.a = 0.5;
        scene.particles.push(p);

        let buf = draw(&scene, MAX_RENDER_DISTANCE);
        let c = Color::from_argb(buf.color[(H / 2) * W + W / 2]);
        // half alpha over black
        assert!((126..=128).contains(&c.r));

        let buf = draw(&scene, 1.0);
        assert!(buf.color.iter().all(|&c| c == OPAQUE_BLACK));
    }

    #[test]
    fn particle_at_the_camera_plane_is_skipped() {
        let mut scene = Scene::new();
        let mut p = Particle::new(Vec3::new(2.5 + 1e-5, 2.5, 0.5), Vec3::ZERO, ColorF::WHITE, 1.0);
        p.size = 1.0;
        scene.particles.push(p);

        let parts = with_frame(&scene, &camera(), |frame| {
            let mut out = Vec::new();
            collect_particles(frame, W, H, &mut out);
            out
        });
        assert!(parts.is_empty());
        let buf = draw(&scene, MAX_RENDER_DISTANCE);
        assert!(buf.color.iter().all(|&c| c == OPAQUE_BLACK));
    }

    #[test]
    fn close_particle_radius_is_capped_and_clipped() {
        let mut scene = Scene::new();
        let mut p = Particle::new(Vec3::new(2.6, 2.5, 0.5), Vec3::ZERO, ColorF::WHITE, 1.0);
        p.size = 1.0;
        scene.particles.push(p);

        let parts = with_frame(&scene, &camera(), |frame| {
            let mut out = Vec::new();
            collect_particles(frame, W, H, &mut out);
            out
        });
        // 1.0 * 24 / 0.1 is capped at the larger screen side
        assert_eq!(parts[0].radius, W as i32);

        let buf = draw(&scene, MAX_RENDER_DISTANCE);
        assert!(buf.color.iter().all(|&c| Color::from_argb(c).r == 255));
    }

    #[test]
    fn crouching_lowers_eye_for_sprites_and_particles_alike() {
        let mut scene = scene_with_sprite_at(Vec2::new(5.5, 2.5));
        scene
            .particles
            .push(Particle::new(Vec3::new(5.5, 2.5, 0.5), Vec3::ZERO, ColorF::WHITE, 1.0));

        let project = |cam: &Camera| {
            with_frame(&scene, cam, |frame| {
                let (mut sprites, mut parts) = (Vec::new(), Vec::new());
                collect_sprites(frame, W, H, &mut sprites);
                collect_particles(frame, W, H, &mut parts);
                (sprites[0].center_y, parts[0].y)
            })
        };

        let mut cam = camera();
        let (sprite_y, particle_y) = project(&cam);
        assert_eq!(sprite_y, (H / 2) as f32);
        assert_eq!(particle_y, (H / 2) as i32);

        // eye at 0.3: both rise on screen by 0.2 * 24 / 3
        cam.crouch(true);
        let (sprite_y, particle_y) = project(&cam);
        assert!(sprite_y < (H / 2) as f32);
        assert_eq!(particle_y, sprite_y as i32);
    }
}
