//! Dynamic scene content: point lights, billboard sprites and particles.
//!
//! Every list is a fixed-capacity [`Pool`]; adding to a full pool drops the
//! new entry and reports `false`.

use glam::{Vec2, Vec3};

use super::{pool::Pool, texture::TextureId};
use crate::renderer::ColorF;

pub const MAX_LIGHTS: usize = 16;
pub const MAX_SPRITES: usize = 256;
pub const MAX_PARTICLES: usize = 2048;

const PARTICLE_DRAG: f32 = 0.98;
const GRAVITY: f32 = 9.81;

#[derive(Clone, Copy, Debug)]
pub struct Light {
    /// `z` is height above the floor in tile units.
    pub pos: Vec3,
    pub color: ColorF,
    pub intensity: f32,
    /// Nominal reach in tile units; falloff itself only depends on depth.
    pub radius: f32,
    pub cast_shadows: bool,
    /// Flicker amplitude as a fraction of `intensity`; 0 = steady.
    pub flicker: f32,
    /// Current intensity after flicker, what the renderer reads.
    pub level: f32,
}

impl Light {
    pub fn new(pos: Vec3, color: ColorF, intensity: f32, radius: f32) -> Self {
        Self {
            pos,
            color,
            intensity,
            radius,
            cast_shadows: false,
            flicker: 0.0,
            level: intensity,
        }
    }

    pub fn with_shadows(mut self) -> Self {
        self.cast_shadows = true;
        self
    }

    pub fn with_flicker(mut self, amount: f32) -> Self {
        self.flicker = amount;
        self
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Sprite {
    pub pos: Vec2,
    /// World height of the sprite's centre in tile units (floor = 0).
    pub z: f32,
    pub tex: TextureId,
    /// Number of animation frames laid out as consecutive texture ids.
    pub frames: u16,
    pub frame: u16,
    /// Frames per second; 0 = static.
    pub anim_speed: f32,
    pub anim_accum: f32,
    pub scale: Vec2,
    pub tint: ColorF,
}

impl Sprite {
    pub fn new(pos: Vec2, tex: TextureId) -> Self {
        Self {
            pos,
            z: 0.5,
            tex,
            frames: 1,
            frame: 0,
            anim_speed: 0.0,
            anim_accum: 0.0,
            scale: Vec2::ONE,
            tint: ColorF::WHITE,
        }
    }

    /// Texture of the frame currently shown.
    #[inline]
    pub fn current_tex(&self) -> TextureId {
        self.tex.wrapping_add(self.frame)
    }

    pub fn animate(&mut self, dt: f32) {
        if self.frames <= 1 || self.anim_speed <= 0.0 {
            return;
        }
        self.anim_accum += dt * self.anim_speed;
        while self.anim_accum >= 1.0 {
            self.anim_accum -= 1.0;
            self.frame = (self.frame + 1) % self.frames;
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Particle {
    pub pos: Vec3,
    pub vel: Vec3,
    pub color: ColorF,
    /// Seconds left; the particle is removed when this reaches zero.
    pub lifetime: f32,
    /// World-space radius.
    pub size: f32,
    pub gravity_scale: f32,
    pub tex: Option<TextureId>,
}

impl Particle {
    pub fn new(pos: Vec3, vel: Vec3, color: ColorF, lifetime: f32) -> Self {
        Self {
            pos,
            vel,
            color,
            lifetime,
            size: 0.1,
            gravity_scale: 1.0,
            tex: None,
        }
    }

    /// Integrate one step; returns `false` once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        self.lifetime -= dt;
        if self.lifetime <= 0.0 {
            return false;
        }
        self.pos += self.vel * dt;
        self.vel.z -= GRAVITY * self.gravity_scale * dt;
        self.vel *= PARTICLE_DRAG;
        // fade out during the final second
        if self.lifetime < 1.0 {
            self.color.a = self.lifetime;
        }
        true
    }
}

/// Everything besides the map that the renderer draws or lights.
#[derive(Clone, Debug)]
pub struct Scene {
    pub lights: Pool<Light>,
    pub sprites: Pool<Sprite>,
    pub particles: Pool<Particle>,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            lights: Pool::with_capacity(MAX_LIGHTS),
            sprites: Pool::with_capacity(MAX_SPRITES),
            particles: Pool::with_capacity(MAX_PARTICLES),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_light(&mut self, light: Light) -> bool {
        self.lights.push(light)
    }

    pub fn add_sprite(&mut self, sprite: Sprite) -> bool {
        self.sprites.push(sprite)
    }

    /// Emit up to `count` copies of `template`, spread by `spread(i)`
    /// added to the velocity; returns how many fitted.
    pub fn emit_particles<F>(&mut self, template: Particle, count: usize, mut spread: F) -> usize
    where
        F: FnMut(usize) -> Vec3,
    {
        let mut emitted = 0;
        for i in 0..count {
            let mut p = template;
            p.vel += spread(i);
            if !self.particles.push(p) {
                break;
            }
            emitted += 1;
        }
        emitted
    }

    pub fn update_particles(&mut self, dt: f32) {
        self.particles.retain_swap(|p| p.update(dt));
    }

    pub fn update_sprites(&mut self, dt: f32) {
        for s in self.sprites.iter_mut() {
            s.animate(dt);
        }
    }

    /// Recompute each light's current level from its flicker at time `t`.
    pub fn update_lights(&mut self, t: f32) {
        for (i, light) in self.lights.iter_mut().enumerate() {
            light.level = if light.flicker > 0.0 {
                let wobble = crate::math::fast_sin(t * 10.0 + i as f32 * 2.0);
                light.intensity * (1.0 + wobble * light.flicker)
            } else {
                light.intensity
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spark(lifetime: f32) -> Particle {
        Particle::new(Vec3::ZERO, Vec3::X, ColorF::WHITE, lifetime)
    }

    #[test]
    fn particles_expire_by_swap_remove() {
        let mut scene = Scene::new();
        scene.particles.push(spark(0.05));
        scene.particles.push(spark(5.0));
        scene.particles.push(spark(0.05));
        scene.update_particles(0.1);
        assert_eq!(scene.particles.len(), 1);
        assert!(scene.particles.as_slice()[0].lifetime > 4.0);
    }

    #[test]
    fn particle_falls_and_fades() {
        let mut p = spark(1.5);
        assert!(p.update(0.1));
        assert!(p.vel.z < 0.0);
        assert!((p.pos.x - 0.1).abs() < 1e-6);
        assert_eq!(p.color.a, 1.0);
        assert!(p.update(0.6));
        assert!((p.color.a - 0.8).abs() < 1e-5);
    }

    #[test]
    fn emission_is_bounded() {
        let mut scene = Scene::new();
        let n = scene.emit_particles(spark(1.0), MAX_PARTICLES + 10, |_| Vec3::ZERO);
        assert_eq!(n, MAX_PARTICLES);
        assert_eq!(scene.emit_particles(spark(1.0), 1, |_| Vec3::ZERO), 0);
    }

    #[test]
    fn light_pool_is_bounded() {
        let mut scene = Scene::new();
        let light = Light::new(Vec3::ZERO, ColorF::WHITE, 1.0, 5.0);
        for _ in 0..MAX_LIGHTS {
            assert!(scene.add_light(light));
        }
        assert!(!scene.add_light(light));
    }

    #[test]
    fn flicker_is_not_cumulative() {
        let mut scene = Scene::new();
        scene.add_light(Light::new(Vec3::ZERO, ColorF::WHITE, 8.0, 5.0).with_flicker(0.2));
        scene.add_light(Light::new(Vec3::ZERO, ColorF::WHITE, 3.0, 5.0));
        for step in 0..50 {
            scene.update_lights(step as f32 * 0.37);
            let l = scene.lights.as_slice();
            assert!(l[0].level >= 8.0 * 0.79 && l[0].level <= 8.0 * 1.21);
            assert_eq!(l[1].level, 3.0);
        }
    }

    #[test]
    fn sprite_animation_wraps() {
        let mut s = Sprite::new(Vec2::ZERO, 10);
        s.frames = 3;
        s.anim_speed = 10.0;
        s.animate(0.25);
        assert_eq!(s.frame, 2);
        assert_eq!(s.current_tex(), 12);
        s.animate(0.1);
        assert_eq!(s.frame, 0);
    }
}
