use log::{debug, trace};

use super::{
    buffers::RenderBuffers,
    columns::ColumnStrips,
    lighting, planes, post,
    sprites::{self, VisParticle, VisSprite},
    walls::WallCaster,
};
use crate::renderer::{Frame, Renderer, Rgba};

/// CPU renderer: owns the frame buffers and every per-frame scratch list,
/// all reused from frame to frame.
#[derive(Default)]
pub struct Software {
    buffers: RenderBuffers,
    strips: ColumnStrips,
    sprites: Vec<VisSprite>,
    particles: Vec<VisParticle>,
}

impl Software {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            buffers: RenderBuffers::new(width, height),
            ..Self::default()
        }
    }

    /// The buffers of the last frame drawn.
    pub fn buffers(&self) -> &RenderBuffers {
        &self.buffers
    }
}

impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        if self.buffers.resize(w, h) {
            debug!("software renderer: {w}x{h}");
        }
        self.buffers.clear();
        self.sprites.clear();
        self.particles.clear();
    }

    fn draw_scene(&mut self, frame: &Frame<'_>) {
        let (w, h) = (self.buffers.width, self.buffers.height);
        if w == 0 || h == 0 {
            return;
        }

        planes::draw_planes(frame, &mut self.buffers);

        let caster = WallCaster::new(frame.map, frame.camera, frame.textures, w, h);
        self.strips.render(&caster, frame.threads, &mut self.buffers);

        sprites::collect_sprites(frame, w, h, &mut self.sprites);
        sprites::draw_sprites(frame, &self.sprites, &mut self.buffers);

        sprites::collect_particles(frame, w, h, &mut self.particles);
        sprites::draw_particles(frame, &self.particles, &mut self.buffers);

        trace!(
            "scene: {} sprite(s), {} particle(s) visible",
            self.sprites.len(),
            self.particles.len()
        );
    }

    fn apply_lighting(&mut self, frame: &Frame<'_>) {
        if self.buffers.width == 0 || self.buffers.height == 0 {
            return;
        }
        lighting::apply_lights(frame, &mut self.buffers);
        lighting::apply_shadows(frame, &mut self.buffers);
        lighting::apply_fog(frame.fog, &mut self.buffers);
    }

    fn post_process(&mut self, frame: &Frame<'_>) {
        post::run(frame.post, frame.camera, &mut self.buffers);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.buffers.color, self.buffers.width, self.buffers.height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        math::NoiseGen,
        renderer::{Fog, PostProcessing, RendererExt},
        world::{Camera, Light, Scene, TextureBank, WorldMap},
    };
    use glam::{Vec2, Vec3};

    struct Fixture {
        map: WorldMap,
        camera: Camera,
        bank: TextureBank,
        scene: Scene,
        fog: Fog,
        post: PostProcessing,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = Scene::new();
            scene.add_light(
                Light::new(Vec3::new(8.5, 8.5, 2.0), crate::renderer::ColorF::rgb(1.0, 0.9, 0.7), 5.0, 15.0)
                    .with_shadows(),
            );
            Self {
                map: WorldMap::bordered(16, 16),
                camera: Camera::new(Vec2::new(4.5, 8.5), Vec2::X, Vec2::new(0.0, -0.66)),
                bank: TextureBank::with_placeholders(&NoiseGen::new()).unwrap(),
                scene,
                fog: Fog::default(),
                post: PostProcessing::default(),
            }
        }

        fn frame(&self, threads: usize) -> Frame<'_> {
            Frame {
                map: &self.map,
                camera: &self.camera,
                textures: &self.bank,
                scene: &self.scene,
                fog: &self.fog,
                post: &self.post,
                threads,
            }
        }
    }

    fn render(fx: &Fixture, threads: usize, w: usize, h: usize) -> (Vec<Rgba>, Vec<f32>) {
        let mut sw = Software::default();
        let mut out = Vec::new();
        sw.draw_frame(w, h, &fx.frame(threads), |fb, fw, fh| {
            assert_eq!((fw, fh), (w, h));
            out = fb.to_vec();
        });
        (out, sw.buffers().depth.clone())
    }

    #[test]
    fn centre_column_sees_the_east_wall() {
        let fx = Fixture::new();
        let (fb, depth) = render(&fx, 1, 32, 24);
        assert_eq!(fb.len(), 32 * 24);
        assert!((depth[16] - 10.5).abs() < 1e-4);
    }

    #[test]
    fn threaded_frame_matches_serial() {
        let fx = Fixture::new();
        let serial = render(&fx, 1, 40, 30);
        for threads in 2..=4 {
            assert_eq!(render(&fx, threads, 40, 30), serial, "threads = {threads}");
        }
    }

    #[test]
    fn resolution_change_reallocates() {
        let fx = Fixture::new();
        let mut sw = Software::new(8, 6);
        sw.draw_frame(16, 12, &fx.frame(1), |fb, w, h| {
            assert_eq!(fb.len(), w * h);
            assert_eq!((w, h), (16, 12));
        });
        assert_eq!(sw.buffers().depth.len(), 16);
    }

    #[test]
    fn empty_frame_is_harmless() {
        let fx = Fixture::new();
        let mut sw = Software::default();
        let mut called = false;
        sw.draw_frame(0, 0, &fx.frame(1), |fb, _, _| {
            assert!(fb.is_empty());
            called = true;
        });
        assert!(called);
    }
}
