use glam::{IVec2, Vec2};
use log::{debug, info};
use smallvec::SmallVec;

use super::config::{ConfigError, EngineConfig};
use crate::{
    renderer::{Frame, Renderer, RendererExt, Rgba},
    sim::{self, InputCmd, PHYSICS_SUBSTEPS, ScriptContext, ScriptRegistry},
    world::{Camera, Scene, TextureBank, WorldMap},
};

/// Below this speed the head-bob eases back to rest.
const BOB_MIN_SPEED: f32 = 0.01;

/// Owns the world state and a [`Renderer`]; advances the simulation and
/// draws frames.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub config: EngineConfig,
    pub map: WorldMap,
    pub camera: Camera,
    pub textures: TextureBank,
    pub scene: Scene,
    pub scripts: ScriptRegistry,
    time: f32,
    frame_count: u64,
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        renderer: R,
        config: EngineConfig,
        map: WorldMap,
        camera: Camera,
        textures: TextureBank,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        info!(
            "engine: {}x{}, {} thread(s), map {}x{}, {} texture(s)",
            config.width,
            config.height,
            config.threads,
            map.width(),
            map.height(),
            textures.len()
        );
        Ok(Self {
            renderer,
            config,
            map,
            camera,
            textures,
            scene: Scene::new(),
            scripts: ScriptRegistry::new(),
            time: 0.0,
            frame_count: 0,
        })
    }

    /// Simulated seconds since start.
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Frames drawn so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Apply one frame of player intent; returns the toggled door cells.
    pub fn apply_input(&mut self, cmd: &InputCmd, dt: f32) -> SmallVec<[IVec2; 4]> {
        sim::player_input(&mut self.camera, &mut self.map, cmd, dt)
    }

    /// Advance the simulation by `dt` seconds.
    ///
    /// Order: physics substeps, head-bob, doors, sprite animation,
    /// particles, light flicker, scripts.
    pub fn update(&mut self, dt: f32) {
        let sub = dt / PHYSICS_SUBSTEPS as f32;
        let mut collided = false;
        for _ in 0..PHYSICS_SUBSTEPS {
            collided |= self.camera.body.update(&self.map, sub);
        }

        let moving = self.camera.vel().length() > BOB_MIN_SPEED;
        self.camera.update_headbob(dt, moving);

        self.map.update_doors(dt);
        self.scene.update_sprites(dt);
        self.scene.update_particles(dt);

        self.time += dt;
        self.scene.update_lights(self.time);

        if self.scripts.is_empty() {
            return;
        }
        let at = self.camera.pos();
        let mut ctx = ScriptContext {
            map: &mut self.map,
            scene: &mut self.scene,
            camera: &self.camera,
            time: self.time,
        };
        if collided {
            self.scripts.collide_all(&mut ctx, at);
        }
        self.scripts.update_all(&mut ctx, dt);
    }

    /// Fire a named script's trigger hook; `false` if there is none.
    pub fn trigger(&mut self, name: &str, activator: Vec2) -> bool {
        let mut ctx = ScriptContext {
            map: &mut self.map,
            scene: &mut self.scene,
            camera: &self.camera,
            time: self.time,
        };
        let fired = self.scripts.trigger(name, &mut ctx, activator);
        if !fired {
            debug!("no active script `{name}` to trigger");
        }
        fired
    }

    /// Borrow everything a frame is drawn from.
    pub fn frame(&self) -> Frame<'_> {
        view(&self.map, &self.camera, &self.textures, &self.scene, &self.config)
    }

    /// Draw one frame and hand it to `submit`.
    pub fn render_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let Self {
            renderer,
            config,
            map,
            camera,
            textures,
            scene,
            ..
        } = self;
        let frame = view(map, camera, textures, scene, config);
        renderer.draw_frame(config.width, config.height, &frame, submit);
        self.frame_count += 1;
    }
}

/// The [`Frame`] over the world parts, kept apart from the renderer so both
/// can be borrowed at once.
fn view<'a>(
    map: &'a WorldMap,
    camera: &'a Camera,
    textures: &'a TextureBank,
    scene: &'a Scene,
    config: &'a EngineConfig,
) -> Frame<'a> {
    Frame {
        map,
        camera,
        textures,
        scene,
        fog: &config.fog,
        post: &config.post,
        threads: config.threads,
    }
}
