//! Native script hooks.
//!
//! A script is any type implementing [`Script`]; every hook has an empty
//! default so implementors override only what they need. Scripts live in a
//! bounded [`ScriptRegistry`] keyed by a unique name.

use glam::{Vec2, Vec3};
use log::debug;
use thiserror::Error;

use crate::{
    math::{fast_cos, fast_sin},
    renderer::ColorF,
    world::{Camera, Particle, Scene, WorldMap},
};

pub const MAX_SCRIPTS: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("script `{0}` is already registered")]
    Duplicate(String),
    #[error("script registry is full ({MAX_SCRIPTS} scripts)")]
    Full,
}

/// What a hook may see and change.
pub struct ScriptContext<'a> {
    pub map: &'a mut WorldMap,
    pub scene: &'a mut Scene,
    pub camera: &'a Camera,
    /// Simulated seconds since start.
    pub time: f32,
}

pub trait Script {
    /// Called once per simulation step.
    fn update(&mut self, _ctx: &mut ScriptContext<'_>, _dt: f32) {}

    /// The player body ran into something at `at`.
    fn on_collision(&mut self, _ctx: &mut ScriptContext<'_>, _at: Vec2) {}

    /// Explicit activation, e.g. from a trigger volume or a key press.
    fn on_trigger(&mut self, _ctx: &mut ScriptContext<'_>, _activator: Vec2) {}
}

struct Entry {
    name: String,
    active: bool,
    script: Box<dyn Script>,
}

#[derive(Default)]
pub struct ScriptRegistry {
    entries: Vec<Entry>,
}

impl ScriptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<S>(&mut self, name: impl Into<String>, script: S) -> Result<(), ScriptError>
    where
        S: Script + 'static,
    {
        let name = name.into();
        if self.entries.iter().any(|e| e.name == name) {
            return Err(ScriptError::Duplicate(name));
        }
        if self.entries.len() >= MAX_SCRIPTS {
            return Err(ScriptError::Full);
        }
        debug!("script `{name}` registered");
        self.entries.push(Entry {
            name,
            active: true,
            script: Box::new(script),
        });
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Enable or disable a script; `false` if no script has that name.
    pub fn set_active(&mut self, name: &str, active: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(e) => {
                e.active = active;
                true
            }
            None => false,
        }
    }

    pub fn update_all(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        for e in self.entries.iter_mut().filter(|e| e.active) {
            e.script.update(ctx, dt);
        }
    }

    /// Notify every active script of a player collision at `at`.
    pub fn collide_all(&mut self, ctx: &mut ScriptContext<'_>, at: Vec2) {
        for e in self.entries.iter_mut().filter(|e| e.active) {
            e.script.on_collision(ctx, at);
        }
    }

    /// Fire `name`'s trigger hook; `false` if missing or inactive.
    pub fn trigger(&mut self, name: &str, ctx: &mut ScriptContext<'_>, activator: Vec2) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name && e.active) {
            Some(e) => {
                e.script.on_trigger(ctx, activator);
                true
            }
            None => false,
        }
    }
}

/*──────────────────────────── built-ins ────────────────────────────*/

/// Emits a burst of orange sparks every `interval` seconds, and once more
/// whenever triggered.
#[derive(Clone, Debug)]
pub struct Fountain {
    pub pos: Vec3,
    pub interval: f32,
    pub burst: usize,
    /// Horizontal speed of the outer ring of sparks.
    pub spread: f32,
    pub color: ColorF,
    pub lifetime: f32,
    accum: f32,
}

impl Fountain {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            interval: 0.25,
            burst: 8,
            spread: 1.0,
            color: ColorF::rgb(1.0, 0.5, 0.0),
            lifetime: 2.0,
            accum: 0.0,
        }
    }

    fn emit(&self, scene: &mut Scene) -> usize {
        let template = Particle::new(self.pos, Vec3::new(0.0, 0.0, 5.0), self.color, self.lifetime);
        let n = self.burst.max(1) as f32;
        let spread = self.spread;
        scene.emit_particles(template, self.burst, |i| {
            let a = i as f32 / n * std::f32::consts::TAU;
            Vec3::new(fast_cos(a), fast_sin(a), 0.0) * spread
        })
    }
}

impl Script for Fountain {
    fn update(&mut self, ctx: &mut ScriptContext<'_>, dt: f32) {
        if self.interval <= 0.0 {
            return;
        }
        self.accum += dt;
        while self.accum >= self.interval {
            self.accum -= self.interval;
            self.emit(ctx.scene);
        }
    }

    fn on_trigger(&mut self, ctx: &mut ScriptContext<'_>, _activator: Vec2) {
        self.emit(ctx.scene);
    }
}
