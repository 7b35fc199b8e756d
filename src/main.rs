//! Interactive demo: a hand-built arena rendered by the software raycaster.
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- --threads 4
//! ```
//!
//! Controls  W/S or ↑/↓ move · A/D strafe · ←/→ turn · PgUp/PgDn look ·
//! mouse drag look · Shift run · Ctrl crouch · E doors · Space particles ·
//! B/M/V/F/C toggle bloom / motion blur / vignette / FXAA / aberration ·
//! Esc quit

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use glam::{IVec2, Vec2, Vec3};
use log::info;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use raycast_rs::{
    engine::{Engine, EngineConfig},
    math::NoiseGen,
    renderer::{ColorF, software::Software},
    sim::{FrameClock, Fountain, InputCmd},
    world::{
        BRICK, Camera, DoorAxis, Light, METAL, ORB, Particle, STONE, Scene, Sprite,
        TextureBank, TextureId, WOOD, WorldMap,
    },
};

const ARENA: usize = 24;
const BURST: usize = 24;

#[derive(Parser, Debug)]
#[command(version, about = "Software raycaster demo")]
struct Args {
    /// Frame-buffer width in pixels
    #[arg(long, short = 'W', default_value_t = 1280)]
    width: usize,

    /// Frame-buffer height in pixels
    #[arg(long, short = 'H', default_value_t = 720)]
    height: usize,

    /// Column workers for the wall pass
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Seed for the procedural textures (classic permutation if omitted)
    #[arg(long)]
    seed: Option<u32>,

    #[arg(long)]
    no_bloom: bool,
    #[arg(long)]
    motion_blur: bool,
    #[arg(long)]
    aberration: bool,
    #[arg(long)]
    no_vignette: bool,
    #[arg(long)]
    no_fxaa: bool,

    #[arg(long, default_value_t = 2.2)]
    gamma: f32,
    #[arg(long, default_value_t = 1.0)]
    exposure: f32,
}

impl Args {
    fn config(&self) -> EngineConfig {
        let mut cfg = EngineConfig {
            width: self.width,
            height: self.height,
            threads: self.threads,
            ..EngineConfig::default()
        };
        let post = &mut cfg.post;
        post.bloom = !self.no_bloom;
        post.motion_blur = self.motion_blur;
        post.chromatic_aberration = self.aberration;
        post.vignette = !self.no_vignette;
        post.fxaa = !self.no_fxaa;
        post.gamma = self.gamma;
        post.exposure = self.exposure;
        cfg
    }
}

fn tex(bank: &TextureBank, name: &str) -> Result<TextureId> {
    bank.id(name).with_context(|| format!("texture {name} missing"))
}

/*───────────────────────────── arena ─────────────────────────────*/

/// Two rooms split by a wall at x = 12 with a door in the middle, four
/// metal pillars, lights, orbs and a spark fountain.
fn build_arena(bank: &TextureBank, scene: &mut Scene) -> Result<WorldMap> {
    let (brick, stone, wood, metal, orb) = (
        tex(bank, BRICK)?,
        tex(bank, STONE)?,
        tex(bank, WOOD)?,
        tex(bank, METAL)?,
        tex(bank, ORB)?,
    );

    let mut map = WorldMap::bordered(ARENA, ARENA);
    map.fill_textures(brick, stone, wood);

    for (x, y) in [(6, 6), (6, 17), (17, 6), (17, 17)] {
        map.set_tile(x, y, 1);
        map.set_textures(x, y, metal, stone, wood);
    }
    for y in 1..ARENA as i32 - 1 {
        map.set_tile(12, y, 1);
    }
    map.add_door(IVec2::new(12, 12), DoorAxis::Horizontal, wood);

    let centre = ARENA as f32 * 0.5;
    scene.add_light(
        Light::new(
            Vec3::new(centre, centre, 2.0),
            ColorF::rgb(1.0, 0.9, 0.7),
            5.0,
            15.0,
        )
        .with_shadows(),
    );
    scene.add_light(
        Light::new(Vec3::new(10.0, 10.0, 2.0), ColorF::rgb(1.0, 0.3, 0.1), 8.0, 12.0)
            .with_shadows()
            .with_flicker(0.2),
    );
    scene.add_light(Light::new(
        Vec3::new(18.5, 12.5, 1.0),
        ColorF::rgb(0.3, 0.5, 1.0),
        4.0,
        10.0,
    ));

    for (pos, tint) in [
        (Vec2::new(8.5, 12.5), ColorF::rgb(1.0, 0.8, 0.4)),
        (Vec2::new(16.5, 9.5), ColorF::rgb(0.4, 0.8, 1.0)),
        (Vec2::new(16.5, 15.5), ColorF::WHITE),
    ] {
        let mut s = Sprite::new(pos, orb);
        s.scale = Vec2::splat(0.5);
        s.tint = tint;
        scene.add_sprite(s);
    }
    Ok(map)
}

/*──────────────────────────── input ──────────────────────────────*/

fn read_input(win: &Window, mouse: &mut Option<(f32, f32)>) -> InputCmd {
    let down = |k| win.is_key_down(k);
    let mut cmd = InputCmd::default();

    if down(Key::W) || down(Key::Up) {
        cmd.forward += 1.0;
    }
    if down(Key::S) || down(Key::Down) {
        cmd.forward -= 1.0;
    }
    if down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if down(Key::D) {
        cmd.strafe += 1.0;
    }
    if down(Key::Left) {
        cmd.turn += 1.0;
    }
    if down(Key::Right) {
        cmd.turn -= 1.0;
    }
    if down(Key::PageUp) {
        cmd.look += 1.0;
    }
    if down(Key::PageDown) {
        cmd.look -= 1.0;
    }

    // drag to look
    let pos = win.get_mouse_pos(MouseMode::Pass);
    if win.get_mouse_down(MouseButton::Left) {
        if let (Some((x0, y0)), Some((x1, y1))) = (*mouse, pos) {
            cmd.mouse_dx = x1 - x0;
            cmd.mouse_dy = y1 - y0;
        }
        *mouse = pos;
    } else {
        *mouse = None;
    }

    cmd.run = down(Key::LeftShift) || down(Key::RightShift);
    cmd.crouch = down(Key::LeftCtrl) || down(Key::RightCtrl);
    cmd.use_act = win.is_key_pressed(Key::E, KeyRepeat::No);
    cmd
}

/// Spray sparks in front of the camera.
fn emit_burst(engine: &mut Engine<Software>, noise: &NoiseGen) {
    let cam = &engine.camera;
    let origin = (cam.pos() + cam.dir * 0.75).extend(cam.z);
    let forward = (cam.dir * 2.0).extend(3.0);
    let t = engine.time();
    let template = Particle::new(origin, forward, ColorF::rgb(1.0, 0.6, 0.2), 2.0);
    let n = engine.scene.emit_particles(template, BURST, |i| {
        let k = i as f32 * 0.37;
        Vec3::new(noise.perlin2(k, t), noise.perlin2(t, k), noise.perlin2(k, k + t)) * 2.0
    });
    log::debug!("emitted {n} particle(s)");
}

fn toggle(win: &Window, key: Key, flag: &mut bool, name: &str) {
    if win.is_key_pressed(key, KeyRepeat::No) {
        *flag = !*flag;
        info!("{name}: {}", if *flag { "on" } else { "off" });
    }
}

/*───────────────────────────── main ──────────────────────────────*/

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = args.config();

    let noise = args.seed.map_or_else(NoiseGen::new, NoiseGen::with_seed);
    let bank = TextureBank::with_placeholders(&noise)?;

    let mut scene = Scene::new();
    let map = build_arena(&bank, &mut scene)?;
    let camera = Camera::with_fov(Vec2::new(3.5, 12.5), Vec2::X, 66.0);

    let mut engine = Engine::new(Software::default(), config, map, camera, bank)?;
    engine.scene = scene;
    engine
        .scripts
        .register("fountain", Fountain::new(Vec3::new(18.5, 12.5, 0.0)))?;

    let mut win = Window::new(
        "raycast_rs",
        config.width,
        config.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);

    let mut clock = FrameClock::new();
    let mut mouse = None;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = clock.tick();

        let cmd = read_input(&win, &mut mouse);
        engine.apply_input(&cmd, dt);
        if win.is_key_pressed(Key::Space, KeyRepeat::No) {
            emit_burst(&mut engine, &noise);
        }

        let post = &mut engine.config.post;
        toggle(&win, Key::B, &mut post.bloom, "bloom");
        toggle(&win, Key::M, &mut post.motion_blur, "motion blur");
        toggle(&win, Key::V, &mut post.vignette, "vignette");
        toggle(&win, Key::F, &mut post.fxaa, "fxaa");
        toggle(&win, Key::C, &mut post.chromatic_aberration, "chromatic aberration");

        engine.update(dt);

        let t0 = Instant::now();
        let mut shown = Ok(());
        engine.render_frame(|fb, w, h| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            shown = win.update_with_buffer(fb, w, h);
        });
        shown?;

        if last_print.elapsed() >= Duration::from_secs(3) && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            info!(
                "avg render: {:.2} ms ({:.1} FPS), {} particle(s)",
                avg_ms,
                1000.0 / avg_ms,
                engine.scene.particles.len()
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    info!("{} frame(s) in {:.1} s", clock.frames(), clock.time());
    Ok(())
}
