//! Full-screen post-processing passes.
//!
//! Fixed order: bloom, motion blur, chromatic aberration, tone mapping,
//! vignette, FXAA. Every pass rewrites `buffers.color`; those that would read
//! what they write work from a scratch snapshot.

use glam::Vec2;
use log::trace;

use super::buffers::RenderBuffers;
use crate::{
    renderer::{Color, PostProcessing, Rgba, channel},
    world::Camera,
};

/// Half of the symmetric 9-tap Gaussian, centre first.
pub const GAUSSIAN_KERNEL: [f32; 5] = [0.227027, 0.1945946, 0.1216216, 0.054054, 0.016216];
pub const FXAA_EDGE_THRESHOLD: f32 = 0.125;
pub const MAX_BLUR_SAMPLES: i32 = 16;
const MIN_BLUR_SPEED: f32 = 0.01;

/// Run every enabled pass in order. Tone mapping always runs.
pub fn run(post: &PostProcessing, camera: &Camera, buf: &mut RenderBuffers) {
    if buf.width == 0 || buf.height == 0 {
        return;
    }
    if post.bloom {
        bloom(post.bloom_threshold, post.bloom_intensity, buf);
    }
    if post.motion_blur {
        let (right, forward) = camera.basis();
        let v = camera.vel();
        motion_blur(Vec2::new(v.dot(right), v.dot(forward)), post.motion_blur_strength, buf);
    }
    if post.chromatic_aberration {
        chromatic_aberration(post.aberration_strength, buf);
    }
    tone_map(post.exposure, post.gamma, buf);
    if post.vignette {
        vignette(post.vignette_intensity, buf);
    }
    if post.fxaa {
        fxaa(buf);
    }
}

/*──────────────────────────────── bloom ──────────────────────────────*/

/// Extract pixels brighter than `threshold`, blur them with the separable
/// Gaussian and add the result back scaled by `intensity`.
pub fn bloom(threshold: f32, intensity: f32, buf: &mut RenderBuffers) {
    let (w, h) = (buf.width, buf.height);
    let (color, bright, blurred) = buf.split();

    let mut any = false;
    for (dst, &src) in bright.iter_mut().zip(color.iter()) {
        if Color::from_argb(src).luma() > threshold {
            *dst = src;
            any = true;
        } else {
            *dst = 0;
        }
    }
    if !any {
        return;
    }

    // horizontal: bright -> blurred
    for y in 0..h {
        let row = &bright[y * w..(y + 1) * w];
        for x in 0..w {
            let sum = taps(x, w, |i| row[i]);
            blurred[y * w + x] = Color::rgb(channel(sum[0]), channel(sum[1]), channel(sum[2])).to_argb();
        }
    }

    // vertical + additive composite
    for y in 0..h {
        for x in 0..w {
            let sum = taps(y, h, |i| blurred[i * w + x]);
            let i = y * w + x;
            let o = Color::from_argb(color[i]);
            let add = |c: u8, s: f32| channel(c as f32 + s * intensity);
            color[i] = Color::rgb(add(o.r, sum[0]), add(o.g, sum[1]), add(o.b, sum[2])).to_argb();
        }
    }
}

/// Weighted sum of the 9 taps around `at`; out-of-range taps are skipped.
#[inline(always)]
fn taps(at: usize, len: usize, fetch: impl Fn(usize) -> Rgba) -> [f32; 3] {
    let mut sum = [0.0f32; 3];
    for k in -4i32..=4 {
        let s = at as i32 + k;
        if s < 0 || s >= len as i32 {
            continue;
        }
        let c = Color::from_argb(fetch(s as usize));
        let wgt = GAUSSIAN_KERNEL[k.unsigned_abs() as usize];
        sum[0] += c.r as f32 * wgt;
        sum[1] += c.g as f32 * wgt;
        sum[2] += c.b as f32 * wgt;
    }
    sum
}

/*───────────────────────────── motion blur ───────────────────────────*/

/// Average taps along the screen-space `velocity`.
///
/// The number of taps grows with speed (`|v| · strength · 10`), capped at
/// [`MAX_BLUR_SAMPLES`]; below two taps nothing happens. Only taps that land
/// on screen are averaged.
pub fn motion_blur(velocity: Vec2, strength: f32, buf: &mut RenderBuffers) {
    let speed = velocity.length();
    if speed < MIN_BLUR_SPEED {
        return;
    }
    let samples = ((speed * strength * 10.0) as i32).min(MAX_BLUR_SAMPLES);
    if samples < 2 {
        return;
    }
    trace!("motion blur: {samples} taps");
    let dir = velocity / speed;
    let (w, h) = (buf.width as i32, buf.height as i32);
    let (src, color) = buf.snapshot();

    for y in 0..h {
        for x in 0..w {
            let mut sum = [0.0f32; 3];
            let mut n = 0u32;
            for s in 0..samples {
                let offset = (s - samples / 2) as f32 * 2.0;
                let sx = x + (dir.x * offset) as i32;
                let sy = y + (dir.y * offset) as i32;
                if sx < 0 || sx >= w || sy < 0 || sy >= h {
                    continue;
                }
                let c = Color::from_argb(src[(sy * w + sx) as usize]);
                sum[0] += c.r as f32;
                sum[1] += c.g as f32;
                sum[2] += c.b as f32;
                n += 1;
            }
            if n == 0 {
                continue;
            }
            let n = n as f32;
            color[(y * w + x) as usize] =
                Color::rgb(channel(sum[0] / n), channel(sum[1] / n), channel(sum[2] / n)).to_argb();
        }
    }
}

/*────────────────────────── chromatic aberration ─────────────────────*/

/// Red is sampled `offset` pixels to the left, blue to the right; green is
/// unchanged. Samples off screen read as 0.
pub fn chromatic_aberration(strength: f32, buf: &mut RenderBuffers) {
    let offset = (strength * 3.0) as i32;
    if offset == 0 {
        return;
    }
    let w = buf.width;
    let (src, color) = buf.snapshot();
    for (src_row, row) in src.chunks_exact(w).zip(color.chunks_exact_mut(w)) {
        for (x, px) in row.iter_mut().enumerate() {
            let fetch = |sx: i32| {
                (0..w as i32)
                    .contains(&sx)
                    .then(|| Color::from_argb(src_row[sx as usize]))
            };
            let r = fetch(x as i32 - offset).map_or(0, |c| c.r);
            let b = fetch(x as i32 + offset).map_or(0, |c| c.b);
            let g = Color::from_argb(src_row[x]).g;
            *px = Color::rgb(r, g, b).to_argb();
        }
    }
}

/*───────────────────────────── tone mapping ──────────────────────────*/

/// Reinhard `x / (1 + x)` after exposure, then gamma `x^(1/gamma)`.
pub fn tone_map(exposure: f32, gamma: f32, buf: &mut RenderBuffers) {
    let lut = tone_lut(exposure, gamma);
    for px in &mut buf.color {
        let c = Color::from_argb(*px);
        *px = Color::rgb(lut[c.r as usize], lut[c.g as usize], lut[c.b as usize]).to_argb();
    }
}

fn tone_lut(exposure: f32, gamma: f32) -> [u8; 256] {
    let inv_gamma = 1.0 / gamma;
    let mut lut = [0u8; 256];
    for (i, v) in lut.iter_mut().enumerate() {
        let x = i as f32 / 255.0 * exposure;
        let x = x / (1.0 + x);
        *v = channel(x.powf(inv_gamma) * 255.0);
    }
    lut
}

/*─────────────────────────────── vignette ────────────────────────────*/

pub fn vignette(intensity: f32, buf: &mut RenderBuffers) {
    let (w, h) = (buf.width, buf.height);
    let centre = Vec2::new(w as f32 * 0.5, h as f32 * 0.5);
    let max_dist = centre.length();
    if max_dist <= 0.0 {
        return;
    }
    for y in 0..h {
        for x in 0..w {
            let d = Vec2::new(x as f32, y as f32).distance(centre);
            let f = (1.0 - d / max_dist * intensity).max(0.0);
            let i = y * w + x;
            buf.color[i] = Color::from_argb(buf.color[i]).scaled(f).to_argb();
        }
    }
}

/*───────────────────────────────── FXAA ──────────────────────────────*/

/// Interior pixels whose summed luma difference to their four neighbours
/// exceeds [`FXAA_EDGE_THRESHOLD`] become the 5-tap average.
pub fn fxaa(buf: &mut RenderBuffers) {
    let (w, h) = (buf.width, buf.height);
    if w < 3 || h < 3 {
        return;
    }
    let (src, color) = buf.snapshot();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let taps = [src[i], src[i - w], src[i + w], src[i - 1], src[i + 1]].map(Color::from_argb);
            let lc = taps[0].luma();
            let edge: f32 = taps[1..].iter().map(|c| (lc - c.luma()).abs()).sum();
            if edge <= FXAA_EDGE_THRESHOLD {
                continue;
            }
            let avg = |f: fn(&Color) -> u8| (taps.iter().map(|c| f(c) as u32).sum::<u32>() / 5) as u8;
            color[i] = Color::rgb(avg(|c| c.r), avg(|c| c.g), avg(|c| c.b)).to_argb();
        }
    }
}

/*==============================================================================
 *                                   Tests
 *============================================================================*/
