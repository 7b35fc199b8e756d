//! Floor and ceiling rasteriser.
//!
//! Works one screen row at a time: every row below the horizon maps to a
//! single floor distance, so walking across the row is a constant world
//! step between the leftmost and rightmost view rays. The ceiling row is the
//! floor row mirrored about the horizon and reuses the same samples' cells.

use glam::Vec2;

use super::buffers::RenderBuffers;
use crate::{
    renderer::{Frame, MAX_RENDER_DISTANCE},
    world::TextureId,
};

/// Distance to the floor seen `p` rows below the horizon.
///
/// `p` must be at least 1; the horizon row itself is never drawn.
#[inline]
pub fn row_distance(p: i32, height: usize, camera_z: f32) -> f32 {
    let h = height as f32;
    (0.5 * h + camera_z * h) / p as f32
}

pub fn draw_planes(frame: &Frame<'_>, buf: &mut RenderBuffers) {
    let (w, h) = (buf.width, buf.height);
    if w == 0 || h == 0 {
        return;
    }
    let hi = h as i32;
    let cam = frame.camera;
    let horizon = cam.horizon(h);

    let ray0 = cam.dir - cam.plane;
    let ray1 = cam.dir + cam.plane;

    // floor rows are horizon + p, ceiling rows horizon - p - 1
    let p_max = (hi - 1 - horizon).max(horizon - 1);
    let mut near = MAX_RENDER_DISTANCE;

    for p in 1..=p_max {
        let floor_row = horizon + p;
        let ceil_row = horizon - p - 1;
        let floor_on = (0..hi).contains(&floor_row);
        let ceil_on = (0..hi).contains(&ceil_row);
        if !floor_on && !ceil_on {
            continue;
        }

        let dist = row_distance(p, h, cam.z);
        if floor_on {
            near = near.min(dist);
        }
        let step = dist * (ray1 - ray0) / w as f32;
        let mut pos = cam.pos() + dist * ray0;

        for x in 0..w {
            let cell = pos.floor();
            let (cx, cy) = (cell.x as i32, cell.y as i32);
            let Vec2 { x: u, y: v } = pos - cell;

            if floor_on {
                let tex = frame.map.floor_texture(cx, cy);
                buf.color[floor_row as usize * w + x] = sample(frame, tex, u, v);
            }
            if ceil_on {
                let tex = frame.map.ceiling_texture(cx, cy);
                buf.color[ceil_row as usize * w + x] = sample(frame, tex, u, v);
            }
            pos += step;
        }
    }

    // min-z: the nearest visible floor row, walls overwrite it later
    for d in &mut buf.depth {
        *d = d.min(near);
    }
}

#[inline(always)]
fn sample(frame: &Frame<'_>, tex: TextureId, u: f32, v: f32) -> u32 {
    let c = frame.textures.sample_bilinear(tex, u, v);
    c.to_argb() | 0xFF_00_00_00
}
