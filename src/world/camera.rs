use glam::Vec2;

use crate::{math::EPSILON, sim::PhysicsBody};

const STAND_Z: f32 = 0.5;
const CROUCH_Z: f32 = 0.3;
const PITCH_LIMIT: f32 = 1.0;
const BOB_RATE: f32 = 8.0;
/// Head-bob amplitude in screen pixels.
const BOB_AMPLITUDE: f32 = 5.0;

/// Player view-point.
///
/// * `dir` is the unit view direction, `plane` the perpendicular camera
///   plane; `|plane| / |dir|` fixes the horizontal field of view.
/// * `z` is eye height in tile units (floor = 0, ceiling = 1).
/// * `pitch` shifts the horizon by `pitch * screen_height` pixels.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub body: PhysicsBody,
    pub dir: Vec2,
    pub plane: Vec2,
    pub pitch: f32,
    pub z: f32,
    pub bob_phase: f32,
    pub bob_offset: f32,
    pub crouching: bool,
}

impl Camera {
    pub fn new(pos: Vec2, dir: Vec2, plane: Vec2) -> Self {
        Self {
            body: PhysicsBody::new(pos),
            dir,
            plane,
            pitch: 0.0,
            z: STAND_Z,
            bob_phase: 0.0,
            bob_offset: 0.0,
            crouching: false,
        }
    }

    /// Camera looking along `dir` with a horizontal field of view of
    /// `fov_deg` degrees; the plane points to the camera's right.
    pub fn with_fov(pos: Vec2, dir: Vec2, fov_deg: f32) -> Self {
        let dir = dir.normalize_or(Vec2::X);
        let half = (fov_deg.to_radians() * 0.5).tan();
        Self::new(pos, dir, right_of(dir) * half)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.body.pos
    }

    #[inline]
    pub fn vel(&self) -> Vec2 {
        self.body.vel
    }

    /*──────────────────────── projection ───────────────────────*/

    /// Ray direction for screen column `x`; camera-x runs from -1 at the
    /// left edge to +1 at the right edge.
    #[inline(always)]
    pub fn ray_dir(&self, x: usize, width: usize) -> Vec2 {
        let camera_x = 2.0 * x as f32 / width as f32 - 1.0;
        self.dir + self.plane * camera_x
    }

    /// World point into camera space: `.x` lateral, `.y` depth.
    ///
    /// `None` when the `[plane, dir]` basis is degenerate.
    pub fn to_camera_space(&self, p: Vec2) -> Option<Vec2> {
        let det = self.plane.x * self.dir.y - self.dir.x * self.plane.y;
        if det.abs() < EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let d = p - self.body.pos;
        Some(Vec2::new(
            inv * (self.dir.y * d.x - self.dir.x * d.y),
            inv * (-self.plane.y * d.x + self.plane.x * d.y),
        ))
    }

    /// Screen row of the horizon, including pitch and head-bob.
    #[inline]
    pub fn horizon(&self, height: usize) -> i32 {
        let h = height as f32;
        (h * 0.5 + self.pitch * h + self.bob_offset) as i32
    }

    /// Screen-space basis of the view: `(right, forward)`, both unit.
    pub fn basis(&self) -> (Vec2, Vec2) {
        let fwd = self.dir.normalize_or(Vec2::X);
        (right_of(fwd), fwd)
    }

    /*──────────────────────── movement ─────────────────────────*/

    pub fn move_forward(&mut self, amount: f32) {
        self.body.vel += self.dir * amount;
    }

    pub fn move_backward(&mut self, amount: f32) {
        self.body.vel -= self.dir * amount;
    }

    pub fn strafe_left(&mut self, amount: f32) {
        self.body.vel -= right_of(self.dir) * amount;
    }

    pub fn strafe_right(&mut self, amount: f32) {
        self.body.vel += right_of(self.dir) * amount;
    }

    /// Rotate view direction and plane together by `angle` radians.
    pub fn rotate(&mut self, angle: f32) {
        let r = Vec2::from_angle(angle);
        self.dir = r.rotate(self.dir);
        self.plane = r.rotate(self.plane);
    }

    pub fn look_up(&mut self, amount: f32) {
        self.pitch = (self.pitch + amount).min(PITCH_LIMIT);
    }

    pub fn look_down(&mut self, amount: f32) {
        self.pitch = (self.pitch - amount).max(-PITCH_LIMIT);
    }

    pub fn crouch(&mut self, on: bool) {
        self.crouching = on;
        self.z = if on { CROUCH_Z } else { STAND_Z };
    }

    /// Advance the head-bob while walking, ease back to rest otherwise.
    pub fn update_headbob(&mut self, dt: f32, moving: bool) {
        if moving {
            self.bob_phase += dt * BOB_RATE;
            self.bob_offset = self.bob_phase.sin() * BOB_AMPLITUDE;
        } else {
            self.bob_offset *= 0.9;
            if self.bob_offset.abs() < 0.1 {
                self.bob_offset = 0.0;
            }
        }
    }
}

/// Right-hand perpendicular: `(x, y) -> (y, -x)`.
#[inline(always)]
fn right_of(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
