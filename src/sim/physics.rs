//! Circle-vs-tile movement for the player body.
//!
//! Bodies slide along walls: a blocked move is retried on each axis alone,
//! then any remaining overlap with neighbouring solid tiles is pushed out
//! along the contact normal.

use glam::Vec2;

use crate::world::WorldMap;

/// Overlaps shorter than this are left alone (normal would be undefined).
const MIN_PUSH_DIST: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhysicsBody {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Velocity multiplier applied every update.
    pub friction: f32,
    /// Fraction of the normal velocity reflected on impact.
    pub bounce: f32,
}

impl PhysicsBody {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: 0.25,
            friction: 0.85,
            bounce: 0.0,
        }
    }

    /// Move out of an overlap and reflect the approaching velocity.
    pub fn resolve_collision(&mut self, normal: Vec2, penetration: f32) {
        self.pos += normal * penetration;
        let dot = self.vel.dot(normal);
        if dot < 0.0 {
            self.vel -= normal * dot * (1.0 + self.bounce);
        }
    }

    /// Advance one step; returns whether the move was blocked.
    pub fn update(&mut self, world: &WorldMap, dt: f32) -> bool {
        let old = self.pos;
        self.vel *= self.friction;
        self.pos += self.vel * dt;

        let mut collided = false;
        if check_collision(world, self.pos, self.radius) {
            collided = true;
            // x only
            self.pos.y = old.y;
            if check_collision(world, self.pos, self.radius) {
                // y only
                self.pos = Vec2::new(old.x, old.y + self.vel.y * dt);
                if check_collision(world, self.pos, self.radius) {
                    self.pos = old;
                    self.vel = Vec2::ZERO;
                } else {
                    self.vel.x = 0.0;
                }
            } else {
                self.vel.y = 0.0;
            }
        }

        self.push_out(world);
        collided
    }

    /// Resolve residual overlap with the 3×3 tiles around the body.
    fn push_out(&mut self, world: &WorldMap) {
        let cx = self.pos.x.floor() as i32;
        let cy = self.pos.y.floor() as i32;
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (x, y) = (cx + dx, cy + dy);
                if !world.in_bounds(x, y) || !world.is_solid(x, y) {
                    continue;
                }
                let to_body = self.pos - closest_point(self.pos, x, y);
                let dist = to_body.length();
                if dist < self.radius && dist > MIN_PUSH_DIST {
                    self.resolve_collision(to_body / dist, self.radius - dist);
                }
            }
        }
    }
}

/// Closest point of the unit cell `(x, y)` to `p`.
#[inline]
fn closest_point(p: Vec2, x: i32, y: i32) -> Vec2 {
    let min = Vec2::new(x as f32, y as f32);
    p.clamp(min, min + Vec2::ONE)
}

/// Does a circle at `pos` overlap a solid tile, the map edge or a door?
pub fn check_collision(world: &WorldMap, pos: Vec2, radius: f32) -> bool {
    let min_x = (pos.x - radius).floor() as i32;
    let max_x = (pos.x + radius).floor() as i32;
    let min_y = (pos.y - radius).floor() as i32;
    let max_y = (pos.y + radius).floor() as i32;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            if !world.in_bounds(x, y) {
                return true;
            }
            if world.is_solid(x, y) && pos.distance_squared(closest_point(pos, x, y)) < radius * radius
            {
                return true;
            }
        }
    }
    world.door_blocks(pos)
}
