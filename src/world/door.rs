use glam::{IVec2, Vec2};

use super::texture::TextureId;

/// Open-amount change per second.
pub const DOOR_SPEED: f32 = 2.0;

/// Doors stop blocking movement once they are this far open.
const PASSABLE_AT: f32 = 0.9;

/// Which way the passage through the door cell runs.
///
/// * `Horizontal` – open cells left and right, the panel slides along Y.
/// * `Vertical`   – open cells above and below, the panel slides along X.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorAxis {
    Horizontal,
    Vertical,
}

#[derive(Clone, Copy, Debug)]
pub struct Door {
    pub cell: IVec2,
    /// Always within `[0, 1]`.
    pub open_amount: f32,
    pub opening: bool,
    pub closing: bool,
    pub axis: DoorAxis,
    pub tex_id: TextureId,
}

impl Door {
    pub fn new(cell: IVec2, axis: DoorAxis, tex_id: TextureId) -> Self {
        Self {
            cell,
            open_amount: 0.0,
            opening: false,
            closing: false,
            axis,
            tex_id,
        }
    }

    pub fn open(&mut self) {
        if !self.opening && self.open_amount < 1.0 {
            self.opening = true;
            self.closing = false;
        }
    }

    pub fn close(&mut self) {
        if !self.closing && self.open_amount > 0.0 {
            self.closing = true;
            self.opening = false;
        }
    }

    /// Open if mostly closed, close otherwise.
    pub fn toggle(&mut self) {
        if self.open_amount < 0.5 {
            self.open();
        } else {
            self.close();
        }
    }

    /// Advance the animation; the open amount is clamped to `[0, 1]`.
    pub fn update(&mut self, dt: f32) {
        if self.opening {
            self.open_amount += DOOR_SPEED * dt;
            if self.open_amount >= 1.0 {
                self.open_amount = 1.0;
                self.opening = false;
            }
        }
        if self.closing {
            self.open_amount -= DOOR_SPEED * dt;
            if self.open_amount <= 0.0 {
                self.open_amount = 0.0;
                self.closing = false;
            }
        }
    }

    /// Does the door panel block a point at `pos`?
    ///
    /// Never blocks once `open_amount >= 0.9`.
    pub fn check_collision(&self, pos: Vec2) -> bool {
        if self.open_amount >= PASSABLE_AT {
            return false;
        }
        let dx = (pos.x - (self.cell.x as f32 + 0.5)).abs();
        let dy = (pos.y - (self.cell.y as f32 + 0.5)).abs();
        let half = (1.0 - self.open_amount) * 0.5;
        match self.axis {
            DoorAxis::Horizontal => dx < 0.5 && dy < half,
            DoorAxis::Vertical => dy < 0.5 && dx < half,
        }
    }

    /// Fractional position of `hit` along the door's motion axis.
    #[inline]
    pub fn local_fraction(&self, hit: Vec2) -> f32 {
        let along = match self.axis {
            DoorAxis::Horizontal => hit.y,
            DoorAxis::Vertical => hit.x,
        };
        along - along.floor()
    }
}
