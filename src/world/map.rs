//! Tile map and its query surface.
//!
//! Every lookup takes signed cell coordinates and never fails: cells outside
//! the grid read as solid wall with the default floor (0.0) and ceiling
//! (1.0) heights, so the caster and the rasteriser need no edge branches.

use glam::{IVec2, Vec2};
use log::debug;
use smallvec::SmallVec;

use super::{
    door::{Door, DoorAxis},
    texture::TextureId,
};

pub type Tile = u16;

/// Tile id written for solid cells by the constructors; any non-zero id is solid.
pub const SOLID: Tile = 1;

pub const MAX_DOORS: usize = 64;

const DEFAULT_FLOOR: f32 = 0.0;
const DEFAULT_CEILING: f32 = 1.0;
const NO_DOOR: u8 = u8::MAX;

#[derive(Clone, Debug)]
pub struct WorldMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
    floor_heights: Vec<f32>,
    ceiling_heights: Vec<f32>,
    wall_tex: Vec<TextureId>,
    floor_tex: Vec<TextureId>,
    ceiling_tex: Vec<TextureId>,
    /// Per-cell index into `doors`, `NO_DOOR` when empty.
    door_slots: Vec<u8>,
    doors: Vec<Door>,
}

impl WorldMap {
    /// A `width × height` map filled with solid wall.
    pub fn new(width: usize, height: usize) -> Self {
        let n = width * height;
        Self {
            width,
            height,
            tiles: vec![SOLID; n],
            floor_heights: vec![DEFAULT_FLOOR; n],
            ceiling_heights: vec![DEFAULT_CEILING; n],
            wall_tex: vec![0; n],
            floor_tex: vec![0; n],
            ceiling_tex: vec![0; n],
            door_slots: vec![NO_DOOR; n],
            doors: Vec::with_capacity(MAX_DOORS),
        }
    }

    /// Open interior surrounded by a one-cell solid border.
    pub fn bordered(width: usize, height: usize) -> Self {
        let mut map = Self::new(width, height);
        for y in 1..height.saturating_sub(1) {
            for x in 1..width.saturating_sub(1) {
                map.set_tile(x as i32, y as i32, 0);
            }
        }
        map
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }

    /*──────────────────────── queries ────────────────────────*/

    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some()
    }

    /// Tile id at `(x, y)`; out of bounds reads as [`SOLID`].
    #[inline]
    pub fn tile(&self, x: i32, y: i32) -> Tile {
        self.index(x, y).map_or(SOLID, |i| self.tiles[i])
    }

    #[inline]
    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.tile(x, y) > 0
    }

    /// Solid test for the cell containing a world-space point.
    #[inline]
    pub fn is_solid_at(&self, p: Vec2) -> bool {
        self.is_solid(p.x.floor() as i32, p.y.floor() as i32)
    }

    #[inline]
    pub fn floor_height(&self, x: i32, y: i32) -> f32 {
        self.index(x, y)
            .map_or(DEFAULT_FLOOR, |i| self.floor_heights[i])
    }

    #[inline]
    pub fn ceiling_height(&self, x: i32, y: i32) -> f32 {
        self.index(x, y)
            .map_or(DEFAULT_CEILING, |i| self.ceiling_heights[i])
    }

    #[inline]
    pub fn wall_texture(&self, x: i32, y: i32) -> TextureId {
        self.index(x, y).map_or(0, |i| self.wall_tex[i])
    }

    #[inline]
    pub fn floor_texture(&self, x: i32, y: i32) -> TextureId {
        self.index(x, y).map_or(0, |i| self.floor_tex[i])
    }

    #[inline]
    pub fn ceiling_texture(&self, x: i32, y: i32) -> TextureId {
        self.index(x, y).map_or(0, |i| self.ceiling_tex[i])
    }

    /*──────────────────────── mutation ───────────────────────*/

    /// Out-of-range writes are ignored.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: Tile) {
        if let Some(i) = self.index(x, y) {
            self.tiles[i] = tile;
        }
    }

    pub fn set_heights(&mut self, x: i32, y: i32, floor: f32, ceiling: f32) {
        if let Some(i) = self.index(x, y) {
            self.floor_heights[i] = floor;
            self.ceiling_heights[i] = ceiling;
        }
    }

    pub fn set_textures(
        &mut self,
        x: i32,
        y: i32,
        wall: TextureId,
        floor: TextureId,
        ceiling: TextureId,
    ) {
        if let Some(i) = self.index(x, y) {
            self.wall_tex[i] = wall;
            self.floor_tex[i] = floor;
            self.ceiling_tex[i] = ceiling;
        }
    }

    /// Apply one texture triple to every cell.
    pub fn fill_textures(&mut self, wall: TextureId, floor: TextureId, ceiling: TextureId) {
        self.wall_tex.fill(wall);
        self.floor_tex.fill(floor);
        self.ceiling_tex.fill(ceiling);
    }

    /*──────────────────────── doors ──────────────────────────*/

    /// Place a door; the cell becomes passable.
    ///
    /// Returns `false` (and changes nothing) when the door list is full, the
    /// cell is out of range or already holds a door.
    pub fn add_door(&mut self, cell: IVec2, axis: DoorAxis, tex_id: TextureId) -> bool {
        let Some(i) = self.index(cell.x, cell.y) else {
            return false;
        };
        if self.doors.len() >= MAX_DOORS || self.door_slots[i] != NO_DOOR {
            debug!("door at {cell} dropped ({} doors)", self.doors.len());
            return false;
        }
        self.door_slots[i] = self.doors.len() as u8;
        self.doors.push(Door::new(cell, axis, tex_id));
        self.tiles[i] = 0;
        true
    }

    #[inline]
    pub fn door_at(&self, x: i32, y: i32) -> Option<&Door> {
        let i = self.index(x, y)?;
        match self.door_slots[i] {
            NO_DOOR => None,
            slot => self.doors.get(slot as usize),
        }
    }

    #[inline]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[inline]
    pub fn doors_mut(&mut self) -> &mut [Door] {
        &mut self.doors
    }

    /// Advance every door animation.
    pub fn update_doors(&mut self, dt: f32) {
        for door in &mut self.doors {
            door.update(dt);
        }
    }

    /// Toggle every door in the 3×3 block around `cell`; returns the cells
    /// that were toggled.
    pub fn toggle_doors_near(&mut self, cell: IVec2) -> SmallVec<[IVec2; 4]> {
        let mut toggled = SmallVec::new();
        for door in &mut self.doors {
            let d = door.cell - cell;
            if d.x.abs() <= 1 && d.y.abs() <= 1 {
                door.toggle();
                toggled.push(door.cell);
            }
        }
        if !toggled.is_empty() {
            debug!("toggled doors {toggled:?}");
        }
        toggled
    }

    /// Is any door panel blocking `pos`?
    pub fn door_blocks(&self, pos: Vec2) -> bool {
        self.doors.iter().any(|d| d.check_collision(pos))
    }
}
