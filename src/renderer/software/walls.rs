//! DDA wall caster.
//!
//! One ray per screen column walks the tile grid cell by cell, always
//! crossing whichever grid line is nearer, until it enters a solid cell, the
//! open part of a door, or runs past [`MAX_RENDER_DISTANCE`].
//!
//! Distances are measured perpendicular to the camera plane so straight
//! walls stay straight (no fisheye).

use glam::{IVec2, Vec2};

use super::columns::ColumnSpan;
use crate::{
    math::EPSILON,
    renderer::{Color, MAX_RENDER_DISTANCE, Rgba},
    world::{Camera, MAGENTA, TextureBank, TextureId, WorldMap},
};

/// Stand-in delta distance for axis-parallel rays.
const HUGE_DELTA: f32 = 1e30;

/// Extra darkening for walls facing the y axis.
const Y_SIDE_SHADE: f32 = 0.7;

/// Which family of grid lines the ray crossed last.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    /// A vertical grid line (constant x); reported as side 0.
    X,
    /// A horizontal grid line (constant y); reported as side 1.
    Y,
}

/// Per-column cast result. Built and consumed within one column.
#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Vec2,
    pub dir: Vec2,
    /// Cell the ray stopped in.
    pub cell: IVec2,
    pub side: Side,
    pub hit: bool,
    /// Distance from the camera plane; `MAX_RENDER_DISTANCE` on a miss.
    pub perp_distance: f32,
    /// Euclidean distance from the camera point; never below `perp_distance`.
    pub distance: f32,
    pub hit_point: Vec2,
    pub tex: TextureId,
    /// Horizontal texture coordinate in `[0, 1)`, before mirroring.
    pub tex_u: f32,
    /// `Some(open_amount)` when the ray stopped on a door.
    pub door: Option<f32>,
}

impl Ray {
    /// Wall texture column for a texture `tex_w` texels wide, mirrored so
    /// every face reads left to right from the outside.
    #[inline]
    pub fn tex_column(&self, tex_w: usize) -> i32 {
        let w = tex_w as i32;
        let tx = ((self.tex_u * tex_w as f32) as i32).clamp(0, w - 1);
        let mirror = match self.side {
            Side::X => self.dir.x > 0.0,
            Side::Y => self.dir.y < 0.0,
        };
        if mirror { w - tx - 1 } else { tx }
    }
}

/// Destination of one rendered column: the column's texels (top to
/// bottom), its depth slot and the written row range.
pub struct ColumnTarget<'a> {
    pub texels: &'a mut [Rgba],
    pub depth: &'a mut f32,
    pub span: &'a mut ColumnSpan,
}

/// Everything the caster reads; shared immutably between column workers.
#[derive(Clone, Copy)]
pub struct WallCaster<'a> {
    pub map: &'a WorldMap,
    pub camera: &'a Camera,
    pub textures: &'a TextureBank,
    pub width: usize,
    pub height: usize,
}

impl<'a> WallCaster<'a> {
    pub fn new(
        map: &'a WorldMap,
        camera: &'a Camera,
        textures: &'a TextureBank,
        width: usize,
        height: usize,
    ) -> Self {
        Self {
            map,
            camera,
            textures,
            width,
            height,
        }
    }

    /// Cast the ray for screen column `x`.
    pub fn cast(&self, x: usize) -> Ray {
        let origin = self.camera.pos();
        let dir = self.camera.ray_dir(x, self.width);
        let mut cell = origin.floor().as_ivec2();

        let delta = Vec2::new(delta_dist(dir.x), delta_dist(dir.y));
        let step = IVec2::new(
            if dir.x < 0.0 { -1 } else { 1 },
            if dir.y < 0.0 { -1 } else { 1 },
        );
        let mut side_dist = Vec2::new(
            if dir.x < 0.0 {
                (origin.x - cell.x as f32) * delta.x
            } else {
                (cell.x as f32 + 1.0 - origin.x) * delta.x
            },
            if dir.y < 0.0 {
                (origin.y - cell.y as f32) * delta.y
            } else {
                (cell.y as f32 + 1.0 - origin.y) * delta.y
            },
        );

        let mut side = Side::X;
        let mut door = None;
        let mut hit = false;

        loop {
            // ties go to x
            let entry;
            if side_dist.x <= side_dist.y {
                entry = side_dist.x;
                side_dist.x += delta.x;
                cell.x += step.x;
                side = Side::X;
            } else {
                entry = side_dist.y;
                side_dist.y += delta.y;
                cell.y += step.y;
                side = Side::Y;
            }
            if entry > MAX_RENDER_DISTANCE {
                break;
            }

            if let Some(d) = self.map.door_at(cell.x, cell.y) {
                let at = origin + dir * entry;
                if d.local_fraction(at) < d.open_amount {
                    door = Some(d);
                    hit = true;
                    break;
                }
                continue;
            }
            if self.map.is_solid(cell.x, cell.y) {
                hit = true;
                break;
            }
        }

        if !hit {
            return Ray {
                origin,
                dir,
                cell,
                side,
                hit,
                perp_distance: MAX_RENDER_DISTANCE,
                distance: MAX_RENDER_DISTANCE,
                hit_point: origin + dir * MAX_RENDER_DISTANCE,
                tex: 0,
                tex_u: 0.0,
                door: None,
            };
        }

        let perp_distance = match side {
            Side::X => {
                (cell.x as f32 - origin.x + (1 - step.x) as f32 * 0.5) / dir.x
            }
            Side::Y => {
                (cell.y as f32 - origin.y + (1 - step.y) as f32 * 0.5) / dir.y
            }
        }
        .max(0.0);

        let hit_point = origin + dir * perp_distance;
        let along = match side {
            Side::X => hit_point.y,
            Side::Y => hit_point.x,
        };

        let (tex, door) = match door {
            Some(d) => (d.tex_id, Some(d.open_amount)),
            None => (self.map.wall_texture(cell.x, cell.y), None),
        };

        Ray {
            origin,
            dir,
            cell,
            side,
            hit,
            perp_distance,
            distance: perp_distance * dir.length(),
            hit_point,
            tex,
            tex_u: along - along.floor(),
            door,
        }
    }

    /// Cast column `x` and draw its textured wall slice into `target`.
    ///
    /// Rows outside the slice and the depth slot are left untouched on a
    /// miss, so whatever the floor pass wrote there survives.
    pub fn render_column(&self, x: usize, target: ColumnTarget<'_>) -> Ray {
        let ray = self.cast(x);
        if !ray.hit {
            *target.span = ColumnSpan::EMPTY;
            return ray;
        }

        let h = self.height as i32;
        let perp = ray.perp_distance.max(EPSILON);
        let line_height = (self.height as f32 / perp) as i32;
        let horizon = self.camera.horizon(self.height);
        let start = (horizon - line_height / 2).clamp(0, h);
        let end = (horizon + line_height / 2).clamp(0, h);

        let mut shade = 1.0 / (1.0 + 0.1 * perp);
        if ray.side == Side::Y {
            shade *= Y_SIDE_SHADE;
        }

        match self.textures.get(ray.tex) {
            Some(tex) => {
                let tx = ray.tex_column(tex.w);
                let step = tex.h as f32 / line_height.max(1) as f32;
                let mut tex_pos = (start - horizon + line_height / 2) as f32 * step;
                for y in start..end {
                    let ty = tex_pos as i32;
                    tex_pos += step;
                    let emission = tex.emission(tx, ty);
                    let lit = shade + (1.0 - shade) * emission;
                    let c = Color::from_argb(tex.texel(tx, ty)).scaled(lit);
                    target.texels[y as usize] = Color { a: 255, ..c }.to_argb();
                }
            }
            None => {
                let c = MAGENTA.scaled(shade).to_argb();
                target.texels[start as usize..end as usize].fill(c);
            }
        }

        *target.depth = ray.perp_distance;
        *target.span = ColumnSpan {
            start: start as u32,
            end: end as u32,
        };
        ray
    }
}

#[inline(always)]
fn delta_dist(d: f32) -> f32 {
    if d.abs() < EPSILON {
        HUGE_DELTA
    } else {
        (1.0 / d).abs()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DoorAxis, Texture};

    const W: usize = 64;
    const H: usize = 48;

    fn arena() -> WorldMap {
        WorldMap::bordered(16, 16)
    }

    /// Camera at (4.5, 8.5) looking along +x with a 66° plane.
    fn camera() -> Camera {
        Camera::new(Vec2::new(4.5, 8.5), Vec2::new(1.0, 0.0), Vec2::new(0.0, -0.66))
    }

    #[test]
    fn center_column_hits_east_border() {
        let map = arena();
        let cam = camera();
        let bank = TextureBank::new();
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(W / 2);
        assert!(ray.hit);
        assert_eq!(ray.side, Side::X);
        assert_eq!(ray.cell, IVec2::new(15, 8));
        assert!((ray.perp_distance - (15.0 - 4.5)).abs() < 1e-4);
    }

    #[test]
    fn perpendicular_distance_has_no_fisheye() {
        // tall enough that every column reaches the east wall
        let map = WorldMap::bordered(16, 32);
        let cam = Camera::new(Vec2::new(4.5, 16.5), Vec2::new(1.0, 0.0), Vec2::new(0.0, -0.66));
        let bank = TextureBank::new();
        let caster = WallCaster::new(&map, &cam, &bank, W, H);
        let centre = caster.cast(W / 2);
        for x in [0, 8, 20, 40, 63] {
            let ray = caster.cast(x);
            // still the east wall for these columns
            assert_eq!(ray.cell.x, 15, "column {x}");
            assert!((ray.perp_distance - centre.perp_distance).abs() < 1e-3);
            if x != W / 2 {
                assert!(ray.distance > centre.distance);
            }
        }
    }

    #[test]
    fn ties_step_x_first() {
        let map = arena();
        // exact diagonal from a cell centre: side distances tie every step
        let cam = Camera::new(Vec2::new(4.5, 4.5), Vec2::new(1.0, 1.0), Vec2::ZERO);
        let bank = TextureBank::new();
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(W / 2);
        assert!(ray.hit);
        assert_eq!(ray.side, Side::X);
        assert_eq!(ray.cell, IVec2::new(15, 14));
    }

    #[test]
    fn axis_parallel_ray_is_guarded() {
        let map = arena();
        let cam = Camera::new(Vec2::new(4.5, 8.5), Vec2::new(0.0, -1.0), Vec2::ZERO);
        let bank = TextureBank::new();
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(0);
        assert!(ray.hit);
        assert_eq!(ray.side, Side::Y);
        assert!(ray.perp_distance.is_finite());
        assert!((ray.perp_distance - 7.5).abs() < 1e-4);
    }

    #[test]
    fn open_world_misses_at_max_distance() {
        let map = WorldMap::bordered(128, 128);
        let cam = Camera::new(Vec2::new(64.5, 64.5), Vec2::new(1.0, 0.0), Vec2::ZERO);
        let bank = TextureBank::new();
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(W / 2);
        assert!(!ray.hit);
        assert_eq!(ray.perp_distance, MAX_RENDER_DISTANCE);
        assert!(ray.distance >= 0.0);
    }

    #[test]
    fn door_hit_depends_on_open_amount() {
        let mut map = arena();
        map.add_door(IVec2::new(8, 8), DoorAxis::Horizontal, 3);
        let cam = camera();
        let bank = TextureBank::new();

        // closed: fraction 0.5 is not below 0.0, the ray passes on
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(W / 2);
        assert_eq!(ray.cell.x, 15);
        assert_eq!(ray.door, None);

        map.doors_mut()[0].open_amount = 0.75;
        let ray = WallCaster::new(&map, &cam, &bank, W, H).cast(W / 2);
        assert_eq!(ray.cell, IVec2::new(8, 8));
        assert_eq!(ray.door, Some(0.75));
        assert_eq!(ray.tex, 3);
        assert!((ray.perp_distance - 3.5).abs() < 1e-4);
    }

    #[test]
    fn texture_is_mirrored_by_direction() {
        let mut ray = WallCaster::new(&arena(), &camera(), &TextureBank::new(), W, H).cast(W / 2);
        ray.tex_u = 0.1;
        // side x, dir.x > 0
        assert_eq!(ray.tex_column(64), 64 - 6 - 1);
        ray.dir.x = -1.0;
        assert_eq!(ray.tex_column(64), 6);
    }

    #[test]
    fn render_column_writes_slice_and_depth() {
        let map = arena();
        let cam = camera();
        let mut bank = TextureBank::new();
        bank.insert("W", Texture::new("W", 2, 2, vec![0xFF_FFFFFF; 4]).unwrap())
            .unwrap();

        let mut texels = vec![0; H];
        let mut depth = MAX_RENDER_DISTANCE;
        let mut span = ColumnSpan::EMPTY;
        let caster = WallCaster::new(&map, &cam, &bank, W, H);
        let ray = caster.render_column(
            W / 2,
            ColumnTarget {
                texels: &mut texels,
                depth: &mut depth,
                span: &mut span,
            },
        );

        assert_eq!(depth, ray.perp_distance);
        // 48 / 10.5 = 4 rows around the horizon at 24
        assert_eq!((span.start, span.end), (22, 26));
        let shade = 1.0 / (1.0 + 0.1 * ray.perp_distance);
        let v = (255.0 * shade) as u32;
        assert_eq!(texels[23], 0xFF_00_00_00 | v << 16 | v << 8 | v);
        assert_eq!(texels[0], 0);
    }

    #[test]
    fn missing_texture_draws_magenta() {
        let map = arena();
        let cam = camera();
        let bank = TextureBank::new();
        let mut texels = vec![0; H];
        let (mut depth, mut span) = (MAX_RENDER_DISTANCE, ColumnSpan::EMPTY);
        WallCaster::new(&map, &cam, &bank, W, H).render_column(
            W / 2,
            ColumnTarget {
                texels: &mut texels,
                depth: &mut depth,
                span: &mut span,
            },
        );
        let c = Color::from_argb(texels[24]);
        assert!(c.r > 0 && c.g == 0 && c.b > 0);
    }
}
