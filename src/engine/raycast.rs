//! Per-column DDA wall scan.
//!
//! Every ray is walked one grid-line crossing at a time. Distances are
//! reported along the camera's forward axis (perpendicular distance), which
//! keeps flat walls flat on screen.

use glam::Vec2;
use tracing::trace;

use crate::engine::ColumnMapping;
use crate::world::{Grid, NO_TEXTURE, Pose, TextureId};

/// Stand-in for 1/0 on an axis the ray never crosses.
const FAR_STEP: f32 = 1e30;

/// Side of the struck cell that the ray entered through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Face {
    North, // -y side
    South, // +y side
    East,  // +x side
    West,  // -x side
}

impl Face {
    /// The ray crossed a vertical (x = const) grid line.
    #[inline]
    pub fn is_x_side(self) -> bool {
        matches!(self, Face::East | Face::West)
    }
}

/// Nearest wall along one ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// Perpendicular distance to the hit point, never negative.
    pub distance: f32,
    pub texture: TextureId,
    /// Horizontal texture coordinate along the face, in `[0, 1]`.
    pub u: f32,
    pub face: Face,
    pub cell: (i32, i32),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RayResult {
    Hit(RayHit),
    /// Nothing within render distance: draw sky.
    Escaped,
}

impl RayResult {
    #[inline]
    pub fn hit(&self) -> Option<&RayHit> {
        match self {
            RayResult::Hit(h) => Some(h),
            RayResult::Escaped => None,
        }
    }

    /// Depth-buffer value for this column.
    #[inline]
    pub fn depth(&self) -> f32 {
        self.hit().map_or(f32::INFINITY, |h| h.distance)
    }
}

/// Walk `grid` from `origin` along `dir`.
///
/// `forward` is the camera's unit forward axis; distances are measured along
/// it. When `dir · forward == 1` (as in [`cast_frame`]) the DDA parameter
/// already *is* the perpendicular distance.
pub fn cast_ray(grid: &Grid, origin: Vec2, dir: Vec2, forward: Vec2, max_dist: f32) -> RayResult {
    let mut ix = origin.x.floor() as i32;
    let mut iy = origin.y.floor() as i32;

    // Started inside geometry – report contact instead of walking.
    if grid.is_opaque(ix, iy) {
        let face = match (dir.x.abs() >= dir.y.abs(), dir.x >= 0.0, dir.y >= 0.0) {
            (true, true, _) => Face::West,
            (true, false, _) => Face::East,
            (false, _, true) => Face::North,
            (false, _, false) => Face::South,
        };
        return RayResult::Hit(RayHit {
            distance: 0.0,
            texture: grid.cell(ix, iy).map_or(NO_TEXTURE, |c| c.texture()),
            u: 0.0,
            face,
            cell: (ix, iy),
        });
    }

    let inv = |c: f32| if c == 0.0 { FAR_STEP } else { (1.0 / c).abs() };
    let delta_x = inv(dir.x);
    let delta_y = inv(dir.y);

    let (step_x, mut side_x) = if dir.x < 0.0 {
        (-1, (origin.x - ix as f32) * delta_x)
    } else {
        (1, (ix as f32 + 1.0 - origin.x) * delta_x)
    };
    let (step_y, mut side_y) = if dir.y < 0.0 {
        (-1, (origin.y - iy as f32) * delta_y)
    } else {
        (1, (iy as f32 + 1.0 - origin.y) * delta_y)
    };

    let along = dir.dot(forward);

    // Out-of-range cells are opaque, so the walk always terminates.
    loop {
        let (t, x_side) = if side_x < side_y {
            let t = side_x;
            side_x += delta_x;
            ix += step_x;
            (t, true)
        } else {
            let t = side_y;
            side_y += delta_y;
            iy += step_y;
            (t, false)
        };

        let distance = (t * along).max(0.0);
        if distance > max_dist {
            return RayResult::Escaped;
        }
        if !grid.is_opaque(ix, iy) {
            continue;
        }

        let p = origin + dir * t;
        let (mut u, face) = if x_side {
            (p.y - p.y.floor(), if step_x > 0 { Face::West } else { Face::East })
        } else {
            (p.x - p.x.floor(), if step_y > 0 { Face::North } else { Face::South })
        };
        // mirror so textures read left-to-right on every face
        if (x_side && dir.x > 0.0) || (!x_side && dir.y < 0.0) {
            u = 1.0 - u;
        }

        return RayResult::Hit(RayHit {
            distance,
            texture: grid.cell(ix, iy).map_or(NO_TEXTURE, |c| c.texture()),
            u: u.clamp(0.0, 1.0),
            face,
            cell: (ix, iy),
        });
    }
}

/// Cast one ray per screen column, left to right, into `out`.
pub fn cast_frame(
    grid: &Grid,
    pose: &Pose,
    mapping: ColumnMapping,
    columns: usize,
    max_dist: f32,
    out: &mut Vec<RayResult>,
) {
    out.clear();
    let forward = pose.forward();
    let right = pose.right();
    for col in 0..columns {
        let dir = forward + right * mapping.ray_slope(col, columns, pose.fov);
        let res = cast_ray(grid, pose.pos, dir, forward, max_dist);
        if cfg!(debug_assertions) && res == RayResult::Escaped {
            trace!(col, "ray escaped render distance; map may be open");
        }
        out.push(res);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Cell, Door, DoorState};
    use glam::vec2;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// 10×10 room, walls on indices 0 and 9.
    fn room() -> Grid {
        let mut rows = String::new();
        for y in 0..10 {
            for x in 0..10 {
                rows.push(if x == 0 || y == 0 || x == 9 || y == 9 { '#' } else { '.' });
            }
            rows.push('\n');
        }
        Grid::from_ascii(&rows).unwrap()
    }

    #[test]
    fn centre_ray_hits_east_wall_at_four() {
        let grid = room();
        let pose = Pose::new(vec2(5.0, 5.0), 0.0, 10_f32.to_radians());
        let mut out = Vec::new();
        cast_frame(&grid, &pose, ColumnMapping::Angular, 9, 100.0, &mut out);

        let hit = *out[4].hit().expect("enclosed room must produce a hit");
        assert!((hit.distance - 4.0).abs() < 1e-4, "{hit:?}");
        assert_eq!(hit.face, Face::West);
        assert!(hit.face.is_x_side());
        assert_eq!(hit.cell, (9, 5));
        assert!(hit.u < 1e-4 || hit.u > 1.0 - 1e-4);
    }

    #[test]
    fn axis_aligned_rays_do_not_divide_by_zero() {
        let grid = room();
        let f = vec2(0.0, -1.0); // straight up the map
        let hit = *cast_ray(&grid, vec2(3.5, 4.5), f, f, 100.0).hit().unwrap();
        assert!((hit.distance - 3.5).abs() < 1e-5);
        assert_eq!(hit.face, Face::South);
        assert!(hit.distance.is_finite());

        let f = vec2(-1.0, 0.0);
        let hit = *cast_ray(&grid, vec2(3.25, 4.5), f, f, 100.0).hit().unwrap();
        assert!((hit.distance - 2.25).abs() < 1e-5);
        assert_eq!(hit.face, Face::East);
    }

    #[test]
    fn perpendicular_distance_not_euclidean() {
        let grid = room();
        let f = vec2(1.0, 0.0);
        // 45° off-axis ray, forward component 1
        let hit = *cast_ray(&grid, vec2(5.0, 5.0), vec2(1.0, 0.5), f, 100.0).hit().unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-4);
    }

    #[test]
    fn short_render_distance_escapes() {
        let grid = room();
        let f = vec2(1.0, 0.0);
        assert_eq!(cast_ray(&grid, vec2(5.0, 5.0), f, f, 3.0), RayResult::Escaped);
        assert_eq!(RayResult::Escaped.depth(), f32::INFINITY);
    }

    #[test]
    fn inside_wall_reports_zero_distance() {
        let grid = room();
        let f = vec2(1.0, 0.0);
        let hit = *cast_ray(&grid, vec2(0.5, 5.0), f, f, 100.0).hit().unwrap();
        assert_eq!(hit.distance, 0.0);
        assert_eq!(hit.cell, (0, 5));
    }

    #[test]
    fn open_map_hits_boundary() {
        let grid = Grid::from_ascii("...\n...\n...").unwrap();
        let f = vec2(0.0, 1.0);
        let hit = *cast_ray(&grid, vec2(1.5, 1.5), f, f, 100.0).hit().unwrap();
        assert_eq!(hit.cell, (1, 3));
        assert_eq!(hit.texture, NO_TEXTURE);
        assert_eq!(hit.face, Face::North);
    }

    #[test]
    fn door_gates_rays() {
        let mut grid = room();
        let mut cells: Vec<Cell> = grid.iter().map(|(_, _, c)| *c).collect();
        cells[5 * 10 + 7] = Cell::Door(Door::closed(5, None));
        grid = Grid::new(10, 10, cells).unwrap();

        let f = vec2(1.0, 0.0);
        let hit = *cast_ray(&grid, vec2(5.0, 5.5), f, f, 100.0).hit().unwrap();
        assert_eq!(hit.cell, (7, 5));
        assert_eq!(hit.texture, 5);

        grid.open_door(7, 5, &[]).unwrap();
        grid.advance_doors(10.0);
        assert_eq!(grid.door_state(7, 5), Some(DoorState::Open));
        let hit = *cast_ray(&grid, vec2(5.0, 5.5), f, f, 100.0).hit().unwrap();
        assert_eq!(hit.cell, (9, 5));
    }

    #[test]
    fn flat_wall_has_constant_distance_across_fov() {
        let grid = room();
        let pose = Pose::new(vec2(2.0, 4.5), 0.0, FRAC_PI_2 * 0.9);
        for mapping in [ColumnMapping::Angular, ColumnMapping::Planar] {
            let mut out = Vec::new();
            cast_frame(&grid, &pose, mapping, 64, 100.0, &mut out);
            for r in &out {
                let h = r.hit().unwrap();
                if h.cell.0 == 9 {
                    assert!((h.distance - 7.0).abs() < 1e-3, "{h:?}");
                }
            }
        }
    }

    #[test]
    fn every_column_hits_in_enclosed_room() {
        let grid = room();
        let mut out = Vec::new();
        for k in 0..16 {
            let pose = Pose::new(vec2(4.3, 6.1), k as f32 * PI / 8.0, 1.2);
            cast_frame(&grid, &pose, ColumnMapping::Angular, 80, 100.0, &mut out);
            assert_eq!(out.len(), 80);
            assert!(out.iter().all(|r| r.hit().is_some()));
        }
    }
}
