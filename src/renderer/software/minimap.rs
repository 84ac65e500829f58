//! Orthographic top-down overlay.
//!
//! Every element goes through one [`MinimapTransform`], so new marker kinds
//! only need a world position and a [`Marker`] style.

use glam::Vec2;

use crate::{
    renderer::{Rgba, Scene, software::Software},
    world::{Category, Cell, DoorState, rgb},
};

const BACKDROP: Rgba = rgb(25, 25, 25);
const WALL: Rgba = rgb(220, 220, 220);
const DOOR: Rgba = rgb(160, 110, 40);
const LOCKED_DOOR: Rgba = rgb(210, 180, 0);
const PLAYER: Rgba = rgb(0, 255, 0);

/// World → minimap pixel affine map.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapTransform {
    /// Pixels per grid cell.
    pub scale: f32,
    /// Pixel position of world origin.
    pub origin: Vec2,
}

impl MinimapTransform {
    pub fn new(scale: f32, origin: Vec2) -> Self {
        Self { scale, origin }
    }

    #[inline]
    pub fn to_screen(&self, p: Vec2) -> (i32, i32) {
        let s = self.origin + p * self.scale;
        (s.x.floor() as i32, s.y.floor() as i32)
    }
}

/// Style of a point drawn on the minimap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Marker {
    /// Filled disc, `size` pixels across.
    Dot { color: Rgba, size: i32 },
    /// Filled square centred on the position.
    Square { color: Rgba, size: i32 },
    /// Square plus a tick pointing along `yaw`.
    Facing {
        color: Rgba,
        size: i32,
        yaw: f32,
        length: f32,
    },
}

impl Marker {
    pub fn for_category(category: Category) -> Self {
        let color = match category {
            Category::Enemy => rgb(230, 25, 25),
            Category::Pickup => rgb(0, 0, 255),
            Category::Projectile => rgb(255, 220, 0),
        };
        let size = if category == Category::Projectile { 2 } else { 4 };
        Marker::Dot { color, size }
    }
}

impl Software {
    pub(super) fn draw_minimap(&mut self, scene: &Scene<'_>) {
        let mm = self.config.minimap;
        let pad = mm.pad as f32;
        let t = MinimapTransform::new(mm.scale, Vec2::splat(pad));
        let grid = scene.grid;

        let (x0, y0) = t.to_screen(Vec2::ZERO);
        let (x1, y1) = t.to_screen(Vec2::new(grid.width() as f32, grid.height() as f32));
        self.fill_rect(x0 - 2, y0 - 2, x1 + 2, y1 + 2, BACKDROP);

        // leave a one-pixel seam between cells when there is room
        let gap = if mm.scale >= 3.0 { 1 } else { 0 };
        for (ix, iy, cell) in grid.iter() {
            let color = match cell {
                Cell::Empty => continue,
                Cell::Wall(_) => WALL,
                Cell::Door(d) if d.state == DoorState::Open => continue,
                Cell::Door(d) if d.key.is_some() => LOCKED_DOOR,
                Cell::Door(_) => DOOR,
            };
            let (cx0, cy0) = t.to_screen(Vec2::new(ix as f32, iy as f32));
            let (cx1, cy1) = t.to_screen(Vec2::new(ix as f32 + 1.0, iy as f32 + 1.0));
            self.fill_rect(cx0, cy0, cx1 - 1 - gap, cy1 - 1 - gap, color);
        }

        for e in scene.entities {
            self.draw_marker(&t, e.pos, Marker::for_category(e.category));
        }

        let cam = scene.camera;
        self.draw_marker(
            &t,
            cam.pos,
            Marker::Facing {
                color: PLAYER,
                size: 4,
                yaw: cam.yaw,
                length: 8.0,
            },
        );
    }

    /// Draw one marker at world position `pos`.
    pub fn draw_marker(&mut self, t: &MinimapTransform, pos: Vec2, marker: Marker) {
        let (px, py) = t.to_screen(pos);
        match marker {
            Marker::Dot { color, size } => {
                let r = size / 2;
                for dy in -r..=r {
                    for dx in -r..=r {
                        if dx * dx + dy * dy <= r * r {
                            self.fill_rect(px + dx, py + dy, px + dx, py + dy, color);
                        }
                    }
                }
            }
            Marker::Square { color, size } => {
                let h = size / 2;
                self.fill_rect(px - h, py - h, px - h + size - 1, py - h + size - 1, color);
            }
            Marker::Facing {
                color,
                size,
                yaw,
                length,
            } => {
                let h = size / 2;
                self.fill_rect(px - h, py - h, px - h + size - 1, py - h + size - 1, color);
                let (s, c) = yaw.sin_cos();
                let tx = px + (c * length).round() as i32;
                let ty = py + (s * length).round() as i32;
                self.draw_line(px, py, tx, ty, color);
            }
        }
    }

    /// Inclusive rectangle, clipped to the frame.
    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let (w, h) = (self.screen.w as i32, self.screen.h as i32);
        let (xa, xb) = (x0.max(0), x1.min(w - 1));
        let (ya, yb) = (y0.max(0), y1.min(h - 1));
        for y in ya..=yb {
            for x in xa..=xb {
                self.scratch[y as usize * self.screen.w + x as usize] = col;
            }
        }
    }

    /// Integer Bresenham line‑drawing algorithm.
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, col: Rgba) {
        let mut x0 = x0;
        let mut y0 = y0;
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            if (0..self.screen.w as i32).contains(&x0) && (0..self.screen.h as i32).contains(&y0) {
                self.scratch[y0 as usize * self.screen.w + x0 as usize] = col;
            }
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::RenderConfig,
        renderer::Renderer,
        world::{Entity, Grid, Pose},
    };

    #[test]
    fn transform_is_affine() {
        let t = MinimapTransform::new(6.0, Vec2::splat(10.0));
        assert_eq!(t.to_screen(Vec2::ZERO), (10, 10));
        assert_eq!(t.to_screen(Vec2::new(2.5, 1.0)), (25, 16));
    }

    fn draw(grid: &Grid, entities: &[Entity], cam: &Pose) -> Software {
        let mut sw = Software::new(RenderConfig::default());
        sw.begin_frame(120, 120);
        let scene = Scene {
            grid,
            camera: cam,
            entities,
        };
        sw.draw_minimap(&scene);
        sw
    }

    #[test]
    fn walls_entities_and_player_are_drawn() {
        let grid = Grid::from_ascii("#####\n#...#\n#.D.#\n#####").unwrap();
        let cam = Pose::new(Vec2::new(1.5, 1.5), 0.0, 1.0);
        let enemy = Entity::new(Vec2::new(3.5, 1.5), 0.3, 1, Category::Enemy);
        let pickup = Entity::new(Vec2::new(3.5, 2.5), 0.2, 2, Category::Pickup);
        let shot = Entity::new(Vec2::new(1.5, 2.5), 0.05, 3, Category::Projectile);
        let sw = draw(&grid, &[enemy, pickup, shot], &cam);

        // wall cell (0,0) → pixels 10..15
        assert_eq!(sw.pixel(12, 12), WALL);
        // empty cell (1,2) shows the backdrop
        assert_eq!(sw.pixel(17, 24), BACKDROP);
        // door (2,2)
        assert_eq!(sw.pixel(24, 24), DOOR);
        // enemy at (3.5, 1.5) → (31, 19)
        assert_eq!(sw.pixel(31, 19), rgb(230, 25, 25));
        // pickup at (3.5, 2.5) → (31, 25)
        assert_eq!(sw.pixel(31, 25), rgb(0, 0, 255));
        assert_eq!(sw.pixel(33, 25), rgb(0, 0, 255));
        // projectile at (1.5, 2.5) → (19, 25), a smaller dot
        assert_eq!(sw.pixel(19, 25), rgb(255, 220, 0));
        assert_eq!(sw.pixel(20, 25), rgb(255, 220, 0));
        assert_eq!(sw.pixel(21, 25), BACKDROP);
        // player square and facing tick towards +x
        assert_eq!(sw.pixel(19, 19), PLAYER);
        assert_eq!(sw.pixel(27, 19), PLAYER);
    }

    #[test]
    fn open_doors_vanish() {
        let mut grid = Grid::from_ascii("###\n#D#\n###").unwrap();
        grid.open_door(1, 1, &[]).unwrap();
        grid.advance_doors(5.0);
        let cam = Pose::new(Vec2::new(50.0, 50.0), 0.0, 1.0);
        let sw = draw(&grid, &[], &cam);
        assert_eq!(sw.pixel(18, 18), BACKDROP);
    }

    #[test]
    fn markers_clip_at_frame_edge() {
        let mut sw = Software::new(RenderConfig::default());
        sw.begin_frame(8, 8);
        let t = MinimapTransform::new(1.0, Vec2::ZERO);
        sw.draw_marker(&t, Vec2::new(7.0, 7.0), Marker::Square { color: 1, size: 6 });
        sw.draw_marker(&t, Vec2::new(0.0, 7.0), Marker::Dot { color: 3, size: 4 });
        sw.draw_marker(
            &t,
            Vec2::ZERO,
            Marker::Facing {
                color: 2,
                size: 2,
                yaw: std::f32::consts::PI,
                length: 20.0,
            },
        );
        assert_eq!(sw.pixel(7, 7), 1);
        assert_eq!(sw.pixel(0, 7), 3);
        assert_eq!(sw.pixel(2, 7), 3);
        assert_ne!(sw.pixel(2, 5), 3, "disc corners stay clear");
        assert_eq!(sw.pixel(0, 0), 2);
    }
}
