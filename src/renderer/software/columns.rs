use crate::{
    engine::RayResult,
    renderer::{Rgba, software::Software},
    world::TextureBank,
};

/// Projected wall height in pixels for a hit at perpendicular `distance`,
/// clamped to `[1, screen_h]`.
///
/// `distance` of zero (camera touching a wall) gives a full-height slice.
#[inline]
pub fn slice_height(screen_h: usize, plane: f32, distance: f32) -> u32 {
    let h = screen_h as f32 * plane / distance.max(f32::EPSILON);
    h.round().clamp(1.0, screen_h.max(1) as f32) as u32
}

/// Brightness multiplier for `distance`: 1.0 at the eye, falling linearly
/// to `floor` at `render_distance` and beyond.
#[inline]
pub fn fog_factor(distance: f32, render_distance: f32, floor: f32) -> f32 {
    (1.0 - distance / render_distance).clamp(floor, 1.0)
}

/// Scale the RGB channels of `px` by `k`, keeping alpha.
#[inline]
pub fn shade(px: Rgba, k: f32) -> Rgba {
    let k = k.clamp(0.0, 1.0);
    let ch = |shift: u32| (((px >> shift) & 0xFF) as f32 * k) as u32;
    (px & 0xFF00_0000) | (ch(16) << 16) | (ch(8) << 8) | ch(0)
}

/*──────────────────────── column rendering ───────────────────────────*/

impl Software {
    /// Paint ceiling and floor halves, then one wall slice per ray.
    /// Fills the depth buffer completely.
    pub(super) fn draw_columns(&mut self, bank: &TextureBank) {
        let (w, h) = (self.screen.w, self.screen.h);
        let half = h / 2;
        self.scratch[..half * w].fill(self.config.ceiling);
        self.scratch[half * w..].fill(self.config.floor);

        let rays = std::mem::take(&mut self.rays);
        for (x, ray) in rays.iter().enumerate().take(w) {
            self.draw_column(x, ray, bank);
        }
        self.rays = rays;
    }

    /// Draw a single vertical slice (one screen column).
    fn draw_column(&mut self, x: usize, ray: &RayResult, bank: &TextureBank) {
        let (w, h) = (self.screen.w, self.screen.h);

        let hit = match ray {
            RayResult::Hit(hit) => hit,
            RayResult::Escaped => {
                self.depth[x] = f32::INFINITY;
                for y in 0..h {
                    self.scratch[y * w + x] = self.config.sky;
                }
                return;
            }
        };
        self.depth[x] = hit.distance;

        let cfg = &self.config;
        let visible = slice_height(h, cfg.projection_plane, hit.distance) as i32;
        // unclipped height keeps texels from stretching when the slice overflows
        let full = h as f32 * cfg.projection_plane / hit.distance.max(f32::EPSILON);
        let top = self.screen.half_h - full * 0.5;

        let y0 = ((self.screen.half_h - visible as f32 * 0.5).round() as i32).max(0);
        let y1 = (y0 + visible - 1).min(h as i32 - 1);

        let mut k = fog_factor(hit.distance, cfg.render_distance, cfg.fog_floor);
        if hit.face.is_x_side() {
            k *= cfg.x_side_shade;
        }

        let tex = bank.texture_or_missing(hit.texture);
        for y in y0..=y1 {
            let v = ((y as f32 + 0.5 - top) / full).clamp(0.0, 0.999_9);
            self.scratch[y as usize * w + x] = shade(tex.sample(hit.u, v), k);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
