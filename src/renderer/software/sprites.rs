use crate::{
    config::RenderConfig,
    engine::Screen,
    renderer::software::{Software, fog_factor, shade},
    world::{Entity, Pose, TextureId, alpha},
};

/// Sprites closer than this (camera-space depth) are culled.
pub const NEAR_PLANE: f32 = 1e-3;

/// A billboard after projection, ready for compositing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisSprite {
    pub x0: i32, // inclusive, unclipped
    pub x1: i32, // inclusive, unclipped
    pub y0: i32,
    pub y1: i32,
    /// Camera-space depth, compared against the wall depth buffer.
    pub depth: f32,
    /// Continuous left/top edge and side length in pixels, for texel lookup.
    pub left: f32,
    pub top: f32,
    pub size: f32,
    pub tex: TextureId,
}

/// Project one entity into screen space.
///
/// `None` when behind the camera, smaller than a pixel, or entirely off
/// screen.
pub fn project_sprite(
    entity: &Entity,
    camera: &Pose,
    screen: &Screen,
    cfg: &RenderConfig,
) -> Option<VisSprite> {
    // camera space -------------------------------------------------
    let rel = camera.to_cam(entity.pos);
    if rel.y <= NEAR_PLANE {
        return None;
    }

    // same distance → height law as wall slices
    let bb = entity.category.billboard();
    let size = screen.h as f32 * cfg.projection_plane / rel.y * bb.scale;
    if size.round() < 1.0 {
        return None;
    }

    let xc = cfg.mapping.screen_x(rel.x, rel.y, screen.w, camera.fov);
    let left = xc - size * 0.5;
    let x0 = left.floor() as i32;
    let x1 = (left + size).ceil() as i32 - 1;
    if x1 < 0 || x0 >= screen.w as i32 {
        return None; // completely off-screen
    }

    let top = screen.half_h + entity.lift * size - size * 0.5;
    let y0 = top.floor() as i32;
    let y1 = (top + size).ceil() as i32 - 1;

    Some(VisSprite {
        x0,
        x1,
        y0,
        y1,
        depth: rel.y,
        left,
        top,
        size,
        tex: entity.sprite,
    })
}

impl Software {
    /// Project every entity and order the survivors far to near.
    pub(super) fn collect_sprites(&mut self, entities: &[Entity], camera: &Pose) {
        self.sprites.clear();
        self.sprites.extend(
            entities
                .iter()
                .filter_map(|e| project_sprite(e, camera, &self.screen, &self.config)),
        );

        // far-to-near painter’s algorithm so nearer sprites overdraw
        self.sprites.sort_by(|a, b| b.depth.total_cmp(&a.depth));
    }

    /// Composite the collected billboards. A column is drawn only where the
    /// sprite is strictly nearer than the wall stored in the depth buffer.
    pub(super) fn draw_sprites(&mut self, bank: &crate::world::TextureBank) {
        let (w, h) = (self.screen.w as i32, self.screen.h as i32);
        let cfg = &self.config;

        for spr in &self.sprites {
            let tex = bank.texture_or_missing(spr.tex);
            let k = fog_factor(spr.depth, cfg.render_distance, cfg.fog_floor);

            let x_start = spr.x0.max(0);
            let x_end = spr.x1.min(w - 1);
            let y_start = spr.y0.max(0);
            let y_end = spr.y1.min(h - 1);

            // ------------------------------------------------ column loop ----
            for x in x_start..=x_end {
                if spr.depth >= self.depth[x as usize] {
                    continue; // wall in front
                }
                let u = (x as f32 + 0.5 - spr.left) / spr.size;
                if !(0.0..1.0).contains(&u) {
                    continue;
                }

                for y in y_start..=y_end {
                    let v = ((y as f32 + 0.5 - spr.top) / spr.size).clamp(0.0, 0.999_9);
                    let texel = tex.sample(u, v);
                    if alpha(texel) == 0 {
                        continue; // transparent
                    }
                    self.scratch[y as usize * w as usize + x as usize] = shade(texel, k);
                }
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
