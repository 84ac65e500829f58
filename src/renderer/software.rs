//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * One DDA ray per column feeds the wall pass, which also writes the
//!   per-column depth buffer.
//! * Billboards are composited afterwards against that finished depth buffer,
//!   then the minimap is drawn on top.
//! ---------------------------------------------------------------------------

mod columns;
mod minimap;
mod sprites;

pub use columns::{fog_factor, shade, slice_height};
pub use minimap::{Marker, MinimapTransform};
pub use sprites::{NEAR_PLANE, VisSprite, project_sprite};

use crate::{
    config::RenderConfig,
    engine::{RayResult, Screen, cast_frame},
    renderer::{Renderer, Rgba, Scene},
    world::TextureBank,
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Wolfenstein-style column renderer.
#[derive(Default)]
pub struct Software {
    config: RenderConfig,
    scratch: Vec<Rgba>,
    /// Perpendicular wall distance per column; `INFINITY` for sky.
    depth: Vec<f32>,
    rays: Vec<RayResult>,
    sprites: Vec<VisSprite>,
    screen: Screen,
}

impl Software {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.screen.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.screen.h
    }

    /// Finished pixels of the current frame.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Rgba {
        self.scratch[y * self.screen.w + x]
    }

    /// Depth buffer of the current frame (read-only once walls are drawn).
    #[inline]
    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth
    }

    /// Hit records of the last wall scan, left to right.
    #[inline]
    pub fn rays(&self) -> &[RayResult] {
        &self.rays
    }

    /// Billboards that survived culling in the last frame, far to near.
    #[inline]
    pub fn visible_sprites(&self) -> &[VisSprite] {
        &self.sprites
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.screen.w || h != self.screen.h {
            self.screen = Screen::new(w, h);
            self.scratch.resize(w * h, 0);
            self.depth.resize(w, f32::INFINITY);
        }

        /* dark-grey clear */
        self.scratch.fill(0xFF_20_20_20);
        self.depth.fill(f32::INFINITY);
        self.sprites.clear();
    }

    fn draw_scene(&mut self, scene: &Scene<'_>, bank: &TextureBank) {
        if self.screen.w == 0 || self.screen.h == 0 {
            return;
        }

        cast_frame(
            scene.grid,
            scene.camera,
            self.config.mapping,
            self.screen.w,
            self.config.render_distance,
            &mut self.rays,
        );

        // depth buffer is complete after this call
        self.draw_columns(bank);

        self.collect_sprites(scene.entities, scene.camera);
        self.draw_sprites(bank);

        if self.config.minimap.enabled {
            self.draw_minimap(scene);
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.screen.w, self.screen.h);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
