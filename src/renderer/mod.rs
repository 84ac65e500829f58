//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It hands a [`Scene`] — one immutable snapshot of grid, camera and
//! entities — to a type that implements [`Renderer`].
//!
//! * Back-ends are pluggable (`renderer::software`, …) without changing
//!   game logic.
//! * A helper blanket‐impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

use crate::world::{Entity, Grid, Pose, TextureBank};

pub use crate::world::Rgba;

/// Everything the render pass reads. Borrowed immutably for the whole pass,
/// so positions cannot change between the wall scan and the sprite pass.
#[derive(Clone, Copy)]
pub struct Scene<'a> {
    pub grid: &'a Grid,
    pub camera: &'a Pose,
    pub entities: &'a [Entity],
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Walls, then sprites, then the minimap overlay.
    fn draw_scene(&mut self, scene: &Scene<'_>, bank: &TextureBank);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    ///
    /// * `submit(&[Rgba], w, h)` is run exactly once per frame.
    /// * Software caller passes `|fb, w, h| window.update_with_buffer(fb, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(
        &mut self,
        width: usize,
        height: usize,
        scene: &Scene<'_>,
        bank: &TextureBank,
        submit: F,
    ) where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(scene, bank);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}

pub mod software;

pub use software::Software;
