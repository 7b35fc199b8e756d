//! Rendering abstraction layer.
//!
//! *The rest of the engine never touches a pixel buffer directly.*
//! It bundles everything a frame needs into a [`Frame`] and hands it to a
//! type that implements [`Renderer`].
//!
//! * The stages are split the way the pipeline runs them: scene geometry,
//!   lighting (lights, shadows, fog), then post-processing.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

mod color;
mod settings;
pub mod software;

pub use color::{Color, ColorF, OPAQUE_BLACK, Rgba, channel};
pub use settings::{Fog, PostProcessing};

use crate::world::{Camera, Scene, TextureBank, WorldMap};

/// Rays travelling farther than this hit nothing; also the far plane the
/// z-buffer is cleared to.
pub const MAX_RENDER_DISTANCE: f32 = 50.0;

/// Read-only view of everything one frame is drawn from.
#[derive(Clone, Copy)]
pub struct Frame<'a> {
    pub map: &'a WorldMap,
    pub camera: &'a Camera,
    pub textures: &'a TextureBank,
    pub scene: &'a Scene,
    pub fog: &'a Fog,
    pub post: &'a PostProcessing,
    /// Column workers for the wall pass; 1 = serial.
    pub threads: usize,
}

/// A renderer that owns an internal scratch buffer for the whole frame.
///
/// `end_frame` hands the finished buffer to a user-supplied closure.
/// Software callers typically forward it to their window-manager.
pub trait Renderer {
    /// (Re)allocate internal scratch for the requested resolution and clear it.
    fn begin_frame(&mut self, width: usize, height: usize);

    /// Floor/ceiling, walls, then depth-tested sprites and particles.
    fn draw_scene(&mut self, frame: &Frame<'_>);

    /// Point lights, shadow test and fog over the rasterised image.
    fn apply_lighting(&mut self, frame: &Frame<'_>);

    /// The enabled full-screen effects in their fixed order.
    fn post_process(&mut self, frame: &Frame<'_>);

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
    fn draw_frame<F>(&mut self, width: usize, height: usize, frame: &Frame<'_>, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(width, height);
        self.draw_scene(frame);
        self.apply_lighting(frame);
        self.post_process(frame);
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
