//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Fills a `Vec<u32>` frame-buffer in **0xAARRGGBB** format.
//! * Depth is tracked per screen column, not per pixel: the nearest wall (or
//!   the floor's far bound) of a column is its single depth value, which
//!   sprites, particles, lighting and fog all read.
//! * The wall pass can split the screen into column buckets worked on in
//!   parallel; every other pass is single-threaded.
//! ---------------------------------------------------------------------------

mod buffers;
mod columns;
mod lighting;
mod planes;
mod post;
mod renderer;
mod sprites;
mod walls;

pub use buffers::RenderBuffers;
pub use columns::{ColumnSpan, MAX_THREADS, bucket_ranges};
pub use lighting::{AMBIENT, LIGHT_CLAMP, SHADOW_FACTOR, SHADOW_MARCH_STEP, light_factor};
pub use renderer::Software;
pub use walls::{ColumnTarget, Ray, Side, WallCaster};
