//! Software raycasting engine in the Wolfenstein 3-D tradition.
//!
//! * [`world`] holds the tile map, doors, camera, textures and the bounded
//!   sprite / particle / light pools.
//! * [`renderer`] turns a [`renderer::Frame`] into an ARGB8888 frame-buffer
//!   (walls, floor/ceiling, sprites, lighting, post-processing).
//! * [`sim`] advances physics, input and script hooks between frames.
//! * [`engine`] ties everything together for a host application.

pub mod engine;
pub mod math;
pub mod renderer;
pub mod sim;
pub mod world;
