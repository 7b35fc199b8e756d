//! Pure math helpers shared by the renderer and the simulation.
//!
//! Vector, matrix and quaternion types come straight from `glam`; this
//! module only adds what glam does not ship: fast approximations, a
//! Perlin/simplex noise context and a few legacy-convention transforms.

mod fast;
mod noise;
mod transform;

pub use fast::{fast_atan2, fast_cos, fast_inv_sqrt, fast_sin, fast_sqrt};
pub use glam::{IVec2, Mat4, Quat, Vec2, Vec3};
pub use noise::NoiseGen;
pub use transform::{look_at, perspective, quat_from_euler, rotate};

/// Smallest magnitude a ray component or determinant may take before it is
/// treated as zero.
pub const EPSILON: f32 = 1e-6;
