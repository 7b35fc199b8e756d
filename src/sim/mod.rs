//! Everything that advances between frames: player input, body physics,
//! the frame clock and script hooks. Runs strictly sequentially, never
//! concurrently with rendering.

mod input;
mod physics;
mod script;
mod tic;

pub use input::{InputCmd, MOUSE_SENSITIVITY, MOVE_SPEED, player_input};
pub use physics::{PhysicsBody, check_collision};
pub use script::{Fountain, MAX_SCRIPTS, Script, ScriptContext, ScriptError, ScriptRegistry};
pub use tic::{FrameClock, MAX_DT, PHYSICS_SUBSTEPS, clamp_dt};
