//! Host-facing orchestration: configuration, the simulation step and
//! frame submission.

mod config;
#[allow(clippy::module_inception)]
mod engine;

pub use config::{ConfigError, EngineConfig, MAX_RESOLUTION};
pub use engine::Engine;
