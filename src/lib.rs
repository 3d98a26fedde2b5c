//! # Rocketry - evolving rockets with a genetic algorithm
//!
//! A population of rockets, each flying a fixed list of force vectors, is bred
//! generation after generation toward a target past a field of obstacles.

pub mod config;
pub mod error;
pub mod evolution;
pub mod world;

// Headless training module (native only)
#[cfg(not(target_arch = "wasm32"))]
pub mod headless;

pub use config::RunConfig;
pub use error::{ConfigError, EvolutionError, SelectionError};
pub use evolution::{GenerationController, GenerationSnapshot};

/// Common imports for internal use
pub mod prelude {
    pub use crate::config::RunConfig;
    pub use crate::evolution::{Agent, GenerationController, Genome};
    pub use crate::world::Environment;
    pub use glam::{IVec2, Vec2};
}
