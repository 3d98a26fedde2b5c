//! World geometry - walls, obstacles, target and spawn point

mod environment;
pub mod generation;

pub use environment::{Environment, Obstacle, Target};
pub use generation::boundary_walls;
