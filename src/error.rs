//! Error types for the evolution engine
//!
//! Configuration and selection errors are fatal for a run. Numeric edge cases
//! (zero lifetimes, zero distances, zero max fitness) are handled where they
//! occur and never show up here.

use thiserror::Error;

/// Invalid run configuration, reported by `GenerationController::initialize`
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("population must be at least 1")]
    EmptyPopulation,
    #[error("lifespan must be at least 1")]
    ZeroLifespan,
    #[error("speed must not be negative (got {0})")]
    NegativeSpeed(i32),
    #[error("mutation rate must be a finite value >= 0 (got {0})")]
    InvalidMutationRate(f32),
    #[error("resistance must be finite (got {0})")]
    InvalidResistance(f32),
    #[error("lifespan {lifespan} x population {population} overflows the life budget")]
    LifeBudgetOverflow { lifespan: usize, population: usize },
    #[error("batch size must be at least 1")]
    ZeroBatchSize,
    #[error("world bounds must be positive (got {0}x{1})")]
    InvalidBounds(f32, f32),
    #[error("{name} position ({x}, {y}) lies outside the world bounds")]
    OutOfBounds { name: &'static str, x: f32, y: f32 },
    #[error("world of height {height} leaves no room to place {count} obstacles")]
    NoObstacleBand { height: f32, count: usize },
    #[error("invalid mutation policy: {0}")]
    InvalidPolicy(String),
}

/// Breeding could not pick parents
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    #[error("mating pool is empty ({population} agents, none with a usable fitness)")]
    EmptyMatingPool { population: usize },
}

/// Any error that ends a run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvolutionError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("selection error: {0}")]
    Selection(#[from] SelectionError),
}
