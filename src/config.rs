//! Run configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `rocketry.ron` file (if exists), or an explicit path
//! 3. Environment variables prefixed with `ROCKETRY_`
//!
//! Example environment variable: `ROCKETRY_RUN__POPULATION=200`

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::evolution::MutationPolicyConfig;

/// Top margin kept free of random obstacles (room around the target)
pub const OBSTACLE_TOP_MARGIN: f32 = 110.0;
/// Bottom margin kept free of random obstacles (room around the spawn point)
pub const OBSTACLE_BOTTOM_MARGIN: f32 = 150.0;
/// Random obstacle footprint
pub const OBSTACLE_SIZE: Vec2 = Vec2::new(100.0, 20.0);
/// Thickness of the four boundary walls
pub const WALL_THICKNESS: f32 = 20.0;

/// Parameters of one evolutionary run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Agents per generation
    pub population: usize,
    /// Genome length, and the per-agent share of the generation's life budget
    pub lifespan: usize,
    /// Maximum absolute value of a gene component
    pub speed: i32,
    /// Initial per-gene mutation probability
    pub mutation_rate: f32,
    /// Velocity damping per frame (1.0 = none)
    pub resistance: f32,
    /// Number of randomly placed obstacles (walls not included)
    pub total_obstacles: usize,
    /// Frames between genome steps
    pub batch_size: usize,
    pub target_position: Vec2,
    pub spawn_position: Vec2,
    /// World width and height
    pub world_bounds: Vec2,
    /// Collision radius of an agent
    pub agent_radius: f32,
    /// Collision radius of the target
    pub target_radius: f32,
    /// Seed for the run's random source; drawn at startup when absent
    pub seed: Option<u64>,
    /// Stagnation response
    pub mutation_policy: MutationPolicyConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            population: 100,
            lifespan: 100,
            speed: 5,
            mutation_rate: 0.01,
            resistance: 1.0,
            total_obstacles: 10,
            batch_size: 10,
            target_position: Vec2::new(500.0, 50.0),
            spawn_position: Vec2::new(500.0, 940.0),
            world_bounds: Vec2::new(1000.0, 1000.0),
            agent_radius: 20.0,
            target_radius: 10.0,
            seed: None,
            mutation_policy: MutationPolicyConfig::default(),
        }
    }
}

impl RunConfig {
    /// Check every parameter, failing on the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.lifespan == 0 {
            return Err(ConfigError::ZeroLifespan);
        }
        if self.lifespan.checked_mul(self.population).is_none() {
            return Err(ConfigError::LifeBudgetOverflow {
                lifespan: self.lifespan,
                population: self.population,
            });
        }
        if self.speed < 0 {
            return Err(ConfigError::NegativeSpeed(self.speed));
        }
        if !self.mutation_rate.is_finite() || self.mutation_rate < 0.0 {
            return Err(ConfigError::InvalidMutationRate(self.mutation_rate));
        }
        if !self.resistance.is_finite() {
            return Err(ConfigError::InvalidResistance(self.resistance));
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }

        let bounds = self.world_bounds;
        if !(bounds.x > 0.0 && bounds.y > 0.0 && bounds.is_finite()) {
            return Err(ConfigError::InvalidBounds(bounds.x, bounds.y));
        }
        for (name, pos) in [
            ("target", self.target_position),
            ("spawn", self.spawn_position),
        ] {
            let inside = pos.is_finite()
                && (0.0..=bounds.x).contains(&pos.x)
                && (0.0..=bounds.y).contains(&pos.y);
            if !inside {
                return Err(ConfigError::OutOfBounds {
                    name,
                    x: pos.x,
                    y: pos.y,
                });
            }
        }

        if self.total_obstacles > 0 {
            let band_empty = bounds.y - OBSTACLE_BOTTOM_MARGIN <= OBSTACLE_TOP_MARGIN
                || bounds.x <= OBSTACLE_SIZE.x;
            if band_empty {
                return Err(ConfigError::NoObstacleBand {
                    height: bounds.y,
                    count: self.total_obstacles,
                });
            }
        }

        self.mutation_policy.validate()
    }

    /// Genome steps shared by the whole generation (`lifespan * population`)
    ///
    /// Saturates for configs that would fail `validate`.
    pub fn life_budget(&self) -> usize {
        self.lifespan.saturating_mul(self.population)
    }
}

/// Complete configuration file: the run itself plus headless output settings
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RocketryConfig {
    #[serde(default)]
    pub run: RunConfig,

    #[serde(default)]
    pub training: crate::headless::TrainingConfig,
}

#[cfg(not(target_arch = "wasm32"))]
impl RocketryConfig {
    /// Load configuration with layered priority:
    /// 1. Compiled defaults (lowest priority)
    /// 2. `path`, or `rocketry.ron` when no path is given (optional)
    /// 3. Environment variables prefixed with `ROCKETRY_` (highest priority)
    pub fn load(path: Option<&std::path::Path>) -> anyhow::Result<Self> {
        use ::config::{Config, Environment, File, FileFormat};
        use anyhow::Context;

        let file = match path {
            Some(path) => File::from(path).format(FileFormat::Ron).required(true),
            None => File::with_name("rocketry")
                .format(FileFormat::Ron)
                .required(false),
        };

        let builder = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("ROCKETRY")
                    .separator("__")
                    .try_parsing(true),
            );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
