//! Evolution engine - force-vector genomes bred toward a target
//!
//! This module implements:
//! - Fixed-length force-vector genomes with single-point crossover
//! - Agents that fly their genome and score by distance to the target
//! - Fitness-proportionate selection through a weighted mating pool
//! - Mutation-rate escalation when the population stagnates
//! - The generation controller tying it all together

pub mod agent;
pub mod clock;
pub mod controller;
pub mod genome;
pub mod mutation_policy;
pub mod selection;

// Re-export main types for convenience
pub use agent::{Agent, AgentRenderData, Collision, MAX_TARGET_FITNESS};
pub use clock::{Clock, FrameClock, WallClock};
pub use controller::{GenerationController, GenerationSnapshot, GenerationSummary};
pub use genome::Genome;
pub use mutation_policy::{MutationPolicy, MutationPolicyConfig, RateChange};
pub use selection::MatingPool;
