//! Agents: a genome plus the kinematic state it drives
//!
//! Motion is a constant-velocity update. Applying a gene replaces the velocity
//! outright instead of accelerating, and the per-frame step only damps it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::genome::Genome;

/// Shortest lifetime the fitness formula distinguishes, in clock units
pub const MIN_LIFETIME: f32 = 1.0;
/// Fitness of an agent that hit the target within one clock unit
pub const MAX_TARGET_FITNESS: f32 = 1.0 + 1.0 / (MIN_LIFETIME * MIN_LIFETIME);
/// Scale applied to an agent that crashed into an obstacle
pub const WALL_PENALTY: f32 = 0.1;

/// What ended an agent's flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Target,
    Obstacle,
}

/// Projection of an agent for presentation layers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentRenderData {
    pub position: Vec2,
    /// Direction of travel in radians (0 = +x)
    pub heading: f32,
    pub radius: f32,
    pub alive: bool,
    pub collision: Option<Collision>,
}

/// One individual of the population
#[derive(Debug, Clone)]
pub struct Agent {
    genome: Genome,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Index of the next gene to play (starts at 1)
    pub step_index: usize,
    /// Closest the agent has come to the target
    pub nearest_distance: f32,
    pub fitness: f32,
    pub wall_collision: bool,
    pub target_collision: bool,
    pub alive: bool,
    pub radius: f32,
    pub birth_time: f64,
    pub death_time: Option<f64>,
}

impl Agent {
    /// Spawn a fresh agent at `spawn`
    pub fn new(genome: Genome, spawn: Vec2, radius: f32, birth_time: f64) -> Self {
        Self {
            genome,
            position: spawn,
            velocity: Vec2::ZERO,
            step_index: 1,
            nearest_distance: f32::INFINITY,
            fitness: 0.0,
            wall_collision: false,
            target_collision: false,
            alive: true,
            radius,
            birth_time,
            death_time: None,
        }
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    /// Replace velocity with `force` and move once
    pub fn apply_force(&mut self, force: Vec2) {
        self.velocity = force;
        self.position += self.velocity;
    }

    /// Per-frame damping and movement
    pub fn step_motion(&mut self, resistance: f32) {
        if self.alive {
            self.velocity *= resistance;
            self.position += self.velocity;
        }
    }

    /// Play the next gene, or loop back to the start of the genome
    ///
    /// Looping also returns the agent to `spawn`. It keeps flying until the
    /// generation's life budget runs out.
    pub fn advance_genome_tick(&mut self, spawn: Vec2) {
        if !self.alive {
            return;
        }
        if self.step_index < self.genome.len() {
            let force = self.genome.genes()[self.step_index].as_vec2();
            self.apply_force(force);
            self.step_index += 1;
        } else {
            self.step_index = 1;
            self.position = spawn;
        }
    }

    /// Update the nearest distance and recompute fitness
    pub fn evaluate_fitness(&mut self, target: Vec2) -> f32 {
        let distance = self.position.distance(target);
        if distance < self.nearest_distance {
            self.nearest_distance = distance;
        }

        let fitness = if self.nearest_distance == 0.0 || self.target_collision {
            let lifetime = match self.death_time {
                Some(death) => (death - self.birth_time) as f32,
                None => 0.0,
            };
            let lifetime = lifetime.max(MIN_LIFETIME);
            1.0 + (1.0 / lifetime).powi(2)
        } else if self.nearest_distance.is_infinite() {
            0.0
        } else if self.wall_collision {
            WALL_PENALTY * (1.0 / self.nearest_distance).powi(2)
        } else {
            (1.0 / self.nearest_distance).powi(2)
        };

        self.fitness = if fitness.is_finite() {
            fitness.max(0.0)
        } else {
            0.0
        };
        self.fitness
    }

    /// Stop the agent after a collision
    ///
    /// Returns false when the agent was already dead.
    pub fn kill(&mut self, collision: Collision, now: f64) -> bool {
        if !self.alive {
            return false;
        }
        match collision {
            Collision::Target => self.target_collision = true,
            Collision::Obstacle => self.wall_collision = true,
        }
        self.alive = false;
        self.death_time = Some(now);
        true
    }

    pub fn collision(&self) -> Option<Collision> {
        if self.target_collision {
            Some(Collision::Target)
        } else if self.wall_collision {
            Some(Collision::Obstacle)
        } else {
            None
        }
    }

    pub fn render_data(&self) -> AgentRenderData {
        AgentRenderData {
            position: self.position,
            heading: self.velocity.y.atan2(self.velocity.x),
            radius: self.radius,
            alive: self.alive,
            collision: self.collision(),
        }
    }
}
