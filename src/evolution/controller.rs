//! Generation controller
//!
//! Owns the population and drives it frame by frame. A generation ends when
//! every agent is dead or the shared life budget is spent; the controller then
//! applies the mutation policy, breeds a replacement population from a
//! fitness-weighted mating pool and starts over.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use rayon::prelude::*;

use super::agent::{Agent, AgentRenderData, Collision};
use super::clock::{Clock, FrameClock};
use super::genome::Genome;
use super::mutation_policy::{MutationPolicy, RateChange};
use super::selection::MatingPool;
use crate::config::RunConfig;
use crate::error::{ConfigError, SelectionError};
use crate::world::Environment;

/// Controller state machine
///
/// `GenerationEnding` and `Breeding` only last for the `tick` that finishes a
/// generation, so callers always observe `Running` between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Running,
    GenerationEnding,
    Breeding,
}

/// What changed for one agent during a frame
#[derive(Debug, Clone, Copy, Default)]
struct AgentUpdate {
    fitness: f32,
    died: Option<Collision>,
}

/// Per-frame view of the run for presentation layers
#[derive(Debug, Clone)]
pub struct GenerationSnapshot {
    /// Generation the agents below belong to
    pub generation: u64,
    /// Best fitness seen in the whole run
    pub max_fitness: f32,
    /// Best fitness seen in the current generation
    pub generation_max_fitness: f32,
    pub mutation_rate: f32,
    pub agents: Vec<AgentRenderData>,
    /// True when this frame finished a generation and bred the next one
    pub generation_ended: bool,
}

/// Summary of a finished generation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub generation: u64,
    pub max_fitness: f32,
    pub average_fitness: f32,
    pub best_fitness: f32,
    pub target_hits: usize,
    pub wall_hits: usize,
    /// Mutation rate used to breed the next generation
    pub mutation_rate: f32,
    pub progress: bool,
}

pub struct GenerationController {
    config: RunConfig,
    environment: Environment,
    population: Vec<Agent>,
    rng: Xoshiro256PlusPlus,
    clock: Box<dyn Clock>,
    policy: MutationPolicy,
    phase: Phase,
    generation: u64,
    frame_counter: usize,
    lifespan_counter: usize,
    dead_count: usize,
    /// Best fitness of the run so far
    best_fitness: f32,
    /// Best fitness of the current generation
    generation_max_fitness: f32,
    progress_flag: bool,
    target_reached: bool,
    generation_boundary: bool,
    last_summary: Option<GenerationSummary>,
}

impl GenerationController {
    /// Validate `config` and build the first generation on a frame clock
    pub fn initialize(config: RunConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, Box::new(FrameClock::new()))
    }

    /// Validate `config` and build the first generation on `clock`
    ///
    /// A missing seed is drawn here and written back into the config, so
    /// `config().seed` always reproduces the run.
    pub fn with_clock(mut config: RunConfig, clock: Box<dyn Clock>) -> Result<Self, ConfigError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        config.seed = Some(seed);
        log::info!(
            "Starting run: population {}, lifespan {}, speed {}, seed {}",
            config.population,
            config.lifespan,
            config.speed,
            seed
        );

        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let environment = Environment::generate(&config, &mut rng);
        let policy = MutationPolicy::new(config.mutation_policy.clone(), config.mutation_rate);

        let mut controller = Self {
            lifespan_counter: config.life_budget(),
            config,
            environment,
            population: Vec::new(),
            rng,
            clock,
            policy,
            phase: Phase::Running,
            generation: 0,
            frame_counter: 0,
            dead_count: 0,
            best_fitness: 0.0,
            generation_max_fitness: 0.0,
            progress_flag: false,
            target_reached: false,
            generation_boundary: false,
            last_summary: None,
        };
        controller.population = controller.random_population();
        Ok(controller)
    }

    /// Replace the environment, e.g. with a hand-built layout
    ///
    /// The current population respawns in the new world.
    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = environment;
        self.population = self
            .population
            .iter()
            .map(|agent| self.spawn(agent.genome().clone()))
            .collect();
        self.reset_generation_counters();
    }

    /// Start the run over: new world, new random population, generation 0
    pub fn reset(&mut self) {
        log::info!("Resetting run");
        self.environment = Environment::generate(&self.config, &mut self.rng);
        self.policy = MutationPolicy::new(
            self.config.mutation_policy.clone(),
            self.config.mutation_rate,
        );
        self.generation = 0;
        self.best_fitness = 0.0;
        self.progress_flag = false;
        self.target_reached = false;
        self.generation_boundary = false;
        self.last_summary = None;
        self.phase = Phase::Running;
        self.population = self.random_population();
        self.reset_generation_counters();
    }

    fn random_population(&mut self) -> Vec<Agent> {
        let (lifespan, speed) = (self.config.lifespan, self.config.speed);
        let genomes: Vec<Genome> = (0..self.config.population)
            .map(|_| Genome::random(lifespan, speed, &mut self.rng))
            .collect();
        genomes.into_iter().map(|genome| self.spawn(genome)).collect()
    }

    fn spawn(&self, genome: Genome) -> Agent {
        Agent::new(
            genome,
            self.environment.spawn(),
            self.config.agent_radius,
            self.clock.now(),
        )
    }

    fn reset_generation_counters(&mut self) {
        self.frame_counter = 0;
        self.lifespan_counter = self.config.life_budget();
        self.dead_count = 0;
        self.generation_max_fitness = 0.0;
    }

    /// Advance one simulation frame
    ///
    /// Finishing a generation happens inside the same call, so the returned
    /// snapshot already shows the freshly bred population.
    pub fn tick(&mut self) -> Result<GenerationSnapshot, SelectionError> {
        self.generation_boundary = false;
        self.clock.advance();
        self.run_frame();

        if self.dead_count >= self.population.len() || self.lifespan_counter == 0 {
            self.lifespan_counter = 0;
            self.phase = Phase::GenerationEnding;
            self.end_generation()?;
        }

        Ok(self.snapshot())
    }

    /// Tick until the current generation has been replaced
    pub fn run_generation(&mut self) -> Result<GenerationSummary, SelectionError> {
        loop {
            self.tick()?;
            if let Some(summary) = self.boundary_summary() {
                return Ok(summary);
            }
        }
    }

    fn boundary_summary(&self) -> Option<GenerationSummary> {
        if self.generation_boundary {
            self.last_summary.clone()
        } else {
            None
        }
    }

    /// Move, steer, score and collide every agent
    fn run_frame(&mut self) {
        self.frame_counter += 1;
        let batch = self.frame_counter % self.config.batch_size == 0;
        if batch {
            self.lifespan_counter = self.lifespan_counter.saturating_sub(1);
        }

        let now = self.clock.now();
        let resistance = self.config.resistance;
        let environment = &self.environment;
        let spawn = environment.spawn();
        let target = environment.target().center;

        // Agents only read the environment and write their own state
        let updates: Vec<AgentUpdate> = self
            .population
            .par_iter_mut()
            .map(|agent| {
                agent.step_motion(resistance);
                if batch {
                    agent.advance_genome_tick(spawn);
                }
                let fitness = agent.evaluate_fitness(target);

                let mut died = None;
                if agent.alive {
                    if environment.collides_with_target(agent) {
                        agent.kill(Collision::Target, now);
                        died = Some(Collision::Target);
                    } else if environment.collides_with_obstacle(agent) {
                        agent.kill(Collision::Obstacle, now);
                        died = Some(Collision::Obstacle);
                    }
                }
                AgentUpdate { fitness, died }
            })
            .collect();

        for update in updates {
            self.record_fitness(update.fitness);
            match update.died {
                Some(Collision::Target) => {
                    self.dead_count += 1;
                    self.target_reached = true;
                }
                Some(Collision::Obstacle) => self.dead_count += 1,
                None => {}
            }
        }
    }

    fn record_fitness(&mut self, fitness: f32) {
        if fitness > self.generation_max_fitness {
            self.generation_max_fitness = fitness;
        }
        if fitness > self.best_fitness {
            self.best_fitness = fitness;
            self.progress_flag = true;
        }
    }

    /// Score, adapt the mutation rate, breed
    fn end_generation(&mut self) -> Result<(), SelectionError> {
        debug_assert_eq!(self.phase, Phase::GenerationEnding);
        let fitness = self.final_fitness_pass();

        let progress = self.progress_flag;
        self.progress_flag = false;
        match self.policy.on_generation_end(progress, self.target_reached) {
            RateChange::Reset => log::info!("Successful generation!"),
            RateChange::Raised { from, to } => log::debug!(
                "No progress for {} generations, mutation rate {:.2} -> {:.2}",
                self.config.mutation_policy.stagnation_window,
                from,
                to
            ),
            RateChange::Unchanged => {}
        }

        let summary = self.summarize(&fitness, progress);
        log::info!(
            "Generation {}: mutation rate {} percent, highest fitness {}",
            summary.generation,
            (summary.mutation_rate * 100.0).round() as i32,
            summary.best_fitness
        );

        self.phase = Phase::Breeding;
        self.breed(&fitness)?;

        self.last_summary = Some(summary);
        self.generation += 1;
        self.generation_boundary = true;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Re-score everyone so collisions on the final frame count
    fn final_fitness_pass(&mut self) -> Vec<f32> {
        let target = self.environment.target().center;
        let fitness: Vec<f32> = self
            .population
            .iter_mut()
            .map(|agent| agent.evaluate_fitness(target))
            .collect();
        for &f in &fitness {
            self.record_fitness(f);
        }
        fitness
    }

    /// Pool weighted against the generation's peak fitness
    ///
    /// The peak includes in-flight scores taken before a crash penalty applied,
    /// so crashed agents weigh less than their own final max would suggest.
    fn mating_pool(&self, fitness: &[f32]) -> MatingPool {
        MatingPool::from_fitness_with_max(fitness, self.generation_max_fitness)
    }

    fn summarize(&self, fitness: &[f32], progress: bool) -> GenerationSummary {
        let finite: Vec<f32> = fitness.iter().copied().filter(|f| f.is_finite()).collect();
        let average_fitness = if finite.is_empty() {
            0.0
        } else {
            finite.iter().sum::<f32>() / finite.len() as f32
        };
        GenerationSummary {
            generation: self.generation,
            max_fitness: self.generation_max_fitness,
            average_fitness,
            best_fitness: self.best_fitness,
            target_hits: self.population.iter().filter(|a| a.target_collision).count(),
            wall_hits: self.population.iter().filter(|a| a.wall_collision).count(),
            mutation_rate: self.policy.rate(),
            progress,
        }
    }

    /// Replace the population with children of a fitness-weighted pool
    fn breed(&mut self, fitness: &[f32]) -> Result<(), SelectionError> {
        if !fitness.iter().any(|f| f.is_finite() && *f > 0.0) {
            log::warn!(
                "Generation {} has no positive fitness, parents drawn uniformly",
                self.generation
            );
        }
        debug_assert_eq!(self.phase, Phase::Breeding);
        let pool = self.mating_pool(fitness);
        if pool.is_empty() {
            return Err(SelectionError::EmptyMatingPool {
                population: self.population.len(),
            });
        }

        let rate = self.policy.rate();
        let speed = self.config.speed;
        let mut children = Vec::with_capacity(self.config.population);
        for _ in 0..self.config.population {
            let (a, b) = pool.select_parents(&mut self.rng)?;
            let child = self.population[a].genome().crossover(
                self.population[b].genome(),
                rate,
                speed,
                &mut self.rng,
            );
            children.push(child);
        }

        self.population = children
            .into_iter()
            .map(|genome| self.spawn(genome))
            .collect();
        self.reset_generation_counters();
        Ok(())
    }

    pub fn snapshot(&self) -> GenerationSnapshot {
        GenerationSnapshot {
            generation: self.generation,
            max_fitness: self.best_fitness,
            generation_max_fitness: self.generation_max_fitness,
            mutation_rate: self.policy.rate(),
            agents: self.population.iter().map(Agent::render_data).collect(),
            generation_ended: self.generation_boundary,
        }
    }

    /// True right after a tick that finished a generation
    pub fn is_generation_boundary(&self) -> bool {
        self.generation_boundary
    }

    pub fn current_generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn population(&self) -> &[Agent] {
        &self.population
    }

    /// Mutable access for scripted scenarios and tests
    pub fn population_mut(&mut self) -> &mut [Agent] {
        &mut self.population
    }

    pub fn mutation_rate(&self) -> f32 {
        self.policy.rate()
    }

    pub fn stagnation_counter(&self) -> u32 {
        self.policy.stagnation_counter()
    }

    pub fn lifespan_counter(&self) -> usize {
        self.lifespan_counter
    }

    pub fn dead_count(&self) -> usize {
        self.dead_count
    }

    pub fn best_fitness(&self) -> f32 {
        self.best_fitness
    }

    pub fn target_reached(&self) -> bool {
        self.target_reached
    }

    /// Summary of the most recently finished generation
    pub fn last_summary(&self) -> Option<&GenerationSummary> {
        self.last_summary.as_ref()
    }
}
