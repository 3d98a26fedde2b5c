//! End-to-end tests for the generation controller
//!
//! These drive full generations through the public API, using hand-built
//! environments where a scenario needs agents to crash on cue.

use glam::{IVec2, Vec2};
use rocketry::evolution::{
    Agent, GenerationController, Genome, MatingPool, WallClock, MAX_TARGET_FITNESS,
};
use rocketry::world::{boundary_walls, Environment, Obstacle, Target};
use rocketry::RunConfig;

fn config(population: usize, lifespan: usize, speed: i32, seed: u64) -> RunConfig {
    RunConfig {
        population,
        lifespan,
        speed,
        seed: Some(seed),
        ..Default::default()
    }
}

/// Spawn point buried in a wall band, target far above it
fn crash_environment(spawn_y: f32) -> Environment {
    let bounds = Vec2::new(1000.0, 1000.0);
    let mut obstacles = boundary_walls(bounds).to_vec();
    obstacles.push(Obstacle::new(0.0, spawn_y - 100.0, 1000.0, 200.0));
    Environment::new(
        bounds,
        obstacles,
        Target {
            center: Vec2::new(500.0, 50.0),
            radius: 10.0,
        },
        Vec2::new(500.0, spawn_y),
    )
}

// ============================================================================
// Scenario A: reproducible trajectories
// ============================================================================

fn trajectory(seed: u64) -> Vec<Vec<Vec2>> {
    let mut controller = GenerationController::initialize(config(4, 5, 1, seed)).unwrap();
    let frames = 5 * controller.config().batch_size;
    (0..frames)
        .map(|_| {
            let snapshot = controller.tick().unwrap();
            snapshot.agents.iter().map(|a| a.position).collect()
        })
        .collect()
}

#[test]
fn test_same_seed_same_positions() {
    let first = trajectory(2024);
    let second = trajectory(2024);

    assert_eq!(first.len(), 50);
    assert!(first.iter().all(|frame| frame.len() == 4));
    assert_eq!(first, second);
}

#[test]
fn test_different_seed_different_positions() {
    assert_ne!(trajectory(1), trajectory(2));
}

// ============================================================================
// Scenario B: zero-lifetime target hit
// ============================================================================

#[test]
fn test_instant_target_hit_has_maximal_fitness() {
    let target = Vec2::new(100.0, 100.0);
    let mut agent = Agent::new(Genome::from_genes(vec![IVec2::ZERO; 3]), target, 20.0, 0.0);
    agent.nearest_distance = 0.0;
    agent.target_collision = true;
    agent.alive = false;
    agent.death_time = Some(0.0);

    let fitness = agent.evaluate_fitness(target);

    assert!(fitness.is_finite());
    assert_eq!(fitness, MAX_TARGET_FITNESS);

    // Nothing in a generation can beat it
    let mut slower = Agent::new(Genome::from_genes(vec![IVec2::ZERO; 3]), target, 20.0, 0.0);
    slower.target_collision = true;
    slower.death_time = Some(3.0);
    assert!(slower.evaluate_fitness(target) < fitness);
}

// ============================================================================
// Scenario C: everyone crashes early
// ============================================================================

#[test]
fn test_all_dead_ends_generation_once() {
    let mut controller = GenerationController::initialize(config(10, 20, 2, 77)).unwrap();
    let wall_point = Vec2::new(5.0, 500.0);
    for agent in controller.population_mut() {
        agent.position = wall_point;
    }

    let mut boundaries = 0;
    for tick in 1..=3 {
        controller.tick().unwrap();
        if controller.is_generation_boundary() {
            boundaries += 1;
            assert_eq!(tick, 1);
            let summary = controller.last_summary().unwrap();
            assert_eq!(summary.wall_hits, 10);
        }
    }

    assert_eq!(boundaries, 1);
    assert_eq!(controller.current_generation(), 1);
    assert_eq!(controller.population().len(), 10);
    assert!(controller.population().iter().all(|a| a.alive));
    assert_eq!(controller.dead_count(), 0);
}

// ============================================================================
// Scenario D: stagnation raises the mutation rate once, progress resets it
// ============================================================================

#[test]
fn test_stagnation_raises_rate_then_progress_resets() {
    let mut controller = GenerationController::initialize(config(5, 10, 1, 9)).unwrap();
    controller.set_environment(crash_environment(500.0));

    // Generation 0 sets the first best fitness
    let summary = controller.run_generation().unwrap();
    assert!(summary.progress);
    assert_eq!(controller.mutation_rate(), 0.01);

    // Five identical generations
    let mut rates = Vec::new();
    for _ in 0..5 {
        let summary = controller.run_generation().unwrap();
        assert!(!summary.progress);
        rates.push(controller.mutation_rate());
    }
    assert_eq!(&rates[..4], &[0.01; 4]);
    assert!((rates[4] - 0.03).abs() < 1e-6);
    assert_eq!(controller.stagnation_counter(), 0);

    // Closer spawn point means a better nearest distance
    controller.set_environment(crash_environment(300.0));
    let summary = controller.run_generation().unwrap();
    assert!(summary.progress);
    assert_eq!(controller.mutation_rate(), 0.01);
}

// ============================================================================
// Invariants over longer runs
// ============================================================================

#[test]
fn test_population_size_is_invariant() {
    let mut controller = GenerationController::initialize(RunConfig {
        batch_size: 2,
        ..config(12, 15, 4, 5)
    })
    .unwrap();

    for generation in 1..=5 {
        controller.run_generation().unwrap();
        assert_eq!(controller.current_generation(), generation);
        assert_eq!(controller.population().len(), 12);
        for agent in controller.population() {
            assert_eq!(agent.genome().len(), 15);
            assert!(agent
                .genome()
                .genes()
                .iter()
                .all(|g| (-4..=4).contains(&g.x) && (-4..=4).contains(&g.y)));
        }
    }
}

#[test]
fn test_life_budget_bounds_generation_length() {
    let population = 3;
    let lifespan = 4;
    let mut controller = GenerationController::initialize(RunConfig {
        batch_size: 1,
        ..config(population, lifespan, 1, 31)
    })
    .unwrap();
    // Nothing to hit: only the budget can end the generation
    controller.set_environment(Environment::new(
        Vec2::new(100_000.0, 100_000.0),
        Vec::new(),
        Target {
            center: Vec2::new(100.0, 100.0),
            radius: 1.0,
        },
        Vec2::new(50_000.0, 50_000.0),
    ));

    let mut batches = 0;
    loop {
        controller.tick().unwrap();
        batches += 1;
        if controller.is_generation_boundary() {
            break;
        }
        assert!(batches < lifespan * population);
    }
    assert_eq!(batches, lifespan * population);
}

#[test]
fn test_mating_pool_never_empty_for_real_population() {
    let mut controller = GenerationController::initialize(config(8, 10, 3, 12)).unwrap();
    for _ in 0..3 {
        controller.run_generation().unwrap();
        // Children are unscored until their first frame
        controller.tick().unwrap();
        let fitness: Vec<f32> = controller.population().iter().map(|a| a.fitness).collect();
        let pool = MatingPool::from_fitness(&fitness);
        assert!(!pool.is_empty());

        let best = fitness
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(pool.count(best), 101);
    }
}

#[test]
fn test_fitness_never_negative_during_run() {
    let mut controller = GenerationController::initialize(config(10, 10, 5, 44)).unwrap();
    for _ in 0..200 {
        let snapshot = controller.tick().unwrap();
        assert!(snapshot.max_fitness >= 0.0);
        assert!(controller.population().iter().all(|a| a.fitness >= 0.0));
    }
}

#[test]
fn test_wall_clock_controller_runs() {
    let mut controller =
        GenerationController::with_clock(config(4, 5, 1, 3), Box::new(WallClock::new())).unwrap();
    let summary = controller.run_generation().unwrap();
    assert_eq!(summary.generation, 0);
    assert_eq!(controller.population().len(), 4);
}
