use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use rocketry::evolution::{GenerationController, Genome, MatingPool};
use rocketry::RunConfig;

fn config(population: usize) -> RunConfig {
    RunConfig {
        population,
        seed: Some(42),
        ..Default::default()
    }
}

// =============================================================================
// Controller
// =============================================================================

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller/tick");

    for population in [100, 500, 2000] {
        group.throughput(Throughput::Elements(population as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &size| {
                let mut controller = GenerationController::initialize(config(size))
                    .expect("valid benchmark config");
                b.iter(|| black_box(controller.tick().expect("breeding succeeds")));
            },
        );
    }
    group.finish();
}

fn bench_run_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("controller/run_generation");
    group.sample_size(20);

    for population in [50, 100] {
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &population,
            |b, &size| {
                b.iter_batched(
                    || GenerationController::initialize(config(size)).expect("valid config"),
                    |mut controller| black_box(controller.run_generation()),
                    criterion::BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

// =============================================================================
// Operators
// =============================================================================

fn bench_mating_pool(c: &mut Criterion) {
    let mut group = c.benchmark_group("selection/mating_pool");

    for population in [100, 1000] {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let fitness: Vec<f32> = (0..population).map(|_| rng.random::<f32>()).collect();
        group.throughput(Throughput::Elements(population as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(population),
            &fitness,
            |b, fitness| b.iter(|| black_box(MatingPool::from_fitness(fitness))),
        );
    }
    group.finish();
}

fn bench_crossover(c: &mut Criterion) {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);
    let a = Genome::random(400, 5, &mut rng);
    let b = Genome::random(400, 5, &mut rng);

    c.bench_function("genome/crossover_400", |bench| {
        bench.iter(|| black_box(a.crossover(&b, 0.01, 5, &mut rng)))
    });
}

criterion_group!(
    benches,
    bench_tick,
    bench_run_generation,
    bench_mating_pool,
    bench_crossover
);
criterion_main!(benches);
