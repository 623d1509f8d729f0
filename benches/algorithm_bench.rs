//! Benchmarks for split and local search.

#[cfg(feature = "bench")]
extern crate criterion;

#[cfg(feature = "bench")]
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use cvrp_core::problem::Problem;
use cvrp_core::{CvrpSolution, IntraRouteOptimizer, Solution, Split};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;

/// Create a benchmark problem of specified size.
fn create_benchmark_problem(size: usize) -> Arc<Problem> {
    let mut demands = vec![0];
    let mut locations = vec![(0, 0)];

    // Customers in a grid arrangement
    let grid_size = (size as f64).sqrt().ceil() as usize;
    for i in 1..=size {
        let row = (i - 1) / grid_size;
        let col = (i - 1) % grid_size;
        locations.push((col as i64 * 10, row as i64 * 10));
        demands.push(1 + (i as u64 % 4));
    }

    Arc::new(
        Problem::from_parts(format!("BenchProblem_{}", size), 20, demands, locations)
            .expect("benchmark instance is valid"),
    )
}

#[cfg(feature = "bench")]
fn benchmark_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    for size in [100, 500, 2000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            let problem = create_benchmark_problem(size);
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let tour = cvrp_core::construct::random_tour(size, &mut rng);

            b.iter(|| Split::split(&tour, &problem));
        });
    }

    group.finish();
}

#[cfg(feature = "bench")]
fn benchmark_local_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("local_search");

    for optimizer in [
        IntraRouteOptimizer::TwoOpt,
        IntraRouteOptimizer::ThreeOpt,
        IntraRouteOptimizer::LinKernighan,
    ] {
        for size in [50, 100].iter() {
            let id = BenchmarkId::new(format!("{:?}", optimizer), size);
            group.bench_with_input(id, size, |b, &size| {
                let problem = create_benchmark_problem(size);
                let mut rng = ChaCha8Rng::seed_from_u64(2);
                let solution = CvrpSolution::random(problem, &mut rng)
                    .expect("random tour is valid")
                    .with_optimizer(optimizer);

                b.iter(|| {
                    let mut solution = solution.clone();
                    solution.local_search()
                });
            });
        }
    }

    group.finish();
}

#[cfg(feature = "bench")]
criterion_group!(benches, benchmark_split, benchmark_local_search);

#[cfg(feature = "bench")]
criterion_main!(benches);
