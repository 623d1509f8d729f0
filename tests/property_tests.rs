//! Property-based tests over randomly generated instances.

use std::sync::Arc;

use cvrp_core::local_search::utils::route_cost;
use cvrp_core::{CvrpSolution, IntraRouteOptimizer, Problem, Solution, Split};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn instance() -> impl Strategy<Value = Problem> {
    (2usize..16, 5u64..20).prop_flat_map(|(n, capacity)| {
        (
            prop::collection::vec((-100i64..100, -100i64..100), n + 1),
            prop::collection::vec(1..=capacity, n),
        )
            .prop_map(move |(locations, demands)| {
                let demands = std::iter::once(0).chain(demands).collect();
                Problem::from_parts("Generated", capacity, demands, locations)
                    .expect("generated instance is valid")
            })
    })
}

fn optimizers() -> impl Strategy<Value = IntraRouteOptimizer> {
    prop_oneof![
        Just(IntraRouteOptimizer::TwoOpt),
        Just(IntraRouteOptimizer::ThreeOpt),
        Just(IntraRouteOptimizer::LinKernighan),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn split_routes_are_feasible_and_consistent(problem in instance(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let tour = cvrp_core::construct::random_tour(problem.get_n(), &mut rng);

        let result = Split::split(&tour, &problem).unwrap();

        prop_assert_eq!(result.truck.last(), Some(&(tour.len() - 1)));
        let mut total = 0;
        for (start, end) in Split::truck_ranges(&result.truck) {
            let route = &tour[start..=end];
            let load: u64 = route.iter().map(|&u| problem.get_demand(u)).sum();
            prop_assert!(load <= problem.get_capacity());
            total += problem.cost(0, route[0])
                + route.windows(2).map(|w| problem.cost(w[0], w[1])).sum::<i64>()
                + problem.cost(route[route.len() - 1], 0);
        }
        prop_assert_eq!(total, result.fitness);
    }

    #[test]
    fn local_search_improves_consistently(
        problem in instance(),
        optimizer in optimizers(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let problem = Arc::new(problem);
        let mut solution = CvrpSolution::random(Arc::clone(&problem), &mut rng)
            .unwrap()
            .with_optimizer(optimizer);
        let before = solution.get_fitness();

        let improvement = solution.local_search();

        prop_assert!(improvement >= 0);
        prop_assert_eq!(solution.get_fitness(), before - improvement);
        prop_assert!(solution.check().is_ok());

        let cost = |u, v| problem.cost(u, v);
        let recomputed: i64 = solution
            .get_solution()
            .into_iter()
            .map(|mut route| {
                route.push(0);
                route_cost(&route, &cost)
            })
            .sum();
        prop_assert_eq!(recomputed, solution.get_fitness());
    }

    #[test]
    fn neighbors_are_permutations(problem in instance(), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let n = problem.get_n();
        let solution = CvrpSolution::random(Arc::new(problem), &mut rng).unwrap();

        let neighbor = solution.neighbor(&mut rng).unwrap();

        let mut clients = neighbor.tour().to_vec();
        clients.sort_unstable();
        prop_assert_eq!(clients, (1..=n).collect::<Vec<_>>());
        prop_assert!(neighbor.check().is_ok());
    }
}
