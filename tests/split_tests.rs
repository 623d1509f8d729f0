//! Unit tests for the Split algorithm.

use cvrp_core::error::Error;
use cvrp_core::problem::{Problem, DEPOT};
use cvrp_core::split::Split;
use cvrp_core::Cost;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Depot at the origin, two clients along each axis, capacity 3.
fn create_test_problem() -> Problem {
    Problem::from_parts(
        "TestProblem",
        3,
        vec![0, 1, 1, 1, 1],
        vec![(0, 0), (10, 0), (20, 0), (0, 10), (0, 20)],
    )
    .unwrap()
}

/// Cost of a route visited from and back to the depot.
fn route_cost(problem: &Problem, route: &[usize]) -> Cost {
    let mut cost = problem.cost(DEPOT, route[0]) + problem.cost(route[route.len() - 1], DEPOT);
    for w in route.windows(2) {
        cost += problem.cost(w[0], w[1]);
    }
    cost
}

/// Total cost of the routes described by `truck`, or `None` if one overflows.
fn evaluate_truck(problem: &Problem, tour: &[usize], truck: &[usize]) -> Option<Cost> {
    let mut total = 0;
    for (i, j) in Split::truck_ranges(truck) {
        let route = &tour[i..=j];
        let load: u64 = route.iter().map(|&u| problem.get_demand(u)).sum();
        if load > problem.get_capacity() {
            return None;
        }
        total += route_cost(problem, route);
    }
    Some(total)
}

/// Minimum over every way of cutting the tour into contiguous routes.
fn brute_force_split(problem: &Problem, tour: &[usize]) -> Cost {
    let n = tour.len();
    (0..1u32 << (n - 1))
        .filter_map(|mask| {
            let mut truck: Vec<usize> = (0..n - 1).filter(|&k| mask & (1 << k) != 0).collect();
            truck.push(n - 1);
            evaluate_truck(problem, tour, &truck)
        })
        .min()
        .unwrap()
}

fn random_problem(rng: &mut ChaCha8Rng, n: usize) -> Problem {
    let capacity = rng.gen_range(5..=15);
    let mut demands = vec![0];
    let mut locations = vec![(rng.gen_range(0..100), rng.gen_range(0..100))];
    for _ in 0..n {
        demands.push(rng.gen_range(1..=capacity.min(8)));
        locations.push((rng.gen_range(0..100), rng.gen_range(0..100)));
    }
    Problem::from_parts("Random", capacity, demands, locations).unwrap()
}

#[test]
fn test_split_documented_minimum() {
    let problem = create_test_problem();
    let tour = vec![1, 2, 3, 4];

    let result = Split::split(&tour, &problem).unwrap();

    // {1, 2} and {3, 4} cost 40 each; every other feasible cut costs 92
    assert_eq!(result.fitness, 80);
    assert_eq!(result.truck, vec![1, 3]);
    assert_eq!(evaluate_truck(&problem, &tour, &result.truck), Some(80));
}

#[test]
fn test_split_single_route_when_everything_fits() {
    let problem = Problem::from_parts(
        "Line",
        10,
        vec![0, 1, 1, 1],
        vec![(0, 0), (10, 0), (20, 0), (30, 0)],
    )
    .unwrap();

    let result = Split::split(&[1, 2, 3], &problem).unwrap();

    assert_eq!(result.truck, vec![2]);
    assert_eq!(result.fitness, 60);
}

#[test]
fn test_split_one_client_per_route() {
    // Every client fills a vehicle on its own
    let problem = Problem::from_parts(
        "Full",
        5,
        vec![0, 5, 5, 5],
        vec![(0, 0), (10, 0), (0, 10), (-10, 0)],
    )
    .unwrap();

    let result = Split::split(&[2, 1, 3], &problem).unwrap();

    assert_eq!(result.truck, vec![0, 1, 2]);
    assert_eq!(result.fitness, 60);
}

#[test]
fn test_split_single_client() {
    let result = Split::split_with(&[1], &[0, 4], 4, |u, v| if u == v { 0 } else { 7 }).unwrap();

    assert_eq!(result.truck, vec![0]);
    assert_eq!(result.fitness, 14);
}

#[test]
fn test_split_empty_tour() {
    let problem = create_test_problem();

    let result = Split::split(&[], &problem);

    assert!(matches!(result, Err(Error::InvalidTour(_))));
}

#[test]
fn test_split_infeasible_demand() {
    let result = Split::split_with(&[1, 2], &[0, 2, 9], 5, |_, _| 1);

    assert!(matches!(
        result,
        Err(Error::InfeasibleDemand {
            client: 2,
            demand: 9,
            capacity: 5
        })
    ));
}

#[test]
fn test_split_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    for _ in 0..200 {
        let n = rng.gen_range(2..=10);
        let problem = random_problem(&mut rng, n);
        let mut tour: Vec<usize> = (1..=n).collect();
        tour.shuffle(&mut rng);

        let result = Split::split(&tour, &problem).unwrap();

        assert_eq!(result.truck.last(), Some(&(n - 1)));
        assert!(result.truck.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(
            evaluate_truck(&problem, &tour, &result.truck),
            Some(result.fitness),
            "truck {:?} of tour {:?} does not achieve its fitness",
            result.truck,
            tour
        );
        assert_eq!(result.fitness, brute_force_split(&problem, &tour));
    }
}

#[test]
fn test_truck_ranges() {
    let ranges: Vec<(usize, usize)> = Split::truck_ranges(&[1, 2, 5]).collect();

    assert_eq!(ranges, vec![(0, 1), (2, 2), (3, 5)]);
}

#[test]
fn test_merge_routes_skips_empty_routes() {
    let routes = vec![vec![3, 1], vec![], vec![2], vec![5, 4, 6]];

    let (tour, truck) = Split::merge_routes(&routes);

    assert_eq!(tour, vec![3, 1, 2, 5, 4, 6]);
    assert_eq!(truck, vec![1, 2, 5]);
}
