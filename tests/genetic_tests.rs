//! Unit tests for the genetic operators and the constructive heuristics.

use cvrp_core::construct::{grasp, random_tour};
use cvrp_core::error::Error;
use cvrp_core::genetic::Genetic;
use cvrp_core::problem::Problem;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Nine clients in a 3x3 grid, capacity 5.
fn create_test_problem() -> Problem {
    let mut demands = vec![0];
    let mut locations = vec![(0, 0)];
    for i in 0..3 {
        for j in 0..3 {
            locations.push(((i + 1) * 10, (j + 1) * 10));
            demands.push(1 + (i * 3 + j) as u64 % 3);
        }
    }
    Problem::from_parts("Grid", 5, demands, locations).unwrap()
}

fn sorted(tour: &[usize]) -> Vec<usize> {
    let mut tour = tour.to_vec();
    tour.sort_unstable();
    tour
}

#[test]
fn test_genetic_crossover() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let parent1 = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];
    let parent2 = vec![9, 8, 7, 6, 5, 4, 3, 2, 1];

    for _ in 0..50 {
        let offspring = Genetic::crossover(&parent1, &parent2, &mut rng).unwrap();
        assert_eq!(sorted(&offspring), parent1);
    }
}

#[test]
fn test_crossover_of_identical_parents() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let parent = vec![4, 2, 7, 1, 3, 6, 5];

    // Crossing a tour with itself gives the tour back
    for _ in 0..20 {
        let offspring = Genetic::crossover(&parent, &parent, &mut rng).unwrap();
        assert_eq!(offspring, parent);
    }
}

#[test]
fn test_crossover_rejects_mismatched_parents() {
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let different = Genetic::crossover(&[1, 2, 3], &[1, 2, 4], &mut rng);
    assert!(matches!(different, Err(Error::InvalidTour(_))));

    let shorter = Genetic::crossover(&[1, 2, 3], &[1, 2], &mut rng);
    assert!(matches!(shorter, Err(Error::InvalidTour(_))));

    let repeated = Genetic::crossover(&[1, 1, 2], &[1, 1, 2], &mut rng);
    assert!(matches!(repeated, Err(Error::InvalidTour(_))));

    let empty = Genetic::crossover(&[], &[], &mut rng);
    assert!(matches!(empty, Err(Error::InvalidTour(_))));
}

#[test]
fn test_genetic_mutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let original = vec![1, 2, 3, 4, 5, 6, 7, 8, 9];

    for _ in 0..50 {
        let mut tour = original.clone();
        Genetic::mutate(&mut tour, &mut rng).unwrap();

        assert_ne!(tour, original);
        assert_eq!(sorted(&tour), original);

        // A single contiguous range was reversed
        let first = tour.iter().zip(&original).position(|(a, b)| a != b).unwrap();
        let last = tour.iter().zip(&original).rposition(|(a, b)| a != b).unwrap();
        let reversed: Vec<usize> = original[first..=last].iter().rev().copied().collect();
        assert_eq!(&tour[first..=last], reversed.as_slice());
    }

    let mut two = vec![1, 2];
    Genetic::mutate(&mut two, &mut rng).unwrap();
    assert_eq!(two, vec![2, 1]);

    let mut one = vec![1];
    assert!(Genetic::mutate(&mut one, &mut rng).is_err());
}

#[test]
fn test_random_tour_is_a_permutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let tour = random_tour(30, &mut rng);

    assert_eq!(sorted(&tour), (1..=30).collect::<Vec<_>>());
}

#[test]
fn test_grasp_builds_permutations() {
    let problem = create_test_problem();
    let mut rng = ChaCha8Rng::seed_from_u64(6);

    for alpha in [0.0, 0.25, 0.5, 1.0] {
        for seed in 1..=9 {
            let tour = grasp(&problem, alpha, Some(seed), &mut rng).unwrap();
            assert_eq!(tour[0], seed);
            assert_eq!(sorted(&tour), (1..=9).collect::<Vec<_>>());
        }
    }
}

#[test]
fn test_greedy_grasp_follows_nearest_neighbor() {
    // Clients on a line: with alpha 0 the only candidate is the nearest one
    let problem = Problem::from_parts(
        "Line",
        10,
        vec![0, 1, 1, 1, 1],
        vec![(0, 0), (10, 0), (25, 0), (45, 0), (70, 0)],
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);

    let tour = grasp(&problem, 0.0, Some(1), &mut rng).unwrap();

    assert_eq!(tour, vec![1, 2, 3, 4]);
}

#[test]
fn test_grasp_restarts_vehicles_from_the_depot() {
    // Capacity 2: after two clients the next one is the closest to the depot,
    // not the closest to the last client
    let problem = Problem::from_parts(
        "Restart",
        2,
        vec![0, 1, 1, 1, 1],
        vec![(0, 0), (50, 0), (60, 0), (-5, 0), (70, 0)],
    )
    .unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let tour = grasp(&problem, 0.0, Some(1), &mut rng).unwrap();

    assert_eq!(tour, vec![1, 2, 3, 4]);
}

#[test]
fn test_grasp_rejects_bad_arguments() {
    let problem = create_test_problem();
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    assert!(matches!(
        grasp(&problem, -0.1, None, &mut rng),
        Err(Error::InvalidConfig(_))
    ));
    assert!(matches!(
        grasp(&problem, 0.5, Some(0), &mut rng),
        Err(Error::InvalidTour(_))
    ));
    assert!(matches!(
        grasp(&problem, 0.5, Some(10), &mut rng),
        Err(Error::InvalidTour(_))
    ));
}
