//! Constructive heuristics producing an initial giant tour.

use itertools::{Itertools, MinMaxResult};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::distance::Cost;
use crate::error::{Error, Result};
use crate::problem::{Problem, DEPOT};

/// A uniformly shuffled giant tour over the clients `1..=n`.
pub fn random_tour<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut tour: Vec<usize> = (1..=n).collect();
    tour.shuffle(rng);
    tour
}

/// Build a giant tour with GRASP.
///
/// Starting from `seed` (a uniformly drawn client when `None`), the next
/// client is drawn among the unvisited clients that still fit in the current
/// vehicle, scored by their cost from the last visited client. When none
/// fits, a new vehicle is started and clients are scored by their cost from
/// the depot. Only candidates scoring at most `min + alpha * (max - min)` are
/// kept, and one of them is drawn with a probability favoring cheaper ones.
pub fn grasp<R: Rng + ?Sized>(
    problem: &Problem,
    alpha: f64,
    seed: Option<usize>,
    rng: &mut R,
) -> Result<Vec<usize>> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(Error::invalid_config(format!(
            "GRASP alpha must be in [0, 1], found {}",
            alpha
        )));
    }

    let n = problem.get_n();
    let capacity = problem.get_capacity();
    let seed = seed.unwrap_or_else(|| rng.gen_range(1..=n));
    if !(1..=n).contains(&seed) {
        return Err(Error::invalid_tour(format!(
            "GRASP seed {} is not a client in [1, {}]",
            seed, n
        )));
    }

    let mut tour = Vec::with_capacity(n);
    let mut remaining: Vec<usize> = (1..=n).filter(|&v| v != seed).collect();
    let mut free = capacity - problem.get_demand(seed);
    let mut last = seed;
    let mut vehicles = 1;
    tour.push(seed);

    while !remaining.is_empty() {
        let mut scored: Vec<(usize, Cost)> = remaining
            .iter()
            .filter(|&&v| problem.get_demand(v) <= free)
            .map(|&v| (v, problem.cost(last, v)))
            .collect();

        if scored.is_empty() {
            free = capacity;
            vehicles += 1;
            scored = remaining
                .iter()
                .map(|&v| (v, problem.cost(DEPOT, v)))
                .collect();
        }

        let (min, max) = match scored.iter().map(|&(_, c)| c).minmax() {
            MinMaxResult::NoElements => {
                return Err(Error::invariant("GRASP candidate list is empty"))
            }
            MinMaxResult::OneElement(c) => (c, c),
            MinMaxResult::MinMax(min, max) => (min, max),
        };

        let cutoff = min as f64 + alpha * (max - min) as f64;
        let restricted: Vec<(usize, Cost)> = scored
            .into_iter()
            .filter(|&(_, c)| c as f64 <= cutoff)
            .collect();

        let pick = match restricted.len() {
            1 => 0,
            _ => WeightedIndex::new(restricted.iter().map(|&(_, c)| 1.0 / (1.0 + c as f64)))
                .map_err(|e| Error::invariant(format!("GRASP roulette: {}", e)))?
                .sample(rng),
        };

        let v = restricted[pick].0;
        tour.push(v);
        free -= problem.get_demand(v);
        last = v;
        remaining.retain(|&u| u != v);
    }

    debug!(
        "GRASP (alpha {:.3}, seed {}): {} clients over {} vehicles",
        alpha, seed, n, vehicles
    );

    Ok(tour)
}
