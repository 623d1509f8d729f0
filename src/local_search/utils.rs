//! Utility functions for local search operations.

use crate::distance::Cost;
use crate::problem::{Problem, DEPOT};

/// Cost of a closed route, including the edge from its last node back to its first.
pub fn route_cost<F>(route: &[usize], cost: &F) -> Cost
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    (0..n).map(|i| cost(route[(i + n - 1) % n], route[i])).sum()
}

/// Reverse `len` consecutive positions of a cyclic sequence starting at `start`.
pub fn reverse_cyclic(route: &mut [usize], start: usize, len: usize) {
    let n = route.len();
    if n == 0 {
        return;
    }
    for k in 0..len / 2 {
        route.swap((start + k) % n, (start + len - 1 - k) % n);
    }
}

/// Rotate a closed route so that the depot is its last element.
pub fn rotate_depot_last(route: &mut [usize]) {
    if let Some(position) = route.iter().position(|&u| u == DEPOT) {
        route.rotate_left(position + 1);
    }
}

/// Per-node lists of the nearest other nodes, used to restrict candidate moves.
#[derive(Debug, Clone)]
pub struct CandidateList {
    pub granularity: usize,
    neighbors: Vec<Vec<usize>>,
}

impl CandidateList {
    /// Build the `granularity` nearest neighbors of every node of `problem`.
    pub fn new(problem: &Problem, granularity: usize) -> Self {
        Self::from_cost(problem.nodes().len(), granularity, |u, v| problem.cost(u, v))
    }

    /// Build candidate lists for `size` nodes under an arbitrary cost function.
    pub fn from_cost<F>(size: usize, granularity: usize, cost: F) -> Self
    where
        F: Fn(usize, usize) -> Cost,
    {
        let neighbors = (0..size)
            .map(|u| get_neighbors(u, size, granularity, &cost))
            .collect();

        CandidateList {
            granularity,
            neighbors,
        }
    }

    /// Nearest neighbors of `u`, closest first.
    pub fn neighbors(&self, u: usize) -> &[usize] {
        &self.neighbors[u]
    }

    /// Whether `v` is among the candidates of `u`.
    pub fn contains(&self, u: usize, v: usize) -> bool {
        self.neighbors.get(u).map_or(false, |list| list.contains(&v))
    }
}

/// Generate the list of the `granularity` nearest nodes to `u`, ties broken by index.
pub fn get_neighbors<F>(u: usize, size: usize, granularity: usize, cost: &F) -> Vec<usize>
where
    F: Fn(usize, usize) -> Cost,
{
    let mut distances: Vec<(Cost, usize)> =
        (0..size).filter(|&v| v != u).map(|v| (cost(u, v), v)).collect();

    distances.sort_unstable();
    distances.truncate(granularity);

    distances.into_iter().map(|(_, v)| v).collect()
}
