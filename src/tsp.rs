//! Traveling salesman instances and solutions.
//!
//! A TSP tour visits every node once and is stored with node 0 as its last
//! element, so the intra-route optimizers used for CVRP routes apply to it
//! directly.

use std::fmt;
use std::sync::Arc;

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::distance::{Cost, DistanceMatrix};
use crate::error::{Error, Result};
use crate::genetic::{reversal_range, Genetic};
use crate::local_search::utils::{route_cost, CandidateList};
use crate::local_search::IntraRouteOptimizer;
use crate::problem::DEPOT;
use crate::solution::{CrossoverCapable, Mutable, Solution};

#[derive(Debug, Clone, Deserialize)]
struct TspData {
    name: String,
    locations: Vec<(i64, i64)>,
}

/// A symmetric TSP instance over rounded Euclidean distances.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "TspData")]
pub struct Tsp {
    name: String,
    locations: Vec<(i64, i64)>,
    #[serde(skip)]
    distance_matrix: DistanceMatrix,
}

impl Tsp {
    /// Create an instance; at least 3 nodes are required.
    pub fn new(name: impl Into<String>, locations: Vec<(i64, i64)>) -> Result<Self> {
        if locations.len() < 3 {
            return Err(Error::invalid_instance(format!(
                "need at least 3 nodes, found {}",
                locations.len()
            )));
        }

        Ok(Tsp {
            name: name.into(),
            distance_matrix: DistanceMatrix::from_locations(&locations),
            locations,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn locations(&self) -> &[(i64, i64)] {
        &self.locations
    }

    /// Number of nodes, node 0 included.
    pub fn get_n(&self) -> usize {
        self.locations.len()
    }

    #[inline]
    pub fn cost(&self, u: usize, v: usize) -> Cost {
        self.distance_matrix.get(u, v)
    }
}

impl TryFrom<TspData> for Tsp {
    type Error = Error;

    fn try_from(data: TspData) -> Result<Self> {
        Tsp::new(data.name, data.locations)
    }
}

/// A closed tour of a [`Tsp`] instance, ending with node 0.
#[derive(Clone)]
pub struct TspSolution {
    tsp: Arc<Tsp>,
    tour: Vec<usize>,
    fitness: Cost,
    optimizer: IntraRouteOptimizer,
    candidates: Option<Arc<CandidateList>>,
}

impl TspSolution {
    /// Adopt a tour: a permutation of all nodes whose last element is node 0.
    pub fn new(tsp: Arc<Tsp>, tour: Vec<usize>) -> Result<Self> {
        let n = tsp.get_n();
        if tour.len() != n {
            return Err(Error::invalid_tour(format!(
                "tour has {} nodes, expected {}",
                tour.len(),
                n
            )));
        }
        if tour.last() != Some(&DEPOT) {
            return Err(Error::invalid_tour("tour must end with node 0"));
        }
        if let Some(&u) = tour.iter().find(|&&u| u >= n) {
            return Err(Error::invalid_tour(format!("unknown node {}", u)));
        }
        if !tour.iter().all_unique() {
            return Err(Error::invalid_tour("tour visits a node twice"));
        }

        let fitness = route_cost(&tour, &|u, v| tsp.cost(u, v));
        Ok(TspSolution {
            tsp,
            tour,
            fitness,
            optimizer: IntraRouteOptimizer::default(),
            candidates: None,
        })
    }

    /// A uniformly shuffled tour.
    pub fn random<R: Rng + ?Sized>(tsp: Arc<Tsp>, rng: &mut R) -> Result<Self> {
        let mut tour: Vec<usize> = (1..tsp.get_n()).collect();
        tour.shuffle(rng);
        tour.push(DEPOT);
        Self::new(tsp, tour)
    }

    /// GRASP construction is only defined for capacitated instances.
    pub fn grasp<R: Rng + ?Sized>(_tsp: Arc<Tsp>, _alpha: f64, _rng: &mut R) -> Result<Self> {
        Err(Error::Unsupported("GRASP construction for TSP".to_string()))
    }

    /// Set the optimizer used by [`Solution::local_search`].
    pub fn with_optimizer(mut self, optimizer: IntraRouteOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Restrict local search moves to the given candidate lists.
    pub fn with_candidates(mut self, candidates: Arc<CandidateList>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Recompute every invariant from scratch, in any build.
    pub fn check(&self) -> Result<()> {
        let n = self.tsp.get_n();
        if self.tour.len() != n || self.tour.last() != Some(&DEPOT) {
            return Err(Error::invariant(format!(
                "tour of {} nodes must end with node 0",
                n
            )));
        }
        if self.tour.iter().any(|&u| u >= n) || !self.tour.iter().all_unique() {
            return Err(Error::invariant("tour is not a permutation of the nodes"));
        }

        let fitness = route_cost(&self.tour, &|u, v| self.tsp.cost(u, v));
        if fitness != self.fitness {
            return Err(Error::invariant(format!(
                "cached fitness {} differs from recomputed {}",
                self.fitness, fitness
            )));
        }

        Ok(())
    }

    fn rebuild(&self, tour: Vec<usize>) -> Self {
        let fitness = route_cost(&tour, &|u, v| self.tsp.cost(u, v));
        TspSolution {
            tsp: Arc::clone(&self.tsp),
            tour,
            fitness,
            optimizer: self.optimizer,
            candidates: self.candidates.clone(),
        }
    }
}

impl Solution for TspSolution {
    type Instance = Tsp;
    type Output = Vec<usize>;

    fn get_instance(&self) -> &Tsp {
        &self.tsp
    }

    fn get_fitness(&self) -> Cost {
        self.fitness
    }

    /// The tour oriented so that its first node is smaller than the node before the final 0.
    fn get_solution(&self) -> Vec<usize> {
        let n = self.tour.len();
        if self.tour[0] < self.tour[n - 2] {
            self.tour.clone()
        } else {
            let mut tour: Vec<usize> = self.tour[..n - 1].iter().rev().copied().collect();
            tour.push(DEPOT);
            tour
        }
    }

    /// Reverse a random range that leaves the final node 0 in place.
    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        let (i, j) = reversal_range(self.tour.len() - 1, rng);
        let mut tour = self.tour.clone();
        tour[i..j].reverse();
        Ok(self.rebuild(tour))
    }

    fn local_search(&mut self) -> Cost {
        let tsp = &self.tsp;
        let improvement = self.optimizer.optimize(
            &mut self.tour,
            &|u, v| tsp.cost(u, v),
            self.candidates.as_deref(),
        );
        self.fitness -= improvement;

        debug_assert!(self.validate().is_ok());
        improvement
    }

    fn validate(&self) -> Result<()> {
        if cfg!(debug_assertions) {
            self.check()
        } else {
            Ok(())
        }
    }
}

impl Mutable for TspSolution {
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let n = self.tour.len();
        Genetic::mutate(&mut self.tour[..n - 1], rng)?;
        self.fitness = route_cost(&self.tour, &|u, v| self.tsp.cost(u, v));
        Ok(())
    }
}

impl CrossoverCapable for TspSolution {
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        let n = self.tour.len();
        let mut offspring = Genetic::crossover(&self.tour[..n - 1], &other.tour[..other.tour.len() - 1], rng)?;
        offspring.push(DEPOT);
        Ok(self.rebuild(offspring))
    }
}

impl fmt::Debug for TspSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TspSolution")
            .field("instance", &self.tsp.name)
            .field("fitness", &self.fitness)
            .field("tour", &self.tour)
            .finish()
    }
}
