//! Solution representation for the CVRP.
//!
//! A solution is a giant tour of all clients plus the end position of every
//! route in it. The truck boundaries and the fitness always come from the
//! optimal split of the tour, except after local search, which reassembles
//! both from the optimized routes.

use std::fmt;
use std::iter;
use std::sync::Arc;

use itertools::Itertools;
use rand::Rng;

use crate::config::Config;
use crate::construct;
use crate::distance::Cost;
use crate::error::{Error, Result};
use crate::genetic::{reversal_range, Genetic};
use crate::local_search::utils::CandidateList;
use crate::local_search::{IntraRouteOptimizer, LocalSearch};
use crate::problem::{Problem, DEPOT};
use crate::solution::{CrossoverCapable, Mutable, Solution};
use crate::split::Split;

/// Represents a complete solution to a CVRP instance.
#[derive(Clone)]
pub struct CvrpSolution {
    problem: Arc<Problem>,
    tour: Vec<usize>,
    truck: Vec<usize>,
    fitness: Cost,
    optimizer: IntraRouteOptimizer,
    candidates: Option<Arc<CandidateList>>,
}

impl CvrpSolution {
    /// Adopt a giant tour, which must be a permutation of the clients `1..=n`.
    pub fn new(problem: Arc<Problem>, tour: Vec<usize>) -> Result<Self> {
        check_permutation(&tour, problem.get_n())?;
        let split = Split::split(&tour, &problem)?;

        Ok(CvrpSolution {
            problem,
            tour,
            truck: split.truck,
            fitness: split.fitness,
            optimizer: IntraRouteOptimizer::default(),
            candidates: None,
        })
    }

    /// Adopt `tour` if given, otherwise build one with GRASP using a random alpha.
    pub fn construct<R: Rng + ?Sized>(
        problem: Arc<Problem>,
        tour: Option<Vec<usize>>,
        rng: &mut R,
    ) -> Result<Self> {
        match tour {
            Some(tour) => Self::new(problem, tour),
            None => {
                let alpha = rng.gen::<f64>();
                Self::grasp(problem, alpha, rng)
            }
        }
    }

    /// Build a solution with GRASP from a random seed client.
    pub fn grasp<R: Rng + ?Sized>(problem: Arc<Problem>, alpha: f64, rng: &mut R) -> Result<Self> {
        let tour = construct::grasp(&problem, alpha, None, rng)?;
        Self::new(problem, tour)
    }

    /// Build a solution from a uniformly shuffled giant tour.
    pub fn random<R: Rng + ?Sized>(problem: Arc<Problem>, rng: &mut R) -> Result<Self> {
        let tour = construct::random_tour(problem.get_n(), rng);
        Self::new(problem, tour)
    }

    /// Build a solution with GRASP and the local search settings of `config`.
    pub fn from_config<R: Rng + ?Sized>(
        problem: Arc<Problem>,
        config: &Config,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;
        let alpha = config.grasp_alpha.unwrap_or_else(|| rng.gen::<f64>());
        let candidates = config
            .granularity
            .map(|granularity| Arc::new(CandidateList::new(&problem, granularity)));

        let mut solution = Self::grasp(problem, alpha, rng)?.with_optimizer(config.optimizer);
        solution.candidates = candidates;
        Ok(solution)
    }

    /// Build a solution without any check; [`Solution::validate`] reports inconsistencies.
    pub fn from_raw_parts(
        problem: Arc<Problem>,
        tour: Vec<usize>,
        truck: Vec<usize>,
        fitness: Cost,
    ) -> Self {
        CvrpSolution {
            problem,
            tour,
            truck,
            fitness,
            optimizer: IntraRouteOptimizer::default(),
            candidates: None,
        }
    }

    /// Set the optimizer used on single routes by [`Solution::local_search`].
    pub fn with_optimizer(mut self, optimizer: IntraRouteOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Restrict intra-route moves to the given candidate lists.
    pub fn with_candidates(mut self, candidates: Arc<CandidateList>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    pub fn tour(&self) -> &[usize] {
        &self.tour
    }

    /// Inclusive end position of every route in the tour.
    pub fn truck(&self) -> &[usize] {
        &self.truck
    }

    pub fn optimizer(&self) -> IntraRouteOptimizer {
        self.optimizer
    }

    /// Clients of each route, in visiting order.
    pub fn routes(&self) -> impl Iterator<Item = &[usize]> + '_ {
        Split::truck_ranges(&self.truck).map(move |(i, j)| &self.tour[i..=j])
    }

    pub fn num_routes(&self) -> usize {
        self.truck.len()
    }

    /// Run local search with an externally owned engine, reusing its buffers.
    ///
    /// The routes are optimized as depot-closed cycles, then the tour and the
    /// truck boundaries are rebuilt from them. Returns the improvement.
    pub fn local_search_with(&mut self, search: &mut LocalSearch) -> Cost {
        let mut routes: Vec<Vec<usize>> = self
            .routes()
            .map(|route| route.iter().copied().chain(iter::once(DEPOT)).collect())
            .collect();

        let improvement = search.educate(&mut routes, &self.problem);

        for route in &mut routes {
            let depot = route.pop();
            debug_assert_eq!(depot, Some(DEPOT));
        }

        let (tour, truck) = Split::merge_routes(&routes);
        self.tour = tour;
        self.truck = truck;
        self.fitness -= improvement;

        debug_assert!(self.validate().is_ok());
        improvement
    }

    /// Recompute every invariant from scratch, in any build.
    pub fn check(&self) -> Result<()> {
        let n = self.problem.get_n();
        check_permutation(&self.tour, n).map_err(|e| Error::invariant(e.to_string()))?;

        if self.truck.last() != Some(&(n - 1)) {
            return Err(Error::invariant(format!(
                "last truck ends at {:?}, expected {}",
                self.truck.last(),
                n - 1
            )));
        }
        if self.truck.windows(2).any(|w| w[0] >= w[1]) {
            return Err(Error::invariant("truck boundaries are not increasing"));
        }

        let capacity = self.problem.get_capacity();
        let mut fitness = 0;
        for (k, route) in self.routes().enumerate() {
            let load: u64 = route.iter().map(|&u| self.problem.get_demand(u)).sum();
            if load > capacity {
                return Err(Error::invariant(format!(
                    "route {} has load {} above capacity {}",
                    k, load, capacity
                )));
            }
            fitness += route_cost(&self.problem, route);
        }

        if fitness != self.fitness {
            return Err(Error::invariant(format!(
                "cached fitness {} differs from recomputed {}",
                self.fitness, fitness
            )));
        }

        Ok(())
    }

    /// Solution sharing this one's instance and settings, built from a new tour.
    fn rebuild(&self, tour: Vec<usize>) -> Result<Self> {
        let split = Split::split(&tour, &self.problem)?;
        Ok(CvrpSolution {
            problem: Arc::clone(&self.problem),
            tour,
            truck: split.truck,
            fitness: split.fitness,
            optimizer: self.optimizer,
            candidates: self.candidates.clone(),
        })
    }
}

/// Cost of visiting `route` from and back to the depot.
fn route_cost(problem: &Problem, route: &[usize]) -> Cost {
    iter::once(DEPOT)
        .chain(route.iter().copied())
        .chain(iter::once(DEPOT))
        .tuple_windows()
        .map(|(u, v)| problem.cost(u, v))
        .sum()
}

fn check_permutation(tour: &[usize], n: usize) -> Result<()> {
    if tour.len() != n {
        return Err(Error::invalid_tour(format!(
            "tour has {} clients, expected {}",
            tour.len(),
            n
        )));
    }

    let mut seen = vec![false; n + 1];
    for &u in tour {
        if u == DEPOT || u > n {
            return Err(Error::invalid_tour(format!("{} is not a client in [1, {}]", u, n)));
        }
        if seen[u] {
            return Err(Error::invalid_tour(format!("client {} appears twice", u)));
        }
        seen[u] = true;
    }

    Ok(())
}

impl Solution for CvrpSolution {
    type Instance = Problem;
    type Output = Vec<Vec<usize>>;

    fn get_instance(&self) -> &Problem {
        &self.problem
    }

    fn get_fitness(&self) -> Cost {
        self.fitness
    }

    /// Routes with each one starting at its smaller endpoint, sorted lexicographically.
    fn get_solution(&self) -> Vec<Vec<usize>> {
        self.routes()
            .map(|route| {
                let mut route = route.to_vec();
                if route.len() > 1 && route[0] > route[route.len() - 1] {
                    route.reverse();
                }
                route
            })
            .sorted()
            .collect()
    }

    /// Reverse a random range of the tour and split it again.
    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self> {
        let (i, j) = reversal_range(self.tour.len(), rng);
        let mut tour = self.tour.clone();
        tour[i..j].reverse();
        self.rebuild(tour)
    }

    fn local_search(&mut self) -> Cost {
        let mut search = LocalSearch::new(self.optimizer);
        if let Some(candidates) = &self.candidates {
            search = search.with_candidates(Arc::clone(candidates));
        }
        self.local_search_with(&mut search)
    }

    fn validate(&self) -> Result<()> {
        if cfg!(debug_assertions) {
            self.check()
        } else {
            Ok(())
        }
    }
}

impl Mutable for CvrpSolution {
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        Genetic::mutate(&mut self.tour, rng)?;
        let split = Split::split(&self.tour, &self.problem)?;
        self.truck = split.truck;
        self.fitness = split.fitness;
        Ok(())
    }
}

impl CrossoverCapable for CvrpSolution {
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Result<Self> {
        let offspring = Genetic::crossover(&self.tour, &other.tour, rng)?;
        self.rebuild(offspring)
    }
}

impl fmt::Debug for CvrpSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "CvrpSolution for {}:", self.problem.name())?;
        writeln!(f, "  Fitness: {}", self.fitness)?;
        writeln!(f, "  Routes: {}", self.truck.len())?;

        for (i, route) in self.routes().enumerate() {
            let load: u64 = route.iter().map(|&u| self.problem.get_demand(u)).sum();
            writeln!(
                f,
                "  Route {}: {:?} (Load: {} / {}, Cost: {})",
                i,
                route,
                load,
                self.problem.get_capacity(),
                route_cost(&self.problem, route)
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for CvrpSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.fitness)?;
        for (k, route) in self.get_solution().iter().enumerate() {
            if k > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}", route)?;
        }
        write!(f, "]")
    }
}
