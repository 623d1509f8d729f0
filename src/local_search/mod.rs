//! Local search operators for depot-closed routes.
//!
//! A single route is improved by one of the intra-route optimizers
//! ([`two_opt`], [`three_opt`] or [`lin_kernighan`]); a set of routes is
//! improved by [`exchange`], which moves route segments between vehicles and
//! re-optimizes every route it touches.

pub mod exchange;
pub mod lin_kernighan;
pub mod three_opt;
pub mod two_opt;
pub mod utils;

use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::distance::Cost;
use crate::problem::Problem;

use self::exchange::InterRouteExchange;
use self::utils::CandidateList;

/// Which optimizer is used to improve a single closed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntraRouteOptimizer {
    #[default]
    TwoOpt,
    ThreeOpt,
    LinKernighan,
}

impl IntraRouteOptimizer {
    /// Improve `route` in place until it is a local optimum; returns the improvement.
    ///
    /// The route contains the depot exactly once and comes back with the
    /// depot as its last element. 3-opt ignores `candidates`.
    pub fn optimize<F>(self, route: &mut [usize], cost: &F, candidates: Option<&CandidateList>) -> Cost
    where
        F: Fn(usize, usize) -> Cost,
    {
        match self {
            IntraRouteOptimizer::TwoOpt => two_opt::two_opt(route, cost, candidates),
            IntraRouteOptimizer::ThreeOpt => three_opt::three_opt(route, cost),
            IntraRouteOptimizer::LinKernighan => lin_kernighan::lin_kernighan(route, cost, candidates),
        }
    }
}

/// Manages the local search phase of a CVRP solution.
#[derive(Debug, Default)]
pub struct LocalSearch {
    pub optimizer: IntraRouteOptimizer,
    candidates: Option<Arc<CandidateList>>,
    exchange: InterRouteExchange,
}

impl LocalSearch {
    /// Create a new local search using `optimizer` on single routes.
    pub fn new(optimizer: IntraRouteOptimizer) -> Self {
        LocalSearch {
            optimizer,
            candidates: None,
            exchange: InterRouteExchange::new(),
        }
    }

    /// Restrict intra-route moves to the given candidate lists.
    pub fn with_candidates(mut self, candidates: Arc<CandidateList>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Build a local search from configuration, computing candidate lists if requested.
    pub fn from_config(config: &Config, problem: &Problem) -> Self {
        let search = LocalSearch::new(config.optimizer);
        match config.granularity {
            Some(granularity) => {
                search.with_candidates(Arc::new(CandidateList::new(problem, granularity)))
            }
            None => search,
        }
    }

    /// Candidate lists in use, if any.
    pub fn candidates(&self) -> Option<&CandidateList> {
        self.candidates.as_deref()
    }

    /// Number of inter-route exchanges applied by the last call to [`LocalSearch::educate`].
    pub fn exchanges_applied(&self) -> usize {
        self.exchange.applied()
    }

    /// Optimize a single depot-closed route of `problem`.
    pub fn optimize_route(&self, route: &mut [usize], problem: &Problem) -> Cost {
        let cost = |u, v| problem.cost(u, v);
        self.optimizer.optimize(route, &cost, self.candidates.as_deref())
    }

    /// Run local search over a set of depot-closed routes.
    ///
    /// Every route is first optimized on its own; improving exchanges between
    /// routes are then applied until none is left. Routes emptied by an
    /// exchange are removed. Returns the total improvement.
    pub fn educate(&mut self, routes: &mut Vec<Vec<usize>>, problem: &Problem) -> Cost {
        let optimizer = self.optimizer;
        let candidates = self.candidates.as_deref();
        let cost = |u, v| problem.cost(u, v);
        let before = routes.len();

        let improvement = self.exchange.exchange_routes(
            routes,
            problem.get_all_demands(),
            problem.get_capacity(),
            &cost,
            |route| optimizer.optimize(route, &cost, candidates),
        );

        debug!(
            "local search ({:?}): improvement {}, {} exchanges, {} -> {} routes",
            optimizer,
            improvement,
            self.exchange.applied(),
            before,
            routes.len()
        );

        improvement
    }
}
