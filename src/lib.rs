//! # cvrp_core
//!
//! Solution representation and local search engine for routing
//! metaheuristics on the Capacitated Vehicle Routing Problem (CVRP) and the
//! Traveling Salesman Problem (TSP).
//!
//! A CVRP solution is a giant tour of all clients, optimally cut into
//! capacity-feasible routes by a linear-time split. Local search improves
//! every route with 2-opt, 3-opt or Lin-Kernighan and exchanges route
//! segments between vehicles while respecting capacity.
//!
//! Metaheuristic drivers (simulated annealing, genetic algorithms, ant
//! colonies and the like) work with solutions through the traits of
//! [`solution`]:
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use cvrp_core::{Config, CvrpSolution, Problem, Solution};
//!
//! # fn main() -> cvrp_core::Result<()> {
//! let problem = Arc::new(Problem::from_parts(
//!     "example",
//!     3,
//!     vec![0, 1, 1, 1, 1],
//!     vec![(0, 0), (10, 0), (20, 0), (0, 10), (0, 20)],
//! )?);
//!
//! let config = Config::new().with_seed(7);
//! let mut rng = config.rng();
//! let mut solution = CvrpSolution::from_config(problem, &config, &mut rng)?;
//! solution.local_search();
//! println!("{}", solution);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod construct;
pub mod cvrp_solution;
pub mod distance;
pub mod error;
pub mod genetic;
pub mod local_search;
pub mod logging;
pub mod min_queue;
pub mod problem;
pub mod solution;
pub mod split;
pub mod tsp;

pub use crate::config::Config;
pub use crate::cvrp_solution::CvrpSolution;
pub use crate::distance::Cost;
pub use crate::error::{Error, Result};
pub use crate::local_search::{IntraRouteOptimizer, LocalSearch};
pub use crate::problem::{Node, Problem, DEPOT};
pub use crate::solution::{by_fitness, CrossoverCapable, Mutable, Solution};
pub use crate::split::{Split, SplitResult};
pub use crate::tsp::{Tsp, TspSolution};
