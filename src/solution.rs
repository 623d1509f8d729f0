//! Capabilities shared by solutions of every routing problem.
//!
//! Metaheuristic drivers only see solutions through these traits: they read
//! the fitness, ask for neighbors, run local search and, for population-based
//! methods, recombine and mutate.

use std::cmp::Ordering;

use rand::Rng;

use crate::distance::Cost;
use crate::error::Result;

/// A solution of a routing problem.
pub trait Solution: Sized {
    /// The instance this solution solves, shared read-only between solutions.
    type Instance;
    /// Canonical form of the solution, suitable for comparison and printing.
    type Output;

    fn get_instance(&self) -> &Self::Instance;

    /// Total cost; lower is better.
    fn get_fitness(&self) -> Cost;

    fn get_solution(&self) -> Self::Output;

    /// A new solution close to this one. `self` is left untouched.
    fn neighbor<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Self>;

    /// Improve this solution in place up to a local optimum; returns the improvement.
    fn local_search(&mut self) -> Cost;

    /// Recompute every invariant from scratch.
    ///
    /// Only checks in debug builds; always `Ok` in release builds.
    fn validate(&self) -> Result<()>;
}

/// Solutions that can be randomly perturbed in place.
pub trait Mutable {
    fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()>;
}

/// Solutions that can be recombined into an offspring.
pub trait CrossoverCapable: Sized {
    fn crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> Result<Self>;
}

/// Order solutions by ascending fitness.
pub fn by_fitness<S: Solution>(a: &S, b: &S) -> Ordering {
    a.get_fitness().cmp(&b.get_fitness())
}
