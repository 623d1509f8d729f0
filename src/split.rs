//! Split algorithm implementation to convert a giant tour into routes.

use crate::distance::Cost;
use crate::error::{Error, Result};
use crate::min_queue::MinQueue;
use crate::problem::{Problem, DEPOT};

/// Result of splitting a giant tour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    /// Total cost of all routes
    pub fitness: Cost,
    /// Inclusive end position of each route in the giant tour; the last one is `len - 1`
    pub truck: Vec<usize>,
}

/// Implements the Split algorithm to optimally partition a giant tour.
pub struct Split;

impl Split {
    /// Split a giant tour of `problem` clients into capacity-feasible routes of minimum total cost.
    pub fn split(tour: &[usize], problem: &Problem) -> Result<SplitResult> {
        Self::split_with(
            tour,
            problem.get_all_demands(),
            problem.get_capacity(),
            |u, v| problem.cost(u, v),
        )
    }

    /// Linear-time split over an arbitrary demand vector and cost function.
    ///
    /// `split[j]` is the marginal cost of returning to the depot after
    /// position `j` and leaving it again for position `j + 1`, instead of
    /// travelling directly. Positions `i..=j` form the feasible window of
    /// route starts for a route ending at `j`; the window minimum of the best
    /// cost to close a route just before each start is kept in a [`MinQueue`].
    pub fn split_with<F>(tour: &[usize], demand: &[u64], capacity: u64, cost: F) -> Result<SplitResult>
    where
        F: Fn(usize, usize) -> Cost,
    {
        let n = tour.len();
        if n == 0 {
            return Err(Error::invalid_tour("cannot split an empty tour"));
        }

        let distances: Vec<Cost> = tour.windows(2).map(|w| cost(w[0], w[1])).collect();
        let split: Vec<Cost> = tour
            .windows(2)
            .zip(&distances)
            .map(|(w, &d)| cost(w[0], DEPOT) + cost(DEPOT, w[1]) - d)
            .collect();

        let mut path: Vec<Option<usize>> = vec![None; n];
        let mut queue: MinQueue<(Cost, Option<usize>)> = MinQueue::new();
        queue.push((0, None));

        let mut used = 0;
        let mut i = 0;
        let mut best = 0;

        for j in 0..n {
            let client_demand = demand[tour[j]];
            if client_demand > capacity {
                return Err(Error::InfeasibleDemand {
                    client: tour[j],
                    demand: client_demand,
                    capacity,
                });
            }

            // Move the left pointer until the truck fits again
            used += client_demand;
            while used > capacity {
                used -= demand[tour[i]];
                i += 1;
                queue.pop();
            }
            debug_assert!(i <= j);

            let &(value, pred) = queue
                .min()
                .ok_or_else(|| Error::invariant("split window is empty"))?;
            best = value;
            path[j] = pred;

            if j + 1 < n {
                queue.push((split[j] + best, Some(j)));
            }
        }

        let mut truck = Vec::new();
        let mut end = Some(n - 1);
        while let Some(v) = end {
            truck.push(v);
            end = path[v];
        }
        truck.reverse();

        let fitness = best
            + cost(DEPOT, tour[0])
            + distances.iter().sum::<Cost>()
            + cost(tour[n - 1], DEPOT);

        Ok(SplitResult { fitness, truck })
    }

    /// Inclusive `(start, end)` tour positions of each route.
    pub fn truck_ranges(truck: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
        truck
            .iter()
            .scan(0, |start, &end| {
                let range = (*start, end);
                *start = end + 1;
                Some(range)
            })
    }

    /// Concatenate routes (client lists without depot) back into a giant tour and its truck ends.
    ///
    /// Empty routes are skipped.
    pub fn merge_routes<R: AsRef<[usize]>>(routes: &[R]) -> (Vec<usize>, Vec<usize>) {
        let mut tour = Vec::new();
        let mut truck = Vec::new();

        for route in routes.iter().map(AsRef::as_ref).filter(|r| !r.is_empty()) {
            tour.extend_from_slice(route);
            truck.push(tour.len() - 1);
        }

        (tour, truck)
    }
}
