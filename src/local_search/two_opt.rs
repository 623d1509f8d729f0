//! 2-Opt neighborhood for a single closed route.

use crate::distance::Cost;

use super::utils::{rotate_depot_last, route_cost, CandidateList};

/// Cost of the edge entering each position: `dis[i] = cost(route[i - 1], route[i])`.
pub(crate) fn incoming_edges<F>(route: &[usize], cost: &F) -> Vec<Cost>
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    (0..n).map(|i| cost(route[(i + n - 1) % n], route[i])).collect()
}

/// Best reversal `route[i..j]`, scanning `i` then `j` ascending and keeping the first maximum.
pub(crate) fn best_two_opt_move<F>(
    route: &[usize],
    dis: &[Cost],
    cost: &F,
    candidates: Option<&CandidateList>,
) -> Option<(Cost, usize, usize)>
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    let mut best: Option<(Cost, usize, usize)> = None;

    for i in 0..n.saturating_sub(2) {
        let a = route[(i + n - 1) % n];
        let b = route[i];

        for j in (i + 2)..n {
            let c = route[j - 1];
            let d = route[j];

            if candidates.map_or(false, |list| !list.contains(a, c)) {
                continue;
            }

            let gain = dis[i] + dis[j] - cost(a, c) - cost(b, d);
            if gain > best.map_or(0, |(g, _, _)| g) {
                best = Some((gain, i, j));
            }
        }
    }

    best
}

/// Run best-improvement 2-opt on a closed route until no reversal improves it.
///
/// The route contains the depot exactly once and is returned with the depot
/// as its last element. Returns the total improvement.
pub fn two_opt<F>(route: &mut [usize], cost: &F, candidates: Option<&CandidateList>) -> Cost
where
    F: Fn(usize, usize) -> Cost,
{
    if route.len() < 4 {
        rotate_depot_last(route);
        return 0;
    }

    let initial = cfg!(debug_assertions).then(|| route_cost(route, cost));
    let mut improvement = 0;

    loop {
        let dis = incoming_edges(route, cost);
        match best_two_opt_move(route, &dis, cost, candidates) {
            Some((gain, i, j)) => {
                route[i..j].reverse();
                improvement += gain;
            }
            None => break,
        }
    }

    rotate_depot_last(route);

    if let Some(initial) = initial {
        debug_assert_eq!(initial - improvement, route_cost(route, cost));
    }

    improvement
}
