//! 3-Opt neighborhood for a single closed route.
//!
//! Three removed edges `(a, b)`, `(c, d)` and `(e, f)` at positions `i < j < k`
//! split the cycle into `b..c`, `d..e` and the wrapping segment `f..a`, each
//! holding at least one node. Besides every 2-opt reversal, the four
//! reconnections that are not reachable by a single reversal are evaluated;
//! each is applied as a set of in-place segment reversals.
//!
//! Every triple of positions is scanned, so the neighborhood does not depend
//! on where the cycle is cut and a route stays locally optimal after the
//! depot is rotated to the end.

use crate::distance::Cost;

use super::two_opt::{best_two_opt_move, incoming_edges};
use super::utils::{reverse_cyclic, rotate_depot_last, route_cost};

/// A cyclic reversal of `len` positions starting at `start`.
type Reversal = (usize, usize);

fn best_three_opt_move<F>(route: &[usize], dis: &[Cost], cost: &F) -> Option<(Cost, Vec<Reversal>)>
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    let mut best: Option<(Cost, Vec<Reversal>)> =
        best_two_opt_move(route, dis, cost, None).map(|(gain, i, j)| (gain, vec![(i, j - i)]));

    let mut consider = |gain: Cost, reversals: &[Reversal]| {
        if gain > best.as_ref().map_or(0, |(g, _)| *g) {
            best = Some((gain, reversals.to_vec()));
        }
    };

    for i in 0..n {
        let a = route[(i + n - 1) % n];
        let b = route[i];

        for j in (i + 1)..n {
            let c = route[j - 1];
            let d = route[j];

            for k in (j + 1)..n {
                let e = route[k - 1];
                let f = route[k];

                let removed = dis[i] + dis[j] + dis[k];
                let first = (i, j - i);
                let second = (j, k - j);
                let wrap = (k, n - k + i);

                consider(removed - cost(a, c) - cost(b, e) - cost(d, f), &[first, second]);
                consider(
                    removed - cost(a, d) - cost(b, e) - cost(c, f),
                    &[first, second, wrap],
                );
                consider(removed - cost(a, d) - cost(b, f) - cost(c, e), &[second, wrap]);
                consider(removed - cost(a, e) - cost(b, d) - cost(c, f), &[first, wrap]);
            }
        }
    }

    best
}

/// Run best-improvement 3-opt on a closed route until no move improves it.
///
/// Returns the total improvement; the depot ends up as the last element.
pub fn three_opt<F>(route: &mut [usize], cost: &F) -> Cost
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
        match best_three_opt_move(route, &dis, cost) {
            Some((gain, reversals)) => {
                for (start, len) in reversals {
                    reverse_cyclic(route, start, len);
                }
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
