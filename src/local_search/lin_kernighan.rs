//! Lin-Kernighan style variable-depth search for a single closed route.
//!
//! A move is a chain of route positions `t = [t0, t1, t2, t3, ...]`. Every
//! pair `(t[2k], t[2k + 1])` is a removed edge between neighboring positions,
//! and the chain is closed by adding the edges `(t[2k + 1], t[2k + 2])` plus
//! `(t[last], t0)`. A chain is only usable if the resulting edge set is a
//! single Hamiltonian cycle.
//!
//! The open gain of a chain is the cost of its removed edges minus the cost
//! of its added edges, leaving out the closing edge. A chain is extended
//! while the open gain stays positive after adding the next edge; the closed
//! gain of every prefix is tracked and the best prefix is the move.

use crate::distance::Cost;

use super::utils::{rotate_depot_last, route_cost, CandidateList};

/// Relink the positions of a cycle of length `n` according to the chain `t`.
///
/// Returns the position order of the resulting cycle, starting at `t[0]`, or
/// `None` when the edges do not form a single cycle through all positions.
fn relink(n: usize, t: &[usize]) -> Option<Vec<usize>> {
    let m = t.len();
    let mut adjacent: Vec<[usize; 2]> = (0..n).map(|u| [(u + n - 1) % n, (u + 1) % n]).collect();

    for k in 0..m {
        let (removed, added) = if k % 2 == 0 {
            (t[(k + 1) % m], t[(k + m - 1) % m])
        } else {
            (t[(k + m - 1) % m], t[(k + 1) % m])
        };

        let slot = &mut adjacent[t[k]];
        if slot[0] == removed {
            slot[0] = added;
        } else if slot[1] == removed {
            slot[1] = added;
        } else {
            return None;
        }

        if slot[0] == slot[1] {
            return None;
        }
    }

    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut current = t[0];
    let mut previous = adjacent[current][0];

    while !visited[current] {
        visited[current] = true;
        order.push(current);

        let [left, right] = adjacent[current];
        let next = if left == previous { right } else { left };
        previous = current;
        current = next;
    }

    (order.len() == n).then_some(order)
}

/// Best edge to append to the chain `t`, as `(step, u, v)`.
///
/// Adding `(a, u)` must keep `open` positive; among those edges the one
/// maximizing `cost(u, v) - cost(a, u)` is chosen.
fn best_move<F>(
    t: &[usize],
    open: Cost,
    route: &[usize],
    cost: &F,
    candidates: Option<&CandidateList>,
) -> Option<(Cost, usize, usize)>
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    let a = route[t[t.len() - 1]];

    let mut in_chain = vec![false; n];
    for &p in t {
        in_chain[p] = true;
    }

    let mut probe = t.to_vec();
    probe.extend([0, 0]);
    let last = probe.len() - 1;

    let mut best: Option<(Cost, usize, usize)> = None;

    for v in 0..n {
        let u = (v + n - 1) % n;
        if in_chain[v] || in_chain[u] {
            continue;
        }

        // Flip the removed edge if the first orientation closes a sub-cycle
        let Some((u, v)) = [(u, v), (v, u)].into_iter().find(|&(x, y)| {
            probe[last - 1] = x;
            probe[last] = y;
            relink(n, &probe).is_some()
        }) else {
            continue;
        };

        if candidates.map_or(false, |list| !list.contains(a, route[u])) {
            continue;
        }
        if open - cost(a, route[u]) <= 0 {
            continue;
        }

        let step = cost(route[u], route[v]) - cost(a, route[u]);
        if best.map_or(true, |(s, _, _)| step > s) {
            best = Some((step, u, v));
        }
    }

    best
}

/// Grow a chain from every starting edge and keep the most improving prefix.
fn select_moves<F>(
    route: &[usize],
    cost: &F,
    candidates: Option<&CandidateList>,
) -> Option<(Cost, Vec<usize>)>
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    let mut best: Option<(Cost, Vec<usize>)> = None;

    for v in 0..n {
        let mut t = vec![(v + n - 1) % n, v];
        let mut open = cost(route[t[0]], route[t[1]]);
        let (mut best_gain, mut best_len) = (0, t.len());

        while let Some((step, u, w)) = best_move(&t, open, route, cost, candidates) {
            open += step;
            t.push(u);
            t.push(w);

            let closed = open - cost(route[w], route[t[0]]);
            if closed > best_gain {
                best_gain = closed;
                best_len = t.len();
            }
        }

        if best_gain > best.as_ref().map_or(0, |(g, _)| *g) {
            t.truncate(best_len);
            best = Some((best_gain, t));
        }
    }

    best
}

/// Run Lin-Kernighan on a closed route until no chain improves it.
///
/// Returns the total improvement; the depot ends up as the last element.
pub fn lin_kernighan<F>(route: &mut [usize], cost: &F, candidates: Option<&CandidateList>) -> Cost
where
    F: Fn(usize, usize) -> Cost,
{
    let n = route.len();
    rotate_depot_last(route);
    if n < 4 {
        return 0;
    }

    let initial = cfg!(debug_assertions).then(|| route_cost(route, cost));
    let mut improvement = 0;

    // The depot stays last between iterations
    while let Some((gain, t)) = select_moves(route, cost, candidates) {
        let Some(order) = relink(n, &t) else {
            break;
        };

        let relinked: Vec<usize> = order.into_iter().map(|p| route[p]).collect();
        route.copy_from_slice(&relinked);
        rotate_depot_last(route);
        improvement += gain;
    }

    if let Some(initial) = initial {
        debug_assert_eq!(initial - improvement, route_cost(route, cost));
    }

    improvement
}
