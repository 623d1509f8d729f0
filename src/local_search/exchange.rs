//! Inter-route exchange (2-opt across two routes).
//!
//! Every route is a depot-closed list: its clients followed by the depot.
//! Position `i` of a route names the edge `(route[i - 1], route[i])`, where
//! position 0 is the edge leaving the depot.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::trace;

use crate::distance::Cost;
use crate::problem::DEPOT;

/// How the two cut routes are reconnected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangeKind {
    /// Join `a -> c` and `b -> d`: the head of the first route continues with
    /// the reversed head of the second, and the reversed tail of the first
    /// continues with the tail of the second.
    Heads,
    /// Join `a -> d` and `c -> b`: the two routes swap tails.
    Tails,
}

/// An improving exchange between routes `first` and `second`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub gain: Cost,
    pub first: usize,
    pub second: usize,
    /// Cut position in `first`
    pub i: usize,
    /// Cut position in `second`
    pub j: usize,
    pub kind: ExchangeKind,
}

/// Best known exchange for every unordered pair of routes.
///
/// Stored as a flattened strictly lower triangle; each cell carries a
/// version that is bumped whenever the cell is recomputed.
#[derive(Debug, Clone, Default)]
pub struct ExchangeCache {
    routes: usize,
    cells: Vec<Option<Exchange>>,
    versions: Vec<u64>,
}

impl ExchangeCache {
    /// Forget every entry and size the table for `routes` routes.
    pub fn reset(&mut self, routes: usize) {
        let size = routes * routes.saturating_sub(1) / 2;
        self.routes = routes;
        self.cells.clear();
        self.cells.resize(size, None);
        self.versions.clear();
        self.versions.resize(size, 0);
    }

    /// Number of routes the table is sized for.
    pub fn routes(&self) -> usize {
        self.routes
    }

    fn index(p: usize, q: usize) -> usize {
        debug_assert_ne!(p, q);
        let (low, high) = if p < q { (p, q) } else { (q, p) };
        high * (high - 1) / 2 + low
    }

    /// Best known improving exchange between routes `p` and `q`.
    pub fn get(&self, p: usize, q: usize) -> Option<&Exchange> {
        self.cells[Self::index(p, q)].as_ref()
    }

    fn version(&self, p: usize, q: usize) -> u64 {
        self.versions[Self::index(p, q)]
    }

    fn set(&mut self, p: usize, q: usize, exchange: Option<Exchange>) -> u64 {
        let index = Self::index(p, q);
        self.cells[index] = exchange;
        self.versions[index] += 1;
        self.versions[index]
    }

    /// Iterate over all cached improving exchanges.
    pub fn iter(&self) -> impl Iterator<Item = &Exchange> {
        self.cells.iter().flatten()
    }
}

/// Heap entry pointing at a cache cell as it was when pushed.
#[derive(Debug, PartialEq, Eq)]
struct Candidate {
    gain: Cost,
    first: usize,
    second: usize,
    version: u64,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Highest gain first, then the lowest route pair
        self.gain
            .cmp(&other.gain)
            .then_with(|| other.second.cmp(&self.second))
            .then_with(|| other.first.cmp(&self.first))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sum of demands over a route.
pub fn route_load(route: &[usize], demand: &[u64]) -> u64 {
    route.iter().map(|&u| demand[u]).sum()
}

/// Find the best capacity-feasible exchange between routes `p` and `q`.
///
/// For a fixed cut `i` in `p`, the loads of both new routes are monotonic in
/// the cut `j` in `q`, so the feasible cuts form one contiguous range found
/// with a two-pointer sweep over the cumulative demand of `q`.
#[allow(clippy::too_many_arguments)]
pub fn find_best_exchange<F>(
    p: usize,
    q: usize,
    route_p: &[usize],
    route_q: &[usize],
    load_p: u64,
    load_q: u64,
    demand: &[u64],
    capacity: u64,
    cost: &F,
) -> Option<Exchange>
where
    F: Fn(usize, usize) -> Cost,
{
    let len_p = route_p.len();
    let len_q = route_q.len();
    let mut best: Option<Exchange> = None;

    let mut consider = |gain: Cost, i: usize, j: usize, kind: ExchangeKind| {
        if gain > best.map_or(0, |e| e.gain) {
            best = Some(Exchange {
                gain,
                first: p,
                second: q,
                i,
                j,
                kind,
            });
        }
    };

    let mut used_p = 0;
    for i in 0..len_p {
        let a = route_p[(i + len_p - 1) % len_p];
        let b = route_p[i];

        // Heads: new loads are used_p + used_q and the complement
        let mut j = 0;
        let mut used_q = 0;
        while j < len_q && (load_p - used_p) + (load_q - used_q) > capacity {
            used_q += demand[route_q[j]];
            j += 1;
        }
        while j < len_q && used_p + used_q <= capacity {
            let c = route_q[(j + len_q - 1) % len_q];
            let d = route_q[j];
            consider(
                cost(a, b) + cost(c, d) - cost(a, c) - cost(d, b),
                i,
                j,
                ExchangeKind::Heads,
            );
            used_q += demand[d];
            j += 1;
        }

        // Tails: new loads are used_p + (load_q - used_q) and used_q + (load_p - used_p)
        let mut j = 0;
        let mut used_q = 0;
        while j < len_q && used_p + (load_q - used_q) > capacity {
            used_q += demand[route_q[j]];
            j += 1;
        }
        while j < len_q && (load_p - used_p) + used_q <= capacity {
            let c = route_q[(j + len_q - 1) % len_q];
            let d = route_q[j];
            consider(
                cost(a, b) + cost(c, d) - cost(a, d) - cost(c, b),
                i,
                j,
                ExchangeKind::Tails,
            );
            used_q += demand[d];
            j += 1;
        }

        used_p += demand[b];
    }

    best
}

/// Rebuild the two routes of `exchange`.
fn apply_exchange(routes: &mut [Vec<usize>], exchange: &Exchange) {
    let Exchange {
        first: p,
        second: q,
        i,
        j,
        kind,
        ..
    } = *exchange;

    let route_p = std::mem::take(&mut routes[p]);
    let route_q = std::mem::take(&mut routes[q]);
    let len_p = route_p.len();

    let (new_p, new_q): (Vec<usize>, Vec<usize>) = match kind {
        ExchangeKind::Heads => (
            route_p[..i]
                .iter()
                .chain(route_q[..j].iter().rev())
                .chain(std::iter::once(&DEPOT))
                .copied()
                .collect(),
            route_p[i..len_p - 1]
                .iter()
                .rev()
                .chain(&route_q[j..])
                .copied()
                .collect(),
        ),
        ExchangeKind::Tails => (
            route_p[..i].iter().chain(&route_q[j..]).copied().collect(),
            route_q[..j].iter().chain(&route_p[i..]).copied().collect(),
        ),
    };

    debug_assert_eq!(new_p.last(), Some(&DEPOT));
    debug_assert_eq!(new_q.last(), Some(&DEPOT));
    debug_assert!({
        let mut before: Vec<usize> = route_p.iter().chain(&route_q).copied().collect();
        let mut after: Vec<usize> = new_p.iter().chain(&new_q).copied().collect();
        before.sort_unstable();
        after.sort_unstable();
        before == after
    });

    routes[p] = new_p;
    routes[q] = new_q;
}

/// Searches and applies improving exchanges between pairs of routes.
///
/// Owns the exchange cache and the candidate heap so that their buffers are
/// reused across calls.
#[derive(Debug, Default)]
pub struct InterRouteExchange {
    cache: ExchangeCache,
    heap: BinaryHeap<Candidate>,
    applied: usize,
}

impl InterRouteExchange {
    pub fn new() -> Self {
        Self::default()
    }

    /// The exchange cache as left by the last run.
    pub fn cache(&self) -> &ExchangeCache {
        &self.cache
    }

    /// Number of exchanges applied by the last run.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Optimize every route with `optimize`, then repeatedly apply the best
    /// improving exchange, re-optimizing both touched routes after each one.
    ///
    /// Every route must be depot-closed and within `capacity`; routes left
    /// without clients are removed. Returns the total improvement.
    pub fn exchange_routes<F, O>(
        &mut self,
        routes: &mut Vec<Vec<usize>>,
        demand: &[u64],
        capacity: u64,
        cost: &F,
        mut optimize: O,
    ) -> Cost
    where
        F: Fn(usize, usize) -> Cost,
        O: FnMut(&mut [usize]) -> Cost,
    {
        debug_assert!(routes.iter().all(|r| r.last() == Some(&DEPOT)));

        let mut improvement: Cost = routes.iter_mut().map(|r| optimize(r)).sum();
        let mut loads: Vec<u64> = routes.iter().map(|r| route_load(r, demand)).collect();
        debug_assert!(loads.iter().all(|&load| load <= capacity));

        let count = routes.len();
        self.cache.reset(count);
        self.heap.clear();
        self.applied = 0;

        for q in 1..count {
            for p in 0..q {
                self.refresh(p, q, routes, &loads, demand, capacity, cost);
            }
        }

        while let Some(candidate) = self.heap.pop() {
            let (p, q) = (candidate.first, candidate.second);
            if self.cache.version(p, q) != candidate.version {
                continue;
            }
            let Some(exchange) = self.cache.get(p, q).copied() else {
                continue;
            };

            trace!(
                "exchange {:?} between routes {} and {} at ({}, {}), gain {}",
                exchange.kind,
                p,
                q,
                exchange.i,
                exchange.j,
                exchange.gain
            );

            apply_exchange(routes, &exchange);
            improvement += exchange.gain;
            improvement += optimize(&mut routes[p]);
            improvement += optimize(&mut routes[q]);
            self.applied += 1;

            let total = loads[p] + loads[q];
            loads[p] = route_load(&routes[p], demand);
            loads[q] = total - loads[p];
            debug_assert_eq!(loads[q], route_load(&routes[q], demand));
            debug_assert!(loads[p] <= capacity && loads[q] <= capacity);

            for h in [p, q] {
                for k in (0..count).filter(|&k| k != h && !(h == q && k == p)) {
                    self.refresh(h, k, routes, &loads, demand, capacity, cost);
                }
            }
        }

        routes.retain(|r| r.len() > 1);
        improvement
    }

    /// Recompute the cache cell of the pair `(p, q)` and queue it if improving.
    #[allow(clippy::too_many_arguments)]
    fn refresh<F>(
        &mut self,
        p: usize,
        q: usize,
        routes: &[Vec<usize>],
        loads: &[u64],
        demand: &[u64],
        capacity: u64,
        cost: &F,
    ) where
        F: Fn(usize, usize) -> Cost,
    {
        let (p, q) = if p < q { (p, q) } else { (q, p) };

        // Routes without clients take no part in exchanges
        let best = if routes[p].len() > 1 && routes[q].len() > 1 {
            find_best_exchange(
                p, q, &routes[p], &routes[q], loads[p], loads[q], demand, capacity, cost,
            )
        } else {
            None
        };

        let version = self.cache.set(p, q, best);
        if let Some(exchange) = best {
            self.heap.push(Candidate {
                gain: exchange.gain,
                first: p,
                second: q,
                version,
            });
        }
    }
}
