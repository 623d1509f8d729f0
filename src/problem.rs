//! Problem definition and data structures for the CVRP.

use serde::{Deserialize, Serialize};

use crate::distance::{rounded_euclidean, Cost, DistanceMatrix};
use crate::error::{Error, Result};

/// Index of the depot. Clients are numbered `1..=n`.
pub const DEPOT: usize = 0;

/// Represents a node (client or depot) in the CVRP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: usize,
    pub x: i64,
    pub y: i64,
    pub demand: u64,
}

impl Node {
    /// Create a new node.
    pub fn new(id: usize, x: i64, y: i64, demand: u64) -> Self {
        Node { id, x, y, demand }
    }

    /// Create the depot node at the given location.
    pub fn depot(x: i64, y: i64) -> Self {
        Node::new(DEPOT, x, y, 0)
    }

    /// Location of this node.
    pub fn location(&self) -> (i64, i64) {
        (self.x, self.y)
    }

    /// Euclidean distance to another node, rounded to the nearest integer.
    pub fn distance(&self, other: &Node) -> Cost {
        rounded_euclidean(self.location(), other.location())
    }
}

/// Raw, unvalidated problem data as it appears in serialized form.
#[derive(Debug, Clone, Deserialize)]
struct ProblemData {
    name: String,
    nodes: Vec<Node>,
    capacity: u64,
    #[serde(default)]
    best: Option<Cost>,
    #[serde(default)]
    best_tour: Option<Vec<usize>>,
}

/// Represents a CVRP problem instance.
///
/// The instance is read-only after construction and is meant to be shared
/// between many solutions. Every field is validated by [`Problem::new`] and
/// only readable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "ProblemData")]
pub struct Problem {
    name: String,
    nodes: Vec<Node>,
    capacity: u64,
    /// Best known total cost, if any
    best: Option<Cost>,
    /// Best known tour: starts and ends at the depot, routes separated by depot visits
    best_tour: Option<Vec<usize>>,
    #[serde(skip)]
    demands: Vec<u64>,
    #[serde(skip)]
    distance_matrix: DistanceMatrix,
}

impl Problem {
    /// Create a new CVRP problem.
    ///
    /// `nodes[0]` must be the depot (demand 0) and every other node a client
    /// whose demand fits in one vehicle.
    pub fn new(name: impl Into<String>, nodes: Vec<Node>, capacity: u64) -> Result<Self> {
        Self::check(&nodes, capacity)?;

        let locations: Vec<(i64, i64)> = nodes.iter().map(Node::location).collect();
        let demands = nodes.iter().map(|node| node.demand).collect();

        Ok(Problem {
            name: name.into(),
            distance_matrix: DistanceMatrix::from_locations(&locations),
            demands,
            nodes,
            capacity,
            best: None,
            best_tour: None,
        })
    }

    /// Create a problem from parallel demand and location lists (index 0 is the depot).
    pub fn from_parts(
        name: impl Into<String>,
        capacity: u64,
        demands: Vec<u64>,
        locations: Vec<(i64, i64)>,
    ) -> Result<Self> {
        if demands.len() != locations.len() {
            return Err(Error::invalid_instance(format!(
                "expected {} demands, found {}",
                locations.len(),
                demands.len()
            )));
        }

        let nodes = locations
            .into_iter()
            .zip(demands)
            .enumerate()
            .map(|(id, ((x, y), demand))| Node::new(id, x, y, demand))
            .collect();

        Self::new(name, nodes, capacity)
    }

    /// Attach a best known value and the tour achieving it.
    pub fn with_best(mut self, best: Cost, best_tour: Vec<usize>) -> Result<Self> {
        let n = self.get_n();

        if best_tour.first() != Some(&DEPOT) || best_tour.last() != Some(&DEPOT) {
            return Err(Error::invalid_instance("best tour must start and end at the depot"));
        }
        if best_tour.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::invalid_instance("best tour repeats a node consecutively"));
        }

        let mut visited = vec![false; n + 1];
        for &u in best_tour.iter().filter(|&&u| u != DEPOT) {
            if u > n {
                return Err(Error::invalid_instance(format!("best tour has unknown node {}", u)));
            }
            if visited[u] {
                return Err(Error::invalid_instance(format!("best tour visits {} twice", u)));
            }
            visited[u] = true;
        }
        if visited.iter().skip(1).any(|&v| !v) {
            return Err(Error::invalid_instance("best tour misses some clients"));
        }

        let expected: Cost = best_tour.windows(2).map(|w| self.cost(w[0], w[1])).sum();
        if expected != best {
            return Err(Error::invalid_instance(format!(
                "best value {} does not match best tour cost {}",
                best, expected
            )));
        }

        self.best = Some(best);
        self.best_tour = Some(best_tour);
        Ok(self)
    }

    fn check(nodes: &[Node], capacity: u64) -> Result<()> {
        if nodes.len() < 3 {
            return Err(Error::invalid_instance(format!(
                "need at least 2 clients, found {}",
                nodes.len().saturating_sub(1)
            )));
        }
        if capacity == 0 {
            return Err(Error::invalid_instance("capacity must be positive"));
        }
        if let Some((index, node)) = nodes.iter().enumerate().find(|(i, node)| node.id != *i) {
            return Err(Error::invalid_instance(format!(
                "node at position {} has id {}",
                index, node.id
            )));
        }
        if nodes[DEPOT].demand != 0 {
            return Err(Error::invalid_instance(format!(
                "depot must have demand 0, found {}",
                nodes[DEPOT].demand
            )));
        }

        for node in &nodes[1..] {
            if node.demand == 0 {
                return Err(Error::invalid_instance(format!(
                    "client {} has no demand",
                    node.id
                )));
            }
            if node.demand > capacity {
                return Err(Error::InfeasibleDemand {
                    client: node.id,
                    demand: node.demand,
                    capacity,
                });
            }
        }

        Ok(())
    }

    /// Cost to travel from `u` to `v`.
    #[inline]
    pub fn cost(&self, u: usize, v: usize) -> Cost {
        self.distance_matrix.get(u, v)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// All nodes, depot first.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Best known total cost, if one was attached with [`Problem::with_best`].
    pub fn best(&self) -> Option<Cost> {
        self.best
    }

    pub fn best_tour(&self) -> Option<&[usize]> {
        self.best_tour.as_deref()
    }

    /// Number of clients (excluding the depot).
    pub fn get_n(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Capacity of every vehicle.
    pub fn get_capacity(&self) -> u64 {
        self.capacity
    }

    /// Demand of node `u`; the depot has demand 0.
    #[inline]
    pub fn get_demand(&self, u: usize) -> u64 {
        self.demands[u]
    }

    /// Demands of all nodes, indexed by node (depot at index 0).
    pub fn get_all_demands(&self) -> &[u64] {
        &self.demands
    }

    /// Sum of all client demands.
    pub fn total_demand(&self) -> u64 {
        self.demands.iter().sum()
    }

    /// Get the depot node.
    pub fn get_depot(&self) -> &Node {
        &self.nodes[DEPOT]
    }

    /// Locations of all nodes, depot first.
    pub fn get_locations(&self) -> Vec<(i64, i64)> {
        self.nodes.iter().map(Node::location).collect()
    }
}

impl TryFrom<ProblemData> for Problem {
    type Error = Error;

    fn try_from(data: ProblemData) -> Result<Self> {
        let problem = Problem::new(data.name, data.nodes, data.capacity)?;

        match (data.best, data.best_tour) {
            (Some(best), Some(tour)) => problem.with_best(best, tour),
            (None, None) => Ok(problem),
            _ => Err(Error::invalid_instance(
                "best value and best tour must be given together",
            )),
        }
    }
}
