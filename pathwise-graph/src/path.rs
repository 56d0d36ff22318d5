//! Single-source shortest distances over a snapshot of the edge list.
//!
//! Dijkstra without a priority queue: every iteration scans the whole
//! unsettled set for the minimum and the whole edge list for neighbours.
//! Besides distances, each run records for every settled node the last node
//! it relaxed into. Following that pointer from the source yields the
//! closer-than chain.

use std::collections::{BTreeSet, HashMap, HashSet};

use pathwise_core::types::{Distance, Edge, NodeId};

/// Algorithm state for one source. Build it from a copy of the store's
/// edges, then call [`PathEngine::execute`].
pub struct PathEngine {
    edges: Vec<Edge>,
    settled: HashSet<NodeId>,
    /// Insertion ordered so ties in the minimum scan go to the first seen.
    unsettled: Vec<NodeId>,
    distance: HashMap<NodeId, Distance>,
    /// Weight of the edge used by the latest relaxation into each node.
    closer_distance: HashMap<NodeId, Distance>,
    /// node -> last node it relaxed into.
    next_hop: HashMap<NodeId, NodeId>,
}

impl PathEngine {
    pub fn new(edges: Vec<Edge>) -> Self {
        Self {
            edges,
            settled: HashSet::new(),
            unsettled: Vec::new(),
            distance: HashMap::new(),
            closer_distance: HashMap::new(),
            next_hop: HashMap::new(),
        }
    }

    /// Compute distances from `source` to every reachable node.
    pub fn execute(&mut self, source: &str) {
        self.settled.clear();
        self.unsettled.clear();
        self.distance.clear();
        self.closer_distance.clear();
        self.next_hop.clear();

        self.distance.insert(source.to_string(), 0);
        self.closer_distance.insert(source.to_string(), 0);
        self.unsettled.push(source.to_string());

        while let Some(node) = self.take_minimum() {
            self.settled.insert(node.clone());
            self.relax_neighbours(&node);
        }
    }

    /// Remove and return the unsettled node with the smallest distance.
    fn take_minimum(&mut self) -> Option<NodeId> {
        let mut best: Option<(usize, Distance)> = None;
        for (idx, node) in self.unsettled.iter().enumerate() {
            let d = self.distance.get(node).copied().unwrap_or(Distance::MAX);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((idx, d)),
            }
        }
        best.map(|(idx, _)| self.unsettled.remove(idx))
    }

    fn relax_neighbours(&mut self, node: &str) {
        let Some(&base) = self.distance.get(node) else {
            return;
        };
        for dest in self.neighbours(node) {
            let Some(weight) = self.edge_weight(node, &dest) else {
                continue;
            };
            let candidate = base + weight;
            let improves = match self.distance.get(&dest) {
                Some(&current) => current > candidate,
                None => true,
            };
            if improves {
                self.distance.insert(dest.clone(), candidate);
                self.closer_distance.insert(dest.clone(), weight);
                self.next_hop.insert(node.to_string(), dest.clone());
                if !self.unsettled.contains(&dest) {
                    self.unsettled.push(dest);
                }
            }
        }
    }

    /// Destinations of every edge leaving `node` that are not yet settled,
    /// in edge-list order. Parallel edges yield the destination repeatedly.
    fn neighbours(&self, node: &str) -> Vec<NodeId> {
        self.edges
            .iter()
            .filter(|e| e.leaves(node) && !self.settled.contains(&e.destination))
            .map(|e| e.destination.clone())
            .collect()
    }

    /// Weight of the first edge from `source` to `destination`.
    fn edge_weight(&self, source: &str, destination: &str) -> Option<Distance> {
        self.edges
            .iter()
            .find(|e| e.source == source && e.destination == destination)
            .map(|e| Distance::from(e.weight))
    }

    /// Distance from the last executed source, `None` if never reached.
    pub fn shortest_distance(&self, node: &str) -> Option<Distance> {
        self.distance.get(node).copied()
    }

    /// Walk the last-relaxed-into chain from `source`, accumulating the
    /// recorded edge weights. Nodes are kept while the running total stays
    /// at or below `limit`; the walk stops at the first node that exceeds it.
    pub fn closer_than(&self, limit: Distance, source: &str) -> BTreeSet<NodeId> {
        let mut included = BTreeSet::new();
        let mut current = source;
        let mut total: Distance = 0;

        while let Some(next) = self.next_hop.get(current) {
            total += self.closer_distance.get(next).copied().unwrap_or(0);
            if total > limit {
                break;
            }
            included.insert(next.clone());
            current = next.as_str();
        }
        included
    }
}
