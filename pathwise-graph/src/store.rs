//! The shared graph: node identifiers plus an edge list behind one lock.
//!
//! Every operation, including the path queries, holds the same
//! `parking_lot::Mutex` for its full duration, so all calls are totally
//! ordered. The store never fails outward; referential problems come back
//! as `false` or `None`.

use std::collections::{BTreeSet, HashSet};

use parking_lot::Mutex;

use pathwise_core::types::{Distance, Edge, NodeId, Weight};

use crate::path::PathEngine;

#[derive(Default)]
struct Graph {
    nodes: HashSet<NodeId>,
    edges: Vec<Edge>,
}

impl Graph {
    fn has_both(&self, source: &str, destination: &str) -> bool {
        self.nodes.contains(source) && self.nodes.contains(destination)
    }

    fn path_engine(&self) -> PathEngine {
        PathEngine::new(self.edges.clone())
    }
}

/// Concurrent directed graph store. Construct one per server and share it.
#[derive(Default)]
pub struct GraphStore {
    graph: Mutex<Graph>,
}

impl GraphStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `id`. Returns `false` without mutating if it already exists.
    pub fn add_node(&self, id: &str) -> bool {
        let mut graph = self.graph.lock();
        if graph.nodes.contains(id) {
            return false;
        }
        graph.nodes.insert(id.to_string());
        tracing::debug!(node = id, "node added");
        true
    }

    /// Remove `id` and every edge whose source or destination contains `id`
    /// as a substring. Returns `false` if `id` is not a node.
    pub fn remove_node(&self, id: &str) -> bool {
        let mut graph = self.graph.lock();
        if !graph.nodes.remove(id) {
            return false;
        }
        let before = graph.edges.len();
        graph.edges.retain(|edge| !edge.mentions(id));
        tracing::debug!(
            node = id,
            edges_removed = before - graph.edges.len(),
            "node removed"
        );
        true
    }

    /// Append an edge. Returns `false` if either endpoint is missing.
    /// Parallel and duplicate edges are accepted.
    pub fn add_edge(&self, source: &str, destination: &str, weight: Weight) -> bool {
        let mut graph = self.graph.lock();
        if !graph.has_both(source, destination) {
            return false;
        }
        let edge = Edge::new(source, destination, weight);
        tracing::debug!(%edge, "edge added");
        graph.edges.push(edge);
        true
    }

    /// Remove every edge whose source contains `source` and whose
    /// destination contains `destination`. Returns `false` only when an
    /// endpoint is missing; matching zero edges still succeeds.
    pub fn remove_edge(&self, source: &str, destination: &str) -> bool {
        let mut graph = self.graph.lock();
        if !graph.has_both(source, destination) {
            return false;
        }
        let before = graph.edges.len();
        graph
            .edges
            .retain(|e| !(e.source.contains(source) && e.destination.contains(destination)));
        tracing::debug!(
            source,
            destination,
            edges_removed = before - graph.edges.len(),
            "edges removed"
        );
        true
    }

    /// Distance from `source` to `destination`. `None` when an endpoint is
    /// missing or the destination is unreachable.
    pub fn shortest_path(&self, source: &str, destination: &str) -> Option<Distance> {
        let graph = self.graph.lock();
        if !graph.has_both(source, destination) {
            return None;
        }
        let mut engine = graph.path_engine();
        engine.execute(source);
        engine.shortest_distance(destination)
    }

    /// Nodes on the closer-than chain from `source` within `limit`, sorted.
    /// `None` when `source` is not a node.
    pub fn closer_than(&self, limit: Distance, source: &str) -> Option<BTreeSet<NodeId>> {
        let graph = self.graph.lock();
        if !graph.nodes.contains(source) {
            return None;
        }
        let mut engine = graph.path_engine();
        engine.execute(source);
        Some(engine.closer_than(limit, source))
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.graph.lock().nodes.contains(id)
    }

    pub fn node_count(&self) -> usize {
        self.graph.lock().nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.lock().edges.len()
    }

    /// Sorted copy of the node set.
    pub fn nodes(&self) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self.graph.lock().nodes.iter().cloned().collect();
        nodes.sort();
        nodes
    }

    /// Copy of the edge list in insertion order.
    pub fn edges(&self) -> Vec<Edge> {
        self.graph.lock().edges.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn abc_store() -> GraphStore {
        let store = GraphStore::new();
        for id in ["A", "B", "C"] {
            assert!(store.add_node(id));
        }
        assert!(store.add_edge("A", "B", 1));
        assert!(store.add_edge("B", "C", 2));
        store
    }

    #[test]
    fn test_add_node_twice() {
        let store = GraphStore::new();
        assert!(store.add_node("A"));
        assert!(!store.add_node("A"));
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_node_ids_case_sensitive() {
        let store = GraphStore::new();
        assert!(store.add_node("a"));
        assert!(store.add_node("A"));
        assert_eq!(store.nodes(), vec!["A", "a"]);
    }

    #[test]
    fn test_add_edge_unknown_endpoint() {
        let store = GraphStore::new();
        store.add_node("A");
        assert!(!store.add_edge("A", "B", 1));
        assert!(!store.add_edge("B", "A", 1));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_add_edge_duplicates_allowed() {
        let store = GraphStore::new();
        store.add_node("A");
        store.add_node("B");
        assert!(store.add_edge("A", "B", 3));
        assert!(store.add_edge("A", "B", 3));
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_remove_node_not_found() {
        let store = GraphStore::new();
        assert!(!store.remove_node("A"));
    }

    #[test]
    fn test_remove_node_drops_touching_edges() {
        let store = abc_store();
        assert!(store.remove_node("B"));
        assert!(!store.has_node("B"));
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.shortest_path("A", "C"), None);
    }

    #[test]
    fn test_remove_node_substring_rule() {
        let store = GraphStore::new();
        for id in ["A", "AB", "C"] {
            store.add_node(id);
        }
        store.add_edge("AB", "C", 1);
        store.add_edge("C", "C", 1);
        // Removing "A" also strips the AB->C edge because "AB" contains "A".
        assert!(store.remove_node("A"));
        assert!(store.has_node("AB"));
        assert_eq!(store.edges(), vec![Edge::new("C", "C", 1)]);
    }

    #[test]
    fn test_remove_add_round_trip() {
        let store = abc_store();
        assert!(store.remove_node("A"));
        assert!(store.add_node("A"));
        assert!(store.has_node("A"));
        assert_eq!(store.shortest_path("A", "B"), None);
        assert_eq!(store.closer_than(10, "A"), Some(BTreeSet::new()));
    }

    #[test]
    fn test_remove_edge() {
        let store = abc_store();
        assert!(store.remove_edge("A", "B"));
        assert_eq!(store.edges(), vec![Edge::new("B", "C", 2)]);
    }

    #[test]
    fn test_remove_edge_missing_endpoint() {
        let store = abc_store();
        assert!(!store.remove_edge("A", "Z"));
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_remove_edge_no_match_still_succeeds() {
        let store = abc_store();
        assert!(store.remove_edge("C", "A"));
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_remove_edge_substring_rule() {
        let store = GraphStore::new();
        for id in ["A", "AX", "B", "BY"] {
            store.add_node(id);
        }
        store.add_edge("A", "B", 1);
        store.add_edge("AX", "BY", 1);
        store.add_edge("AX", "B", 1);
        assert!(store.remove_edge("A", "B"));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_remove_edge_removes_all_parallel_edges() {
        let store = abc_store();
        store.add_edge("A", "B", 9);
        assert!(store.remove_edge("A", "B"));
        assert_eq!(store.edge_count(), 1);
    }

    #[test]
    fn test_shortest_path() {
        let store = abc_store();
        assert_eq!(store.shortest_path("A", "C"), Some(3));
        assert_eq!(store.shortest_path("C", "A"), None);
        assert_eq!(store.shortest_path("A", "A"), Some(0));
    }

    #[test]
    fn test_shortest_path_missing_node() {
        let store = abc_store();
        assert_eq!(store.shortest_path("A", "Z"), None);
        assert_eq!(store.shortest_path("Z", "A"), None);
    }

    #[test]
    fn test_closer_than() {
        let store = abc_store();
        let nodes: Vec<_> = store.closer_than(3, "A").unwrap().into_iter().collect();
        assert_eq!(nodes, vec!["B", "C"]);
        assert_eq!(store.closer_than(0, "A"), Some(BTreeSet::new()));
    }

    #[test]
    fn test_closer_than_missing_source() {
        let store = abc_store();
        assert_eq!(store.closer_than(3, "Z"), None);
    }

    #[test]
    fn test_concurrent_add_same_node() {
        let store = Arc::new(GraphStore::new());
        let handles: Vec<_> = (0..16)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || store.add_node("X"))
            })
            .collect();
        let wins = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|added| *added)
            .count();
        assert_eq!(wins, 1);
        assert_eq!(store.node_count(), 1);
    }
}
