//! Deterministic graph builders shared by the criterion benches.

use pathwise_core::types::{Edge, Weight};
use pathwise_graph::store::GraphStore;

/// Node id for index `i`. Fixed width, so no id is a substring of another.
pub fn node_id(i: u64) -> String {
    format!("N{i:06}")
}

/// Linear congruential step used to pick edge targets and weights.
pub fn next_seed(seed: u64) -> u64 {
    seed.wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407)
}

/// Edges of a pseudo-random graph: `node_count` nodes, `avg_degree` outgoing
/// edges per node, weights in `1..=100`.
pub fn random_edges(node_count: u64, avg_degree: u64) -> Vec<Edge> {
    let mut edges = Vec::with_capacity((node_count * avg_degree) as usize);
    let mut seed: u64 = 42;
    for src in 0..node_count {
        for _ in 0..avg_degree {
            seed = next_seed(seed);
            let dst = (seed >> 33) % node_count;
            let weight = ((seed >> 17) % 100 + 1) as Weight;
            edges.push(Edge::new(node_id(src), node_id(dst), weight));
        }
    }
    edges
}

/// A store holding the same graph as [`random_edges`].
pub fn random_store(node_count: u64, avg_degree: u64) -> GraphStore {
    let store = GraphStore::new();
    for i in 0..node_count {
        store.add_node(&node_id(i));
    }
    for edge in random_edges(node_count, avg_degree) {
        store.add_edge(&edge.source, &edge.destination, edge.weight);
    }
    store
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_edges_deterministic() {
        assert_eq!(random_edges(20, 3), random_edges(20, 3));
        assert_eq!(random_edges(20, 3).len(), 60);
    }

    #[test]
    fn test_random_store_counts() {
        let store = random_store(50, 2);
        assert_eq!(store.node_count(), 50);
        assert_eq!(store.edge_count(), 100);
    }
}
