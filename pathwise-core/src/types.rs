//! Leaf data types for the graph store.

use std::fmt;

/// A node identifier. Case-sensitive, compared byte for byte.
pub type NodeId = String;

/// Weight of a single edge.
pub type Weight = u32;

/// Accumulated weight along a path.
pub type Distance = u64;

/// A directed, weighted edge. Duplicates are independent records.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: NodeId,
    pub destination: NodeId,
    pub weight: Weight,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, destination: impl Into<NodeId>, weight: Weight) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            weight,
        }
    }

    /// Whether this edge leaves `node` (exact match).
    pub fn leaves(&self, node: &str) -> bool {
        self.source == node
    }

    /// Substring match used by node and edge removal: an edge touches `id`
    /// when either endpoint contains it.
    pub fn mentions(&self, id: &str) -> bool {
        self.source.contains(id) || self.destination.contains(id)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} ({})", self.source, self.destination, self.weight)
    }
}
