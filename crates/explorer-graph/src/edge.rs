//! Directed, labeled edges
//!
//! Adjacency is keyed by source node. Each source's list is replaced
//! wholesale when the backend reports it again.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};

/// One directed edge
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    pub label: String,
}

impl Edge {
    /// Create an edge
    #[must_use]
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>, label: &str) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            label: label.to_string(),
        }
    }
}

/// Outgoing edges of one source, `{ edges: [[target, label]], written_at }`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NodeEdges {
    pub edges: Vec<(NodeId, String)>,
    pub written_at: i64,
}

impl NodeEdges {
    /// Build from `(target, label)` pairs
    #[must_use]
    pub fn new(edges: Vec<(NodeId, String)>, written_at: i64) -> Self {
        Self { edges, written_at }
    }

    /// Targets reached over `label`
    pub fn targets_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = NodeId> + 'a {
        self.edges
            .iter()
            .filter(move |(_, l)| l == label)
            .map(|(target, _)| *target)
    }
}
