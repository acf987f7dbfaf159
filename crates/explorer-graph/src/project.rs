//! Per-project graph cache
//!
//! [`ProjectGraph`] holds the authoritative node map, forward adjacency,
//! a derived reverse index, sibling groups and the two fetch watermarks.
//! All merge logic is synchronous; callers fetch first and lock second.

use crate::edge::NodeEdges;
use crate::identity::{hash_ids, IdentityKey};
use crate::node::{Node, NodeId};
use crate::wire::EdgesBySource;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Project identifier as used in engine URLs
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Wrap a project id
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as str
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A backend-asserted cluster of nodes rendered as one element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiblingGroup {
    key: IdentityKey,
    members: Vec<NodeId>,
}

impl SiblingGroup {
    /// Create a group; its key is the rolling hash of `members`
    #[must_use]
    pub fn new(members: Vec<NodeId>) -> Self {
        Self {
            key: hash_ids(&members),
            members,
        }
    }

    /// Identity of this exact member sequence
    #[inline]
    #[must_use]
    pub fn key(&self) -> IdentityKey {
        self.key
    }

    /// Members in backend order
    #[inline]
    #[must_use]
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    fn overlaps(&self, other: &SiblingGroup) -> bool {
        self.members.iter().any(|id| other.members.contains(id))
    }
}

/// What one merge changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeReport {
    /// Nodes inserted or overwritten
    pub nodes: usize,
    /// Sources whose adjacency list was replaced
    pub edge_sources: usize,
    /// Sibling groups appended
    pub sibling_groups: usize,
    pub nodes_watermark: i64,
    pub edges_watermark: i64,
}

impl MergeReport {
    /// Combine two partial reports of the same project
    #[must_use]
    pub fn combine(self, other: MergeReport) -> MergeReport {
        MergeReport {
            nodes: self.nodes + other.nodes,
            edge_sources: self.edge_sources + other.edge_sources,
            sibling_groups: self.sibling_groups + other.sibling_groups,
            nodes_watermark: self.nodes_watermark.max(other.nodes_watermark),
            edges_watermark: self.edges_watermark.max(other.edges_watermark),
        }
    }

    /// Check whether anything was applied
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes == 0 && self.edge_sources == 0 && self.sibling_groups == 0
    }
}

/// Nodes reachable over one edge label, split by cache presence
#[derive(Debug, Clone, Default)]
pub struct RelatedNodes {
    pub found: Vec<Node>,
    /// Targets not yet in the cache
    pub missing: Vec<NodeId>,
}

/// Authoritative cache of one project's graph
#[derive(Debug, Clone)]
pub struct ProjectGraph {
    project_id: ProjectId,
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<NodeId, NodeEdges>,
    incoming: HashMap<NodeId, Vec<(NodeId, String)>>,
    sibling_groups: Vec<SiblingGroup>,
    nodes_watermark: i64,
    edges_watermark: i64,
    pub(crate) fetching: bool,
}

impl ProjectGraph {
    /// Create an empty graph
    #[must_use]
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            nodes: HashMap::new(),
            edges: HashMap::new(),
            incoming: HashMap::new(),
            sibling_groups: Vec::new(),
            nodes_watermark: 0,
            edges_watermark: 0,
            fetching: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Cursor for the next incremental node fetch
    #[inline]
    #[must_use]
    pub fn nodes_watermark(&self) -> i64 {
        self.nodes_watermark
    }

    /// Cursor for the next incremental edge fetch
    #[inline]
    #[must_use]
    pub fn edges_watermark(&self) -> i64 {
        self.edges_watermark
    }

    /// Check whether a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    /// Insert or overwrite nodes by id and advance the node watermark
    pub fn merge_nodes(&mut self, nodes: Vec<Node>) -> MergeReport {
        let count = nodes.len();
        for node in nodes {
            self.nodes_watermark = self.nodes_watermark.max(node.written_at);
            self.nodes.insert(node.id, node);
        }
        MergeReport {
            nodes: count,
            nodes_watermark: self.nodes_watermark,
            edges_watermark: self.edges_watermark,
            ..MergeReport::default()
        }
    }

    /// Replace each reported source's adjacency list and advance the edge watermark
    pub fn merge_edges(&mut self, edges: EdgesBySource) -> MergeReport {
        let count = edges.len();
        for (source, node_edges) in edges {
            self.edges_watermark = self.edges_watermark.max(node_edges.written_at);
            if let Some(previous) = self.edges.remove(&source) {
                self.unindex(source, &previous);
            }
            for (target, label) in &node_edges.edges {
                self.incoming
                    .entry(*target)
                    .or_default()
                    .push((source, label.clone()));
            }
            self.edges.insert(source, node_edges);
        }
        MergeReport {
            edge_sources: count,
            nodes_watermark: self.nodes_watermark,
            edges_watermark: self.edges_watermark,
            ..MergeReport::default()
        }
    }

    /// Append sibling groups
    ///
    /// A group whose identity is already present is skipped. A group that
    /// shares members with an existing one supersedes it, so a node id is
    /// in at most one group.
    pub fn merge_sibling_groups(&mut self, groups: Vec<Vec<NodeId>>) -> MergeReport {
        let mut appended = 0;
        for members in groups {
            if members.is_empty() {
                continue;
            }
            let group = SiblingGroup::new(members);
            if self
                .sibling_groups
                .iter()
                .any(|g| g.key == group.key && g.members == group.members)
            {
                continue;
            }
            let before = self.sibling_groups.len();
            self.sibling_groups.retain(|existing| !existing.overlaps(&group));
            if self.sibling_groups.len() != before {
                tracing::debug!(
                    project = %self.project_id,
                    superseded = before - self.sibling_groups.len(),
                    "sibling group supersedes overlapping groups"
                );
            }
            self.sibling_groups.push(group);
            appended += 1;
        }
        MergeReport {
            sibling_groups: appended,
            nodes_watermark: self.nodes_watermark,
            edges_watermark: self.edges_watermark,
            ..MergeReport::default()
        }
    }

    fn unindex(&mut self, source: NodeId, previous: &NodeEdges) {
        for (target, _) in &previous.edges {
            if let Some(sources) = self.incoming.get_mut(target) {
                sources.retain(|(s, _)| *s != source);
                if sources.is_empty() {
                    self.incoming.remove(target);
                }
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node access, for the UI's ephemeral fetching marker
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    #[inline]
    #[must_use]
    pub fn nodes(&self) -> &HashMap<NodeId, Node> {
        &self.nodes
    }

    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Outgoing edges of `source`
    #[inline]
    #[must_use]
    pub fn edges_from(&self, source: NodeId) -> Option<&NodeEdges> {
        self.edges.get(&source)
    }

    #[inline]
    #[must_use]
    pub fn edges(&self) -> &HashMap<NodeId, NodeEdges> {
        &self.edges
    }

    /// Sources pointing at `target`, with their edge labels
    #[must_use]
    pub fn incoming(&self, target: NodeId) -> &[(NodeId, String)] {
        self.incoming.get(&target).map(Vec::as_slice).unwrap_or(&[])
    }

    #[inline]
    #[must_use]
    pub fn sibling_groups(&self) -> &[SiblingGroup] {
        &self.sibling_groups
    }

    /// Node ids that belong to any sibling group
    #[must_use]
    pub fn grouped_ids(&self) -> HashSet<NodeId> {
        self.sibling_groups
            .iter()
            .flat_map(|g| g.members.iter().copied())
            .collect()
    }

    /// Ids of nodes carrying `label`, ascending
    #[must_use]
    pub fn nodes_with_label(&self, label: &str) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.has_label(label))
            .map(|n| n.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Targets of `node`'s edges labeled `edge_label`
    #[must_use]
    pub fn related_nodes(&self, node: NodeId, edge_label: &str) -> RelatedNodes {
        let mut related = RelatedNodes::default();
        if let Some(edges) = self.edges.get(&node) {
            for target in edges.targets_with_label(edge_label) {
                match self.nodes.get(&target) {
                    Some(n) => related.found.push(n.clone()),
                    None => related.missing.push(target),
                }
            }
        }
        related
    }
}
