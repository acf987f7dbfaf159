//! Visual elements
//!
//! A [`WorkflowElement`] is the display-stable unit tracked across sync
//! cycles: one ungrouped node, or one sibling cluster. [`ElementSet`]
//! keeps the live elements in workflow order.

use crate::error::LayoutError;
use crate::geometry::CanvasPosition;
use explorer_graph::{hash_ids, IdentityKey, NodeId, ProjectGraph};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// What an element stands for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementKind {
    SingleNode(NodeId),
    SiblingCluster(Vec<NodeId>),
}

impl ElementKind {
    /// Node ids covered, in cluster order
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        match self {
            Self::SingleNode(id) => std::slice::from_ref(id),
            Self::SiblingCluster(ids) => ids,
        }
    }

    /// Identity of the covered sequence
    #[must_use]
    pub fn key(&self) -> IdentityKey {
        hash_ids(self.node_ids())
    }
}

/// Per-element layout state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutState {
    /// Assigned once by the placer, then only translated
    pub position: Option<CanvasPosition>,
    /// Body shown; configurable kinds start collapsed
    pub expanded: bool,
}

impl Default for LayoutState {
    fn default() -> Self {
        Self {
            position: None,
            expanded: true,
        }
    }
}

/// A reconciled, display-stable unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowElement {
    key: IdentityKey,
    kind: ElementKind,
    /// Labels of the first covered node, as last seen in the graph
    labels: Vec<String>,
    pub layout: LayoutState,
    /// Edges of interest: label -> target element keys
    edges: BTreeMap<String, Vec<IdentityKey>>,
}

impl WorkflowElement {
    /// Create an unplaced element
    #[must_use]
    pub fn new(kind: ElementKind, labels: Vec<String>) -> Self {
        Self {
            key: kind.key(),
            kind,
            labels,
            layout: LayoutState::default(),
            edges: BTreeMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn key(&self) -> IdentityKey {
        self.key
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[inline]
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        self.kind.node_ids()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> Option<CanvasPosition> {
        self.layout.position
    }

    /// Cached edges of interest
    #[inline]
    #[must_use]
    pub fn edges(&self) -> &BTreeMap<String, Vec<IdentityKey>> {
        &self.edges
    }

    /// Check whether any label is in `configurable`
    #[must_use]
    pub fn is_configurable(&self, configurable: &[String]) -> bool {
        self.labels.iter().any(|l| configurable.contains(l))
    }
}

/// Viewport and fallback cursor of one canvas
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasState {
    /// Visible part of the canvas, as reported by the UI
    pub viewport: CanvasPosition,
    /// Elements placed without an anchor so far
    pub fallback_placements: usize,
}

/// Elements removed and created by one apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApplyReport {
    pub removed: usize,
    pub created: usize,
}

/// Live elements of one project, in workflow order
#[derive(Debug, Clone, Default)]
pub struct ElementSet {
    elements: IndexMap<IdentityKey, WorkflowElement>,
    node_index: HashMap<NodeId, IdentityKey>,
    configurable: Vec<String>,
    pub(crate) canvas: CanvasState,
}

impl ElementSet {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty set whose elements carrying one of `labels` can be expanded
    #[must_use]
    pub fn with_configurable_labels(labels: Vec<String>) -> Self {
        Self {
            configurable: labels,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn configurable_labels(&self) -> &[String] {
        &self.configurable
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: IdentityKey) -> Option<&WorkflowElement> {
        self.elements.get(&key)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, key: IdentityKey) -> bool {
        self.elements.contains_key(&key)
    }

    /// Element keys in workflow order
    #[must_use]
    pub fn order(&self) -> Vec<IdentityKey> {
        self.elements.keys().copied().collect()
    }

    /// Elements in workflow order
    pub fn iter(&self) -> impl Iterator<Item = &WorkflowElement> {
        self.elements.values()
    }

    /// Element covering `node`
    #[inline]
    #[must_use]
    pub fn element_for_node(&self, node: NodeId) -> Option<IdentityKey> {
        self.node_index.get(&node).copied()
    }

    #[inline]
    #[must_use]
    pub fn canvas(&self) -> CanvasState {
        self.canvas
    }

    /// Record the visible part of the canvas
    pub fn set_viewport(&mut self, viewport: CanvasPosition) {
        self.canvas.viewport = viewport;
    }

    pub(crate) fn get_mut(&mut self, key: IdentityKey) -> Option<&mut WorkflowElement> {
        self.elements.get_mut(&key)
    }

    /// Drop `removals`, keeping survivors in order, then append `creations`
    ///
    /// Configurable creations start collapsed.
    pub fn apply(
        &mut self,
        removals: &[IdentityKey],
        creations: Vec<WorkflowElement>,
    ) -> ApplyReport {
        let before = self.elements.len();
        if !removals.is_empty() {
            let doomed: HashSet<IdentityKey> = removals.iter().copied().collect();
            self.elements.retain(|key, _| !doomed.contains(key));
        }
        let removed = before - self.elements.len();

        let created = creations.len();
        for mut element in creations {
            if element.is_configurable(&self.configurable) {
                element.layout.expanded = false;
            }
            self.elements.insert(element.key, element);
        }

        self.node_index = self
            .elements
            .values()
            .flat_map(|e| e.node_ids().iter().map(move |id| (*id, e.key)))
            .collect();

        ApplyReport { removed, created }
    }

    /// Re-read every element's labels from its first covered node
    ///
    /// Elements whose nodes are not cached yet keep their labels.
    pub fn refresh_labels(&mut self, graph: &ProjectGraph) {
        for element in self.elements.values_mut() {
            let current = element
                .kind
                .node_ids()
                .first()
                .and_then(|id| graph.node(*id));
            if let Some(node) = current {
                if node.labels != element.labels {
                    element.labels.clone_from(&node.labels);
                }
            }
        }
    }

    /// Recompute every element's edges of interest from `graph`
    ///
    /// Only labels in `allow_list` are kept. Targets map to the element
    /// covering them; self-references and targets without a live element
    /// are dropped.
    pub fn refresh_edges(&mut self, graph: &ProjectGraph, allow_list: &[String]) {
        let index = &self.node_index;
        for element in self.elements.values_mut() {
            let mut edges: BTreeMap<String, Vec<IdentityKey>> = BTreeMap::new();
            for node in element.kind.node_ids() {
                let Some(out) = graph.edges_from(*node) else {
                    continue;
                };
                for (target, label) in &out.edges {
                    if !allow_list.contains(label) {
                        continue;
                    }
                    let Some(target_key) = index.get(target).copied() else {
                        continue;
                    };
                    if target_key == element.key {
                        continue;
                    }
                    let targets = edges.entry(label.clone()).or_default();
                    if !targets.contains(&target_key) {
                        targets.push(target_key);
                    }
                }
            }
            element.edges = edges;
        }
    }

    /// Open or close a configurable element's settings panel
    ///
    /// # Errors
    /// - `LayoutError::UnknownElement` if `key` is not live
    /// - `LayoutError::NotConfigurable` if none of its current labels is configurable
    pub fn set_expanded(&mut self, key: IdentityKey, expanded: bool) -> Result<(), LayoutError> {
        let element = self
            .elements
            .get_mut(&key)
            .ok_or(LayoutError::UnknownElement(key))?;
        if !element.is_configurable(&self.configurable) {
            return Err(LayoutError::NotConfigurable(key));
        }
        element.layout.expanded = expanded;
        Ok(())
    }
}
