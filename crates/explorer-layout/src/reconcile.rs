//! Reconciliation of graph snapshots against live elements
//!
//! Computes the minimal add/remove edit that brings an [`ElementSet`] in
//! line with the current nodes and sibling groups. Elements whose node
//! sequence is unchanged keep their identity, and with it their layout.

use crate::element::{ApplyReport, ElementKind, ElementSet, WorkflowElement};
use explorer_graph::{hash_ids, IdentityKey, NodeId, ProjectGraph};
use std::collections::HashSet;

/// Staged edit: removals are applied before creations
#[derive(Debug, Clone, Default)]
pub struct ReconcilePlan {
    pub removals: Vec<IdentityKey>,
    pub creations: Vec<WorkflowElement>,
}

impl ReconcilePlan {
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty() && self.creations.is_empty()
    }
}

struct Staging<'a> {
    graph: &'a ProjectGraph,
    elements: &'a ElementSet,
    valid: HashSet<IdentityKey>,
    plan: ReconcilePlan,
}

impl Staging<'_> {
    fn stage(&mut self, kind: ElementKind) {
        let key = kind.key();
        if !self.valid.insert(key) {
            return;
        }
        match self.elements.get(key) {
            Some(existing) if existing.kind() == &kind => {}
            Some(existing) => {
                tracing::warn!(
                    key = %key,
                    existing = ?existing.kind(),
                    incoming = ?kind,
                    "identity collision, replacing element"
                );
                self.plan.removals.push(key);
                self.create(kind);
            }
            None => self.create(kind),
        }
    }

    fn create(&mut self, kind: ElementKind) {
        let labels = kind
            .node_ids()
            .first()
            .and_then(|id| self.graph.node(*id))
            .map(|node| node.labels.clone())
            .unwrap_or_default();
        self.plan.creations.push(WorkflowElement::new(kind, labels));
    }
}

/// Stage the edit that makes `elements` match `graph`
///
/// Every ungrouped node gets one `SingleNode` element and every sibling
/// group one `SiblingCluster` element keyed by the group's hash. Anything
/// else live is removed.
#[must_use]
pub fn reconcile(graph: &ProjectGraph, elements: &ElementSet) -> ReconcilePlan {
    let grouped = graph.grouped_ids();

    let mut staging = Staging {
        graph,
        elements,
        valid: HashSet::new(),
        plan: ReconcilePlan::default(),
    };

    let mut ungrouped: Vec<NodeId> = graph
        .nodes()
        .keys()
        .copied()
        .filter(|id| !grouped.contains(id))
        .collect();
    ungrouped.sort_unstable();
    for id in ungrouped {
        staging.stage(ElementKind::SingleNode(id));
    }

    for group in graph.sibling_groups() {
        debug_assert_eq!(group.key(), hash_ids(group.members()));
        staging.stage(ElementKind::SiblingCluster(group.members().to_vec()));
    }

    let Staging {
        valid, mut plan, ..
    } = staging;
    plan.removals.extend(elements.order().into_iter().filter(|key| !valid.contains(key)));
    plan
}

/// Reconcile and apply in one step
pub fn reconcile_into(graph: &ProjectGraph, elements: &mut ElementSet) -> ApplyReport {
    let plan = reconcile(graph, elements);
    if plan.is_empty() {
        return ApplyReport::default();
    }
    tracing::debug!(
        project = %graph.project_id(),
        removals = plan.removals.len(),
        creations = plan.creations.len(),
        "applying reconcile plan"
    );
    elements.apply(&plan.removals, plan.creations)
}
