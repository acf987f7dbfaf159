//! Live element sets, one per project

use dashmap::DashMap;
use explorer_graph::{MergeReport, ProjectGraph, ProjectId};
use explorer_layout::{reconcile_into, ApplyReport, ElementSet};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared handle to one project's live elements
pub type SharedView = Arc<Mutex<ElementSet>>;

/// Lazily populated map of element sets
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: DashMap<ProjectId, SharedView>,
    edge_labels: Vec<String>,
    configurable_labels: Vec<String>,
}

impl ViewRegistry {
    /// Create an empty registry caching edges with `edge_labels`
    #[must_use]
    pub fn new(edge_labels: Vec<String>, configurable_labels: Vec<String>) -> Self {
        Self {
            views: DashMap::new(),
            edge_labels,
            configurable_labels,
        }
    }

    /// Edge labels of interest, in priority order
    #[inline]
    #[must_use]
    pub fn edge_labels(&self) -> &[String] {
        &self.edge_labels
    }

    pub fn ensure(&self, project_id: &ProjectId) -> SharedView {
        self.views
            .entry(project_id.clone())
            .or_insert_with(|| {
                let labels = self.configurable_labels.clone();
                Arc::new(Mutex::new(ElementSet::with_configurable_labels(labels)))
            })
            .value()
            .clone()
    }

    #[must_use]
    pub fn get(&self, project_id: &ProjectId) -> Option<SharedView> {
        self.views.get(project_id).map(|entry| entry.value().clone())
    }

    /// Bring the project's elements in line with `graph` and refresh their labels and edges
    pub fn reconcile(&self, graph: &ProjectGraph) -> ApplyReport {
        let view = self.ensure(graph.project_id());
        let mut elements = view.lock();
        let report = reconcile_into(graph, &mut elements);
        elements.refresh_labels(graph);
        elements.refresh_edges(graph, &self.edge_labels);
        report
    }

    /// Reconcile after a merge, skipping the pass when `merged` changed nothing
    pub fn sync(&self, graph: &ProjectGraph, merged: &MergeReport) -> ApplyReport {
        if merged.is_empty() && self.get(graph.project_id()).is_some() {
            return ApplyReport::default();
        }
        self.reconcile(graph)
    }
}
