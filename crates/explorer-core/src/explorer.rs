//! Top-level explorer context
//!
//! Owns the graph registry, the live element sets, the scheduler and the
//! layout components. Everything the UI reads or changes goes through here.

use crate::config::ExplorerConfig;
use crate::error::ExplorerError;
use crate::scheduler::{SyncScheduler, TickOutcome};
use crate::store::GraphStore;
use crate::views::{SharedView, ViewRegistry};
use explorer_backend::{GraphBackend, HttpBackend};
use explorer_graph::{
    GraphRegistry, IdentityKey, MergeReport, Node, NodeId, ProjectGraph, ProjectId, RelatedNodes,
};
use explorer_layout::{CanvasPosition, LayoutState, PathRouter, Placer, RoutedEdge, WorkflowElement};
use std::sync::Arc;

/// The explorer engine
#[derive(Debug)]
pub struct Explorer {
    config: ExplorerConfig,
    store: GraphStore,
    views: Arc<ViewRegistry>,
    scheduler: SyncScheduler,
    placer: Placer,
    router: PathRouter,
}

impl Explorer {
    /// Create an explorer talking HTTP to `config.api_root`
    ///
    /// # Errors
    /// - `ExplorerError::Config` if the config does not validate
    /// - `ExplorerError::Backend` if the HTTP client cannot be built
    pub fn new(config: ExplorerConfig) -> Result<Self, ExplorerError> {
        config.validate()?;
        let backend = HttpBackend::new(&config.api_root, config.request_timeout())?;
        Self::with_backend(config, Arc::new(backend))
    }

    /// Create an explorer over any backend
    ///
    /// # Errors
    /// - `ExplorerError::Config` if the config does not validate
    pub fn with_backend(
        config: ExplorerConfig,
        backend: Arc<dyn GraphBackend>,
    ) -> Result<Self, ExplorerError> {
        config.validate()?;
        let store = GraphStore::new(Arc::new(GraphRegistry::new()), backend);
        let views = Arc::new(ViewRegistry::new(
            config.edge_labels_of_interest.clone(),
            config.configurable_node_labels.clone(),
        ));
        let scheduler =
            SyncScheduler::new(store.clone(), Arc::clone(&views), config.poll_interval());
        Ok(Self {
            placer: Placer::new(config.layout),
            router: PathRouter::new(config.routing),
            config,
            store,
            views,
            scheduler,
        })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &ExplorerConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    /// Start polling `project`
    pub fn start_sync(&self, project: &ProjectId) {
        self.views.ensure(project);
        self.scheduler.start_sync(project);
    }

    pub fn stop_sync(&self, project: &ProjectId) {
        self.scheduler.stop_sync(project);
    }

    #[must_use]
    pub fn is_syncing(&self, project: &ProjectId) -> bool {
        self.scheduler.is_syncing(project)
    }

    /// Run one sync tick now
    pub async fn tick(&self, project: &ProjectId) -> TickOutcome {
        self.scheduler.tick(project).await
    }

    /// Bulk-load the project, including sibling groups, then reconcile
    ///
    /// # Errors
    /// - `ExplorerError::Store` on transport or status failure
    pub async fn explore(&self, project: &ProjectId) -> Result<MergeReport, ExplorerError> {
        let report = self.store.explore(project).await?;
        let graph = self.store.graph(project)?;
        let applied = self.views.sync(&graph.read(), &report);
        tracing::debug!(
            project = %project,
            removed = applied.removed,
            created = applied.created,
            "explore reconciled"
        );
        Ok(report)
    }

    // Graph reads

    /// Copy of the project's current graph
    #[must_use]
    pub fn graph_snapshot(&self, project: &ProjectId) -> Option<ProjectGraph> {
        self.store.registry().snapshot(project)
    }

    /// Cached nodes carrying `label`, ordered by id
    #[must_use]
    pub fn nodes_with_label(&self, project: &ProjectId, label: &str) -> Vec<Node> {
        let Some(graph) = self.store.registry().get(project) else {
            return Vec::new();
        };
        let graph = graph.read();
        graph
            .nodes_with_label(label)
            .into_iter()
            .filter_map(|id| graph.node(id).cloned())
            .collect()
    }

    /// Targets of `node` over `edge_label`
    ///
    /// # Errors
    /// - `ExplorerError::Store` if the project is unknown
    pub fn related_nodes(
        &self,
        project: &ProjectId,
        node: NodeId,
        edge_label: &str,
    ) -> Result<RelatedNodes, ExplorerError> {
        let graph = self.store.graph(project)?;
        let related = graph.read().related_nodes(node, edge_label);
        Ok(related)
    }

    // Element reads

    /// Live element keys in workflow order
    #[must_use]
    pub fn workflow_order(&self, project: &ProjectId) -> Vec<IdentityKey> {
        self.views
            .get(project)
            .map(|view| view.lock().order())
            .unwrap_or_default()
    }

    /// Live elements in workflow order
    #[must_use]
    pub fn elements(&self, project: &ProjectId) -> Vec<WorkflowElement> {
        self.views
            .get(project)
            .map(|view| view.lock().iter().cloned().collect())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn element(&self, project: &ProjectId, key: IdentityKey) -> Option<WorkflowElement> {
        self.views.get(project)?.lock().get(key).cloned()
    }

    #[must_use]
    pub fn layout_state(&self, project: &ProjectId, key: IdentityKey) -> Option<LayoutState> {
        self.views.get(project)?.lock().get(key).map(|e| e.layout)
    }

    // Element changes

    /// Place an element once, anchored on its first placed edge target
    ///
    /// # Errors
    /// - `ExplorerError::UnknownProject` if the project has no elements
    /// - `ExplorerError::Layout` if the key is not live or the size is invalid
    pub fn place_element(
        &self,
        project: &ProjectId,
        key: IdentityKey,
        width: f64,
        height: f64,
    ) -> Result<CanvasPosition, ExplorerError> {
        let view = self.view(project)?;
        let mut elements = view.lock();
        let anchor = self
            .placer
            .anchor_for(&elements, key, &self.config.edge_labels_of_interest);
        Ok(self.placer.place(&mut elements, key, width, height, anchor)?)
    }

    /// Move a placed element, e.g. after a drag
    ///
    /// # Errors
    /// - `ExplorerError::UnknownProject` if the project has no elements
    /// - `ExplorerError::Layout` if the key is not live or not placed
    pub fn translate_element(
        &self,
        project: &ProjectId,
        key: IdentityKey,
        dx: f64,
        dy: f64,
    ) -> Result<CanvasPosition, ExplorerError> {
        let view = self.view(project)?;
        let mut elements = view.lock();
        Ok(self.placer.translate(&mut elements, key, dx, dy)?)
    }

    /// Open or close a configurable element's settings panel
    ///
    /// # Errors
    /// - `ExplorerError::UnknownProject` if the project has no elements
    /// - `ExplorerError::Layout` if the key is not live or not configurable
    pub fn set_expanded(
        &self,
        project: &ProjectId,
        key: IdentityKey,
        expanded: bool,
    ) -> Result<(), ExplorerError> {
        let view = self.view(project)?;
        let mut elements = view.lock();
        elements.set_expanded(key, expanded)?;
        Ok(())
    }

    /// Record the visible canvas area used for fallback placement
    pub fn set_viewport(&self, project: &ProjectId, viewport: CanvasPosition) {
        self.views.ensure(project).lock().set_viewport(viewport);
    }

    /// Curves for every edge of interest between placed elements
    #[must_use]
    pub fn routed_edges(&self, project: &ProjectId) -> Vec<RoutedEdge> {
        let Some(view) = self.views.get(project) else {
            return Vec::new();
        };
        let elements = view.lock();
        self.router
            .route_all(&elements, &self.config.edge_labels_of_interest)
    }

    fn view(&self, project: &ProjectId) -> Result<SharedView, ExplorerError> {
        self.views
            .get(project)
            .ok_or_else(|| ExplorerError::UnknownProject(project.clone()))
    }
}
