//! Graph store
//!
//! Fetches incremental node and edge updates from the backend and merges
//! them into the project's [`ProjectGraph`]. Requests never hold a graph
//! lock: read the watermark, await the response, then lock and merge.
//!
//! A response that arrives but cannot be used (undecodable body, an
//! `Error` payload, the wrong variant) is logged and merged as nothing.
//! Transport and status failures leave the graph untouched and are
//! returned to the caller.

use crate::error::StoreError;
use explorer_backend::{BackendError, GraphBackend};
use explorer_graph::{EngineResponse, GraphRegistry, MergeReport, ProjectId, SharedGraph};
use std::sync::Arc;

/// Backend-fed cache of project graphs
#[derive(Clone)]
pub struct GraphStore {
    registry: Arc<GraphRegistry>,
    backend: Arc<dyn GraphBackend>,
}

impl std::fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphStore")
            .field("projects", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl GraphStore {
    #[must_use]
    pub fn new(registry: Arc<GraphRegistry>, backend: Arc<dyn GraphBackend>) -> Self {
        Self { registry, backend }
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &Arc<GraphRegistry> {
        &self.registry
    }

    /// Create the project's empty graph on first call
    pub fn ensure_project(&self, project: &ProjectId) -> SharedGraph {
        self.registry.ensure_project(project)
    }

    /// Existing graph of `project`
    ///
    /// # Errors
    /// - `StoreError::UnknownProject` if the project was never ensured
    pub fn graph(&self, project: &ProjectId) -> Result<SharedGraph, StoreError> {
        self.registry
            .get(project)
            .ok_or_else(|| StoreError::UnknownProject(project.clone()))
    }

    /// Fetch nodes written after the node watermark and merge them
    ///
    /// # Errors
    /// - `StoreError::Backend` on transport or status failure; nothing is merged
    pub async fn fetch_nodes(&self, project: &ProjectId) -> Result<MergeReport, StoreError> {
        let graph = self.ensure_project(project);
        let since = graph.read().nodes_watermark();
        let response = self.backend.nodes_since(project, since).await;

        match accept(project, "nodes", response)? {
            Some(EngineResponse::Nodes(nodes)) => {
                let report = graph.write().merge_nodes(nodes);
                tracing::trace!(
                    project = %project,
                    merged = report.nodes,
                    watermark = report.nodes_watermark,
                    "nodes merged"
                );
                Ok(report)
            }
            Some(other) => Ok(unexpected(project, "nodes", &other, &graph)),
            None => Ok(unchanged(&graph)),
        }
    }

    /// Fetch edge lists written after the edge watermark and replace them per source
    ///
    /// # Errors
    /// - `StoreError::Backend` on transport or status failure; nothing is merged
    pub async fn fetch_edges(&self, project: &ProjectId) -> Result<MergeReport, StoreError> {
        let graph = self.ensure_project(project);
        let since = graph.read().edges_watermark();
        let response = self.backend.edges_since(project, since).await;

        match accept(project, "edges", response)? {
            Some(EngineResponse::Edges(edges)) => {
                let report = graph.write().merge_edges(edges);
                tracing::trace!(
                    project = %project,
                    sources = report.edge_sources,
                    watermark = report.edges_watermark,
                    "edges merged"
                );
                Ok(report)
            }
            Some(other) => Ok(unexpected(project, "edges", &other, &graph)),
            None => Ok(unchanged(&graph)),
        }
    }

    /// Bulk fetch of nodes, edges and sibling groups
    ///
    /// # Errors
    /// - `StoreError::Backend` on transport or status failure; nothing is merged
    pub async fn explore(&self, project: &ProjectId) -> Result<MergeReport, StoreError> {
        let graph = self.ensure_project(project);
        let response = self.backend.explore(project).await;

        match accept(project, "explore", response)? {
            Some(EngineResponse::Explore(data)) => {
                let mut guard = graph.write();
                let report = guard
                    .merge_nodes(data.nodes)
                    .combine(guard.merge_edges(data.edges))
                    .combine(guard.merge_sibling_groups(data.sibling_nodes));
                drop(guard);
                tracing::info!(
                    project = %project,
                    nodes = report.nodes,
                    edge_sources = report.edge_sources,
                    sibling_groups = report.sibling_groups,
                    "explore merged"
                );
                Ok(report)
            }
            Some(other) => Ok(unexpected(project, "explore", &other, &graph)),
            None => Ok(unchanged(&graph)),
        }
    }
}

/// Split a backend result into usable, ignorable and failed
fn accept(
    project: &ProjectId,
    resource: &'static str,
    response: Result<EngineResponse, BackendError>,
) -> Result<Option<EngineResponse>, StoreError> {
    match response {
        Ok(EngineResponse::Error(message)) => {
            tracing::warn!(project = %project, resource, %message, "engine reported an error");
            Ok(None)
        }
        Ok(response) => Ok(Some(response)),
        Err(e) if e.is_malformed() => {
            tracing::warn!(project = %project, resource, error = %e, "ignoring malformed response");
            Ok(None)
        }
        Err(e) => {
            tracing::warn!(project = %project, resource, error = %e, "fetch failed");
            Err(e.into())
        }
    }
}

fn unexpected(
    project: &ProjectId,
    resource: &'static str,
    response: &EngineResponse,
    graph: &SharedGraph,
) -> MergeReport {
    tracing::warn!(
        project = %project,
        resource,
        kind = response.kind(),
        "ignoring unexpected response"
    );
    unchanged(graph)
}

fn unchanged(graph: &SharedGraph) -> MergeReport {
    let graph = graph.read();
    MergeReport {
        nodes_watermark: graph.nodes_watermark(),
        edges_watermark: graph.edges_watermark(),
        ..MergeReport::default()
    }
}
