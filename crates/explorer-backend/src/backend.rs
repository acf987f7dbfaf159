//! The engine API as seen by the explorer core

use crate::error::BackendError;
use async_trait::async_trait;
use explorer_graph::{EngineResponse, ProjectId};
use std::sync::Arc;

/// Read side of the engine API
///
/// Implementations return the decoded envelope as-is; deciding what an
/// `Error` payload or an unexpected variant means is the caller's job.
#[async_trait]
pub trait GraphBackend: Send + Sync {
    /// Nodes written after `since` (milliseconds)
    async fn nodes_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError>;

    /// Edge lists of sources written after `since` (milliseconds)
    async fn edges_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError>;

    /// Initial bulk payload with sibling groups
    async fn explore(&self, project: &ProjectId) -> Result<EngineResponse, BackendError>;
}

#[async_trait]
impl<T: GraphBackend + ?Sized> GraphBackend for Arc<T> {
    async fn nodes_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        (**self).nodes_since(project, since).await
    }

    async fn edges_since(
        &self,
        project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        (**self).edges_since(project, since).await
    }

    async fn explore(&self, project: &ProjectId) -> Result<EngineResponse, BackendError> {
        (**self).explore(project).await
    }
}
