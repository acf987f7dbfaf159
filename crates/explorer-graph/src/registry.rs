//! Registry of project graphs
//!
//! One [`ProjectGraph`] per project id, created lazily and kept for the
//! lifetime of the registry.

use crate::project::{ProjectGraph, ProjectId};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// Shared handle to one project's graph
pub type SharedGraph = Arc<RwLock<ProjectGraph>>;

/// Lazily populated map of project graphs
#[derive(Debug, Default)]
pub struct GraphRegistry {
    projects: DashMap<ProjectId, SharedGraph>,
}

impl GraphRegistry {
    /// Create an empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            projects: DashMap::new(),
        }
    }

    /// Get the project's graph, creating an empty one on first access
    pub fn ensure_project(&self, project_id: &ProjectId) -> SharedGraph {
        self.projects
            .entry(project_id.clone())
            .or_insert_with(|| {
                tracing::debug!(project = %project_id, "creating project graph");
                Arc::new(RwLock::new(ProjectGraph::new(project_id.clone())))
            })
            .value()
            .clone()
    }

    /// Get the project's graph if it exists
    #[must_use]
    pub fn get(&self, project_id: &ProjectId) -> Option<SharedGraph> {
        self.projects.get(project_id).map(|entry| entry.value().clone())
    }

    /// Clone of the project's current graph
    #[must_use]
    pub fn snapshot(&self, project_id: &ProjectId) -> Option<ProjectGraph> {
        self.get(project_id).map(|graph| graph.read().clone())
    }

    /// Mark the project as fetching
    ///
    /// Returns `None` when a fetch is already in flight. The flag is
    /// cleared when the returned guard drops, on every exit path.
    pub fn try_begin_fetch(&self, project_id: &ProjectId) -> Option<FetchGuard> {
        let graph = self.ensure_project(project_id);
        {
            let mut guard = graph.write();
            if guard.fetching {
                return None;
            }
            guard.fetching = true;
        }
        Some(FetchGuard { graph })
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, project_id: &ProjectId) -> bool {
        self.projects.contains_key(project_id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.projects.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Known project ids
    #[must_use]
    pub fn project_ids(&self) -> Vec<ProjectId> {
        self.projects.iter().map(|entry| entry.key().clone()).collect()
    }
}

/// Holds a project's fetching flag
#[derive(Debug)]
pub struct FetchGuard {
    graph: SharedGraph,
}

impl FetchGuard {
    /// The guarded graph
    #[inline]
    #[must_use]
    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        self.graph.write().fetching = false;
    }
}
