//! Sync scheduler
//!
//! Polls each active project at a fixed interval. A tick fetches nodes and
//! edges concurrently, merges both, then reconciles the project's elements.
//! Ticks for a project never overlap: a tick that finds a fetch in flight
//! is dropped, not queued.

use crate::store::GraphStore;
use crate::views::ViewRegistry;
use dashmap::DashMap;
use explorer_graph::{MergeReport, ProjectId};
use explorer_layout::ApplyReport;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Result of one tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// A fetch for the project was already in flight; no requests issued
    Skipped,
    /// Both fetches merged and elements reconciled
    Completed {
        merged: MergeReport,
        applied: ApplyReport,
    },
    /// At least one fetch failed; the other side, if it succeeded, was merged
    Failed {
        nodes: Option<String>,
        edges: Option<String>,
    },
}

impl TickOutcome {
    #[inline]
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    #[inline]
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

#[derive(Debug)]
struct SchedulerInner {
    store: GraphStore,
    views: Arc<ViewRegistry>,
    interval: Duration,
    /// Active projects and the generation of their polling task
    active: DashMap<ProjectId, u64>,
    generation: AtomicU64,
}

impl SchedulerInner {
    fn is_current(&self, project: &ProjectId, generation: u64) -> bool {
        self.active
            .get(project)
            .is_some_and(|entry| *entry.value() == generation)
    }

    async fn tick(&self, project: &ProjectId) -> TickOutcome {
        let Some(guard) = self.store.registry().try_begin_fetch(project) else {
            tracing::trace!(project = %project, "fetch in flight, dropping tick");
            return TickOutcome::Skipped;
        };

        let (nodes, edges) = tokio::join!(
            self.store.fetch_nodes(project),
            self.store.fetch_edges(project)
        );
        let graph = Arc::clone(guard.graph());
        drop(guard);

        match (nodes, edges) {
            (Ok(nodes), Ok(edges)) => {
                let merged = nodes.combine(edges);
                let applied = self.views.sync(&graph.read(), &merged);
                tracing::debug!(
                    project = %project,
                    nodes = merged.nodes,
                    edge_sources = merged.edge_sources,
                    removed = applied.removed,
                    created = applied.created,
                    "sync tick completed"
                );
                TickOutcome::Completed { merged, applied }
            }
            (nodes, edges) => {
                let merged = [&nodes, &edges]
                    .into_iter()
                    .filter_map(|side| side.as_ref().ok().copied())
                    .fold(MergeReport::default(), MergeReport::combine);
                self.views.sync(&graph.read(), &merged);
                TickOutcome::Failed {
                    nodes: nodes.err().map(|e| e.to_string()),
                    edges: edges.err().map(|e| e.to_string()),
                }
            }
        }
    }
}

/// Fixed-interval poller over a [`GraphStore`]
#[derive(Debug, Clone)]
pub struct SyncScheduler {
    inner: Arc<SchedulerInner>,
}

impl SyncScheduler {
    #[must_use]
    pub fn new(store: GraphStore, views: Arc<ViewRegistry>, interval: Duration) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                store,
                views,
                interval,
                active: DashMap::new(),
                generation: AtomicU64::new(0),
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.inner.interval
    }

    /// Start polling `project`; no-op if it is already active
    ///
    /// The first tick runs immediately. Must be called within a tokio runtime.
    pub fn start_sync(&self, project: &ProjectId) {
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;
        match self.inner.active.entry(project.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => return,
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(generation);
            }
        }
        self.inner.store.ensure_project(project);
        tracing::info!(
            project = %project,
            interval_ms = self.inner.interval.as_millis() as u64,
            "sync started"
        );

        let inner = Arc::clone(&self.inner);
        let project = project.clone();
        tokio::spawn(poll_project(inner, project, generation));
    }

    /// Stop polling `project`
    ///
    /// A tick already in flight completes but does not re-arm.
    pub fn stop_sync(&self, project: &ProjectId) {
        if self.inner.active.remove(project).is_some() {
            tracing::info!(project = %project, "sync stopped");
        }
    }

    #[must_use]
    pub fn is_syncing(&self, project: &ProjectId) -> bool {
        self.inner.active.contains_key(project)
    }

    /// Projects currently polled
    #[must_use]
    pub fn active_projects(&self) -> Vec<ProjectId> {
        self.inner.active.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Run one tick for `project` now
    pub async fn tick(&self, project: &ProjectId) -> TickOutcome {
        self.inner.tick(project).await
    }
}

async fn poll_project(inner: Arc<SchedulerInner>, project: ProjectId, generation: u64) {
    loop {
        if let TickOutcome::Failed { nodes, edges } = inner.tick(&project).await {
            tracing::warn!(
                project = %project,
                nodes = nodes.as_deref().unwrap_or("ok"),
                edges = edges.as_deref().unwrap_or("ok"),
                "sync tick failed"
            );
        }
        if !inner.is_current(&project, generation) {
            break;
        }
        tokio::time::sleep(inner.interval).await;
        if !inner.is_current(&project, generation) {
            break;
        }
    }
    tracing::debug!(project = %project, "polling task exited");
}
