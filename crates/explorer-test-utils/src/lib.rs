//! Testing utilities for the explorer workspace
//!
//! Scripted backend, node/edge fixtures and tracing setup.

#![allow(missing_docs)]

use async_trait::async_trait;
use explorer_backend::{BackendError, GraphBackend};
use explorer_graph::{
    EdgesBySource, EngineResponse, ExploreData, Node, NodeEdges, NodeId, Payload, ProjectId,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Install a fmt subscriber writing through the test harness
///
/// Filter comes from `RUST_LOG`, defaulting to `warn`. Safe to call from
/// every test.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn ids(raw: &[u32]) -> Vec<NodeId> {
    raw.iter().copied().map(NodeId::new).collect()
}

pub fn node(id: u32, label: &str, written_at: i64) -> Node {
    Node::new(id, &[label], Payload::Text(format!("node {id}")), written_at)
}

pub fn settings_node(id: u32, written_at: i64) -> Node {
    Node::new(
        id,
        &["CrawlerSettings"],
        Payload::CrawlerSettings(serde_json::json!({ "depth": 2 })),
        written_at,
    )
}

/// Edge map with one source
pub fn edges_of(source: u32, targets: &[(u32, &str)], written_at: i64) -> EdgesBySource {
    let mut edges = EdgesBySource::new();
    edges.insert(
        NodeId::new(source),
        NodeEdges::new(
            targets
                .iter()
                .map(|(t, label)| (NodeId::new(*t), (*label).to_string()))
                .collect(),
            written_at,
        ),
    );
    edges
}

pub fn nodes_response(nodes: Vec<Node>) -> EngineResponse {
    EngineResponse::Nodes(nodes)
}

pub fn edges_response(edges: EdgesBySource) -> EngineResponse {
    EngineResponse::Edges(edges)
}

pub fn explore_response(
    nodes: Vec<Node>,
    edges: EdgesBySource,
    sibling_nodes: Vec<Vec<NodeId>>,
) -> EngineResponse {
    EngineResponse::Explore(ExploreData {
        nodes,
        edges,
        sibling_nodes,
    })
}

/// A failure the scheduler should log and retry on the next tick
pub fn unavailable(project: &ProjectId) -> BackendError {
    BackendError::Status {
        status: 503,
        url: format!("fake://engine/{project}"),
    }
}

type Script = Mutex<VecDeque<Result<EngineResponse, BackendError>>>;

/// Scripted [`GraphBackend`]
///
/// Each endpoint pops its queued responses in order. An empty queue
/// answers with an empty payload of the right kind. While held, requests
/// block after being counted until [`FakeBackend::release`].
#[derive(Debug, Default)]
pub struct FakeBackend {
    nodes: Script,
    edges: Script,
    explore: Script,
    node_calls: AtomicUsize,
    edge_calls: AtomicUsize,
    explore_calls: AtomicUsize,
    since_log: Mutex<Vec<(&'static str, i64)>>,
    gate: Mutex<Option<Arc<Semaphore>>>,
}

impl FakeBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn push_nodes(&self, response: Result<EngineResponse, BackendError>) {
        self.nodes.lock().push_back(response);
    }

    pub fn push_edges(&self, response: Result<EngineResponse, BackendError>) {
        self.edges.lock().push_back(response);
    }

    pub fn push_explore(&self, response: Result<EngineResponse, BackendError>) {
        self.explore.lock().push_back(response);
    }

    /// Block every request from now on until [`release`](Self::release)
    pub fn hold(&self) {
        *self.gate.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    /// Let held and future requests through
    pub fn release(&self) {
        if let Some(gate) = self.gate.lock().take() {
            gate.close();
        }
    }

    pub fn node_calls(&self) -> usize {
        self.node_calls.load(Ordering::SeqCst)
    }

    pub fn edge_calls(&self) -> usize {
        self.edge_calls.load(Ordering::SeqCst)
    }

    pub fn explore_calls(&self) -> usize {
        self.explore_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.node_calls() + self.edge_calls() + self.explore_calls()
    }

    /// `(endpoint, since)` of every incremental request, in call order
    pub fn since_log(&self) -> Vec<(&'static str, i64)> {
        self.since_log.lock().clone()
    }

    /// Yield until at least `n` requests have been issued
    pub async fn wait_for_calls(&self, n: usize) {
        while self.total_calls() < n {
            tokio::task::yield_now().await;
        }
    }

    async fn pass_gate(&self) {
        let gate = self.gate.lock().clone();
        if let Some(gate) = gate {
            // Closed means released
            let _ = gate.acquire().await;
        }
    }
}

#[async_trait]
impl GraphBackend for FakeBackend {
    async fn nodes_since(
        &self,
        _project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        self.node_calls.fetch_add(1, Ordering::SeqCst);
        self.since_log.lock().push(("nodes", since));
        self.pass_gate().await;
        let scripted = self.nodes.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(EngineResponse::Nodes(Vec::new())))
    }

    async fn edges_since(
        &self,
        _project: &ProjectId,
        since: i64,
    ) -> Result<EngineResponse, BackendError> {
        self.edge_calls.fetch_add(1, Ordering::SeqCst);
        self.since_log.lock().push(("edges", since));
        self.pass_gate().await;
        let scripted = self.edges.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(EngineResponse::Edges(EdgesBySource::new())))
    }

    async fn explore(&self, _project: &ProjectId) -> Result<EngineResponse, BackendError> {
        self.explore_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;
        let scripted = self.explore.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(EngineResponse::Explore(ExploreData::default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn scripted_responses_pop_in_order() {
        let backend = FakeBackend::new();
        let project = ProjectId::new("p");
        backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 10)])));
        backend.push_nodes(Err(unavailable(&project)));

        let first = backend.nodes_since(&project, 0).await.unwrap();
        assert_eq!(first, nodes_response(vec![node(1, "Link", 10)]));
        assert!(backend.nodes_since(&project, 10).await.is_err());
        assert_eq!(
            backend.nodes_since(&project, 10).await.unwrap(),
            EngineResponse::Nodes(vec![])
        );
        assert_eq!(backend.node_calls(), 3);
        assert_eq!(
            backend.since_log(),
            vec![("nodes", 0), ("nodes", 10), ("nodes", 10)]
        );
    }

    #[tokio::test]
    async fn held_requests_wait_for_release() {
        let backend = FakeBackend::shared();
        backend.hold();

        let task = {
            let backend = Arc::clone(&backend);
            tokio::spawn(async move { backend.explore(&ProjectId::new("p")).await })
        };
        backend.wait_for_calls(1).await;
        assert!(!task.is_finished());

        backend.release();
        assert!(task.await.unwrap().is_ok());
    }
}
