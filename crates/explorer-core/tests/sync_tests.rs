use explorer_backend::BackendError;
use explorer_core::{Explorer, ExplorerConfig, TickOutcome};
use explorer_graph::{hash_ids, ProjectId};
use explorer_test_utils::{
    edges_of, edges_response, ids, init_tracing, node, nodes_response, unavailable, FakeBackend,
};
use std::sync::Arc;
use std::time::Duration;

fn setup() -> (Arc<FakeBackend>, Arc<Explorer>, ProjectId) {
    init_tracing();
    let backend = FakeBackend::shared();
    let explorer = Explorer::with_backend(ExplorerConfig::default(), backend.clone()).unwrap();
    (backend, Arc::new(explorer), ProjectId::new("sync"))
}

#[tokio::test]
async fn test_tick_with_fetch_in_flight_issues_no_requests() {
    let (backend, explorer, project) = setup();
    backend.hold();

    let first = {
        let explorer = Arc::clone(&explorer);
        let project = project.clone();
        tokio::spawn(async move { explorer.tick(&project).await })
    };
    backend.wait_for_calls(2).await;

    assert_eq!(explorer.tick(&project).await, TickOutcome::Skipped);
    assert_eq!(backend.total_calls(), 2);

    backend.release();
    assert!(first.await.unwrap().is_completed());
    assert!(!explorer.graph_snapshot(&project).unwrap().is_fetching());
}

#[tokio::test]
async fn test_reconcile_waits_for_both_merges() {
    let (backend, explorer, project) = setup();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Objective", 5), node(2, "Link", 5)])));
    backend.push_edges(Ok(edges_response(edges_of(2, &[(1, "BelongsTo")], 6))));
    backend.hold();

    let tick = {
        let explorer = Arc::clone(&explorer);
        let project = project.clone();
        tokio::spawn(async move { explorer.tick(&project).await })
    };
    backend.wait_for_calls(2).await;
    assert!(explorer.workflow_order(&project).is_empty());

    backend.release();
    tick.await.unwrap();

    let link = explorer.element(&project, hash_ids(&ids(&[2]))).unwrap();
    assert_eq!(link.edges()["BelongsTo"], vec![hash_ids(&ids(&[1]))]);
}

#[tokio::test]
async fn test_failed_tick_clears_flag_and_keeps_watermarks() {
    let (backend, explorer, project) = setup();
    backend.push_nodes(Err(unavailable(&project)));
    backend.push_edges(Err(unavailable(&project)));

    let outcome = explorer.tick(&project).await;
    assert!(matches!(outcome, TickOutcome::Failed { nodes: Some(_), edges: Some(_) }));

    let snapshot = explorer.graph_snapshot(&project).unwrap();
    assert!(!snapshot.is_fetching());
    assert_eq!(snapshot.nodes_watermark(), 0);
    assert_eq!(snapshot.edges_watermark(), 0);

    assert!(explorer.tick(&project).await.is_completed());
    assert_eq!(backend.total_calls(), 4);
}

#[tokio::test]
async fn test_malformed_response_is_a_no_op() {
    let (backend, explorer, project) = setup();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 7)])));
    explorer.tick(&project).await;

    backend.push_nodes(Err(BackendError::Malformed {
        url: "fake://nodes".into(),
        reason: "expected value".into(),
    }));
    let outcome = explorer.tick(&project).await;
    let TickOutcome::Completed { merged, applied } = outcome else {
        panic!("malformed payload should not fail the tick");
    };
    assert!(merged.is_empty());
    assert_eq!(applied.created + applied.removed, 0);
    assert_eq!(explorer.graph_snapshot(&project).unwrap().nodes_watermark(), 7);
}

#[tokio::test]
async fn test_watermarks_advance_between_ticks() {
    let (backend, explorer, project) = setup();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 40), node(2, "Link", 15)])));
    backend.push_edges(Ok(edges_response(edges_of(1, &[(2, "RelatedTo")], 33))));

    explorer.tick(&project).await;
    explorer.tick(&project).await;

    assert_eq!(
        backend.since_log(),
        vec![("nodes", 0), ("edges", 0), ("nodes", 40), ("edges", 33)]
    );
}

#[tokio::test(start_paused = true)]
async fn test_sync_polls_until_stopped() {
    let (backend, explorer, project) = setup();

    explorer.start_sync(&project);
    explorer.start_sync(&project);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.node_calls(), 1);

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert!(backend.node_calls() >= 3);

    explorer.stop_sync(&project);
    let stopped_at = backend.total_calls();
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(backend.total_calls(), stopped_at);
    assert!(!explorer.is_syncing(&project));
}

#[tokio::test(start_paused = true)]
async fn test_in_flight_tick_completes_after_stop() {
    let (backend, explorer, project) = setup();
    backend.push_nodes(Ok(nodes_response(vec![node(9, "Link", 3)])));
    backend.hold();

    explorer.start_sync(&project);
    backend.wait_for_calls(2).await;
    explorer.stop_sync(&project);
    backend.release();

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(backend.total_calls(), 2);
    assert_eq!(explorer.workflow_order(&project), vec![hash_ids(&ids(&[9]))]);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_resumes_polling() {
    let (backend, explorer, project) = setup();

    explorer.start_sync(&project);
    tokio::time::sleep(Duration::from_millis(100)).await;
    explorer.stop_sync(&project);
    explorer.start_sync(&project);
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(backend.node_calls(), 2);

    // the first task must not keep polling next to the second
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(backend.node_calls(), 3);
}
