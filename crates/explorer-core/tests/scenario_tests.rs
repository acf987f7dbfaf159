use explorer_core::{Explorer, ExplorerConfig, ProjectId};
use explorer_graph::{hash_ids, EdgesBySource};
use explorer_layout::{CanvasPosition, ElementKind};
use explorer_test_utils::{
    edges_of, edges_response, explore_response, ids, init_tracing, node, nodes_response,
    settings_node, FakeBackend,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn explorer_with(backend: &Arc<FakeBackend>, config: ExplorerConfig) -> Explorer {
    init_tracing();
    Explorer::with_backend(config, backend.clone()).unwrap()
}

#[tokio::test]
async fn test_grouped_nodes_become_one_cluster() {
    let backend = FakeBackend::shared();
    backend.push_explore(Ok(explore_response(
        vec![node(1, "Link", 1), node(2, "Link", 1), node(3, "Link", 1)],
        EdgesBySource::new(),
        vec![ids(&[2, 3])],
    )));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");

    explorer.explore(&project).await.unwrap();

    let elements = explorer.elements(&project);
    assert_eq!(elements.len(), 2);
    assert_eq!(elements[0].key(), hash_ids(&ids(&[1])));
    assert_eq!(elements[0].kind(), &ElementKind::SingleNode(ids(&[1])[0]));
    assert_eq!(elements[1].key(), hash_ids(&ids(&[2, 3])));
    assert_eq!(elements[1].kind(), &ElementKind::SiblingCluster(ids(&[2, 3])));
}

#[tokio::test]
async fn test_reordered_group_replaces_cluster_and_keeps_single() {
    let backend = FakeBackend::shared();
    backend.push_explore(Ok(explore_response(
        vec![node(1, "Link", 1), node(2, "Link", 1), node(3, "Link", 1)],
        EdgesBySource::new(),
        vec![ids(&[2, 3])],
    )));
    backend.push_explore(Ok(explore_response(vec![], EdgesBySource::new(), vec![ids(&[3, 2])])));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");

    explorer.explore(&project).await.unwrap();
    let single = hash_ids(&ids(&[1]));
    let placed = explorer.place_element(&project, single, 100.0, 50.0).unwrap();

    explorer.explore(&project).await.unwrap();

    assert_eq!(
        explorer.workflow_order(&project),
        vec![single, hash_ids(&ids(&[3, 2]))]
    );
    assert!(explorer.element(&project, hash_ids(&ids(&[2, 3]))).is_none());
    assert_eq!(explorer.layout_state(&project, single).unwrap().position, Some(placed));
}

#[tokio::test]
async fn test_unchanged_snapshot_creates_and_removes_nothing() {
    let backend = FakeBackend::shared();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 1), node(2, "Link", 1)])));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");

    explorer.tick(&project).await;
    let before = explorer.workflow_order(&project);

    let outcome = explorer.tick(&project).await;
    let explorer_core::TickOutcome::Completed { applied, .. } = outcome else {
        panic!("second tick should complete");
    };
    assert_eq!((applied.created, applied.removed), (0, 0));
    assert_eq!(explorer.workflow_order(&project), before);
}

async fn related_to_explorer(labels: &[&str]) -> (Explorer, ProjectId) {
    let backend = FakeBackend::shared();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 1), node(2, "Link", 1)])));
    backend.push_edges(Ok(edges_response(edges_of(1, &[(2, "RelatedTo")], 1))));
    let config = ExplorerConfig::default().with_edge_labels_of_interest(labels.iter().copied());
    let explorer = explorer_with(&backend, config);
    let project = ProjectId::new("scenario");

    explorer.tick(&project).await;
    explorer.set_viewport(&project, CanvasPosition::from_origin(0.0, 0.0, 1200.0, 800.0));
    for key in explorer.workflow_order(&project) {
        explorer.place_element(&project, key, 120.0, 60.0).unwrap();
    }
    (explorer, project)
}

#[tokio::test]
async fn test_related_to_in_allow_list_is_routed() {
    let (explorer, project) = related_to_explorer(&["RelatedTo"]).await;

    let routed = explorer.routed_edges(&project);
    assert_eq!(routed.len(), 1);
    assert!(routed[0].path.svg_path().starts_with("M "));
    assert!(!routed[0].path.arrow_points().is_empty());
    assert_eq!(routed[0].path.label, "RelatedTo");
}

#[tokio::test]
async fn test_related_to_outside_allow_list_is_not_routed() {
    let (explorer, project) = related_to_explorer(&["SuggestedFor", "BelongsTo"]).await;
    assert!(explorer.routed_edges(&project).is_empty());
}

#[tokio::test]
async fn test_translate_moves_route_endpoints() {
    let (explorer, project) = related_to_explorer(&["RelatedTo"]).await;
    let before = explorer.routed_edges(&project)[0].path.clone();

    let target = explorer.routed_edges(&project)[0].target;
    explorer.translate_element(&project, target, 0.0, 200.0).unwrap();

    let after = explorer.routed_edges(&project)[0].path.clone();
    assert_eq!(after.start, before.start);
    assert_eq!(after.end.y, before.end.y + 200.0);
}

#[tokio::test]
async fn test_related_nodes_split_cached_and_missing() {
    let backend = FakeBackend::shared();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Objective", 1), node(2, "Link", 1)])));
    backend.push_edges(Ok(edges_response(edges_of(
        1,
        &[(2, "SuggestedFor"), (7, "SuggestedFor"), (2, "BelongsTo")],
        1,
    ))));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");
    explorer.tick(&project).await;

    let related = explorer
        .related_nodes(&project, ids(&[1])[0], "SuggestedFor")
        .unwrap();
    assert_eq!(related.found.len(), 1);
    assert_eq!(related.missing, ids(&[7]));

    let snapshot = explorer.graph_snapshot(&project).unwrap();
    assert_eq!(snapshot.incoming(ids(&[2])[0]).len(), 2);
}

#[tokio::test]
async fn test_overwritten_node_becomes_configurable() {
    let backend = FakeBackend::shared();
    backend.push_nodes(Ok(nodes_response(vec![node(1, "Link", 1)])));
    backend.push_nodes(Ok(nodes_response(vec![settings_node(1, 2)])));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");
    let key = hash_ids(&ids(&[1]));

    explorer.tick(&project).await;
    assert!(explorer.layout_state(&project, key).unwrap().expanded);
    assert!(explorer.set_expanded(&project, key, false).is_err());

    explorer.tick(&project).await;
    assert_eq!(explorer.element(&project, key).unwrap().labels(), ["CrawlerSettings"]);
    explorer.set_expanded(&project, key, false).unwrap();
    assert!(!explorer.layout_state(&project, key).unwrap().expanded);
}

#[tokio::test]
async fn test_cluster_labels_arrive_after_explore() {
    let backend = FakeBackend::shared();
    backend.push_explore(Ok(explore_response(vec![], EdgesBySource::new(), vec![ids(&[5, 6])])));
    backend.push_nodes(Ok(nodes_response(vec![settings_node(5, 3), node(6, "Link", 3)])));
    let explorer = explorer_with(&backend, ExplorerConfig::default());
    let project = ProjectId::new("scenario");
    let cluster = hash_ids(&ids(&[5, 6]));

    explorer.explore(&project).await.unwrap();
    assert!(explorer.element(&project, cluster).unwrap().labels().is_empty());

    explorer.tick(&project).await;
    assert_eq!(explorer.workflow_order(&project), vec![cluster]);
    explorer.set_expanded(&project, cluster, true).unwrap();
}
