//! Integration tests for Depscope
//!
//! These tests verify that the fact store, query pipeline and HTTP handlers
//! work together.

use std::sync::Arc;

use fixtures::project;
use depscope_core::{Direction, FactStore, GraphQuery, NodeClass, run_graph_query};
use depscope_server::{DepscopeServer, ServerConfig, ServerState};
use serde_json::json;
use tempfile::TempDir;

mod fixtures {
    //! Project records in the ingest wire format

    use serde_json::{Value, json};

    pub fn project(owner: &str, deps: &[(&str, &str)]) -> Value {
        let coords = |gav: &str| {
            let mut parts = gav.splitn(3, ':');
            (
                parts.next().unwrap_or_default().to_string(),
                parts.next().unwrap_or_default().to_string(),
                parts.next().unwrap_or_default().to_string(),
            )
        };
        let (g, a, v) = coords(owner);
        let dependencies: Vec<Value> = deps
            .iter()
            .map(|(gav, scope)| {
                let (g, a, v) = coords(gav);
                json!({"group_id": g, "artifact_id": a, "version": v, "scope": scope})
            })
            .collect();
        json!({
            "project": {"group_id": g, "artifact_id": a, "version": v},
            "dependencies": dependencies,
        })
    }
}

fn commons_batch() -> Vec<serde_json::Value> {
    vec![
        project(
            "org.acme:shop:1.0",
            &[
                ("org.apache.commons:commons-lang3:3.14.0", "compile"),
                ("org.acme:payments:1.0", "compile"),
                ("org.junit.jupiter:junit-jupiter:5.10.0", "test"),
            ],
        ),
        project(
            "org.acme:payments:1.0",
            &[
                ("org.apache.commons:commons-lang3:3.12.0", "compile"),
                ("org.junit.jupiter:junit-jupiter:5.10.0", "test"),
            ],
        ),
    ]
}

/// Facts imported from a file survive a snapshot round trip and answer queries
#[test]
fn test_import_then_query_snapshot() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("facts.json");

    let mut store = FactStore::load(&path).unwrap();
    assert!(store.is_empty());
    let summary = store.ingest_json(commons_batch());
    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.new_artifacts, 5);
    assert_eq!(summary.new_edges, 5);
    store.save(&path).unwrap();

    let reloaded = FactStore::load(&path).unwrap();
    assert_eq!(reloaded.distinct_scopes(), vec!["compile", "test"]);

    // Who uses commons-lang3, in any version?
    let query = GraphQuery {
        root_id: Some("org.apache.commons:commons-lang3:3.12.0".to_string()),
        direction: Direction::Reverse,
        show_version: false,
        ..GraphQuery::default()
    };
    let data = run_graph_query(&reloaded, &query);

    assert_eq!(data.node_count, 3);
    let nodes: Vec<_> = data
        .elements
        .iter()
        .filter_map(|element| element.as_node())
        .collect();
    let root = nodes
        .iter()
        .find(|node| node.data.id == "org.apache.commons:commons-lang3")
        .unwrap();
    assert!(root.has_class(NodeClass::Root));
    assert!(
        nodes
            .iter()
            .filter(|node| node.data.artifact_id != "commons-lang3")
            .all(|node| node.has_class(NodeClass::Highlight))
    );
}

/// Handlers see facts ingested through the shared state
#[tokio::test]
async fn test_server_state_shared_between_handlers() {
    let server = DepscopeServer::new(
        ServerState::new(FactStore::new()),
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
    );
    let state = server.state();

    let response = depscope_server::handlers::post_facts(
        axum::extract::State(Arc::clone(&state)),
        axum::Json(commons_batch()),
    )
    .await;
    assert!(response.status().is_success());

    let store = state.store.read().await;
    assert_eq!(store.artifacts().len(), 5);
    let data = run_graph_query(&*store, &GraphQuery::rooted("org.acme:shop:1.0"));
    assert_eq!(data.node_count, 5);
    assert_eq!(data.edge_count, 5);
}

/// Concurrent readers all see the same snapshot
#[tokio::test]
async fn test_concurrent_graph_queries() {
    let mut store = FactStore::new();
    store.ingest_json(commons_batch());
    let state = Arc::new(ServerState::new(store));

    let mut handles = Vec::new();
    for depth in 0..4 {
        let state = Arc::clone(&state);
        handles.push(tokio::spawn(async move {
            let store = state.store.read().await;
            let query = GraphQuery {
                depth: Some(depth),
                ..GraphQuery::rooted("org.acme:shop:1.0")
            };
            (depth, run_graph_query(&*store, &query).node_count)
        }));
    }

    for handle in handles {
        let (depth, count) = handle.await.unwrap();
        let expected = match depth {
            0 => 1,
            1 => 4,
            _ => 5,
        };
        assert_eq!(count, expected, "depth {depth}");
    }
}

/// Malformed records are reported without aborting the batch
#[test]
fn test_partial_batch() {
    let mut store = FactStore::new();
    let mut batch = commons_batch();
    batch.push(json!({"dependencies": []}));
    batch.push(json!([1, 2, 3]));

    let summary = store.ingest_json(batch);
    assert_eq!(summary.parsed, 2);
    assert_eq!(summary.skipped, 2);
    assert_eq!(summary.errors.len(), 2);
}
