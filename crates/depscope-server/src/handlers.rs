//! REST API handlers for the Depscope server

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use axum_extra::extract::Query;
use depscope_core::{
    ArtifactFact, DependencyRow, DependencyTableQuery, FactStore, GraphData, GraphQuery,
    IngestSummary, dependency_table, list_artifacts, query::DEFAULT_LIMIT, run_graph_query,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ServerState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactsParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

/// Body returned by a successful ingest.
#[derive(Debug, Serialize)]
pub struct IngestResponse {
    pub success: bool,
    /// Whether the snapshot file now holds the ingested facts.
    pub persisted: bool,
    #[serde(flatten)]
    pub summary: IngestSummary,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    fn bad_request(error: impl Into<String>) -> Response {
        let body = ErrorResponse {
            success: false,
            error: error.into(),
        };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

/// Run one graph view query against the current facts
pub async fn get_graph_data(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<GraphQuery>,
) -> Json<GraphData> {
    let store = state.store.read().await;
    Json(run_graph_query(&*store, &query))
}

pub async fn get_artifacts(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<ArtifactsParams>,
) -> Json<Vec<ArtifactFact>> {
    let store = state.store.read().await;
    Json(list_artifacts(&*store, params.limit))
}

pub async fn get_dependency_table(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<DependencyTableQuery>,
) -> Json<Vec<DependencyRow>> {
    let store = state.store.read().await;
    Json(dependency_table(&*store, &query))
}

pub async fn get_scopes(State(state): State<Arc<ServerState>>) -> Json<Vec<String>> {
    let store = state.store.read().await;
    Json(store.distinct_scopes())
}

/// Ingest a batch of project facts.
///
/// Malformed records are skipped and reported in the summary. When the state
/// is backed by a snapshot file the store is written back afterwards, after
/// the write lock has been released.
pub async fn post_facts(
    State(state): State<Arc<ServerState>>,
    Json(records): Json<Vec<Value>>,
) -> Response {
    if records.is_empty() {
        return ErrorResponse::bad_request("No project facts in request");
    }

    let (summary, pending_save) = {
        let mut store = state.store.write().await;
        let summary = store.ingest_json(records);
        let pending_save = state
            .snapshot_path
            .clone()
            .map(|path| (store.clone(), path));
        (summary, pending_save)
    };
    tracing::info!(
        "Ingested {} projects ({} skipped): {} new artifacts, {} new edges",
        summary.parsed,
        summary.skipped,
        summary.new_artifacts,
        summary.new_edges
    );

    let persisted = match pending_save {
        Some((store, path)) => persist(store, path).await,
        None => false,
    };

    Json(IngestResponse {
        success: true,
        persisted,
        summary,
    })
    .into_response()
}

/// Write `store` to `path` off the async workers. Failures are logged.
async fn persist(store: FactStore, path: PathBuf) -> bool {
    match tokio::task::spawn_blocking(move || store.save(&path)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!("Failed to persist facts: {}", e);
            false
        }
        Err(e) => {
            tracing::warn!("Fact persistence task failed: {}", e);
            false
        }
    }
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    let health = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };
    Json(health)
}
