//! Axum router setup for the Depscope server

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::{
    ServerState,
    handlers::{
        get_artifacts, get_dependency_table, get_graph_data, get_scopes, health_check, post_facts,
    },
};

/// Create the axum router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/api/graph/data", get(get_graph_data))
        .route("/api/artifacts", get(get_artifacts))
        .route("/api/dependencies/table", get(get_dependency_table))
        .route("/api/scopes", get(get_scopes))
        .route("/api/facts", post(post_facts))
        .route("/api/health", get(health_check))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
