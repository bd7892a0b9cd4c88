//! HTTP server over a shared dependency fact store

pub mod handlers;
pub mod router;

use std::path::PathBuf;
use std::sync::Arc;

use depscope_core::FactStore;
use tokio::sync::RwLock;

/// State shared by every request handler.
pub struct ServerState {
    pub store: RwLock<FactStore>,
    /// Snapshot file the store was opened from, written back after ingest.
    pub snapshot_path: Option<PathBuf>,
}

impl ServerState {
    pub fn new(store: FactStore) -> Self {
        ServerState {
            store: RwLock::new(store),
            snapshot_path: None,
        }
    }

    pub fn with_snapshot(store: FactStore, path: PathBuf) -> Self {
        ServerState {
            store: RwLock::new(store),
            snapshot_path: Some(path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 7890,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

pub struct DepscopeServer {
    state: Arc<ServerState>,
    config: ServerConfig,
}

impl DepscopeServer {
    pub fn new(state: ServerState, config: ServerConfig) -> Self {
        DepscopeServer {
            state: Arc::new(state),
            config,
        }
    }

    pub fn state(&self) -> Arc<ServerState> {
        Arc::clone(&self.state)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> anyhow::Result<()> {
        let address = self.config.address();
        let listener = tokio::net::TcpListener::bind(&address).await?;
        tracing::info!("Depscope server listening on http://{}", listener.local_addr()?);

        let app = router::create_router(self.state);
        axum::serve(listener, app).await?;
        Ok(())
    }
}
