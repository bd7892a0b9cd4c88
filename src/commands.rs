//! CLI command implementations

use anyhow::Context;
use depscope_core::{FactStore, GraphQuery, run_graph_query};
use depscope_server::{DepscopeServer, ServerConfig, ServerState};
use std::path::{Path, PathBuf};

pub async fn serve(facts: PathBuf, config: ServerConfig) -> anyhow::Result<()> {
    let store = FactStore::load(&facts)?;
    tracing::info!(
        "Serving {} artifacts, {} edges from {}",
        store.artifacts().len(),
        store.edges().len(),
        facts.display()
    );

    let server = DepscopeServer::new(ServerState::with_snapshot(store, facts), config);
    server.start().await
}

pub fn graph(facts: &Path, query: &GraphQuery) -> anyhow::Result<()> {
    let store = FactStore::load(facts)?;
    let data = run_graph_query(&store, query);
    tracing::info!(
        "{} nodes, {} edges, {} elements",
        data.node_count,
        data.edge_count,
        data.elements.len()
    );
    println!("{}", serde_json::to_string_pretty(&data)?);
    Ok(())
}

pub fn import(facts: &Path, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Cannot read {}", file.display()))?;
    let records: Vec<serde_json::Value> = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of projects", file.display()))?;

    let mut store = FactStore::load(facts)?;
    let summary = store.ingest_json(records);
    store.save(facts)?;

    tracing::info!(
        "Imported {} projects ({} skipped): {} new artifacts, {} new edges",
        summary.parsed,
        summary.skipped,
        summary.new_artifacts,
        summary.new_edges
    );
    for error in &summary.errors {
        tracing::warn!("{}", error);
    }
    Ok(())
}

pub fn stats(facts: &Path) -> anyhow::Result<()> {
    let store = FactStore::load(facts)?;
    let scopes = store.distinct_scopes();

    println!("Snapshot:  {}", facts.display());
    println!("Artifacts: {}", store.artifacts().len());
    println!("Edges:     {}", store.edges().len());
    if scopes.is_empty() {
        println!("Scopes:    -");
    } else {
        println!("Scopes:    {}", scopes.join(", "));
    }
    Ok(())
}
