//! In-memory fact store backing the graph queries
//!
//! Holds artifact and dependency facts with the uniqueness rules of the
//! upstream storage: one artifact per GAV, one edge per
//! `(from, to, scope, optional)` tuple. Only facts are ever written to disk;
//! derived graphs are rebuilt per query.

use std::collections::{BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::{FactSource, scope_matches};
use crate::error::FactStoreError;
use crate::model::{ArtifactFact, DEFAULT_SCOPE, EdgeFact, Gav};

/// One project and its declared dependencies, as produced by a manifest parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFacts {
    pub project: Gav,
    #[serde(default)]
    pub dependencies: Vec<DeclaredDependency>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    #[serde(flatten)]
    pub gav: Gav,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
}

impl DeclaredDependency {
    pub fn new(gav: Gav) -> Self {
        DeclaredDependency {
            gav,
            scope: None,
            optional: None,
        }
    }
}

/// Outcome of an ingest batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    /// Projects recorded.
    pub parsed: usize,
    /// Records rejected as malformed.
    pub skipped: usize,
    pub new_artifacts: usize,
    pub new_edges: usize,
    pub errors: Vec<String>,
}

impl IngestSummary {
    fn absorb(&mut self, other: IngestSummary) {
        self.parsed += other.parsed;
        self.skipped += other.skipped;
        self.new_artifacts += other.new_artifacts;
        self.new_edges += other.new_edges;
        self.errors.extend(other.errors);
    }
}

/// On-disk shape of a fact snapshot.
#[derive(Debug, Default, Serialize, Deserialize)]
struct FactSnapshot {
    #[serde(default)]
    saved_at: Option<String>,
    #[serde(default)]
    artifacts: Vec<ArtifactFact>,
    #[serde(default)]
    edges: Vec<EdgeFact>,
}

/// Artifact and dependency facts, deduplicated, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct FactStore {
    artifacts: Vec<ArtifactFact>,
    edges: Vec<EdgeFact>,
    known_gavs: HashSet<String>,
    known_edges: HashSet<EdgeFact>,
}

impl FactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from raw facts, dropping duplicates.
    pub fn from_facts(
        artifacts: impl IntoIterator<Item = ArtifactFact>,
        edges: impl IntoIterator<Item = EdgeFact>,
    ) -> Self {
        let mut store = FactStore::new();
        for artifact in artifacts {
            store.insert_artifact(artifact);
        }
        for edge in edges {
            store.insert_edge(edge);
        }
        store
    }

    pub fn artifacts(&self) -> &[ArtifactFact] {
        &self.artifacts
    }

    pub fn edges(&self) -> &[EdgeFact] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty() && self.edges.is_empty()
    }

    /// Insert an artifact unless its GAV is already known. Returns whether it was new.
    pub fn insert_artifact(&mut self, artifact: ArtifactFact) -> bool {
        if !self.known_gavs.insert(artifact.gav.clone()) {
            return false;
        }
        self.artifacts.push(artifact);
        true
    }

    /// Insert an edge unless the exact tuple is already known. Returns whether it was new.
    pub fn insert_edge(&mut self, edge: EdgeFact) -> bool {
        if !self.known_edges.insert(edge.clone()) {
            return false;
        }
        self.edges.push(edge);
        true
    }

    /// Record a project and its dependencies; absent scopes become `compile`.
    pub fn record_project(&mut self, project: &ProjectFacts) -> IngestSummary {
        let mut summary = IngestSummary {
            parsed: 1,
            ..IngestSummary::default()
        };

        let owner = ArtifactFact::from(&project.project);
        let from = owner.gav.clone();
        if self.insert_artifact(owner) {
            summary.new_artifacts += 1;
        }

        for dependency in &project.dependencies {
            let target = ArtifactFact::from(&dependency.gav);
            let to = target.gav.clone();
            if self.insert_artifact(target) {
                summary.new_artifacts += 1;
            }

            let scope = dependency
                .scope
                .clone()
                .unwrap_or_else(|| DEFAULT_SCOPE.to_string());
            let edge = EdgeFact {
                from: from.clone(),
                to,
                scope: Some(scope),
                optional: dependency.optional,
            };
            if self.insert_edge(edge) {
                summary.new_edges += 1;
            }
        }

        tracing::info!(
            "Recorded {} -> {} dependencies",
            from,
            project.dependencies.len()
        );
        summary
    }

    pub fn ingest(&mut self, projects: &[ProjectFacts]) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for project in projects {
            summary.absorb(self.record_project(project));
        }
        summary
    }

    /// Ingest loosely typed records, skipping (and reporting) the malformed ones.
    pub fn ingest_json(&mut self, records: Vec<serde_json::Value>) -> IngestSummary {
        let mut summary = IngestSummary::default();
        for (position, record) in records.into_iter().enumerate() {
            match serde_json::from_value::<ProjectFacts>(record) {
                Ok(project) => summary.absorb(self.record_project(&project)),
                Err(e) => {
                    tracing::warn!("Skipping record {}: {}", position, e);
                    summary.skipped += 1;
                    summary.errors.push(format!("record {position}: {e}"));
                }
            }
        }
        summary
    }

    /// Sorted, distinct scopes that appear on at least one edge.
    pub fn distinct_scopes(&self) -> Vec<String> {
        self.edges
            .iter()
            .filter_map(|edge| edge.scope.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Artifacts whose group or artifact id contains `query`, ignoring case.
    pub fn find_artifacts(&self, query: &str) -> Vec<&ArtifactFact> {
        let needle = query.to_lowercase();
        self.artifacts
            .iter()
            .filter(|artifact| {
                artifact.group_id.to_lowercase().contains(&needle)
                    || artifact.artifact_id.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Load a snapshot. A missing file is an empty store.
    pub fn load(path: &Path) -> Result<Self, FactStoreError> {
        if !path.exists() {
            tracing::info!("No fact snapshot at {}, starting empty", path.display());
            return Ok(FactStore::new());
        }

        let raw = std::fs::read_to_string(path).map_err(|e| FactStoreError::io(path, e))?;
        let snapshot: FactSnapshot =
            serde_json::from_str(&raw).map_err(|e| FactStoreError::json(path, e))?;
        let store = FactStore::from_facts(snapshot.artifacts, snapshot.edges);

        tracing::debug!(
            "Loaded {} artifacts, {} edges from {}",
            store.artifacts.len(),
            store.edges.len(),
            path.display()
        );
        Ok(store)
    }

    /// Write the facts as a JSON snapshot, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), FactStoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| FactStoreError::io(parent, e))?;
        }

        let snapshot = FactSnapshot {
            saved_at: Some(chrono::Utc::now().to_rfc3339()),
            artifacts: self.artifacts.clone(),
            edges: self.edges.clone(),
        };
        let json =
            serde_json::to_string_pretty(&snapshot).map_err(|e| FactStoreError::json(path, e))?;
        std::fs::write(path, json).map_err(|e| FactStoreError::io(path, e))?;

        tracing::debug!("Fact snapshot saved: {}", path.display());
        Ok(())
    }
}

impl FactSource for FactStore {
    fn list_artifacts(&self) -> Vec<ArtifactFact> {
        self.artifacts.clone()
    }

    fn list_edges(&self, scope_filter: Option<&HashSet<String>>) -> Vec<EdgeFact> {
        self.edges
            .iter()
            .filter(|edge| scope_matches(edge, scope_filter))
            .cloned()
            .collect()
    }
}
