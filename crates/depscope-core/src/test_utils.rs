//! Test fixtures for Depscope

use crate::facts::{DeclaredDependency, FactStore, ProjectFacts};
use crate::model::{ArtifactFact, EdgeFact, Gav};
use std::path::PathBuf;
use tempfile::TempDir;

/// A project with dependencies given as `(gav, scope)`.
pub fn project(owner: &str, deps: &[(&str, &str)]) -> ProjectFacts {
    ProjectFacts {
        project: Gav::parse(owner),
        dependencies: deps
            .iter()
            .map(|(gav, scope)| DeclaredDependency {
                gav: Gav::parse(gav),
                scope: Some(scope.to_string()),
                optional: None,
            })
            .collect(),
    }
}

/// spring-core and its single runtime dependency.
pub fn spring_core_store() -> FactStore {
    let mut store = FactStore::new();
    store.record_project(&project(
        "org.springframework:spring-core:6.2.15",
        &[("org.springframework:spring-jcl:6.2.15", "compile")],
    ));
    store
}

/// Two application versions over a shared library stack.
///
/// ```text
/// acme:web:2.0 ──compile──▶ acme:service:2.0 ──compile──▶ acme:model:1.1
///      │                         │
///      └──test──▶ junit:junit:4.13 ◀──test──┘
/// acme:web:1.0 ──compile──▶ acme:service:1.0 ──compile──▶ acme:model:1.0
/// acme:batch:1.0 ──runtime──▶ acme:service:2.0
/// ```
pub fn layered_store() -> FactStore {
    let mut store = FactStore::new();
    store.ingest(&[
        project(
            "acme:web:2.0",
            &[("acme:service:2.0", "compile"), ("junit:junit:4.13", "test")],
        ),
        project(
            "acme:service:2.0",
            &[("acme:model:1.1", "compile"), ("junit:junit:4.13", "test")],
        ),
        project("acme:web:1.0", &[("acme:service:1.0", "compile")]),
        project("acme:service:1.0", &[("acme:model:1.0", "compile")]),
        project("acme:batch:1.0", &[("acme:service:2.0", "runtime")]),
    ]);
    store
}

/// Raw facts exactly as given, including unscoped edges and unlisted endpoints.
pub fn raw_store(artifacts: &[&str], edges: &[EdgeFact]) -> FactStore {
    FactStore::from_facts(
        artifacts.iter().map(|gav| ArtifactFact::from_gav(gav)),
        edges.iter().cloned(),
    )
}

/// Save `store` into a fresh temporary directory.
pub fn snapshot_in_tempdir(store: &FactStore) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("facts.json");
    store.save(&path).unwrap();
    (dir, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layered_store_shape() {
        let store = layered_store();
        assert_eq!(store.artifacts().len(), 8);
        assert_eq!(store.edges().len(), 7);
    }

    #[test]
    fn test_snapshot_in_tempdir() {
        let (_dir, path) = snapshot_in_tempdir(&spring_core_store());
        assert!(path.exists());
    }
}
