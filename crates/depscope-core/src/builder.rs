//! Atomic graph construction from flat artifact and edge facts

use std::collections::HashSet;

use crate::graph::DependencyGraph;
use crate::model::{ArtifactFact, DependencyEdge, EdgeFact};

/// Supplies the complete artifact and dependency facts for one snapshot.
pub trait FactSource {
    /// Every known artifact.
    fn list_artifacts(&self) -> Vec<ArtifactFact>;

    /// Dependency facts, restricted to `scope_filter` when it is given and non-empty.
    fn list_edges(&self, scope_filter: Option<&HashSet<String>>) -> Vec<EdgeFact>;
}

/// Whether `fact` passes an optional scope filter.
///
/// An empty filter admits everything. A non-empty one never admits an edge
/// without a scope.
pub fn scope_matches(fact: &EdgeFact, scope_filter: Option<&HashSet<String>>) -> bool {
    match scope_filter {
        Some(filter) if !filter.is_empty() => fact
            .scope
            .as_ref()
            .is_some_and(|scope| filter.contains(scope)),
        _ => true,
    }
}

/// Build the atomic graph: one node per GAV, one edge per included fact.
pub fn build_atomic<S>(source: &S, scope_filter: Option<&HashSet<String>>) -> DependencyGraph
where
    S: FactSource + ?Sized,
{
    let scope_filter = scope_filter.filter(|filter| !filter.is_empty());
    let mut graph = DependencyGraph::new();

    for artifact in source.list_artifacts() {
        graph.add_node(&artifact.gav);
    }

    let mut skipped = 0usize;
    for fact in source.list_edges(scope_filter) {
        if !scope_matches(&fact, scope_filter) {
            skipped += 1;
            continue;
        }
        graph.add_edge(&fact.from, &fact.to, DependencyEdge::from(&fact));
    }

    if skipped > 0 {
        tracing::debug!("Fact source ignored scope filter, dropped {} edges", skipped);
    }
    tracing::debug!(
        "Built atomic graph: {} nodes, {} edges",
        graph.node_count(),
        graph.edge_count()
    );
    graph
}
