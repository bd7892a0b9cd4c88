//! Node collapsing under group/version visibility toggles

use crate::graph::DependencyGraph;
use crate::model::{DependencyEdge, Gav};
use std::collections::{BTreeSet, HashMap};

/// Map a GAV onto the identity space selected by the two toggles.
///
/// | show_group | show_version | result                    |
/// |------------|--------------|---------------------------|
/// | true       | true         | `gav`, untouched          |
/// | true       | false        | `group:artifact`          |
/// | false      | true         | `artifact:version`        |
/// | false      | false        | `artifact`                |
pub fn project_identity(gav: &str, show_group: bool, show_version: bool) -> String {
    if show_group && show_version {
        return gav.to_string();
    }
    let parsed = Gav::parse(gav);
    match (show_group, show_version) {
        (true, _) => format!("{}:{}", parsed.group_id, parsed.artifact_id),
        (false, true) => format!("{}:{}", parsed.artifact_id, parsed.version),
        (false, false) => parsed.artifact_id,
    }
}

/// Parallel edges collected under one projected (source, target) pair.
struct MergedEdge {
    source: String,
    target: String,
    scopes: BTreeSet<String>,
    optional_any: bool,
}

/// Collapse `atomic` under the identity projection.
///
/// Edges whose endpoints collapse onto the same node are dropped. Remaining
/// edges are merged per (source, target): scopes become the sorted, distinct,
/// `", "`-joined list and the optional flag is OR-ed.
pub fn aggregate(atomic: &DependencyGraph, show_group: bool, show_version: bool) -> DependencyGraph {
    if show_group && show_version {
        return carry_over(atomic);
    }

    let mut out = DependencyGraph::new();
    let mut projected: HashMap<&str, String> = HashMap::with_capacity(atomic.node_count());

    for node in atomic.nodes() {
        let id = project_identity(node, show_group, show_version);
        out.add_node(&id);
        projected.insert(node, id);
    }

    let mut merged: Vec<MergedEdge> = Vec::new();
    let mut slots: HashMap<(&str, &str), usize> = HashMap::new();
    let mut dropped_loops = 0usize;

    for edge in atomic.edges() {
        let (Some(source), Some(target)) =
            (projected.get(edge.source()), projected.get(edge.target()))
        else {
            continue;
        };

        // Collapsing both ends into one node makes a meaningless self-loop
        if source == target {
            dropped_loops += 1;
            continue;
        }

        let slot = *slots
            .entry((source.as_str(), target.as_str()))
            .or_insert_with(|| {
                merged.push(MergedEdge {
                    source: source.clone(),
                    target: target.clone(),
                    scopes: BTreeSet::new(),
                    optional_any: false,
                });
                merged.len() - 1
            });

        let entry = &mut merged[slot];
        entry.scopes.insert(edge.data().scope().to_string());
        entry.optional_any |= edge.data().is_optional();
    }

    for entry in merged {
        let scope = entry.scopes.into_iter().collect::<Vec<_>>().join(", ");
        out.add_edge(
            &entry.source,
            &entry.target,
            DependencyEdge::Aggregated {
                scope,
                optional_any: entry.optional_any,
            },
        );
    }

    tracing::debug!(
        "Aggregated {} -> {} nodes, {} -> {} edges ({} collapsed self-loops)",
        atomic.node_count(),
        out.node_count(),
        atomic.edge_count(),
        out.edge_count(),
        dropped_loops
    );
    out
}

/// Identity projection: every node and every edge survives as-is.
fn carry_over(atomic: &DependencyGraph) -> DependencyGraph {
    let mut out = DependencyGraph::new();
    for node in atomic.nodes() {
        out.add_node(node);
    }
    for edge in atomic.edges() {
        out.add_edge(
            edge.source(),
            edge.target(),
            DependencyEdge::Aggregated {
                scope: edge.data().scope().to_string(),
                optional_any: edge.data().is_optional(),
            },
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomic(edges: &[(&str, &str, Option<&str>, Option<bool>)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for (from, to, scope, optional) in edges {
            graph.add_edge(
                from,
                to,
                DependencyEdge::atomic(scope.map(str::to_string), *optional),
            );
        }
        graph
    }

    #[test]
    fn projection_forms() {
        let gav = "org.slf4j:slf4j-api:2.0.9";
        assert_eq!(project_identity(gav, true, true), gav);
        assert_eq!(project_identity(gav, true, false), "org.slf4j:slf4j-api");
        assert_eq!(project_identity(gav, false, true), "slf4j-api:2.0.9");
        assert_eq!(project_identity(gav, false, false), "slf4j-api");
    }

    #[test]
    fn projection_of_malformed_ids_uses_unknown() {
        assert_eq!(project_identity("lonely", true, false), "lonely:Unknown");
        assert_eq!(project_identity("lonely", false, true), "Unknown:Unknown");
        // Full identity passes malformed input through untouched
        assert_eq!(project_identity("lonely", true, true), "lonely");
    }

    #[test]
    fn merges_scopes_of_collapsed_versions() {
        let graph = atomic(&[
            ("G1:A:1", "G1:B:1", Some("compile"), None),
            ("G1:A:1", "G1:B:2", Some("test"), None),
        ]);
        let out = aggregate(&graph, true, false);

        assert_eq!(out.nodes().collect::<Vec<_>>(), vec!["G1:A", "G1:B"]);
        assert_eq!(out.edge_count(), 1);
        let edge = out.edges().next().unwrap();
        assert_eq!(edge.source(), "G1:A");
        assert_eq!(edge.target(), "G1:B");
        assert_eq!(edge.data().scope(), "compile, test");
        assert!(!edge.data().is_optional());
    }

    #[test]
    fn scopes_are_sorted_deduplicated_and_defaulted() {
        let graph = atomic(&[
            ("g:a:1", "g:b:1", Some("test"), Some(false)),
            ("g:a:2", "g:b:2", None, None),
            ("g:a:3", "g:b:3", Some("compile"), Some(true)),
            ("g:a:3", "g:b:1", Some("provided"), None),
        ]);
        let out = aggregate(&graph, false, false);
        let edge = out.find_edge("a", "b").unwrap();
        assert_eq!(edge.scope(), "compile, provided, test");
        assert!(edge.is_optional());
    }

    #[test]
    fn collapsed_self_loops_are_dropped() {
        let graph = atomic(&[("g:core:1", "g:core:2", Some("compile"), None)]);
        let out = aggregate(&graph, true, false);
        assert_eq!(out.node_count(), 1);
        assert_eq!(out.edge_count(), 0);
    }

    #[test]
    fn full_identity_is_a_round_trip() {
        let graph = atomic(&[
            ("g:a:1", "g:b:1", Some("compile"), None),
            ("g:a:1", "g:b:1", Some("test"), Some(true)),
            ("g:b:1", "g:b:1", None, None),
        ]);
        let out = aggregate(&graph, true, true);

        assert_eq!(
            out.nodes().collect::<Vec<_>>(),
            graph.nodes().collect::<Vec<_>>()
        );
        let original: Vec<_> = graph
            .edges()
            .map(|e| (e.source(), e.target(), e.data().scope(), e.data().is_optional()))
            .collect();
        let carried: Vec<_> = out
            .edges()
            .map(|e| (e.source(), e.target(), e.data().scope(), e.data().is_optional()))
            .collect();
        assert_eq!(original, carried);
    }

    #[test]
    fn collapse_never_grows_the_node_set() {
        let graph = atomic(&[
            ("a:x:1", "b:x:1", Some("compile"), None),
            ("a:y:1", "a:y:2", Some("runtime"), None),
            ("c:z:9", "a:x:1", Some("test"), Some(true)),
        ]);
        for show_group in [true, false] {
            for show_version in [true, false] {
                let out = aggregate(&graph, show_group, show_version);
                assert!(out.node_count() <= graph.node_count());
            }
        }
    }
}
