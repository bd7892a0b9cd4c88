//! Query pipeline: build → aggregate → traverse → project
//!
//! Every call builds its graphs fresh from the fact source and drops them
//! when the response is assembled. Nothing is cached between queries.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::aggregation::{aggregate, project_identity};
use crate::builder::{FactSource, build_atomic};
use crate::elements::{Element, project};
use crate::model::{ArtifactFact, DEFAULT_SCOPE};
use crate::traversal::{Direction, reachable};

/// Default row cap for listing endpoints.
pub const DEFAULT_LIMIT: usize = 500;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_true() -> bool {
    true
}

/// Parameters of a graph view request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQuery {
    #[serde(default)]
    pub root_id: Option<String>,
    #[serde(default)]
    pub direction: Direction,
    #[serde(default = "default_true")]
    pub show_group: bool,
    #[serde(default = "default_true")]
    pub show_version: bool,
    #[serde(default)]
    pub depth: Option<usize>,
    #[serde(default, rename = "scope")]
    pub scopes: Vec<String>,
}

impl Default for GraphQuery {
    fn default() -> Self {
        GraphQuery {
            root_id: None,
            direction: Direction::Forward,
            show_group: true,
            show_version: true,
            depth: None,
            scopes: Vec::new(),
        }
    }
}

impl GraphQuery {
    pub fn rooted(root_id: impl Into<String>) -> Self {
        GraphQuery {
            root_id: Some(root_id.into()),
            ..GraphQuery::default()
        }
    }

    fn collapses(&self) -> bool {
        !self.show_group || !self.show_version
    }
}

/// Projected elements plus the counts shown alongside them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphData {
    pub elements: Vec<Element>,
    /// Visible nodes when a root was resolved, otherwise every node.
    pub node_count: usize,
    /// Edges of the projected graph, before visibility filtering.
    pub edge_count: usize,
}

/// Run the full graph pipeline against one fact snapshot.
pub fn run_graph_query<S>(source: &S, query: &GraphQuery) -> GraphData
where
    S: FactSource + ?Sized,
{
    let scope_filter: HashSet<String> = query.scopes.iter().cloned().collect();
    let atomic = build_atomic(source, Some(&scope_filter));

    let (graph, root_id) = if query.collapses() {
        let root_id = query
            .root_id
            .as_deref()
            .map(|root| project_identity(root, query.show_group, query.show_version));
        (
            aggregate(&atomic, query.show_group, query.show_version),
            root_id,
        )
    } else {
        (atomic, query.root_id.clone())
    };

    let visible = root_id
        .as_deref()
        .filter(|root| graph.contains_node(root))
        .map(|root| reachable(&graph, root, query.direction, query.depth));

    let elements = project(
        &graph,
        root_id.as_deref(),
        query.direction,
        query.show_version,
        visible.as_ref(),
    );
    let node_count = visible
        .as_ref()
        .map_or_else(|| graph.node_count(), HashSet::len);

    tracing::debug!(
        "Graph query root={:?} direction={} depth={:?}: {} elements",
        root_id,
        query.direction,
        query.depth,
        elements.len()
    );

    GraphData {
        elements,
        node_count,
        edge_count: graph.edge_count(),
    }
}

/// First `limit` artifacts of the snapshot.
pub fn list_artifacts<S>(source: &S, limit: usize) -> Vec<ArtifactFact>
where
    S: FactSource + ?Sized,
{
    source.list_artifacts().into_iter().take(limit).collect()
}

/// Filters for the flat dependency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyTableQuery {
    /// Substring of either artifact id, case-insensitive.
    #[serde(default)]
    pub q: Option<String>,
    /// Substring of either group id, case-insensitive.
    #[serde(default)]
    pub group_q: Option<String>,
    #[serde(default, rename = "scope")]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub ignore_version: bool,
    #[serde(default)]
    pub ignore_group: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for DependencyTableQuery {
    fn default() -> Self {
        DependencyTableQuery {
            q: None,
            group_q: None,
            scopes: Vec::new(),
            ignore_version: false,
            ignore_group: false,
            limit: DEFAULT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyRow {
    pub from_gav: String,
    pub from_group: String,
    pub from_artifact: String,
    pub from_version: String,
    pub to_gav: String,
    pub to_group: String,
    pub to_artifact: String,
    pub to_version: String,
    pub scope: String,
}

/// Raw coordinate split for display: missing parts stay empty.
fn split_columns(gav: &str) -> (String, String, String) {
    let mut parts = gav.splitn(3, ':');
    let mut next = || parts.next().unwrap_or_default().to_string();
    let group = next();
    let artifact = next();
    let version = next();
    (group, artifact, version)
}

fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// One row per dependency fact, in source order, filtered and capped.
pub fn dependency_table<S>(source: &S, query: &DependencyTableQuery) -> Vec<DependencyRow>
where
    S: FactSource + ?Sized,
{
    let artifact_needle = query
        .q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);
    let group_needle = query
        .group_q
        .as_deref()
        .filter(|q| !q.is_empty())
        .map(str::to_lowercase);

    let mut rows = Vec::new();
    for edge in source.list_edges(None) {
        if rows.len() >= query.limit {
            break;
        }

        let (from_group, from_artifact, from_version) = split_columns(&edge.from);
        let (to_group, to_artifact, to_version) = split_columns(&edge.to);

        if let Some(needle) = &artifact_needle {
            if !contains_ignore_case(&from_artifact, needle)
                && !contains_ignore_case(&to_artifact, needle)
            {
                continue;
            }
        }
        if let Some(needle) = &group_needle {
            if !contains_ignore_case(&from_group, needle) && !contains_ignore_case(&to_group, needle)
            {
                continue;
            }
        }
        // Unscoped edges are never filtered out by scope
        if let Some(scope) = &edge.scope {
            if !query.scopes.is_empty() && !query.scopes.contains(scope) {
                continue;
            }
        }

        let blank_group = |value: String| if query.ignore_group { String::new() } else { value };
        let blank_version = |value: String| if query.ignore_version { String::new() } else { value };

        rows.push(DependencyRow {
            scope: edge.scope.clone().unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
            from_gav: edge.from,
            from_group: blank_group(from_group),
            from_artifact,
            from_version: blank_version(from_version),
            to_gav: edge.to,
            to_group: blank_group(to_group),
            to_artifact,
            to_version: blank_version(to_version),
        });
    }
    rows
}
