//! Depscope Core - dependency graph engine for build-artifact facts

pub mod model;
pub mod graph;
pub mod builder;
pub mod aggregation;
pub mod traversal;
pub mod elements;
pub mod facts;
pub mod query;
pub mod error;


#[cfg(test)]
pub mod test_utils;

pub use model::{Gav, ArtifactFact, EdgeFact, DependencyEdge, UNKNOWN, DEFAULT_SCOPE, AGGREGATED_VERSION};
pub use graph::{Graph, DependencyGraph, EdgeRef};
pub use builder::{FactSource, build_atomic};
pub use aggregation::{aggregate, project_identity};
pub use traversal::{Direction, reachable, ancestors, descendants};
pub use elements::{Element, NodeElement, EdgeElement, NodeClass, project};
pub use facts::{FactStore, ProjectFacts, DeclaredDependency, IngestSummary};
pub use query::{GraphQuery, GraphData, DependencyTableQuery, DependencyRow, run_graph_query, dependency_table, list_artifacts};
pub use error::FactStoreError;
