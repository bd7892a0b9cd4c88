//! Graph wrapper using petgraph::StableDiGraph keyed by node identity strings

use crate::model::DependencyEdge;
use petgraph::Direction;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef as _;
use std::collections::HashMap;

/// Atomic and aggregated graphs share this type; only the identity space differs.
pub type DependencyGraph = Graph<DependencyEdge>;

/// A directed multigraph over string identities, generic over the edge payload.
///
/// Nodes and edges iterate in insertion order. Nothing is ever removed, so the
/// stable indices stay dense.
pub struct Graph<E> {
    inner: StableDiGraph<String, E>,
    index: HashMap<String, NodeIndex>,
}

/// Borrowed view of one edge with its endpoint identities.
#[derive(Debug)]
pub struct EdgeRef<'a, E> {
    source: &'a str,
    target: &'a str,
    data: &'a E,
}

impl<'a, E> EdgeRef<'a, E> {
    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn target(&self) -> &'a str {
        self.target
    }

    pub fn data(&self) -> &'a E {
        self.data
    }
}

impl<E> Clone for EdgeRef<'_, E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for EdgeRef<'_, E> {}

impl<E> std::fmt::Debug for Graph<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Graph")
            .field("node_count", &self.inner.node_count())
            .field("edge_count", &self.inner.edge_count())
            .finish()
    }
}

impl<E> Graph<E> {
    pub fn new() -> Self {
        Graph {
            inner: StableDiGraph::new(),
            index: HashMap::new(),
        }
    }

    /// Add a node unless it already exists. Returns its index either way.
    pub fn add_node(&mut self, id: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.inner.add_node(id.to_string());
        self.index.insert(id.to_string(), idx);
        idx
    }

    /// Add a directed edge, creating missing endpoints.
    pub fn add_edge(&mut self, from: &str, to: &str, data: E) -> EdgeIndex {
        let source = self.add_node(from);
        let target = self.add_node(to);
        self.inner.add_edge(source, target, data)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over node identities in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.inner
            .node_indices()
            .filter_map(move |idx| self.inner.node_weight(idx))
            .map(String::as_str)
    }

    /// Iterate over edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef<'_, E>> {
        self.inner.edge_indices().filter_map(move |idx| {
            let (source, target) = self.inner.edge_endpoints(idx)?;
            Some(EdgeRef {
                source: self.inner.node_weight(source)?,
                target: self.inner.node_weight(target)?,
                data: self.inner.edge_weight(idx)?,
            })
        })
    }

    /// Targets of the outgoing edges of `id`. Empty for an unknown node.
    pub fn successors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Sources of the incoming edges of `id`. Empty for an unknown node.
    pub fn predecessors(&self, id: &str) -> impl Iterator<Item = &str> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: &str, direction: Direction) -> impl Iterator<Item = &str> {
        self.index
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.inner.edges_directed(idx, direction))
            .filter_map(move |edge_ref| {
                let other = match direction {
                    Direction::Outgoing => edge_ref.target(),
                    Direction::Incoming => edge_ref.source(),
                };
                self.inner.node_weight(other).map(String::as_str)
            })
    }

    /// Payload of the first edge from `from` to `to`, if any.
    pub fn find_edge(&self, from: &str, to: &str) -> Option<&E> {
        let source = *self.index.get(from)?;
        let target = *self.index.get(to)?;
        let idx = self.inner.find_edge(source, target)?;
        self.inner.edge_weight(idx)
    }
}

impl<E> Default for Graph<E> {
    fn default() -> Self {
        Self::new()
    }
}
