//! Renderer-neutral element list (Cytoscape-style `data` / `classes` records)

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::graph::DependencyGraph;
use crate::model::{AGGREGATED_VERSION, Gav};
use crate::traversal::{self, Direction};

/// Display tag attached to a node element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    /// The query root.
    Root,
    /// Transitively depends on the root (reverse queries only).
    Highlight,
    /// Identity hides the version, or was collapsed to a bare artifact id.
    Aggregated,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::Root => "root",
            NodeClass::Highlight => "highlight",
            NodeClass::Aggregated => "aggregated",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeElement {
    pub data: NodeData,
    #[serde(serialize_with = "join_classes")]
    pub classes: Vec<NodeClass>,
}

impl NodeElement {
    pub fn has_class(&self, class: NodeClass) -> bool {
        self.classes.contains(&class)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub scope: String,
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EdgeElement {
    pub data: EdgeData,
}

/// One entry of the projected element list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Element {
    Node(NodeElement),
    Edge(EdgeElement),
}

impl Element {
    pub fn id(&self) -> &str {
        match self {
            Element::Node(node) => &node.data.id,
            Element::Edge(edge) => &edge.data.id,
        }
    }

    pub fn as_node(&self) -> Option<&NodeElement> {
        match self {
            Element::Node(node) => Some(node),
            Element::Edge(_) => None,
        }
    }

    pub fn as_edge(&self) -> Option<&EdgeElement> {
        match self {
            Element::Edge(edge) => Some(edge),
            Element::Node(_) => None,
        }
    }
}

#[allow(clippy::ptr_arg)]
fn join_classes<S: Serializer>(classes: &Vec<NodeClass>, serializer: S) -> Result<S::Ok, S::Error> {
    let joined = classes
        .iter()
        .map(|class| class.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    serializer.serialize_str(&joined)
}

/// An identity with no `:` was collapsed to a bare artifact id.
pub fn is_aggregated_id(id: &str) -> bool {
    !id.contains(':')
}

fn node_data(id: &str) -> NodeData {
    let (group_id, artifact_id, version) = if is_aggregated_id(id) {
        (id.to_string(), id.to_string(), AGGREGATED_VERSION.to_string())
    } else {
        let gav = Gav::parse(id);
        (gav.group_id, gav.artifact_id, gav.version)
    };
    NodeData {
        id: id.to_string(),
        label: id.to_string(),
        group_id,
        artifact_id,
        version,
    }
}

/// Render `graph` into nodes (in graph order) followed by edges (in graph order).
///
/// With `visible`, only member nodes and edges with both ends in the set are
/// emitted.
pub fn project(
    graph: &DependencyGraph,
    root_id: Option<&str>,
    direction: Direction,
    show_version: bool,
    visible: Option<&HashSet<String>>,
) -> Vec<Element> {
    let highlight = match root_id {
        Some(root) if direction == Direction::Reverse && graph.contains_node(root) => {
            traversal::ancestors(graph, root)
        }
        _ => HashSet::new(),
    };
    let is_visible = |id: &str| visible.is_none_or(|set| set.contains(id));

    let mut elements = Vec::with_capacity(graph.node_count() + graph.edge_count());

    for id in graph.nodes() {
        if !is_visible(id) {
            continue;
        }
        let mut classes = Vec::new();
        if root_id == Some(id) {
            classes.push(NodeClass::Root);
        }
        if highlight.contains(id) {
            classes.push(NodeClass::Highlight);
        }
        if !show_version || is_aggregated_id(id) {
            classes.push(NodeClass::Aggregated);
        }
        elements.push(Element::Node(NodeElement {
            data: node_data(id),
            classes,
        }));
    }

    for edge in graph.edges() {
        if !is_visible(edge.source()) || !is_visible(edge.target()) {
            continue;
        }
        // Parallel atomic edges (same endpoints, different scope or optional)
        // share this id. Collapsed views merge them into one edge.
        elements.push(Element::Edge(EdgeElement {
            data: EdgeData {
                id: format!("{}__{}", edge.source(), edge.target()),
                source: edge.source().to_string(),
                target: edge.target().to_string(),
                scope: edge.data().scope().to_string(),
                optional: edge.data().is_optional(),
            },
        }));
    }

    elements
}
