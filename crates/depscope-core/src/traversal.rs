//! Direction-aware, depth-bounded reachability
//!
//! All walks use an explicit worklist and a visited set, so they terminate on
//! cyclic graphs and never recurse on the native stack.

use std::collections::{HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use crate::graph::Graph;

/// Which way to follow edges from the root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// What the root depends on.
    #[default]
    Forward,
    /// What depends on the root.
    Reverse,
}

impl Direction {
    /// Lenient parse: `"reverse"` selects [`Direction::Reverse`], anything else is forward.
    pub fn parse(value: &str) -> Self {
        if value == "reverse" {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Forward => "forward",
            Direction::Reverse => "reverse",
        }
    }
}

impl From<&str> for Direction {
    fn from(value: &str) -> Self {
        Direction::parse(value)
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Direction::parse(&raw))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn step<'g, E>(graph: &'g Graph<E>, node: &str, direction: Direction) -> Vec<&'g str> {
    match direction {
        Direction::Forward => graph.successors(node).collect(),
        Direction::Reverse => graph.predecessors(node).collect(),
    }
}

/// Nodes reachable from `root` in `direction`, bounded by `depth` hops when given.
///
/// The result always contains `root`. A root that is not in the graph yields
/// the full vertex set instead of an error.
pub fn reachable<E>(
    graph: &Graph<E>,
    root: &str,
    direction: Direction,
    depth: Option<usize>,
) -> HashSet<String> {
    if !graph.contains_node(root) {
        tracing::debug!("Root {} not in graph, returning all {} nodes", root, graph.node_count());
        return graph.nodes().map(str::to_string).collect();
    }

    let mut result = match depth {
        None => closure(graph, root, direction),
        Some(limit) => within_depth(graph, root, direction, limit),
    };
    result.insert(root.to_string());
    result
}

/// Every node that transitively depends on `root`.
///
/// `root` itself is only included when it sits on a cycle.
pub fn ancestors<E>(graph: &Graph<E>, root: &str) -> HashSet<String> {
    closure(graph, root, Direction::Reverse)
}

/// Every node `root` transitively depends on.
///
/// `root` itself is only included when it sits on a cycle.
pub fn descendants<E>(graph: &Graph<E>, root: &str) -> HashSet<String> {
    closure(graph, root, Direction::Forward)
}

fn closure<E>(graph: &Graph<E>, root: &str, direction: Direction) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack: Vec<&str> = vec![root];

    while let Some(current) = stack.pop() {
        for next in step(graph, current, direction) {
            if visited.insert(next.to_string()) {
                stack.push(next);
            }
        }
    }

    visited
}

fn within_depth<E>(
    graph: &Graph<E>,
    root: &str,
    direction: Direction,
    limit: usize,
) -> HashSet<String> {
    let mut visited: HashSet<String> = HashSet::new();
    visited.insert(root.to_string());
    let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(root, 0)]);

    while let Some((current, distance)) = queue.pop_front() {
        if distance >= limit {
            continue;
        }
        for next in step(graph, current, direction) {
            if visited.insert(next.to_string()) {
                queue.push_back((next, distance + 1));
            }
        }
    }

    visited
}
