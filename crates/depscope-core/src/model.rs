//! Core data structures for the dependency graph

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Placeholder for any missing coordinate component.
pub const UNKNOWN: &str = "Unknown";

/// Scope assumed for an edge that carries none.
pub const DEFAULT_SCOPE: &str = "compile";

/// Version marker shown for nodes collapsed down to a bare artifact id.
pub const AGGREGATED_VERSION: &str = "(aggregated)";

/// Artifact coordinates: group, artifact, version.
///
/// Missing and empty components are both stored as [`UNKNOWN`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Gav {
    #[serde(default = "unknown", deserialize_with = "component")]
    pub group_id: String,
    #[serde(default = "unknown", deserialize_with = "component")]
    pub artifact_id: String,
    #[serde(default = "unknown", deserialize_with = "component")]
    pub version: String,
}

fn unknown() -> String {
    UNKNOWN.to_string()
}

fn or_unknown(part: String) -> String {
    if part.is_empty() { unknown() } else { part }
}

fn component<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(or_unknown)
}

impl Gav {
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Gav {
            group_id: or_unknown(group_id.into()),
            artifact_id: or_unknown(artifact_id.into()),
            version: or_unknown(version.into()),
        }
    }

    /// Parse `group:artifact:version`.
    ///
    /// Splits on `:` into at most three parts, so any further colons stay in
    /// the version. Missing or empty parts become [`UNKNOWN`]; parsing never
    /// fails.
    pub fn parse(gav: &str) -> Self {
        let mut parts = gav.splitn(3, ':');
        let mut next = || parts.next().unwrap_or_default();
        let group_id = next();
        let artifact_id = next();
        let version = next();
        Gav::new(group_id, artifact_id, version)
    }

    /// Canonical `group:artifact:version` form.
    pub fn compact(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// One artifact as supplied by a fact source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactFact {
    pub gav: String,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
}

impl ArtifactFact {
    /// Build from components; the canonical gav is derived.
    pub fn of(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        let coords = Gav::new(group_id, artifact_id, version);
        ArtifactFact {
            gav: coords.compact(),
            group_id: coords.group_id,
            artifact_id: coords.artifact_id,
            version: coords.version,
        }
    }

    pub fn from_gav(gav: &str) -> Self {
        let coords = Gav::parse(gav);
        ArtifactFact::of(coords.group_id, coords.artifact_id, coords.version)
    }

    pub fn coords(&self) -> Gav {
        Gav::new(&self.group_id, &self.artifact_id, &self.version)
    }
}

impl From<&Gav> for ArtifactFact {
    fn from(gav: &Gav) -> Self {
        ArtifactFact::of(&gav.group_id, &gav.artifact_id, &gav.version)
    }
}

/// A dependency fact: `from` depends on `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeFact {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub optional: Option<bool>,
}

impl EdgeFact {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        EdgeFact {
            from: from.into(),
            to: to.into(),
            scope: None,
            optional: None,
        }
    }

    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn with_optional(mut self, optional: bool) -> Self {
        self.optional = Some(optional);
        self
    }
}

/// Payload carried by an edge in either the atomic or the aggregated graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DependencyEdge {
    /// A single dependency fact, copied as-is.
    Atomic {
        scope: Option<String>,
        optional: Option<bool>,
    },
    /// Several facts merged under an identity projection.
    Aggregated { scope: String, optional_any: bool },
}

impl DependencyEdge {
    pub fn atomic(scope: Option<String>, optional: Option<bool>) -> Self {
        DependencyEdge::Atomic { scope, optional }
    }

    /// Scope label, [`DEFAULT_SCOPE`] when absent.
    pub fn scope(&self) -> &str {
        match self {
            DependencyEdge::Atomic { scope, .. } => scope.as_deref().unwrap_or(DEFAULT_SCOPE),
            DependencyEdge::Aggregated { scope, .. } => scope,
        }
    }

    /// Optional flag; unknown counts as `false`.
    pub fn is_optional(&self) -> bool {
        match self {
            DependencyEdge::Atomic { optional, .. } => optional.unwrap_or(false),
            DependencyEdge::Aggregated { optional_any, .. } => *optional_any,
        }
    }
}

impl From<&EdgeFact> for DependencyEdge {
    fn from(fact: &EdgeFact) -> Self {
        DependencyEdge::atomic(fact.scope.clone(), fact.optional)
    }
}
