//! Error types for fact store I/O
//!
//! The graph engine itself is total and has no error type. Only loading and
//! saving fact snapshots can fail.

use std::path::PathBuf;
use thiserror::Error;

/// Failure reading or writing a fact snapshot file.
#[derive(Debug, Error)]
pub enum FactStoreError {
    /// File system operation failed
    #[error("cannot access fact snapshot {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot contents are not valid JSON for the expected shape
    #[error("invalid fact snapshot {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl FactStoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FactStoreError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        FactStoreError::Json {
            path: path.into(),
            source,
        }
    }
}
