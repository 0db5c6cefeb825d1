//! Error types for the file-facing helpers.
//!
//! The search itself never fails: rejected points and empty results are
//! `Option`/status values. Errors only arise when configurations, events or
//! reports are read from or written to disk.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedingError {
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize JSON for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SeedingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedingError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        SeedingError::Json {
            path: path.into(),
            source,
        }
    }
}
