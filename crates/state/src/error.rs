//! Error types for state persistence

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the fallible persistence and configuration helpers.
///
/// [`AppState`](crate::AppState) logs these and falls back to defaults or
/// in-memory state; only [`AppState::try_flush`](crate::AppState::try_flush)
/// returns a write failure to its caller.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed state document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("state document root must be a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("attribute {key} has the wrong type: {source}")]
    AttributeType {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl StateError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for state operations
pub type Result<T> = std::result::Result<T, StateError>;
