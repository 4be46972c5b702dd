//! Error types for configuration loading and engine faults
//!
//! Missing assets are never errors (bodies fall back to fixed boxes); these
//! variants cover bad data files and broken invariants that end a run.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GameError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid tuning: {0}")]
    Tuning(String),

    #[error("invalid replay: {0}")]
    Replay(String),

    #[error("teleport needs at least 2 spots, level defines {count}")]
    TeleportSpots { count: usize },
}

impl GameError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.into(),
            source,
        }
    }
}
