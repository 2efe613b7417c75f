//! # Error taxonomy
//!
//! Only configuration and sink failures escalate to the process. Probe failures and
//! timeouts never show up here: they are recovered per task and become outcomes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems detected before any task is scheduled.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{kind} list '{}' contains no entries", path.display())]
    EmptyList { kind: &'static str, path: PathBuf },

    #[error("{kind} list is empty")]
    EmptyInput { kind: &'static str },

    #[error("cannot read {kind} list '{}': {source}", path.display())]
    UnreadableList {
        kind: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("handshake probe unavailable ({program}): {reason}")]
    ProbeUnavailable { program: String, reason: String },

    #[error("worker count must be between 1 and {}", crate::config::MAX_WORKERS)]
    InvalidWorkers,

    #[error("per-task timeout must be greater than zero")]
    InvalidTimeout,

    #[error("cannot prepare output directory '{}': {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures of the aggregation sink. Outcomes are never dropped silently,
/// so every one of these aborts the run.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to write {stream} stream: {source}")]
    Write {
        stream: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("aggregation sink stopped before all outcomes were persisted")]
    Closed,
}

impl SinkError {
    pub fn write(stream: &'static str, source: io::Error) -> Self {
        Self::Write { stream, source }
    }
}

#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("scan worker failed: {0}")]
    Worker(String),

    #[error("scan interrupted after {completed} of {total} tasks")]
    Interrupted { completed: usize, total: usize },
}
