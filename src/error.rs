//! Error kinds surfaced by the pipeline.
//!
//! Per-row timestamp failures and per-cell number failures never show up here: they are
//! recovered where they happen (row dropped, value missing).

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file missing, unreadable, or not a semicolon-delimited table.
    #[error("failed to load {}: {source:#}", path.display())]
    LoadFailure {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// No source produced a usable table.
    #[error("no data available: every source failed to load")]
    NoDataAvailable,

    #[error("failed to write {}: {source:#}", path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("invalid configuration {}: {source:#}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}
