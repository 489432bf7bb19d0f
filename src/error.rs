//! # Error Types
//!
//! Errors raised outside a running batch: job-table loading, report and string
//! table writing. Failures *inside* a batch never surface here; they are
//! recorded per job as [`crate::models::JobOutcome::Failed`].

use std::path::PathBuf;
use thiserror::Error;

pub use crate::config::ConfigurationError;
pub use crate::conversion::ConversionError;

#[derive(Debug, Error)]
pub enum BatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error("Invalid job table '{path}': {reason}")]
    JobTable { path: PathBuf, reason: String },

    #[error("Unknown group '{group}' (available: {available:?})")]
    UnknownGroup {
        group: String,
        available: Vec<String>,
    },

    #[error("I/O error while {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BatchError {
    pub fn job_table<P: Into<PathBuf>, R: std::fmt::Display>(path: P, reason: R) -> Self {
        Self::JobTable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn io<C: Into<String>>(context: C, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, BatchError>;
