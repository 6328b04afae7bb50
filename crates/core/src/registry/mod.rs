//! Series registry persistence.
//!
//! The registry is a single pretty-printed JSON array of [`SeriesEntry`]
//! objects. Writes go through a timestamped backup and an atomic
//! temp-file rename, so the file on disk always parses.

mod store;
mod types;

pub use store::JsonRegistryStore;
pub use types::*;

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or saving the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file exists but is not a JSON array.
    #[error("Registry file {path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The pre-write backup copy could not be made.
    #[error("Failed to back up registry to {path}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to serialize entries.
    #[error("Failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    /// I/O error while reading or replacing the registry.
    #[error("Registry I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RegistryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
