//! Error types for the reconciler crate.
//!
//! Every variant is transient: the filesystem or the store may become
//! reachable again, so the dispatcher answers any error with retry plus
//! backoff. No fatal condition exists at this layer. A deleted resource is
//! not an error at all; the engine reports it as a skipped pass.

use std::path::PathBuf;

use thiserror::Error;

use tally_resource::ResourceId;

/// Result type alias for reconciler operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Reconciler error types.
#[derive(Debug, Error)]
pub enum Error {
    /// Counting entries under the directory failed.
    #[error("failed to measure '{path}': {source}")]
    Measurement {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Creating or removing files failed.
    #[error("failed to correct '{path}': {source}")]
    Correction {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the observed count back to the store failed.
    #[error("failed to persist status for '{id}': {source}")]
    Persist {
        id: ResourceId,
        #[source]
        source: tally_resource::Error,
    },

    /// Fetching the resource from the store failed.
    #[error(transparent)]
    Store(#[from] tally_resource::Error),

    /// Invalid engine configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl Error {
    /// Create a measurement error.
    pub fn measurement(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Measurement {
            path: path.into(),
            source,
        }
    }

    /// Create a correction error.
    pub fn correction(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Correction {
            path: path.into(),
            source,
        }
    }

    /// Create a persist error.
    pub fn persist(id: ResourceId, source: tally_resource::Error) -> Self {
        Self::Persist { id, source }
    }

    /// Create an invalid config error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}
