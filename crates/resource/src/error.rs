//! Error types for the resource store.

use thiserror::Error;

use crate::types::ResourceId;

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Resource store error types.
///
/// A missing resource is not an error: `ResourceStore::get` returns
/// `Ok(None)` for it. Both variants here are transient from the caller's
/// point of view.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A concurrent writer won, or the object vanished mid-update.
    #[error("conflicting update for '{id}': {reason}")]
    Conflict { id: ResourceId, reason: String },

    /// A store operation failed.
    #[error("store operation '{operation}' failed: {reason}")]
    StoreFailed { operation: String, reason: String },
}

impl Error {
    /// Create a conflict error.
    pub fn conflict(id: ResourceId, reason: impl Into<String>) -> Self {
        Self::Conflict {
            id,
            reason: reason.into(),
        }
    }

    /// Create a store failed error.
    pub fn store_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StoreFailed {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_display() {
        let id = ResourceId::new("default", "scratch");
        let err = Error::conflict(id, "resource version changed");
        assert!(err.to_string().contains("default/scratch"));
        assert!(err.to_string().contains("resource version changed"));
    }

    #[test]
    fn test_store_failed_display() {
        let err = Error::store_failed("apply", "backend unavailable");
        assert!(err.to_string().contains("apply"));
        assert!(err.to_string().contains("backend unavailable"));
    }
}
