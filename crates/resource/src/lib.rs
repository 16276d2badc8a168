//! Resource model and store surface for file-count reconciliation.
//!
//! A `FileCount` resource pairs one directory with one declared file count:
//!
//! - **Spec** ([`FileCountSpec`]): the directory path and the target count,
//!   owned by an external actor
//! - **Status** ([`FileCountStatus`]): the last count the engine measured
//!
//! The [`ResourceStore`] trait is the narrow interface the reconciliation
//! engine consumes; [`InMemoryResourceStore`] backs tests and embedded use,
//! and [`TracingResourceStore`] decorates any backend with structured logs.
//!
//! All durable state lives behind the store. The engine keeps no cache of
//! desired or observed state, so the store stays the single source of truth.

pub mod error;
pub mod store;
pub mod types;

// Re-export main types
pub use error::{Error, Result};
pub use store::{InMemoryResourceStore, ResourceStore, TracingResourceStore};
pub use types::{FileCount, FileCountSpec, FileCountStatus, ResourceId};
