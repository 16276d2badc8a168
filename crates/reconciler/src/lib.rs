//! K8s-style reconciliation engine for directory file counts.
//!
//! This crate implements a reconciliation pattern inspired by Kubernetes:
//!
//! - **Desired State**: a target file count declared in a persisted resource
//! - **Actual State**: measured by walking the resource's directory
//! - **Diff**: compare the measured count with the declared target
//! - **Actions**: create (or optionally remove) files to converge
//!
//! # Pass lifecycle
//!
//! One call to `Reconciler::reconcile` runs a single pass:
//! 1. Fetch the resource; a deleted resource ends the pass with nothing done
//! 2. Count non-directory entries under the spec's directory
//! 3. Stop if the count already matches the target
//! 4. Ask the [`ActionExecutor`] to close the gap
//! 5. Persist the pre-correction count as the observed status
//!
//! The dispatcher that triggers passes is external. Every error this crate
//! returns is transient, and the dispatcher answers it with retry plus
//! backoff; a clean outcome with no requeue hint means "wait for the next
//! triggering event".
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use tally_reconciler::{Reconciler, ReconcilerConfig};
//! use tally_resource::{
//!     FileCount, FileCountSpec, InMemoryResourceStore, ResourceId, ResourceStore,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = InMemoryResourceStore::new_arc();
//!     let id = ResourceId::new("default", "scratch");
//!     store
//!         .apply(FileCount::new(
//!             id.clone(),
//!             FileCountSpec::new("/tmp/scratch", 5),
//!         ))
//!         .await?;
//!
//!     let reconciler = Reconciler::with_file_executor(store, ReconcilerConfig::default());
//!     let outcome = reconciler.reconcile(&id).await?;
//!     println!("{outcome:?}");
//!     Ok(())
//! }
//! ```

pub mod counter;
pub mod error;
pub mod executor;
pub mod reconciler;
pub mod types;

// Re-export main types
pub use counter::count_entries;
pub use error::{Error, Result};
pub use executor::{ActionExecutor, ExecutorConfig, FileActionExecutor, SurplusAction};
pub use reconciler::{Reconciler, ReconcilerBuilder, ReconcilerConfig};
pub use types::{Pass, ReconcileOutcome};
