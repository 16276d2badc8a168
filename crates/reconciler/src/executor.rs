//! Corrective file actions.

use std::cmp::Ordering;
use std::path::Path;

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tracing::{debug, warn};
use ulid::Ulid;

use crate::error::{Error, Result};

/// What to do when the directory holds more entries than the target.
///
/// The legacy controller created files on both sides of the drift. Deleting
/// on surplus is the corrected behavior and must be opted into explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SurplusAction {
    /// Create one new file per surplus entry (legacy behavior).
    #[default]
    CreateFiles,
    /// Remove up to one top-level entry per surplus entry. No addressing
    /// rule ties the removals to the measured set.
    RemoveFiles,
}

/// Configuration for the filesystem executor.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Surplus-branch policy.
    pub surplus_action: SurplusAction,
    /// Prefix for created file names; a ULID suffix keeps every name unique.
    pub file_prefix: String,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            surplus_action: SurplusAction::default(),
            file_prefix: "tally-".to_string(),
        }
    }
}

/// Trait for executing corrective actions against a directory.
#[async_trait]
pub trait ActionExecutor: Send + Sync {
    /// Close the gap between `observed` and `target` entries in `directory`.
    async fn reconcile_count(&self, directory: &Path, observed: u64, target: u64) -> Result<()>;
}

/// Filesystem-backed action executor.
#[derive(Debug, Default)]
pub struct FileActionExecutor {
    config: ExecutorConfig,
}

impl FileActionExecutor {
    /// Create an executor with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an executor with a custom configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        Self { config }
    }

    async fn create_files(&self, directory: &Path, n: u64) -> Result<()> {
        for _ in 0..n {
            let path = directory.join(format!("{}{}", self.config.file_prefix, Ulid::new()));

            // create_new: a name collision must error, never truncate
            // unrelated data. The handle is scoped to this iteration, so it
            // is closed on every exit path.
            let file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
                .map_err(|e| Error::correction(&path, e))?;
            drop(file);

            debug!(path = %path.display(), "Created file");
        }
        Ok(())
    }

    async fn remove_files(&self, directory: &Path, n: u64) -> Result<()> {
        let mut removed: u64 = 0;
        let mut entries = fs::read_dir(directory)
            .await
            .map_err(|e| Error::correction(directory, e))?;

        while removed < n {
            let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| Error::correction(directory, e))?
            else {
                break;
            };

            let file_type = entry
                .file_type()
                .await
                .map_err(|e| Error::correction(entry.path(), e))?;
            if file_type.is_dir() {
                continue;
            }

            fs::remove_file(entry.path())
                .await
                .map_err(|e| Error::correction(entry.path(), e))?;
            debug!(path = %entry.path().display(), "Removed file");
            removed += 1;
        }

        if removed < n {
            warn!(removed, surplus = n, "Fewer removable entries than surplus");
        }
        Ok(())
    }
}

#[async_trait]
impl ActionExecutor for FileActionExecutor {
    async fn reconcile_count(&self, directory: &Path, observed: u64, target: u64) -> Result<()> {
        match observed.cmp(&target) {
            Ordering::Equal => Ok(()),
            Ordering::Less => self.create_files(directory, target - observed).await,
            Ordering::Greater => match self.config.surplus_action {
                SurplusAction::CreateFiles => {
                    self.create_files(directory, observed - target).await
                }
                SurplusAction::RemoveFiles => {
                    self.remove_files(directory, observed - target).await
                }
            },
        }
    }
}
