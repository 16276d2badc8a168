//! Reconciliation engine.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use tally_resource::{FileCountStatus, ResourceId, ResourceStore};

use crate::counter::count_entries;
use crate::error::{Error, Result};
use crate::executor::{ActionExecutor, ExecutorConfig, FileActionExecutor};
use crate::types::ReconcileOutcome;

/// Configuration for the reconciler.
#[derive(Debug, Clone, Default)]
pub struct ReconcilerConfig {
    /// Requeue hint attached to corrected passes. `None` leaves scheduling
    /// entirely to the dispatcher's own triggers.
    pub resync_interval: Option<Duration>,
}

/// Drives one directory toward its declared file count per invocation.
///
/// The engine is stateless across invocations: the store owns all durable
/// state, and each pass re-reads it. The dispatcher decides when a pass
/// runs; an error return is its signal to retry with backoff.
pub struct Reconciler {
    store: Arc<dyn ResourceStore>,
    executor: Arc<dyn ActionExecutor>,
    config: ReconcilerConfig,
}

impl Reconciler {
    /// Create a new reconciler.
    pub fn new(
        store: Arc<dyn ResourceStore>,
        executor: Arc<dyn ActionExecutor>,
        config: ReconcilerConfig,
    ) -> Self {
        Self {
            store,
            executor,
            config,
        }
    }

    /// Create a reconciler with the default filesystem executor.
    pub fn with_file_executor(store: Arc<dyn ResourceStore>, config: ReconcilerConfig) -> Self {
        let executor = Arc::new(FileActionExecutor::new());
        Self::new(store, executor, config)
    }

    /// Run one fetch-measure-compare-correct-persist pass for `id`.
    ///
    /// A resource deleted between trigger and fetch ends the pass
    /// successfully with nothing done. On drift, the count measured
    /// *before* correction is what gets persisted; the next pass
    /// re-measures and converges.
    pub async fn reconcile(&self, id: &ResourceId) -> Result<ReconcileOutcome> {
        let Some(resource) = self.store.get(id).await? else {
            debug!(id = %id, "Resource gone, nothing to reconcile");
            return Ok(ReconcileOutcome::skipped());
        };

        let directory = resource.spec.directory_path;
        let target = resource.spec.max_files;

        let observed = count_entries(&directory).await?;
        debug!(id = %id, observed, target, "Measured directory");

        if observed == target {
            return Ok(ReconcileOutcome::in_sync(observed));
        }

        self.executor
            .reconcile_count(&directory, observed, target)
            .await?;

        // Persist the pre-correction snapshot; corrective side effects are
        // never rolled back, even if this write fails.
        self.store
            .update_status(id, FileCountStatus { num_files: observed })
            .await
            .map_err(|e| Error::persist(id.clone(), e))?;

        info!(id = %id, observed, target, "Corrected drift");
        Ok(ReconcileOutcome::corrected(
            observed,
            target,
            self.config.resync_interval,
        ))
    }

    /// Get the configuration.
    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }
}

/// Builder for [`Reconciler`].
pub struct ReconcilerBuilder {
    store: Option<Arc<dyn ResourceStore>>,
    executor: Option<Arc<dyn ActionExecutor>>,
    config: ReconcilerConfig,
    executor_config: ExecutorConfig,
}

impl ReconcilerBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            store: None,
            executor: None,
            config: ReconcilerConfig::default(),
            executor_config: ExecutorConfig::default(),
        }
    }

    /// Set the resource store.
    pub fn with_store(mut self, store: Arc<dyn ResourceStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set a custom action executor.
    pub fn with_executor(mut self, executor: Arc<dyn ActionExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Set the engine configuration.
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the configuration for the default filesystem executor. Ignored
    /// when a custom executor is supplied.
    pub fn with_executor_config(mut self, config: ExecutorConfig) -> Self {
        self.executor_config = config;
        self
    }

    /// Set the resync interval hint.
    pub fn resync_interval(mut self, interval: Duration) -> Self {
        self.config.resync_interval = Some(interval);
        self
    }

    /// Build the reconciler.
    pub fn build(self) -> Result<Reconciler> {
        let store = self
            .store
            .ok_or_else(|| Error::invalid_config("Resource store is required"))?;

        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(FileActionExecutor::with_config(self.executor_config)));

        Ok(Reconciler::new(store, executor, self.config))
    }
}

impl Default for ReconcilerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;
    use tempfile::tempdir;
    use tokio::sync::Mutex;

    use tally_resource::{FileCount, FileCountSpec, InMemoryResourceStore};

    /// Executor double that records invocations and touches nothing.
    #[derive(Default)]
    struct RecordingExecutor {
        calls: Mutex<Vec<(PathBuf, u64, u64)>>,
    }

    #[async_trait]
    impl ActionExecutor for RecordingExecutor {
        async fn reconcile_count(
            &self,
            directory: &Path,
            observed: u64,
            target: u64,
        ) -> Result<()> {
            self.calls
                .lock()
                .await
                .push((directory.to_path_buf(), observed, target));
            Ok(())
        }
    }

    /// Store double whose status writes always lose the conflict.
    struct ConflictingStore {
        inner: InMemoryResourceStore,
    }

    #[async_trait]
    impl ResourceStore for ConflictingStore {
        async fn get(&self, id: &ResourceId) -> tally_resource::Result<Option<FileCount>> {
            self.inner.get(id).await
        }

        async fn update_status(
            &self,
            id: &ResourceId,
            _status: FileCountStatus,
        ) -> tally_resource::Result<()> {
            Err(tally_resource::Error::conflict(
                id.clone(),
                "simulated concurrent update",
            ))
        }

        async fn apply(&self, resource: FileCount) -> tally_resource::Result<()> {
            self.inner.apply(resource).await
        }
    }

    async fn seed(store: &dyn ResourceStore, dir: &Path, max_files: u64) -> ResourceId {
        let id = ResourceId::new("default", "scratch");
        store
            .apply(FileCount::new(
                id.clone(),
                FileCountSpec::new(dir, max_files),
            ))
            .await
            .unwrap();
        id
    }

    async fn seed_files(dir: &Path, n: u64) {
        for i in 0..n {
            tokio::fs::write(dir.join(format!("seed-{i}")), b"")
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn should_skip_when_resource_is_gone() {
        let store = InMemoryResourceStore::new_arc();
        let executor = Arc::new(RecordingExecutor::default());
        let reconciler = Reconciler::new(
            store,
            executor.clone(),
            ReconcilerConfig::default(),
        );

        let outcome = reconciler
            .reconcile(&ResourceId::new("default", "ghost"))
            .await
            .unwrap();

        assert!(outcome.converged());
        assert!(executor.calls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn should_not_invoke_executor_when_in_sync() {
        let dir = tempdir().unwrap();
        seed_files(dir.path(), 2).await;

        let store = InMemoryResourceStore::new_arc();
        let id = seed(store.as_ref(), dir.path(), 2).await;

        // Pre-set an odd status so any unexpected write is visible.
        store
            .update_status(&id, FileCountStatus { num_files: 99 })
            .await
            .unwrap();

        let executor = Arc::new(RecordingExecutor::default());
        let reconciler = Reconciler::new(
            store.clone(),
            executor.clone(),
            ReconcilerConfig::default(),
        );

        let outcome = reconciler.reconcile(&id).await.unwrap();

        assert!(outcome.converged());
        assert!(executor.calls.lock().await.is_empty());
        let status = store.get(&id).await.unwrap().map(|r| r.status.num_files);
        assert_eq!(status, Some(99), "In-sync passes must not touch status");
    }

    #[tokio::test]
    async fn should_pass_measured_and_target_counts_to_executor() {
        let dir = tempdir().unwrap();
        seed_files(dir.path(), 3).await;

        let store = InMemoryResourceStore::new_arc();
        let id = seed(store.as_ref(), dir.path(), 5).await;

        let executor = Arc::new(RecordingExecutor::default());
        let reconciler = Reconciler::new(
            store,
            executor.clone(),
            ReconcilerConfig::default(),
        );

        reconciler.reconcile(&id).await.unwrap();

        let calls = executor.calls.lock().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], (dir.path().to_path_buf(), 3, 5));
    }

    #[tokio::test]
    async fn should_persist_the_pre_correction_count() {
        let dir = tempdir().unwrap();
        tokio::fs::write(dir.path().join("only"), b"").await.unwrap();

        let store = InMemoryResourceStore::new_arc();
        let id = seed(store.as_ref(), dir.path(), 3).await;

        let reconciler =
            Reconciler::with_file_executor(store.clone(), ReconcilerConfig::default());
        let outcome = reconciler.reconcile(&id).await.unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::corrected(1, 3, None),
            "Outcome reports the measured and target counts"
        );
        let status = store.get(&id).await.unwrap().map(|r| r.status.num_files);
        assert_eq!(status, Some(1), "Status holds the pre-correction snapshot");
        assert_eq!(count_entries(dir.path()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn should_surface_measurement_failure_without_status_write() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");

        let store = InMemoryResourceStore::new_arc();
        let id = seed(store.as_ref(), &missing, 3).await;

        let executor = Arc::new(RecordingExecutor::default());
        let reconciler = Reconciler::new(
            store.clone(),
            executor.clone(),
            ReconcilerConfig::default(),
        );

        let result = reconciler.reconcile(&id).await;

        assert!(matches!(result, Err(Error::Measurement { .. })));
        assert!(executor.calls.lock().await.is_empty());
        let status = store.get(&id).await.unwrap().map(|r| r.status.num_files);
        assert_eq!(status, Some(0), "Failed measurement must not mutate status");
    }

    #[tokio::test]
    async fn should_keep_corrections_when_persist_conflicts() {
        let dir = tempdir().unwrap();

        let store = Arc::new(ConflictingStore {
            inner: InMemoryResourceStore::new(),
        });
        let id = seed(store.as_ref(), dir.path(), 2).await;

        let reconciler =
            Reconciler::with_file_executor(store, ReconcilerConfig::default());
        let result = reconciler.reconcile(&id).await;

        assert!(matches!(result, Err(Error::Persist { .. })));
        // No rollback: the files created this pass stay in place.
        assert_eq!(count_entries(dir.path()).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn should_attach_resync_hint_to_corrected_passes() {
        let dir = tempdir().unwrap();

        let store = InMemoryResourceStore::new_arc();
        let id = seed(store.as_ref(), dir.path(), 1).await;

        let reconciler = Reconciler::with_file_executor(
            store,
            ReconcilerConfig {
                resync_interval: Some(Duration::from_secs(30)),
            },
        );

        let outcome = reconciler.reconcile(&id).await.unwrap();
        assert_eq!(outcome.requeue_after, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_builder_requires_a_store() {
        let result = ReconcilerBuilder::new().build();
        assert!(matches!(result, Err(Error::InvalidConfig { .. })));
    }

    #[tokio::test]
    async fn test_builder_defaults_to_file_executor() {
        let store = InMemoryResourceStore::new_arc();

        let result = ReconcilerBuilder::new()
            .with_store(store)
            .resync_interval(Duration::from_secs(10))
            .build();

        assert!(result.is_ok());
        assert_eq!(
            result.ok().and_then(|r| r.config().resync_interval),
            Some(Duration::from_secs(10))
        );
    }
}
