//! Resource store trait and implementations.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::types::{FileCount, FileCountStatus, ResourceId};

/// Trait for resource storage backends.
///
/// `get` returning `Ok(None)` means the resource was deleted between
/// trigger and fetch; callers treat it as success with nothing to do.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Fetch a resource by identity.
    async fn get(&self, id: &ResourceId) -> Result<Option<FileCount>>;

    /// Write the observed status for a resource.
    async fn update_status(&self, id: &ResourceId, status: FileCountStatus) -> Result<()>;

    /// Create or replace a resource. This is the external actor's surface;
    /// the engine itself never changes specs.
    async fn apply(&self, resource: FileCount) -> Result<()>;
}

/// In-memory resource store.
#[derive(Default)]
pub struct InMemoryResourceStore {
    resources: RwLock<HashMap<ResourceId, FileCount>>,
}

impl InMemoryResourceStore {
    /// Create a new in-memory resource store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new in-memory resource store wrapped in an Arc.
    pub fn new_arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<FileCount>> {
        let resources = self.resources.read().await;
        Ok(resources.get(id).cloned())
    }

    async fn update_status(&self, id: &ResourceId, status: FileCountStatus) -> Result<()> {
        let mut resources = self.resources.write().await;
        match resources.get_mut(id) {
            Some(resource) => {
                resource.status = status;
                Ok(())
            }
            None => Err(Error::conflict(id.clone(), "resource no longer exists")),
        }
    }

    async fn apply(&self, resource: FileCount) -> Result<()> {
        if !resource.spec.is_valid() {
            return Err(Error::store_failed("apply", "directory path must not be empty"));
        }

        let mut resources = self.resources.write().await;
        resources.insert(resource.id.clone(), resource);
        Ok(())
    }
}

/// A wrapper that adds tracing to a resource store.
pub struct TracingResourceStore<S: ResourceStore> {
    inner: S,
}

impl<S: ResourceStore> TracingResourceStore<S> {
    /// Create a new tracing resource store.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: ResourceStore> ResourceStore for TracingResourceStore<S> {
    async fn get(&self, id: &ResourceId) -> Result<Option<FileCount>> {
        tracing::debug!(id = %id, "Fetching resource");
        let result = self.inner.get(id).await;
        if let Ok(None) = result {
            tracing::trace!(id = %id, "Resource not found");
        }
        result
    }

    async fn update_status(&self, id: &ResourceId, status: FileCountStatus) -> Result<()> {
        tracing::debug!(id = %id, num_files = status.num_files, "Updating status");
        self.inner.update_status(id, status).await
    }

    async fn apply(&self, resource: FileCount) -> Result<()> {
        tracing::debug!(id = %resource.id, "Applying resource");
        self.inner.apply(resource).await
    }
}
