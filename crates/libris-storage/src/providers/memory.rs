//! In-memory blob store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;

/// Keeps blobs in a map keyed by locator.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorageProvider {
    blobs: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStorageProvider {
    /// Create an empty in-memory blob store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of blobs currently stored.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Whether no blobs are stored.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl StorageProvider for MemoryStorageProvider {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }

    async fn write(&self, locator: &str, data: Bytes) -> AppResult<()> {
        self.blobs.write().await.insert(locator.to_string(), data);
        Ok(())
    }

    async fn read_bytes(&self, locator: &str) -> AppResult<Bytes> {
        self.blobs
            .read()
            .await
            .get(locator)
            .cloned()
            .ok_or_else(|| AppError::not_found(format!("Blob not found: {locator}")))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        self.blobs.write().await.remove(locator);
        Ok(())
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        Ok(self.blobs.read().await.contains_key(locator))
    }
}
