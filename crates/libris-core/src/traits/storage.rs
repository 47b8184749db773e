//! Blob store trait for the object storage that holds raw file bytes.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Trait for blob storage backends.
///
/// File metadata references its blob by a locator string; the namespace
/// manager only ever deletes blobs, while writes and reads belong to the
/// ingestion and download paths.
#[async_trait]
pub trait StorageProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes to the blob at the given locator.
    async fn write(&self, locator: &str, data: Bytes) -> AppResult<()>;

    /// Read a blob into memory.
    async fn read_bytes(&self, locator: &str) -> AppResult<Bytes>;

    /// Delete the blob at the given locator.
    ///
    /// Deleting a locator that does not exist succeeds, so a retried
    /// cascade never fails on blobs removed by an earlier attempt.
    async fn delete(&self, locator: &str) -> AppResult<()>;

    /// Check whether a blob exists at the given locator.
    async fn exists(&self, locator: &str) -> AppResult<bool>;
}
