//! # libris-storage
//!
//! Blob store implementations for Libris. File records point at their
//! bytes through a locator string; these providers resolve it.

pub mod providers;

use std::sync::Arc;

use tracing::info;

use libris_core::config::StorageConfig;
use libris_core::error::AppError;
use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;

pub use providers::{LocalStorageProvider, MemoryStorageProvider};

/// Build the blob store selected by `storage.provider`.
pub async fn build_provider(config: &StorageConfig) -> AppResult<Arc<dyn StorageProvider>> {
    let provider: Arc<dyn StorageProvider> = match config.provider.as_str() {
        "local" => Arc::new(LocalStorageProvider::new(&config.local.root_path).await?),
        "memory" => Arc::new(MemoryStorageProvider::new()),
        other => {
            return Err(AppError::configuration(format!(
                "Unknown storage provider '{other}'"
            )));
        }
    };

    info!(provider = provider.provider_type(), "Blob store initialized");
    Ok(provider)
}
