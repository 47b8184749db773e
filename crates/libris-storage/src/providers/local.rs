//! Local filesystem blob store.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use libris_core::error::{AppError, ErrorKind};
use libris_core::result::AppResult;
use libris_core::traits::storage::StorageProvider;

/// Stores each blob as a file below a root directory.
#[derive(Debug, Clone)]
pub struct LocalStorageProvider {
    root: PathBuf,
}

impl LocalStorageProvider {
    /// Create a new local provider rooted at the given path.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Resolve a locator to a path inside the root.
    ///
    /// Locators may not climb out of the root with `..` components.
    fn resolve(&self, locator: &str) -> AppResult<PathBuf> {
        let relative = Path::new(locator.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(AppError::validation(format!(
                "Invalid blob locator: {locator}"
            )));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl StorageProvider for LocalStorageProvider {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(fs::metadata(&self.root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false))
    }

    async fn write(&self, locator: &str, data: Bytes) -> AppResult<()> {
        let full_path = self.resolve(locator)?;
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write blob: {locator}"),
                e,
            )
        })?;

        debug!(locator, bytes = data.len(), "Wrote blob");
        Ok(())
    }

    async fn read_bytes(&self, locator: &str) -> AppResult<Bytes> {
        let full_path = self.resolve(locator)?;
        let data = fs::read(&full_path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AppError::not_found(format!("Blob not found: {locator}"))
            } else {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read blob: {locator}"),
                    e,
                )
            }
        })?;
        Ok(Bytes::from(data))
    }

    async fn delete(&self, locator: &str) -> AppResult<()> {
        let full_path = self.resolve(locator)?;
        match fs::remove_file(&full_path).await {
            Ok(()) => {
                debug!(locator, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob: {locator}"),
                e,
            )),
        }
    }

    async fn exists(&self, locator: &str) -> AppResult<bool> {
        let full_path = self.resolve(locator)?;
        Ok(fs::try_exists(&full_path).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn provider(dir: &tempfile::TempDir) -> LocalStorageProvider {
        LocalStorageProvider::new(dir.path().to_str().unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;

        let data = Bytes::from("lecture notes");
        provider.write("owner/notes.md", data.clone()).await.unwrap();
        assert!(provider.exists("owner/notes.md").await.unwrap());
        assert_eq!(provider.read_bytes("owner/notes.md").await.unwrap(), data);

        provider.delete("owner/notes.md").await.unwrap();
        assert!(!provider.exists("owner/notes.md").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_blob_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        provider.delete("never/written.bin").await.unwrap();
    }

    #[tokio::test]
    async fn test_locator_cannot_escape_root() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        let err = provider.delete("../outside.txt").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let provider = provider(&dir).await;
        assert!(provider.health_check().await.unwrap());
    }
}
