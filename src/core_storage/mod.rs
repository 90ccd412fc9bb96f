// Backing object stores. The protocol engine only sees the `Storage` trait.

pub mod error;
pub mod local;
pub mod memory;

pub use error::StorageError;
pub use local::LocalFileStorage;
pub use memory::InMemoryStorage;

use crate::config::{StorageBackend, StorageConfig};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::sync::Arc;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileItem {
    pub name: String,
    pub is_directory: bool,
    pub size: u64,
    pub last_modified: DateTime<Local>,
}

/// File store addressed by logical, '/'-separated absolute paths.
///
/// Implementations are shared by every session and must tolerate
/// concurrent calls.
#[async_trait]
pub trait Storage: Send + Sync + std::fmt::Debug {
    async fn store(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Returns `StorageError::NotFound` when nothing is stored at `path`.
    async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// Returns `Ok(false)` when there was no file to delete.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    async fn list_all(&self, directory: &str) -> Result<Vec<FileItem>, StorageError>;
}

/// Builds the backend selected in `[storage]`.
pub async fn create_storage(config: &StorageConfig) -> Result<Arc<dyn Storage>, StorageError> {
    match config.backend {
        StorageBackend::Local => Ok(Arc::new(LocalFileStorage::new(&config.root).await?)),
        StorageBackend::Memory => Ok(Arc::new(InMemoryStorage::new())),
    }
}
