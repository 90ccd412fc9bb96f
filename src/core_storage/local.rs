use crate::core_storage::{FileItem, Storage, StorageError};
use crate::helpers::{normalize_path, sanitize_input};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores files below a root directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    /// Opens (and creates, if needed) the storage root.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self, StorageError> {
        let root = root.as_ref();
        fs::create_dir_all(root).await?;
        let root = fs::canonicalize(root).await?;
        info!("Local storage rooted at {:?}", root);
        Ok(Self { root })
    }

    /// Maps a logical path onto the filesystem. Paths that try to climb
    /// with `..` are refused outright.
    fn local_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        let sanitized = sanitize_input(path);
        if sanitized.split('/').any(|segment| segment == "..") {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        let relative = normalize_path(&sanitized);
        Ok(self.root.join(relative.trim_start_matches('/')))
    }
}

fn modified_time(metadata: &std::fs::Metadata) -> DateTime<Local> {
    metadata
        .modified()
        .map(DateTime::<Local>::from)
        .unwrap_or_else(|_| Local::now())
}

#[async_trait]
impl Storage for LocalFileStorage {
    async fn store(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let full_path = self.local_path(path)?;
        if full_path == self.root {
            return Err(StorageError::InvalidPath(path.to_string()));
        }

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&full_path, data).await?;
        debug!("Stored {} bytes at {:?}", data.len(), full_path);
        Ok(())
    }

    async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full_path = self.local_path(path)?;
        match fs::read(&full_path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full_path = self.local_path(path)?;
        match fs::metadata(&full_path).await {
            Ok(metadata) if metadata.is_file() => {
                fs::remove_file(&full_path).await?;
                debug!("Deleted {:?}", full_path);
                Ok(true)
            }
            Ok(_) => Ok(false),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_all(&self, directory: &str) -> Result<Vec<FileItem>, StorageError> {
        let full_path = self.local_path(directory)?;
        let mut entries = match fs::read_dir(&full_path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut directories = Vec::new();
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let metadata = entry.metadata().await?;
            let item = FileItem {
                name: entry.file_name().to_string_lossy().to_string(),
                is_directory: metadata.is_dir(),
                size: if metadata.is_dir() { 0 } else { metadata.len() },
                last_modified: modified_time(&metadata),
            };
            if item.is_directory {
                directories.push(item);
            } else {
                files.push(item);
            }
        }

        directories.sort_by(|a, b| a.name.cmp(&b.name));
        files.sort_by(|a, b| a.name.cmp(&b.name));
        directories.extend(files);
        Ok(directories)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn storage() -> (tempfile::TempDir, LocalFileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path()).await.unwrap();
        (dir, storage)
    }

    #[tokio::test]
    async fn test_store_creates_parent_directories() {
        let (dir, storage) = storage().await;
        storage.store("/a/b/file.txt", b"hello").await.unwrap();

        let on_disk = std::fs::read(dir.path().join("a/b/file.txt")).unwrap();
        assert_eq!(on_disk, b"hello");
        assert_eq!(storage.retrieve("/a/b/file.txt").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_retrieve_missing_file_is_not_found() {
        let (_dir, storage) = storage().await;
        let result = storage.retrieve("/missing.txt").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete() {
        let (_dir, storage) = storage().await;
        storage.store("/file.txt", b"x").await.unwrap();

        assert!(storage.delete("/file.txt").await.unwrap());
        assert!(!storage.delete("/file.txt").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_refuses_directories() {
        let (_dir, storage) = storage().await;
        storage.store("/sub/file.txt", b"x").await.unwrap();
        assert!(!storage.delete("/sub").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_all_directories_first() {
        let (_dir, storage) = storage().await;
        storage.store("/b.txt", b"12345").await.unwrap();
        storage.store("/a.txt", b"1").await.unwrap();
        storage.store("/zdir/inner.txt", b"1").await.unwrap();

        let items = storage.list_all("/").await.unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["zdir", "a.txt", "b.txt"]);
        assert!(items[0].is_directory);
        assert_eq!(items[2].size, 5);
    }

    #[tokio::test]
    async fn test_list_missing_directory_is_empty() {
        let (_dir, storage) = storage().await;
        assert!(storage.list_all("/nope").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parent_traversal_is_rejected() {
        let (_dir, storage) = storage().await;
        let result = storage.store("/../escape.txt", b"x").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
        let result = storage.retrieve("a/../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
    }
}
