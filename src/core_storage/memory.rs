use crate::core_storage::{FileItem, Storage, StorageError};
use crate::helpers::normalize_path;
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
struct MemoryFile {
    data: Vec<u8>,
    modified: DateTime<Local>,
}

/// Volatile storage keyed by normalized path. Directories exist implicitly
/// as prefixes of stored files.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    files: RwLock<BTreeMap<String, MemoryFile>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.files.read().await.is_empty()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn store(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        let key = normalize_path(path);
        if key == "/" {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        let file = MemoryFile {
            data: data.to_vec(),
            modified: Local::now(),
        };
        self.files.write().await.insert(key, file);
        Ok(())
    }

    async fn retrieve(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let key = normalize_path(path);
        self.files
            .read()
            .await
            .get(&key)
            .map(|file| file.data.clone())
            .ok_or_else(|| StorageError::NotFound(path.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let key = normalize_path(path);
        Ok(self.files.write().await.remove(&key).is_some())
    }

    async fn list_all(&self, directory: &str) -> Result<Vec<FileItem>, StorageError> {
        let dir = normalize_path(directory);
        let prefix = if dir == "/" {
            dir
        } else {
            format!("{}/", dir)
        };

        let files = self.files.read().await;
        let mut directories: BTreeMap<String, DateTime<Local>> = BTreeMap::new();
        let mut items = Vec::new();

        for (key, file) in files.range(prefix.clone()..) {
            let Some(rest) = key.strip_prefix(&prefix) else {
                break;
            };
            match rest.split_once('/') {
                Some((subdir, _)) => {
                    let newest = directories.entry(subdir.to_string()).or_insert(file.modified);
                    if file.modified > *newest {
                        *newest = file.modified;
                    }
                }
                None => items.push(FileItem {
                    name: rest.to_string(),
                    is_directory: false,
                    size: file.data.len() as u64,
                    last_modified: file.modified,
                }),
            }
        }

        let mut listing: Vec<FileItem> = directories
            .into_iter()
            .map(|(name, last_modified)| FileItem {
                name,
                is_directory: true,
                size: 0,
                last_modified,
            })
            .collect();
        listing.extend(items);
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_and_retrieve() {
        let storage = InMemoryStorage::new();
        storage.store("/docs/a.txt", b"payload").await.unwrap();
        assert_eq!(storage.retrieve("docs/a.txt").await.unwrap(), b"payload");
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_retrieve_missing_is_not_found() {
        let storage = InMemoryStorage::new();
        assert!(matches!(
            storage.retrieve("/nothing").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete() {
        let storage = InMemoryStorage::new();
        storage.store("/a.txt", b"x").await.unwrap();
        assert!(storage.delete("/a.txt").await.unwrap());
        assert!(!storage.delete("/a.txt").await.unwrap());
        assert!(storage.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_all_implies_directories() {
        let storage = InMemoryStorage::new();
        storage.store("/top.txt", b"abc").await.unwrap();
        storage.store("/sub/one.txt", b"1").await.unwrap();
        storage.store("/sub/deeper/two.txt", b"2").await.unwrap();
        storage.store("/subway.txt", b"4").await.unwrap();

        let root = storage.list_all("/").await.unwrap();
        let names: Vec<(&str, bool)> = root
            .iter()
            .map(|i| (i.name.as_str(), i.is_directory))
            .collect();
        assert_eq!(
            names,
            vec![("sub", true), ("subway.txt", false), ("top.txt", false)]
        );

        let sub = storage.list_all("/sub").await.unwrap();
        let names: Vec<&str> = sub.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["deeper", "one.txt"]);
    }
}
