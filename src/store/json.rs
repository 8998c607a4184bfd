//! Whole-document JSON store.

use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Errors from store I/O. Read paths never surface these; only explicit
/// saves do.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error at {0}: {1}")]
    Io(String, #[source] std::io::Error),

    #[error("store encode error at {0}: {1}")]
    Encode(String, #[source] serde_json::Error),
}

/// One JSON document on disk, read and written wholesale.
///
/// The writer lock serializes read-modify-write cycles within this
/// process; the on-disk format stays a plain pretty-printed document that
/// other tooling can edit.
#[derive(Debug)]
pub struct JsonStore<T> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _shape: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonStore {
            path: path.into(),
            write_lock: Mutex::new(()),
            _shape: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with the default shape if it does not exist yet.
    pub async fn init(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        if tokio::fs::try_exists(&self.path).await.unwrap_or(false) {
            return Ok(());
        }
        self.write_document(&T::default()).await
    }

    /// Load the document.
    ///
    /// A missing or malformed file yields the default shape; the malformed
    /// case is logged, never propagated.
    pub async fn load(&self) -> T {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => value,
                Err(e) => {
                    warn!(
                        "malformed store {} ({e}), falling back to defaults",
                        self.path.display()
                    );
                    T::default()
                }
            },
            Err(e) => {
                debug!("store {} not readable ({e}), using defaults", self.path.display());
                T::default()
            }
        }
    }

    /// Replace the document on disk.
    pub async fn save(&self, value: &T) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.write_document(value).await
    }

    /// Load, apply `mutate`, save. The whole cycle holds the writer lock,
    /// so concurrent updates to the same store cannot lose writes within
    /// this process.
    pub async fn update<F, R>(&self, mutate: F) -> Result<R, StoreError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let _guard = self.write_lock.lock().await;

        let mut value = match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(
                    "malformed store {} ({e}), rebuilding from defaults",
                    self.path.display()
                );
                T::default()
            }),
            Err(_) => T::default(),
        };

        let result = mutate(&mut value);
        self.write_document(&value).await?;
        Ok(result)
    }

    async fn write_document(&self, value: &T) -> Result<(), StoreError> {
        let display = self.path.display().to_string();
        let body = serde_json::to_string_pretty(value)
            .map_err(|e| StoreError::Encode(display.clone(), e))?;
        tokio::fs::write(&self.path, body)
            .await
            .map_err(|e| StoreError::Io(display, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BanList;

    #[tokio::test]
    async fn test_missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<BanList> = JsonStore::new(dir.path().join("banned.json"));
        let list = store.load().await;
        assert!(list.banned.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_file_fails_closed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banned.json");
        tokio::fs::write(&path, "{not json").await.unwrap();

        let store: JsonStore<BanList> = JsonStore::new(&path);
        let list = store.load().await;
        assert!(list.banned.is_empty());
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store: JsonStore<BanList> = JsonStore::new(dir.path().join("banned.json"));

        store
            .update(|list| list.banned.push("12345".to_string()))
            .await
            .unwrap();

        let list = store.load().await;
        assert_eq!(list.banned, vec!["12345".to_string()]);
    }

    #[tokio::test]
    async fn test_save_is_byte_stable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("banned.json");
        let store: JsonStore<BanList> = JsonStore::new(&path);

        let mut list = BanList::default();
        list.banned.push("999".to_string());
        store.save(&list).await.unwrap();
        let first = tokio::fs::read(&path).await.unwrap();

        let reloaded = store.load().await;
        store.save(&reloaded).await.unwrap();
        let second = tokio::fs::read(&path).await.unwrap();

        assert_eq!(first, second);
    }
}
