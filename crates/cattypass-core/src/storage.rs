//! Key-value storage areas and the credential store adapter on top of them.
//!
//! A storage area holds structured JSON values under string keys. The whole
//! credential store lives under a single key, [`PASSWORDS_KEY`], and is always
//! read and written as one unit.

use crate::error::{Result, VaultError};
use crate::models::CredentialStore;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Storage key holding the credential store.
pub const PASSWORDS_KEY: &str = "passwords";

/// An asynchronous key-value storage area.
#[async_trait]
pub trait StorageArea: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}

#[async_trait]
impl<T: StorageArea + ?Sized> StorageArea for std::sync::Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value).await
    }
}

// ─── In-memory area ─────────────────────────────────────────────────────────

/// Process-local storage area.
///
/// Can be taken offline to make every access fail, which is how tests exercise
/// the storage-unavailable path.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, Value>>,
    offline: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(VaultError::StorageUnavailable(
                "storage area is offline".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl StorageArea for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        self.check_online()?;
        let data = self.data.lock().map_err(VaultError::storage)?;
        Ok(data.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        self.check_online()?;
        let mut data = self.data.lock().map_err(VaultError::storage)?;
        data.insert(key.to_string(), value);
        Ok(())
    }
}

// ─── File-backed area ───────────────────────────────────────────────────────

/// Storage area persisted as a single JSON object file.
///
/// Writes go to a temporary file next to the target which is then renamed over
/// it, so readers see either the old or the new area, never a partial one.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_area(&self) -> Result<Map<String, Value>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No storage file at {}, starting empty", self.path.display());
                return Ok(Map::new());
            }
            Err(e) => {
                return Err(VaultError::StorageUnavailable(format!(
                    "failed to read {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            VaultError::StorageUnavailable(format!(
                "failed to parse {}: {}",
                self.path.display(),
                e
            ))
        })
    }

    async fn write_area(&self, area: Map<String, Value>) -> Result<()> {
        let path = self.path.clone();
        let contents = serde_json::to_vec_pretty(&Value::Object(area)).map_err(VaultError::storage)?;

        tokio::task::spawn_blocking(move || write_atomically(&path, &contents))
            .await
            .map_err(VaultError::storage)?
            .map_err(|e| {
                VaultError::StorageUnavailable(format!(
                    "failed to write {}: {}",
                    self.path.display(),
                    e
                ))
            })
    }
}

fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir)?;

    let mut file = tempfile::NamedTempFile::new_in(&dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl StorageArea for FileStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let mut area = self.read_area().await?;
        Ok(area.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut area = self.read_area().await?;
        area.insert(key.to_string(), value);
        self.write_area(area).await
    }
}

// ─── Credential store adapter ───────────────────────────────────────────────

/// Reads and writes the whole [`CredentialStore`] through a storage area.
pub struct CredentialStoreAdapter<S> {
    area: S,
}

impl<S: StorageArea> CredentialStoreAdapter<S> {
    pub fn new(area: S) -> Self {
        Self { area }
    }

    pub fn area(&self) -> &S {
        &self.area
    }

    /// Load the full store, or an empty one if nothing has been saved yet.
    pub async fn load_all(&self) -> Result<CredentialStore> {
        match self.area.get(PASSWORDS_KEY).await? {
            None | Some(Value::Null) => Ok(CredentialStore::new()),
            Some(value) => serde_json::from_value(value).map_err(|e| {
                VaultError::StorageUnavailable(format!("stored passwords are unreadable: {e}"))
            }),
        }
    }

    /// Replace the persisted store with `store`.
    pub async fn save_all(&self, store: &CredentialStore) -> Result<()> {
        let value = serde_json::to_value(store).map_err(VaultError::storage)?;
        self.area.set(PASSWORDS_KEY, value).await?;
        tracing::debug!(records = store.len(), "Saved credential store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CredentialRecord;
    use serde_json::json;

    fn sample_store() -> CredentialStore {
        let mut store = CredentialStore::new();
        store.insert("zeta.example", CredentialRecord::new("zed", "z-pass", ""));
        store.insert("alpha.example", CredentialRecord::new("al", "a-pass", "work"));
        store
    }

    #[tokio::test]
    async fn load_all_on_fresh_area_is_empty() {
        let adapter = CredentialStoreAdapter::new(MemoryStorage::new());
        let store = adapter.load_all().await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn store_is_saved_as_structured_value() {
        let adapter = CredentialStoreAdapter::new(MemoryStorage::new());
        adapter.save_all(&sample_store()).await.unwrap();

        let raw = adapter.area().get(PASSWORDS_KEY).await.unwrap().unwrap();
        assert_eq!(
            raw["alpha.example"],
            json!({"username": "al", "password": "a-pass", "note": "work"})
        );
    }

    #[tokio::test]
    async fn offline_area_reports_storage_unavailable() {
        let storage = MemoryStorage::new();
        storage.set_offline(true);
        let adapter = CredentialStoreAdapter::new(storage);

        let err = adapter.load_all().await.unwrap_err();
        assert!(matches!(err, VaultError::StorageUnavailable(_)));
        let err = adapter.save_all(&sample_store()).await.unwrap_err();
        assert!(matches!(err, VaultError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn malformed_stored_value_is_unavailable() {
        let storage = MemoryStorage::new();
        storage.set(PASSWORDS_KEY, json!(["not", "a", "map"])).await.unwrap();
        let adapter = CredentialStoreAdapter::new(storage);

        let err = adapter.load_all().await.unwrap_err();
        assert!(matches!(err, VaultError::StorageUnavailable(_)));
    }

    #[tokio::test]
    async fn file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let adapter = CredentialStoreAdapter::new(FileStorage::new(&path));
        adapter.save_all(&sample_store()).await.unwrap();

        let reopened = CredentialStoreAdapter::new(FileStorage::new(&path));
        let store = reopened.load_all().await.unwrap();
        assert_eq!(store, sample_store());

        let sites: Vec<_> = store.sites().cloned().collect();
        assert_eq!(sites, vec!["zeta.example", "alpha.example"]);
    }

    #[tokio::test]
    async fn file_storage_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage.json"));
        storage.set("theme", json!("dark")).await.unwrap();

        let adapter = CredentialStoreAdapter::new(storage);
        adapter.save_all(&sample_store()).await.unwrap();

        assert_eq!(adapter.area().get("theme").await.unwrap(), Some(json!("dark")));
    }

    #[tokio::test]
    async fn corrupt_storage_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        std::fs::write(&path, "{ not json").unwrap();

        let adapter = CredentialStoreAdapter::new(FileStorage::new(&path));
        let err = adapter.load_all().await.unwrap_err();
        assert!(matches!(err, VaultError::StorageUnavailable(_)));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
