//! Audit storage backends.
//!
//! A backend holds the whole record list as one JSON document under a
//! single key. Reading an absent key is the first-run signal; writing
//! replaces the whole document.

use crate::error::StorageError;
use async_trait::async_trait;
use hullcheck_core::{AuditRecord, StorageBackend, StoreConfig};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Trait for audit storage backends.
#[async_trait]
pub trait AuditStorage: Send + Sync {
    /// Load the saved record list.
    ///
    /// Returns `Ok(None)` when nothing has been saved yet and
    /// [`StorageError::Malformed`] when the saved document does not parse.
    async fn load(&self) -> Result<Option<Vec<AuditRecord>>, StorageError>;

    /// Replace the saved record list.
    async fn save(&self, records: &[AuditRecord]) -> Result<(), StorageError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Create a storage backend based on configuration.
pub fn create_storage(config: &StoreConfig) -> Box<dyn AuditStorage> {
    match config.backend {
        StorageBackend::File => Box::new(FileStorage::new(&config.directory, &config.key)),
        StorageBackend::Memory => Box::new(MemoryStorage::new(&config.key)),
        StorageBackend::None => Box::new(NullStorage),
    }
}

fn parse_document(key: &str, raw: &str) -> Result<Vec<AuditRecord>, StorageError> {
    serde_json::from_str(raw).map_err(|source| StorageError::Malformed {
        key: key.to_string(),
        source,
    })
}

/// File storage (one JSON document per key).
pub struct FileStorage {
    directory: PathBuf,
    key: String,
}

impl FileStorage {
    /// Create a file storage for `<directory>/<key>.json`.
    pub fn new(directory: impl AsRef<Path>, key: impl Into<String>) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
            key: key.into(),
        }
    }

    /// Path of the document.
    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.key))
    }

    fn temp_path(&self) -> PathBuf {
        self.directory.join(format!(".{}.json.tmp", self.key))
    }
}

#[async_trait]
impl AuditStorage for FileStorage {
    async fn load(&self) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        let raw = match tokio::fs::read_to_string(self.path()).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        parse_document(&self.key, &raw).map(Some)
    }

    async fn save(&self, records: &[AuditRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(records)?;

        tokio::fs::create_dir_all(&self.directory).await?;

        // Write then rename so readers never see a partial document
        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, self.path()).await?;

        Ok(())
    }

    fn describe(&self) -> String {
        self.path().display().to_string()
    }
}

/// In-memory storage.
///
/// Keeps serialized documents rather than records, so loads go through the
/// same parsing as the file backend.
#[derive(Debug)]
pub struct MemoryStorage {
    key: String,
    documents: RwLock<HashMap<String, String>>,
    saves: AtomicUsize,
}

impl MemoryStorage {
    /// Create an empty in-memory storage for the given key.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            documents: RwLock::new(HashMap::new()),
            saves: AtomicUsize::new(0),
        }
    }

    /// The raw document stored under `key`, if any.
    pub fn raw(&self, key: &str) -> Result<Option<String>, StorageError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;
        Ok(documents.get(key).cloned())
    }

    /// Store a raw document under `key`, bypassing serialization.
    pub fn put_raw(&self, key: &str, document: impl Into<String>) -> Result<(), StorageError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| StorageError::LockPoisoned)?;
        documents.insert(key.to_string(), document.into());
        Ok(())
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(StoreConfig::default().key)
    }
}

#[async_trait]
impl AuditStorage for MemoryStorage {
    async fn load(&self) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| StorageError::LockPoisoned)?;

        documents
            .get(&self.key)
            .map(|raw| parse_document(&self.key, raw))
            .transpose()
    }

    async fn save(&self, records: &[AuditRecord]) -> Result<(), StorageError> {
        let json = serde_json::to_string(records)?;
        self.put_raw(&self.key, json)?;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory:{}", self.key)
    }
}

/// Storage that is always empty and discards writes.
#[derive(Debug, Default)]
pub struct NullStorage;

#[async_trait]
impl AuditStorage for NullStorage {
    async fn load(&self) -> Result<Option<Vec<AuditRecord>>, StorageError> {
        Ok(None)
    }

    async fn save(&self, _records: &[AuditRecord]) -> Result<(), StorageError> {
        Ok(())
    }

    fn describe(&self) -> String {
        "none".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use hullcheck_core::AuditStatus;
    use tempfile::TempDir;

    fn sample() -> Vec<AuditRecord> {
        vec![
            AuditRecord {
                id: 1,
                survey: "Hull Inspection".to_string(),
                status: AuditStatus::Compliant,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                description: Some("Dry dock".to_string()),
            },
            AuditRecord {
                id: 4,
                survey: "Lifeboat Check".to_string(),
                status: AuditStatus::NonCompliant,
                date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
                description: None,
            },
        ]
    }

    #[tokio::test]
    async fn test_file_storage_absent_key() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "audits");

        assert!(storage.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_storage_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join("nested"), "audits");

        storage.save(&sample()).await.unwrap();

        assert!(storage.path().exists());
        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn test_file_storage_save_replaces_document() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "audits");

        storage.save(&sample()).await.unwrap();
        storage.save(&sample()[..1]).await.unwrap();

        let loaded = storage.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, 1);
    }

    #[tokio::test]
    async fn test_file_storage_malformed_document() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path(), "audits");
        std::fs::write(storage.path(), r#"[{"id":1,"survey":"x","status":"Archived"}]"#).unwrap();

        let result = storage.load().await;
        assert!(matches!(result, Err(StorageError::Malformed { ref key, .. }) if key == "audits"));
    }

    #[tokio::test]
    async fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new("audits");
        assert!(storage.load().await.unwrap().is_none());

        storage.save(&sample()).await.unwrap();

        assert_eq!(storage.save_count(), 1);
        assert!(storage.raw("audits").unwrap().unwrap().contains("Non-Compliant"));
        assert_eq!(storage.raw("fleet").unwrap(), None);
        assert_eq!(storage.load().await.unwrap(), Some(sample()));
    }

    #[tokio::test]
    async fn test_memory_storage_malformed_document() {
        let storage = MemoryStorage::new("audits");
        storage.put_raw("audits", "{not json").unwrap();

        assert!(matches!(
            storage.load().await,
            Err(StorageError::Malformed { .. })
        ));
    }

    #[test]
    fn test_memory_storage_poisoned_lock_is_an_error() {
        let storage = MemoryStorage::new("audits");
        let _ = std::panic::catch_unwind(|| {
            let _guard = storage.documents.write().unwrap();
            panic!("poison the lock");
        });

        assert!(matches!(
            storage.raw("audits"),
            Err(StorageError::LockPoisoned)
        ));
    }

    #[tokio::test]
    async fn test_null_storage_discards_writes() {
        let storage = NullStorage;
        storage.save(&sample()).await.unwrap();
        assert!(storage.load().await.unwrap().is_none());
    }

    #[test]
    fn test_create_storage_from_config() {
        let config = StoreConfig {
            backend: StorageBackend::File,
            directory: PathBuf::from("/var/lib/hullcheck"),
            key: "fleet".to_string(),
            seed_defaults: true,
        };
        let storage = create_storage(&config);
        assert_eq!(storage.describe(), "/var/lib/hullcheck/fleet.json");

        let config = StoreConfig {
            backend: StorageBackend::Memory,
            ..config
        };
        assert_eq!(create_storage(&config).describe(), "memory:fleet");
    }
}
