//! Audit store configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the audit record store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory holding the durable documents (file backend).
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Storage key the record list is saved under.
    #[serde(default = "default_key")]
    pub key: String,

    /// Seed the bundled default dataset on first run.
    #[serde(default = "default_seed_defaults")]
    pub seed_defaults: bool,
}

/// Storage backend type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// One JSON document per key on disk.
    #[default]
    File,
    /// Process memory only; nothing survives a restart.
    Memory,
    /// Discard all writes.
    None,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            directory: default_directory(),
            key: default_key(),
            seed_defaults: default_seed_defaults(),
        }
    }
}

impl StoreConfig {
    /// Path of the document for the configured key.
    pub fn document_path(&self) -> PathBuf {
        self.directory.join(format!("{}.json", self.key))
    }
}

fn default_directory() -> PathBuf {
    PathBuf::from(".hullcheck")
}

fn default_key() -> String {
    "audits".to_string()
}

fn default_seed_defaults() -> bool {
    true
}
