//! Error types for the audit crate.

use hullcheck_core::{AuditId, ValidationError};
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The stored document exists but is not a valid record list.
    #[error("malformed audit document under key '{key}': {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization of the record list failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A lock guarding in-memory state was poisoned.
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Errors returned by [`AuditStore`](crate::AuditStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Persisting or loading the record list failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The new record is missing required fields.
    #[error("invalid audit: {0}")]
    Validation(#[from] ValidationError),

    /// A caller-supplied ID is already taken.
    #[error("audit #{0} already exists")]
    DuplicateId(AuditId),

    /// The largest possible ID is taken, so none can be auto-assigned.
    #[error("no audit id left to assign; supply an explicit id")]
    IdExhausted,

    /// The bundled default dataset could not be parsed.
    #[error("bundled default dataset is invalid: {0}")]
    DefaultDataset(#[source] serde_json::Error),
}
