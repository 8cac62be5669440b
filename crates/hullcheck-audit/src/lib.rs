//! # hullcheck-audit
//!
//! The audit record store for Hullcheck.
//!
//! This crate provides:
//! - [`AuditStore`]: the authoritative in-memory list of audit records with
//!   add, status update, toggle and delete operations
//! - [`AuditStorage`]: the persistence port, with file, in-memory and null
//!   backends
//! - The bundled default dataset seeded on first run
//!
//! ## Persistence
//!
//! The whole record list is stored as one JSON array under a single key and
//! rewritten after every mutation. An absent key means first run: the default
//! dataset is written and adopted. A document that fails to parse is replaced
//! by the default dataset.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use hullcheck_audit::{AlwaysConfirm, AuditStore, FileStorage};
//! use hullcheck_core::{AuditStatus, NewAudit};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = Arc::new(FileStorage::new(".hullcheck", "audits"));
//! let mut store = AuditStore::initialize_with_defaults(storage).await?;
//!
//! let date = "2024-05-01".parse::<chrono::NaiveDate>()?;
//! let added = store
//!     .add(NewAudit::new("Hull Check", AuditStatus::Pending, date, "Annual"))
//!     .await?;
//!
//! store.toggle_status(added.id).await?;
//! store.delete(added.id, &AlwaysConfirm).await?;
//! # Ok(())
//! # }
//! ```

pub mod confirm;
pub mod defaults;
pub mod error;
pub mod storage;
pub mod store;

pub use confirm::{AlwaysConfirm, Confirm, NeverConfirm};
pub use defaults::default_audits;
pub use error::{StorageError, StoreError};
pub use storage::{AuditStorage, FileStorage, MemoryStorage, NullStorage, create_storage};
pub use store::{AuditStore, DeleteOutcome};
