//! # hullcheck-core
//!
//! Shared types for Hullcheck, a marine compliance audit tracker.
//!
//! - [`record`]: the audit record, its status and the input for new records
//! - [`query`]: search and per-status summary over a record list
//! - [`config`]: YAML configuration for the store and logging

pub mod config;
pub mod query;
pub mod record;

pub use config::{ConfigError, HullcheckConfig, LogConfig, StorageBackend, StoreConfig};
pub use query::{AuditFilter, StatusSummary};
pub use record::{AuditId, AuditRecord, AuditStatus, NewAudit, ParseStatusError, ValidationError};
