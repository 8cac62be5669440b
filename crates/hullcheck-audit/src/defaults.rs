//! Bundled default dataset, seeded on first run.

use crate::error::StoreError;
use hullcheck_core::AuditRecord;

/// The default dataset document, same shape as the stored document.
pub const DEFAULT_AUDITS_JSON: &str = include_str!("../data/audits.json");

/// Parse the bundled default dataset.
pub fn default_audits() -> Result<Vec<AuditRecord>, StoreError> {
    serde_json::from_str(DEFAULT_AUDITS_JSON).map_err(StoreError::DefaultDataset)
}
