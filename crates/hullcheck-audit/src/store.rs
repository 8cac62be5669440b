//! Audit store implementation.
//!
//! [`AuditStore`] owns the authoritative list of audit records and writes
//! the whole list to its storage backend after every mutation. A store only
//! exists once it has been initialized, so reads and mutations can never
//! run against a list that is still loading.

use hullcheck_core::{AuditId, AuditRecord, AuditStatus, NewAudit, StatusSummary};
use std::collections::HashSet;
use std::sync::Arc;

use crate::confirm::Confirm;
use crate::defaults::default_audits;
use crate::error::{StorageError, StoreError};
use crate::storage::AuditStorage;

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Deleted,
    /// No record had the ID; the list is unchanged.
    NotFound,
    /// The prompt was declined; nothing was changed or written.
    Cancelled,
}

/// The audit record store.
pub struct AuditStore {
    storage: Arc<dyn AuditStorage>,
    defaults: Vec<AuditRecord>,
    records: Vec<AuditRecord>,
}

impl AuditStore {
    /// Load the record list from `storage`.
    ///
    /// A previously saved list is used as-is. When nothing has been saved,
    /// or the saved document is malformed, `defaults` is written to storage
    /// and becomes the initial list.
    pub async fn initialize(
        storage: Arc<dyn AuditStorage>,
        defaults: Vec<AuditRecord>,
    ) -> Result<Self, StoreError> {
        let records = Self::load_or_seed(storage.as_ref(), &defaults).await?;

        tracing::info!(
            location = %storage.describe(),
            count = records.len(),
            "Audit store ready"
        );

        Ok(Self {
            storage,
            defaults,
            records,
        })
    }

    /// Initialize with the bundled default dataset.
    pub async fn initialize_with_defaults(
        storage: Arc<dyn AuditStorage>,
    ) -> Result<Self, StoreError> {
        Self::initialize(storage, default_audits()?).await
    }

    async fn load_or_seed(
        storage: &dyn AuditStorage,
        defaults: &[AuditRecord],
    ) -> Result<Vec<AuditRecord>, StoreError> {
        match storage.load().await {
            Ok(Some(records)) => {
                warn_on_duplicate_ids(&records);
                Ok(records)
            }
            Ok(None) => {
                tracing::info!(
                    count = defaults.len(),
                    "No saved audits found, seeding default dataset"
                );
                storage.save(defaults).await?;
                Ok(defaults.to_vec())
            }
            Err(StorageError::Malformed { key, source }) => {
                tracing::warn!(
                    key = %key,
                    error = %source,
                    "Saved audits are malformed, restoring default dataset"
                );
                storage.save(defaults).await?;
                Ok(defaults.to_vec())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All records in insertion order.
    pub fn list(&self) -> &[AuditRecord] {
        &self.records
    }

    /// Get a record by ID.
    pub fn get(&self, id: AuditId) -> Option<&AuditRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Count of records per status.
    pub fn summary(&self) -> StatusSummary {
        StatusSummary::from_records(&self.records)
    }

    /// The ID an added record receives when none is supplied:
    /// one more than the largest existing ID, or 1 for an empty store.
    ///
    /// `None` once the largest ID is `u64::MAX`.
    pub fn next_id(&self) -> Option<AuditId> {
        self.records
            .iter()
            .map(|r| r.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
    }

    /// Where the records are persisted.
    pub fn location(&self) -> String {
        self.storage.describe()
    }

    /// Append a new record and persist.
    ///
    /// A caller-supplied ID must not already be in use.
    pub async fn add(&mut self, input: NewAudit) -> Result<AuditRecord, StoreError> {
        input.validate()?;

        let id = match input.id {
            Some(id) if self.get(id).is_some() => return Err(StoreError::DuplicateId(id)),
            Some(id) => id,
            None => self.next_id().ok_or(StoreError::IdExhausted)?,
        };

        let record = AuditRecord::from_new(id, input);
        self.records.push(record.clone());

        tracing::debug!(id, status = %record.status, "Audit added");

        self.persist().await?;
        Ok(record)
    }

    /// Set the status of a record and persist.
    ///
    /// Returns `false` if no record has the ID; that is not an error.
    pub async fn update_status(
        &mut self,
        id: AuditId,
        status: AuditStatus,
    ) -> Result<bool, StoreError> {
        let found = match self.records.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.status = status;
                true
            }
            None => false,
        };

        tracing::debug!(id, %status, found, "Audit status updated");

        self.persist().await?;
        Ok(found)
    }

    /// Flip a record between `Compliant` and `Pending` and persist.
    ///
    /// Any status other than `Compliant` becomes `Compliant`; see
    /// [`AuditStatus::toggled`]. Returns `false` if no record has the ID.
    pub async fn toggle_status(&mut self, id: AuditId) -> Result<bool, StoreError> {
        let toggled = self.records.iter_mut().find(|r| r.id == id).map(|record| {
            record.status = record.status.toggled();
            record.status
        });

        match toggled {
            Some(status) => tracing::debug!(id, %status, "Audit status toggled"),
            None => tracing::debug!(id, "Toggle target not found"),
        }

        self.persist().await?;
        Ok(toggled.is_some())
    }

    /// Remove a record after confirmation and persist.
    pub async fn delete(
        &mut self,
        id: AuditId,
        confirm: &dyn Confirm,
    ) -> Result<DeleteOutcome, StoreError> {
        if !confirm.confirm(&format!("Delete audit #{}?", id)) {
            tracing::debug!(id, "Audit delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        let outcome = if self.records.len() < before {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotFound
        };

        tracing::debug!(id, ?outcome, "Audit delete");

        self.persist().await?;
        Ok(outcome)
    }

    /// Re-read the list from storage, with the same fallbacks as
    /// [`initialize`](Self::initialize).
    pub async fn reload(&mut self) -> Result<(), StoreError> {
        self.records = Self::load_or_seed(self.storage.as_ref(), &self.defaults).await?;
        Ok(())
    }

    /// Replace the list with the seed dataset and persist.
    pub async fn reset_to_defaults(&mut self) -> Result<(), StoreError> {
        self.records = self.defaults.clone();
        tracing::info!(count = self.records.len(), "Audit store reset to defaults");
        self.persist().await
    }

    async fn persist(&self) -> Result<(), StoreError> {
        self.storage.save(&self.records).await?;
        Ok(())
    }
}

fn warn_on_duplicate_ids(records: &[AuditRecord]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.id) {
            tracing::warn!(id = record.id, "Saved audits contain a duplicate id");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::{AlwaysConfirm, NeverConfirm};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use std::cell::RefCell;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(id: AuditId, survey: &str, status: AuditStatus) -> AuditRecord {
        AuditRecord {
            id,
            survey: survey.to_string(),
            status,
            date: date("2024-01-15"),
            description: Some(format!("{} notes", survey)),
        }
    }

    fn seed() -> Vec<AuditRecord> {
        vec![
            record(1, "Hull Inspection", AuditStatus::Compliant),
            record(2, "Fire Safety Survey", AuditStatus::Pending),
            record(5, "Ballast Water Audit", AuditStatus::NonCompliant),
        ]
    }

    async fn store_with(records: Vec<AuditRecord>) -> (AuditStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new("audits"));
        let store = AuditStore::initialize(storage.clone(), records).await.unwrap();
        (store, storage)
    }

    fn hull_check() -> NewAudit {
        NewAudit::new("Hull Check", AuditStatus::Pending, date("2024-05-01"), "Annual")
    }

    #[tokio::test]
    async fn test_first_run_seeds_defaults() {
        let (store, storage) = store_with(seed()).await;

        assert_eq!(store.list(), seed().as_slice());
        assert_eq!(storage.load().await.unwrap(), Some(seed()));
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_saved_list_is_used_verbatim() {
        let storage = Arc::new(MemoryStorage::new("audits"));
        let saved = vec![record(9, "Radio Survey", AuditStatus::Pending)];
        storage.save(&saved).await.unwrap();

        let store = AuditStore::initialize(storage.clone(), seed()).await.unwrap();

        assert_eq!(store.list(), saved.as_slice());
        // No reseed write
        assert_eq!(storage.save_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_storage_falls_back_to_defaults() {
        let storage = Arc::new(MemoryStorage::new("audits"));
        storage
            .put_raw("audits", r#"[{"id":1,"survey":"x","status":"Backlogged","date":"2024-01-01"}]"#)
            .unwrap();

        let store = AuditStore::initialize(storage.clone(), seed()).await.unwrap();

        assert_eq!(store.list(), seed().as_slice());
        assert_eq!(storage.load().await.unwrap(), Some(seed()));
    }

    #[tokio::test]
    async fn test_add_assigns_next_id() {
        let (mut store, _storage) = store_with(seed()).await;

        let added = store.add(hull_check()).await.unwrap();

        assert_eq!(added.id, 6);
        assert_eq!(added.survey, "Hull Check");
        assert_eq!(added.status, AuditStatus::Pending);
        assert_eq!(added.date, date("2024-05-01"));
        assert_eq!(added.description.as_deref(), Some("Annual"));
        assert_eq!(store.list().last(), Some(&added));
    }

    #[tokio::test]
    async fn test_add_to_empty_store_starts_at_one() {
        let (mut store, _storage) = store_with(Vec::new()).await;
        assert!(store.is_empty());

        let first = store.add(hull_check()).await.unwrap();
        let second = store.add(hull_check()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_add_with_explicit_id() {
        let (mut store, _storage) = store_with(seed()).await;

        let added = store.add(hull_check().with_id(42)).await.unwrap();
        assert_eq!(added.id, 42);

        // Auto-assignment continues from the largest id
        let next = store.add(hull_check()).await.unwrap();
        assert_eq!(next.id, 43);
    }

    #[tokio::test]
    async fn test_add_rejects_duplicate_id() {
        let (mut store, storage) = store_with(seed()).await;
        let saves = storage.save_count();

        let result = store.add(hull_check().with_id(2)).await;

        assert!(matches!(result, Err(StoreError::DuplicateId(2))));
        assert_eq!(store.list(), seed().as_slice());
        assert_eq!(storage.save_count(), saves);
    }

    #[tokio::test]
    async fn test_auto_id_after_max_id_is_rejected() {
        let (mut store, storage) = store_with(seed()).await;

        let top = store.add(hull_check().with_id(u64::MAX)).await.unwrap();
        assert_eq!(top.id, u64::MAX);
        assert_eq!(store.next_id(), None);
        let saves = storage.save_count();

        let result = store.add(hull_check()).await;

        assert!(matches!(result, Err(StoreError::IdExhausted)));
        assert_eq!(store.len(), 4);
        assert_eq!(storage.save_count(), saves);

        // Explicit ids below the maximum still work
        let explicit = store.add(hull_check().with_id(3)).await.unwrap();
        assert_eq!(explicit.id, 3);
    }

    #[tokio::test]
    async fn test_add_rejects_blank_survey() {
        let (mut store, _storage) = store_with(seed()).await;

        let input = NewAudit::new("", AuditStatus::Pending, date("2024-05-01"), "");
        let result = store.add(input).await;

        assert!(matches!(result, Err(StoreError::Validation(_))));
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_add_persists_immediately() {
        let (mut store, storage) = store_with(seed()).await;

        store.add(hull_check()).await.unwrap();

        let saved = storage.load().await.unwrap().unwrap();
        assert_eq!(saved, store.list());
    }

    #[tokio::test]
    async fn test_update_status_changes_only_status() {
        let (mut store, storage) = store_with(seed()).await;

        let found = store.update_status(2, AuditStatus::NonCompliant).await.unwrap();
        assert!(found);

        let mut expected = seed();
        expected[1].status = AuditStatus::NonCompliant;
        assert_eq!(store.list(), expected.as_slice());
        assert_eq!(storage.load().await.unwrap(), Some(expected));
    }

    #[tokio::test]
    async fn test_update_status_missing_id_is_noop() {
        let (mut store, _storage) = store_with(seed()).await;

        let found = store.update_status(99, AuditStatus::Compliant).await.unwrap();

        assert!(!found);
        assert_eq!(store.list(), seed().as_slice());
    }

    #[tokio::test]
    async fn test_toggle_compliant_twice_round_trips() {
        let (mut store, _storage) = store_with(seed()).await;

        store.toggle_status(1).await.unwrap();
        assert_eq!(store.get(1).unwrap().status, AuditStatus::Pending);

        store.toggle_status(1).await.unwrap();
        assert_eq!(store.get(1).unwrap().status, AuditStatus::Compliant);
    }

    #[tokio::test]
    async fn test_toggle_non_compliant_does_not_return() {
        let (mut store, _storage) = store_with(seed()).await;

        store.toggle_status(5).await.unwrap();
        assert_eq!(store.get(5).unwrap().status, AuditStatus::Compliant);

        store.toggle_status(5).await.unwrap();
        assert_eq!(store.get(5).unwrap().status, AuditStatus::Pending);
    }

    #[tokio::test]
    async fn test_toggle_missing_id_is_noop() {
        let (mut store, _storage) = store_with(seed()).await;

        assert!(!store.toggle_status(77).await.unwrap());
        assert_eq!(store.list(), seed().as_slice());
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (mut store, storage) = store_with(seed()).await;

        let outcome = store.delete(2, &AlwaysConfirm).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Deleted);
        assert!(store.get(2).is_none());
        assert!(store.list().iter().all(|r| r.id != 2));
        let saved = storage.load().await.unwrap().unwrap();
        assert!(saved.iter().all(|r| r.id != 2));
    }

    #[tokio::test]
    async fn test_delete_missing_id_leaves_list_unchanged() {
        let (mut store, _storage) = store_with(seed()).await;

        let outcome = store.delete(3, &AlwaysConfirm).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::NotFound);
        assert_eq!(store.list(), seed().as_slice());
    }

    #[tokio::test]
    async fn test_declined_delete_writes_nothing() {
        let (mut store, storage) = store_with(seed()).await;
        let saves = storage.save_count();

        let outcome = store.delete(1, &NeverConfirm).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert_eq!(store.len(), 3);
        assert_eq!(storage.save_count(), saves);
    }

    #[tokio::test]
    async fn test_delete_prompt_names_the_record() {
        let (mut store, _storage) = store_with(seed()).await;
        let asked = RefCell::new(Vec::new());

        let confirm = |prompt: &str| {
            asked.borrow_mut().push(prompt.to_string());
            true
        };
        store.delete(5, &confirm).await.unwrap();

        assert_eq!(asked.into_inner(), vec!["Delete audit #5?".to_string()]);
    }

    #[tokio::test]
    async fn test_restart_preserves_added_record() {
        let (mut store, storage) = store_with(seed()).await;
        let added = store.add(hull_check()).await.unwrap();
        drop(store);

        // "Restart" by initializing a new store over the same storage
        let restarted = AuditStore::initialize(storage.clone(), seed()).await.unwrap();
        assert_eq!(restarted.get(added.id), Some(&added));
        assert_eq!(restarted.len(), 4);
    }

    #[tokio::test]
    async fn test_reload_picks_up_external_changes() {
        let (mut store, storage) = store_with(seed()).await;
        storage.save(&seed()[..1]).await.unwrap();

        store.reload().await.unwrap();

        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_reset_to_defaults() {
        let (mut store, storage) = store_with(seed()).await;
        store.add(hull_check()).await.unwrap();
        store.delete(1, &AlwaysConfirm).await.unwrap();

        store.reset_to_defaults().await.unwrap();

        assert_eq!(store.list(), seed().as_slice());
        assert_eq!(storage.load().await.unwrap(), Some(seed()));
    }

    #[tokio::test]
    async fn test_summary_tracks_mutations() {
        let (mut store, _storage) = store_with(seed()).await;
        assert_eq!(store.summary().compliant, 1);

        store.update_status(2, AuditStatus::Compliant).await.unwrap();

        let summary = store.summary();
        assert_eq!(summary.compliant, 2);
        assert_eq!(summary.pending, 0);
        assert_eq!(summary.non_compliant, 1);
        assert_eq!(summary.total, 3);
    }

    #[tokio::test]
    async fn test_initialize_with_bundled_defaults() {
        let storage = Arc::new(MemoryStorage::default());
        let store = AuditStore::initialize_with_defaults(storage).await.unwrap();

        assert_eq!(store.list(), default_audits().unwrap().as_slice());
    }
}
