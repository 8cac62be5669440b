//! View helpers over a list of audit records.
//!
//! Search and the per-status summary are presentation concerns: they read a
//! snapshot of the store and never mutate it.

use crate::record::{AuditRecord, AuditStatus};
use serde::Serialize;

/// Filter for searching audit records.
#[derive(Debug, Clone, Default)]
pub struct AuditFilter {
    /// Case-insensitive substring of the survey name, or substring of the ID.
    pub term: Option<String>,
    /// Only records with this status.
    pub status: Option<AuditStatus>,
}

impl AuditFilter {
    /// Filter by search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            term: Some(term.into()),
            status: None,
        }
    }

    /// Whether any criterion is set.
    pub fn is_active(&self) -> bool {
        self.term.as_deref().is_some_and(|t| !t.is_empty()) || self.status.is_some()
    }

    /// Check a single record against the filter.
    pub fn matches(&self, record: &AuditRecord) -> bool {
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }

        match self.term.as_deref() {
            None | Some("") => true,
            Some(term) => {
                record
                    .survey
                    .to_lowercase()
                    .contains(&term.to_lowercase())
                    || record.id.to_string().contains(term)
            }
        }
    }

    /// Records matching the filter, in their original order.
    pub fn apply<'a>(&self, records: &'a [AuditRecord]) -> Vec<&'a AuditRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }
}

/// Count of records per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub compliant: usize,
    pub pending: usize,
    pub non_compliant: usize,
    pub total: usize,
}

impl StatusSummary {
    /// Tally a list of records.
    pub fn from_records(records: &[AuditRecord]) -> Self {
        records.iter().fold(Self::default(), |mut summary, record| {
            match record.status {
                AuditStatus::Compliant => summary.compliant += 1,
                AuditStatus::Pending => summary.pending += 1,
                AuditStatus::NonCompliant => summary.non_compliant += 1,
            }
            summary.total += 1;
            summary
        })
    }

    /// Count for one status.
    pub fn count(&self, status: AuditStatus) -> usize {
        match status {
            AuditStatus::Compliant => self.compliant,
            AuditStatus::Pending => self.pending,
            AuditStatus::NonCompliant => self.non_compliant,
        }
    }
}
