//! Audit record types.
//!
//! An audit record is the unit of tracked compliance data: a survey label,
//! its compliance status, the survey date and an optional description.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of an audit record. Positive, unique within a store.
pub type AuditId = u64;

/// Compliance status of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    /// The vessel passed the survey.
    Compliant,
    /// The survey outcome is still open.
    Pending,
    /// The survey found deficiencies.
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl AuditStatus {
    /// Every status, in display order.
    pub const ALL: [AuditStatus; 3] = [Self::Compliant, Self::Pending, Self::NonCompliant];

    /// The label used in the stored document and in views.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Compliant => "Compliant",
            Self::Pending => "Pending",
            Self::NonCompliant => "Non-Compliant",
        }
    }

    /// The status a quick toggle moves to.
    ///
    /// Only `Compliant` and `Pending` alternate. A `NonCompliant` record
    /// becomes `Compliant`, and a second toggle yields `Pending`.
    pub fn toggled(self) -> Self {
        match self {
            Self::Compliant => Self::Pending,
            Self::Pending | Self::NonCompliant => Self::Compliant,
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown audit status '{0}' (expected Compliant, Pending or Non-Compliant)")]
pub struct ParseStatusError(pub String);

impl FromStr for AuditStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compliant" => Ok(Self::Compliant),
            "pending" => Ok(Self::Pending),
            "non-compliant" | "non_compliant" | "noncompliant" => Ok(Self::NonCompliant),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

/// A stored audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record ID.
    pub id: AuditId,

    /// Survey name. Older documents call this field `title`.
    #[serde(alias = "title")]
    pub survey: String,

    /// Compliance status.
    pub status: AuditStatus,

    /// Survey date, stored as `YYYY-MM-DD`.
    pub date: NaiveDate,

    /// Free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AuditRecord {
    /// Create a record with the given ID from validated input.
    pub fn from_new(id: AuditId, input: NewAudit) -> Self {
        Self {
            id,
            survey: input.survey,
            status: input.status,
            date: input.date,
            description: Some(input.description),
        }
    }
}

/// Input for creating an audit record.
///
/// `id` is optional; when absent the store assigns one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAudit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<AuditId>,
    pub survey: String,
    pub status: AuditStatus,
    pub date: NaiveDate,
    pub description: String,
}

impl NewAudit {
    /// Create input with an auto-assigned ID.
    pub fn new(
        survey: impl Into<String>,
        status: AuditStatus,
        date: NaiveDate,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            survey: survey.into(),
            status,
            date,
            description: description.into(),
        }
    }

    /// Request a specific ID instead of an auto-assigned one.
    pub fn with_id(mut self, id: AuditId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check required fields.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.survey.trim().is_empty() {
            return Err(ValidationError::EmptySurvey);
        }
        if self.id == Some(0) {
            return Err(ValidationError::ZeroId);
        }
        Ok(())
    }
}

/// Invalid input for a new audit record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The survey title is missing or blank.
    #[error("survey title is required")]
    EmptySurvey,

    /// The description is missing or blank.
    #[error("description is required")]
    EmptyDescription,

    /// IDs start at 1.
    #[error("audit id must be a positive integer")]
    ZeroId,
}
