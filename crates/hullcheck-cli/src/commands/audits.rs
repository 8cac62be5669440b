//! Audit record commands.
//!
//! `hullcheck list | show | add | status | toggle | delete | reset`

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use serde::Serialize;

use hullcheck_audit::{AuditStore, Confirm, DeleteOutcome};
use hullcheck_core::{AuditFilter, AuditId, AuditRecord, AuditStatus, NewAudit, ValidationError};

/// JSON shape of `list --json`.
#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    shown: usize,
    total: usize,
    audits: Vec<&'a AuditRecord>,
}

/// Render the compliance table for a filtered view.
pub fn render_table(records: &[&AuditRecord], total: usize, filter: &AuditFilter) -> String {
    let mut out = format!("Compliance Overview ({} of {})\n", records.len(), total);

    if records.is_empty() {
        out.push_str(if filter.is_active() {
            "No matching audits found.\n"
        } else {
            "No audits yet. Add one with `hullcheck add`.\n"
        });
        return out;
    }

    let survey_width = records
        .iter()
        .map(|r| r.survey.chars().count())
        .max()
        .unwrap_or(0)
        .max("SURVEY".len());

    out.push_str(&format!(
        "{:>6}  {:<survey_width$}  {:<13}  {}\n",
        "ID", "SURVEY", "STATUS", "DATE"
    ));
    for record in records {
        out.push_str(&format!(
            "{:>6}  {:<survey_width$}  {:<13}  {}\n",
            record.id,
            record.survey,
            record.status.as_str(),
            record.date.format("%Y-%m-%d"),
        ));
    }

    if filter.is_active() {
        out.push_str(&format!("\nShowing {} results\n", records.len()));
    }

    out
}

/// `hullcheck list`
pub fn list(store: &AuditStore, filter: &AuditFilter, json: bool) -> Result<()> {
    let shown = filter.apply(store.list());

    if json {
        let output = ListOutput {
            shown: shown.len(),
            total: store.len(),
            audits: shown,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_table(&shown, store.len(), filter));
    }

    Ok(())
}

/// `hullcheck show <id>`
pub fn show(store: &AuditStore, id: AuditId) -> Result<()> {
    match store.get(id) {
        Some(record) => println!("{}", serde_json::to_string_pretty(record)?),
        None => println!("No audit #{}", id),
    }
    Ok(())
}

/// Fields collected by `hullcheck add`.
#[derive(Debug, Clone)]
pub struct AddArgs {
    pub id: Option<AuditId>,
    pub survey: String,
    pub status: AuditStatus,
    pub date: NaiveDate,
    pub description: String,
}

impl AddArgs {
    /// Form validation, applied before the store sees the input.
    pub fn into_new_audit(self) -> Result<NewAudit> {
        let description = self.description.trim();
        if description.is_empty() {
            bail!(ValidationError::EmptyDescription);
        }

        let input = NewAudit {
            id: self.id,
            survey: self.survey.trim().to_string(),
            status: self.status,
            date: self.date,
            description: description.to_string(),
        };
        input.validate().context("invalid audit")?;
        Ok(input)
    }
}

/// `hullcheck add`
pub async fn add(store: &mut AuditStore, args: AddArgs) -> Result<AuditRecord> {
    let input = args.into_new_audit()?;
    let record = store.add(input).await?;

    println!(
        "✔ Added audit #{}: {} ({})",
        record.id, record.survey, record.status
    );
    Ok(record)
}

/// `hullcheck status <id> <status>`
pub async fn set_status(store: &mut AuditStore, id: AuditId, status: AuditStatus) -> Result<()> {
    if store.update_status(id, status).await? {
        println!("✔ Audit #{} is now {}", id, status);
    } else {
        println!("No audit #{}; nothing changed", id);
    }
    Ok(())
}

/// `hullcheck toggle <id>`
pub async fn toggle(store: &mut AuditStore, id: AuditId) -> Result<()> {
    if store.toggle_status(id).await? {
        if let Some(record) = store.get(id) {
            println!("✔ Audit #{} is now {}", id, record.status);
        }
    } else {
        println!("No audit #{}; nothing changed", id);
    }
    Ok(())
}

/// `hullcheck delete <id>`
pub async fn delete(store: &mut AuditStore, id: AuditId, confirm: &dyn Confirm) -> Result<()> {
    match store.delete(id, confirm).await? {
        DeleteOutcome::Deleted => println!("✔ Deleted audit #{}", id),
        DeleteOutcome::NotFound => println!("No audit #{}; nothing changed", id),
        DeleteOutcome::Cancelled => println!("Cancelled"),
    }
    Ok(())
}

/// `hullcheck reset`
pub async fn reset(store: &mut AuditStore, confirm: &dyn Confirm) -> Result<()> {
    if !confirm.confirm("Replace all audits with the default dataset?") {
        println!("Cancelled");
        return Ok(());
    }

    store.reset_to_defaults().await?;
    println!("✔ Restored {} default audits", store.len());
    Ok(())
}
