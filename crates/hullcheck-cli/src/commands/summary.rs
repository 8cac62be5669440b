//! `hullcheck summary` command implementation.

use anyhow::Result;
use hullcheck_audit::AuditStore;
use hullcheck_core::{AuditStatus, StatusSummary};

/// Render the per-status counts.
pub fn render(summary: &StatusSummary) -> String {
    let mut out = String::from("Marine Compliance Dashboard\n\n");
    for status in AuditStatus::ALL {
        let label = match status {
            AuditStatus::Compliant => "on track",
            AuditStatus::Pending => "needs attention",
            AuditStatus::NonCompliant => "deficiencies found",
        };
        out.push_str(&format!(
            "  {:>4}  {:<13}  {}\n",
            summary.count(status),
            status.as_str(),
            label
        ));
    }
    out.push_str(&format!("  {:>4}  Total\n", summary.total));
    out
}

/// `hullcheck summary`
pub fn run(store: &AuditStore, json: bool) -> Result<()> {
    let summary = store.summary();
    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render(&summary));
    }
    Ok(())
}
