//! CLI command implementations for Hullcheck.

pub mod audits;
pub mod summary;

use hullcheck_audit::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on stderr and reads a y/N answer from stdin.
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        eprint!("{} [y/N] ", prompt);
        if let Err(e) = io::stderr().flush() {
            tracing::debug!(error = %e, "Failed to flush confirmation prompt");
        }

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        is_yes(&answer)
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
