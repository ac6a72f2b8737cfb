use std::fmt;

use super::models::Row;

/// Result of one transform-and-submit attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum RowOutcome {
    /// Accepted by the remote system; holds the returned URI.
    Submitted(String),
    /// Nothing sent; holds the reason (already exists, no target, ...).
    Skipped(String),
    /// Request built and logged but not sent.
    DryRun,
}

#[derive(Debug, Default, PartialEq)]
pub struct RunSummary {
    pub submitted: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &RowOutcome) {
        match outcome {
            RowOutcome::Submitted(_) | RowOutcome::DryRun => self.submitted += 1,
            RowOutcome::Skipped(_) => self.skipped += 1,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} skipped, {} failed",
            self.submitted, self.skipped, self.failed
        )
    }
}

/// Attempt `op` on every row. A failed row is logged with its index and does
/// not stop the pass.
pub fn process_rows<F>(rows: &[Row], mut op: F) -> RunSummary
where
    F: FnMut(&Row) -> anyhow::Result<RowOutcome>,
{
    let mut summary = RunSummary::default();
    for row in rows {
        match op(row) {
            Ok(outcome) => {
                if let RowOutcome::Skipped(reason) = &outcome {
                    log::info!("Row {}: skipped ({})", row.index(), reason);
                }
                summary.record(&outcome);
            }
            Err(e) => {
                log::error!("Row {}: {:#}", row.index(), e);
                summary.failed += 1;
            }
        }
    }
    summary
}
