// ABOUTME: Reporter seam for the end-of-run summary.
// ABOUTME: The orchestrator hands the final per-unit listing to a reporter.

use serde::Serialize;

use super::ledger::LedgerSnapshot;
use super::outcome::OutcomeStatus;
use crate::types::{Unit, UnitId};

/// Whether a run as a whole succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    Completed,
    Failed,
}

/// One line of the final listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryEntry {
    pub unit: UnitId,
    pub status: OutcomeStatus,
    pub info: String,
}

/// Receives the final listing of a run for display.
pub trait Reporter: Send + Sync {
    fn summary(&self, outcome: RunOutcome, entries: &[SummaryEntry]);

    /// Advisory message that does not change the run's result.
    fn warning(&self, message: &str);
}

/// Summary entries for `units` in submission order. Units that never ran
/// have no record and are left out.
pub fn summarize(units: &[Unit], ledger: &LedgerSnapshot) -> Vec<SummaryEntry> {
    units
        .iter()
        .filter_map(|unit| {
            ledger.get(&unit.id).map(|record| SummaryEntry {
                unit: unit.id.clone(),
                status: record.status,
                info: record.info.clone(),
            })
        })
        .collect()
}
