// ABOUTME: Outcome ledger shared by all deploy tasks of one run.
// ABOUTME: Holds per-unit records and the completion-ordered deployed set.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;

use super::error::LedgerError;
use super::outcome::{OutcomeRecord, OutcomeStatus};
use crate::types::UnitId;

/// Concurrency-safe store of unit outcomes.
///
/// Records and the deployed set sit behind one lock, so concurrent tasks
/// never lose an update and a unit is in the deployed set iff its record is
/// `completed`. Tasks receive it by reference; it lives for one run only.
#[derive(Debug, Default)]
pub struct OutcomeLedger {
    state: Mutex<LedgerSnapshot>,
}

impl OutcomeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of `unit`. A unit can be recorded once.
    pub fn record(&self, unit: &UnitId, outcome: OutcomeRecord) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        if state.records.contains_key(unit) {
            return Err(LedgerError::DuplicateRecord(unit.clone()));
        }
        tracing::debug!(unit = %unit, status = %outcome.status, "recorded outcome");
        state.records.insert(unit.clone(), outcome);
        Ok(())
    }

    /// Append `unit` to the deployed set. Requires a `completed` record.
    pub fn mark_deployed(&self, unit: &UnitId) -> Result<(), LedgerError> {
        let mut state = self.state.lock();
        match state.records.get(unit) {
            Some(record) if record.status == OutcomeStatus::Completed => {}
            _ => return Err(LedgerError::NotCompleted(unit.clone())),
        }
        if state.deployed.contains(unit) {
            return Err(LedgerError::AlreadyDeployed(unit.clone()));
        }
        state.deployed.push(unit.clone());
        Ok(())
    }

    /// Copy of the current ledger contents.
    pub fn snapshot(&self) -> LedgerSnapshot {
        self.state.lock().clone()
    }

    /// Consume the ledger, returning its final contents.
    pub fn into_snapshot(self) -> LedgerSnapshot {
        self.state.into_inner()
    }
}

/// Owned view of a ledger at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerSnapshot {
    records: BTreeMap<UnitId, OutcomeRecord>,
    deployed: Vec<UnitId>,
}

impl LedgerSnapshot {
    pub fn get(&self, unit: &UnitId) -> Option<&OutcomeRecord> {
        self.records.get(unit)
    }

    pub fn status(&self, unit: &UnitId) -> Option<OutcomeStatus> {
        self.get(unit).map(|r| r.status)
    }

    /// Units that completed, in the order they finished.
    pub fn deployed(&self) -> &[UnitId] {
        &self.deployed
    }

    pub fn records(&self) -> impl Iterator<Item = (&UnitId, &OutcomeRecord)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(name: &str) -> UnitId {
        UnitId::new(name).unwrap()
    }

    #[test]
    fn records_once() {
        let ledger = OutcomeLedger::new();
        ledger
            .record(&unit("api"), OutcomeRecord::completed("done"))
            .unwrap();

        let err = ledger
            .record(&unit("api"), OutcomeRecord::failed("again"))
            .unwrap_err();
        assert_eq!(err, LedgerError::DuplicateRecord(unit("api")));

        // First record wins.
        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.get(&unit("api")).unwrap().info, "done");
    }

    #[test]
    fn mark_deployed_requires_completed_record() {
        let ledger = OutcomeLedger::new();
        assert_eq!(
            ledger.mark_deployed(&unit("api")),
            Err(LedgerError::NotCompleted(unit("api")))
        );

        ledger
            .record(&unit("web"), OutcomeRecord::skipped("unchanged"))
            .unwrap();
        assert_eq!(
            ledger.mark_deployed(&unit("web")),
            Err(LedgerError::NotCompleted(unit("web")))
        );
    }

    #[test]
    fn mark_deployed_once() {
        let ledger = OutcomeLedger::new();
        ledger
            .record(&unit("api"), OutcomeRecord::completed(""))
            .unwrap();
        ledger.mark_deployed(&unit("api")).unwrap();
        assert_eq!(
            ledger.mark_deployed(&unit("api")),
            Err(LedgerError::AlreadyDeployed(unit("api")))
        );
    }

    #[test]
    fn deployed_keeps_completion_order() {
        let ledger = OutcomeLedger::new();
        for name in ["zeta", "alpha", "mid"] {
            ledger
                .record(&unit(name), OutcomeRecord::completed(""))
                .unwrap();
            ledger.mark_deployed(&unit(name)).unwrap();
        }

        let snapshot = ledger.into_snapshot();
        assert_eq!(
            snapshot.deployed(),
            &[unit("zeta"), unit("alpha"), unit("mid")]
        );
    }

    #[test]
    fn concurrent_writers_do_not_lose_updates() {
        let ledger = OutcomeLedger::new();
        std::thread::scope(|s| {
            for i in 0..32 {
                let ledger = &ledger;
                s.spawn(move || {
                    let id = unit(&format!("unit-{i}"));
                    ledger.record(&id, OutcomeRecord::completed("")).unwrap();
                    ledger.mark_deployed(&id).unwrap();
                });
            }
        });

        let snapshot = ledger.snapshot();
        assert_eq!(snapshot.len(), 32);
        assert_eq!(snapshot.deployed().len(), 32);
    }
}
