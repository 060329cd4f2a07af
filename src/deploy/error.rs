// ABOUTME: Error types for deploy and rollback orchestration.
// ABOUTME: Per-unit errors, ledger invariant errors, and the aggregated run error.

use serde::Serialize;
use std::fmt;

use super::ledger::LedgerSnapshot;
use crate::executor::ExecutorError;
use crate::hooks::HookPoint;
use crate::types::UnitId;

/// Violations of the outcome ledger's write-once rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// A second outcome was written for the same unit.
    #[error("outcome for unit {0} was already recorded")]
    DuplicateRecord(UnitId),

    /// A unit was marked deployed without a completed outcome.
    #[error("unit {0} cannot be marked deployed without a completed outcome")]
    NotCompleted(UnitId),

    /// A unit was marked deployed twice.
    #[error("unit {0} is already marked deployed")]
    AlreadyDeployed(UnitId),
}

/// Failure of a single deploy or rollback task.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The executor failed for this unit.
    #[error("[{unit}] {source}")]
    UnitExecution {
        unit: UnitId,
        #[source]
        source: ExecutorError,
    },

    /// Rollback output carried no deployment timestamp to roll back to.
    #[error("[{unit}] cannot roll back: no deployment timestamp in rollback output")]
    CannotRollback { unit: UnitId },

    /// A fatal lifecycle hook failed.
    #[error("[{unit}] {hook} hook failed")]
    Hook {
        unit: UnitId,
        hook: HookPoint,
        stderr: String,
    },

    /// Ledger invariant violated.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    UnitExecution,
    CannotRollback,
    Hook,
    Ledger,
}

impl DeployError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::UnitExecution { .. } => DeployErrorKind::UnitExecution,
            DeployError::CannotRollback { .. } => DeployErrorKind::CannotRollback,
            DeployError::Hook { .. } => DeployErrorKind::Hook,
            DeployError::Ledger(_) => DeployErrorKind::Ledger,
        }
    }

    /// The unit this error belongs to.
    pub fn unit(&self) -> &UnitId {
        match self {
            DeployError::UnitExecution { unit, .. }
            | DeployError::CannotRollback { unit }
            | DeployError::Hook { unit, .. } => unit,
            DeployError::Ledger(
                LedgerError::DuplicateRecord(unit)
                | LedgerError::NotCompleted(unit)
                | LedgerError::AlreadyDeployed(unit),
            ) => unit,
        }
    }

    /// Diagnostic text recorded for the unit.
    pub fn diagnostic(&self) -> String {
        match self {
            DeployError::UnitExecution { source, .. } => source.log(),
            DeployError::Hook { stderr, .. } if !stderr.trim().is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

/// Which scheduling run an aggregate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Deploy,
    Rollback,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Deploy => f.write_str("deploy"),
            Phase::Rollback => f.write_str("rollback"),
        }
    }
}

/// One or more tasks of a scheduling run failed.
///
/// `errors` is in failure arrival order; `context` is the ledger as it stood
/// when scheduling stopped.
#[derive(Debug, thiserror::Error)]
#[error("{phase} failed for {} unit(s): {}", .errors.len(), unit_list(.errors))]
pub struct AggregateError {
    pub phase: Phase,
    pub errors: Vec<DeployError>,
    pub context: LedgerSnapshot,
}

fn unit_list(errors: &[DeployError]) -> String {
    errors
        .iter()
        .map(|e| e.unit().as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

impl AggregateError {
    pub fn new(phase: Phase, errors: Vec<DeployError>, context: LedgerSnapshot) -> Self {
        Self {
            phase,
            errors,
            context,
        }
    }

    /// Units whose task failed, in failure arrival order.
    pub fn failed_units(&self) -> Vec<&UnitId> {
        self.errors.iter().map(DeployError::unit).collect()
    }
}
