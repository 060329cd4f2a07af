// ABOUTME: Deployment orchestration across many units.
// ABOUTME: Ledger, deploy and rollback tasks, scheduler, and the orchestrator.

mod classify;
mod context;
mod error;
mod ledger;
mod orchestrator;
mod outcome;
mod report;
mod rollback;
mod scheduler;
mod task;

pub use classify::{
    DeployClass, SERVICE_INFO_MARKER, STACK_UPDATED_MARKER, TIMESTAMP_MARKER, classify_deploy,
    find_rollback_version,
};
pub use context::RunContext;
pub use error::{AggregateError, DeployError, DeployErrorKind, LedgerError, Phase};
pub use ledger::{LedgerSnapshot, OutcomeLedger};
pub use orchestrator::{Orchestrator, RunState};
pub use outcome::{OutcomeRecord, OutcomeStatus};
pub use report::{Reporter, RunOutcome, SummaryEntry, summarize};
pub use rollback::RollbackTask;
pub use scheduler::Scheduler;
pub use task::DeployTask;
