// ABOUTME: Deployment orchestrator: deploys every unit, then rolls back on failure.
// ABOUTME: The deploy failure is always what the caller sees, never a rollback failure.

use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::context::RunContext;
use super::error::{AggregateError, Phase};
use super::ledger::{LedgerSnapshot, OutcomeLedger};
use super::report::{Reporter, RunOutcome, summarize};
use super::rollback::RollbackTask;
use super::scheduler::Scheduler;
use super::task::DeployTask;
use crate::config::RunConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::executor::UnitExecutor;
use crate::hooks::HookRunner;
use crate::sink::LogSink;
use crate::types::{Unit, UnitId};

/// Lifecycle of one `deploy_all` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Deploying,
    /// Terminal: every unit deployed or was skipped.
    DeployedOk,
    RollingBack,
    /// Terminal: the deploy phase failed (with or without a rollback sweep).
    FailedFinal,
}

/// Coordinates deploy and rollback runs over a set of units.
pub struct Orchestrator<'a> {
    executor: &'a dyn UnitExecutor,
    hooks: Option<&'a HookRunner>,
    reporter: Option<&'a dyn Reporter>,
    state: Mutex<RunState>,
    diagnostics: Mutex<Diagnostics>,
}

impl<'a> Orchestrator<'a> {
    pub fn new(executor: &'a dyn UnitExecutor) -> Self {
        Self {
            executor,
            hooks: None,
            reporter: None,
            state: Mutex::new(RunState::Idle),
            diagnostics: Mutex::new(Diagnostics::default()),
        }
    }

    pub fn with_hooks(mut self, hooks: &'a HookRunner) -> Self {
        self.hooks = Some(hooks);
        self
    }

    pub fn with_reporter(mut self, reporter: &'a dyn Reporter) -> Self {
        self.reporter = Some(reporter);
        self
    }

    /// State reached by the most recent run.
    pub fn state(&self) -> RunState {
        *self.state.lock()
    }

    /// Advisory warnings from the most recent run (hook and rollback failures).
    pub fn warnings(&self) -> Vec<Warning> {
        self.diagnostics.lock().warnings().to_vec()
    }

    fn enter(&self, state: RunState) {
        tracing::debug!(?state, "orchestrator state");
        *self.state.lock() = state;
    }

    /// Deploy `units`, rolling back what deployed if the run fails and
    /// `rollback_on_failure` is set.
    ///
    /// Resolves with the final ledger. On failure, rejects with the deploy
    /// phase's aggregate whatever happens during rollback: a failed rollback
    /// sweep is only logged and recorded as a warning.
    pub async fn deploy_all(
        &self,
        units: &[Unit],
        flags: &str,
        config: &RunConfig,
        sink: &dyn LogSink,
    ) -> Result<LedgerSnapshot, AggregateError> {
        self.enter(RunState::Idle);
        *self.diagnostics.lock() = Diagnostics::default();

        let ledger = OutcomeLedger::new();
        let ctx = RunContext {
            executor: self.executor,
            sink,
            hooks: self.hooks,
            ledger: &ledger,
            diagnostics: &self.diagnostics,
            config,
        };

        self.enter(RunState::Deploying);
        tracing::info!(
            units = units.len(),
            concurrency = ?config.concurrency,
            "deploying"
        );

        let deploy = Scheduler::new(config.concurrency, config.exit_on_failure);
        let tasks: Vec<_> = units
            .iter()
            .map(|unit| DeployTask::new(ctx, unit, flags).run())
            .collect();
        let result = deploy.run(tasks).await;
        let context = ledger.snapshot();

        let errors = match result {
            Ok(()) => {
                tracing::info!("deployment completed successfully");
                self.report(RunOutcome::Completed, units, &context);
                self.enter(RunState::DeployedOk);
                return Ok(context);
            }
            Err(errors) => errors,
        };

        tracing::warn!("deployment failed");
        self.report(RunOutcome::Failed, units, &context);
        let failure = AggregateError::new(Phase::Deploy, errors, context);

        if config.rollback_on_failure {
            match NonEmpty::from_slice(failure.context.deployed()) {
                Some(deployed) => self.roll_back(units, &deployed, &failure.context, ctx).await,
                None => tracing::info!("nothing deployed, skipping rollback"),
            }
        }

        self.enter(RunState::FailedFinal);
        Err(failure)
    }

    /// Roll back every deployed unit. Every unit is attempted regardless of
    /// sibling failures; failures are advisory.
    async fn roll_back(
        &self,
        units: &[Unit],
        deployed: &NonEmpty<UnitId>,
        context: &LedgerSnapshot,
        ctx: RunContext<'_>,
    ) {
        self.enter(RunState::RollingBack);
        tracing::info!(units = deployed.len(), "rolling back");

        let by_id: HashMap<&UnitId, &Unit> = units.iter().map(|u| (&u.id, u)).collect();
        let targets: Vec<&Unit> = deployed
            .iter()
            .filter_map(|id| by_id.get(id).copied())
            .collect();

        let rollback = Scheduler::new(ctx.config.concurrency, false);
        let tasks: Vec<_> = targets
            .into_iter()
            .map(|unit| RollbackTask::new(ctx, unit).run())
            .collect();

        match rollback.run(tasks).await {
            Ok(()) => tracing::info!("rollback completed"),
            Err(errors) => {
                let err = AggregateError::new(Phase::Rollback, errors, context.clone());
                tracing::error!("{}", err);
                for e in &err.errors {
                    tracing::error!(unit = %e.unit(), "{}", e.diagnostic());
                }
                let message = err.to_string();
                self.diagnostics
                    .lock()
                    .warn(Warning::rollback_failed(message.clone()));
                if let Some(reporter) = self.reporter {
                    reporter.warning(&message);
                }
            }
        }
    }

    fn report(&self, outcome: RunOutcome, units: &[Unit], context: &LedgerSnapshot) {
        if let Some(reporter) = self.reporter {
            reporter.summary(outcome, &summarize(units, context));
        }
    }
}
