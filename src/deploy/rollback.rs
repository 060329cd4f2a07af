// ABOUTME: Rollback task: returns one deployed unit to its previous version.
// ABOUTME: Discovers the version from a first rollback call, then targets it.

use super::classify::find_rollback_version;
use super::context::RunContext;
use super::error::DeployError;
use crate::hooks::{HookContext, HookPoint};
use crate::sink::UnitLog;
use crate::types::{RollbackVersion, Unit};

/// Rolls back one unit that deployed during this run.
///
/// The executor has no way to list versions, so the output of a plain
/// rollback call is the only source of the version to target:
/// 1. roll back to latest, capturing output
/// 2. find `Timestamp: <digits>` in that output
/// 3. roll back again, explicitly targeting that version
///
/// Never touches the ledger.
pub struct RollbackTask<'a> {
    ctx: RunContext<'a>,
    unit: &'a Unit,
}

impl<'a> RollbackTask<'a> {
    pub fn new(ctx: RunContext<'a>, unit: &'a Unit) -> Self {
        Self { ctx, unit }
    }

    /// Run the task, returning the version the unit was rolled back to.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - the before-rollback hook fails
    /// - either executor call fails
    /// - the first call's output has no timestamp (`CannotRollback`); the
    ///   version-targeted call is then never made
    pub async fn run(self) -> Result<RollbackVersion, DeployError> {
        let id = &self.unit.id;
        let hook = HookContext::new(self.unit, "");

        if let Err(stderr) = self.ctx.hook(HookPoint::BeforeRollback, &hook).await {
            return Err(DeployError::Hook {
                unit: id.clone(),
                hook: HookPoint::BeforeRollback,
                stderr,
            });
        }

        let sink = self.ctx.log_sink();
        let log = UnitLog::new(&sink, id);
        let executor = self.ctx.executor;
        let execution = |source| DeployError::UnitExecution {
            unit: id.clone(),
            source,
        };

        tracing::info!(unit = %id, "rolling back");
        let discovery = executor
            .rollback_latest(&self.unit.path, log)
            .await
            .map_err(execution)?;

        let version = find_rollback_version(&discovery)
            .ok_or_else(|| DeployError::CannotRollback { unit: id.clone() })?;

        tracing::info!(unit = %id, version = %version, "rolling back to version");
        executor
            .rollback_to_version(&self.unit.path, &version, log)
            .await
            .map_err(execution)?;

        let _ = self.ctx.hook(HookPoint::AfterRollback, &hook).await;
        Ok(version)
    }
}
