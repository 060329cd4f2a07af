// ABOUTME: Deploy task: runs the executor for one unit and records its outcome.
// ABOUTME: Classifies successful output as completed or skipped.

use super::classify::{DeployClass, classify_deploy};
use super::context::RunContext;
use super::error::DeployError;
use super::outcome::{OutcomeRecord, OutcomeStatus};
use crate::hooks::{HookContext, HookPoint};
use crate::sink::UnitLog;
use crate::types::Unit;

/// Deploys one unit. Writes exactly one outcome record per run.
pub struct DeployTask<'a> {
    ctx: RunContext<'a>,
    unit: &'a Unit,
    flags: &'a str,
}

impl<'a> DeployTask<'a> {
    pub fn new(ctx: RunContext<'a>, unit: &'a Unit, flags: &'a str) -> Self {
        Self { ctx, unit, flags }
    }

    /// Run the task. Executor and fatal hook failures are recorded as
    /// `failed` before they propagate.
    pub async fn run(self) -> Result<OutcomeStatus, DeployError> {
        let id = &self.unit.id;
        let hook = HookContext::new(self.unit, self.flags);

        if let Err(stderr) = self.ctx.hook(HookPoint::BeforeDeploy, &hook).await {
            let err = DeployError::Hook {
                unit: id.clone(),
                hook: HookPoint::BeforeDeploy,
                stderr,
            };
            self.ctx
                .ledger
                .record(id, OutcomeRecord::failed(err.diagnostic()))?;
            return Err(err);
        }

        tracing::info!(unit = %id, "deploying");
        let sink = self.ctx.log_sink();
        let deployed = self
            .ctx
            .executor
            .deploy(&self.unit.path, self.flags, UnitLog::new(&sink, id))
            .await;

        let output = match deployed {
            Ok(output) => output,
            Err(source) => {
                tracing::warn!(unit = %id, "deploy failed: {}", source);
                self.ctx
                    .ledger
                    .record(id, OutcomeRecord::failed(source.log()))?;
                return Err(DeployError::UnitExecution {
                    unit: id.clone(),
                    source,
                });
            }
        };

        let status = match classify_deploy(&output) {
            DeployClass::Updated { info } => {
                self.ctx.ledger.record(id, OutcomeRecord::completed(info))?;
                self.ctx.ledger.mark_deployed(id)?;
                OutcomeStatus::Completed
            }
            DeployClass::Unchanged { info } => {
                self.ctx.ledger.record(id, OutcomeRecord::skipped(info))?;
                OutcomeStatus::Skipped
            }
        };
        tracing::info!(unit = %id, status = %status, "deploy finished");

        // Advisory, so this never fails the unit.
        let _ = self.ctx.hook(HookPoint::AfterDeploy, &hook).await;
        Ok(status)
    }
}
