// ABOUTME: Shared per-run context handed to every deploy and rollback task.
// ABOUTME: Borrowed collaborators plus the run's ledger and diagnostics.

use parking_lot::Mutex;

use super::ledger::OutcomeLedger;
use crate::config::RunConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::executor::UnitExecutor;
use crate::hooks::{HookContext, HookPoint, HookRunner};
use crate::sink::{Echo, LogSink};

/// Everything a task needs besides its unit. Created fresh for each run.
#[derive(Clone, Copy)]
pub struct RunContext<'a> {
    pub executor: &'a dyn UnitExecutor,
    pub sink: &'a dyn LogSink,
    pub hooks: Option<&'a HookRunner>,
    pub ledger: &'a OutcomeLedger,
    pub diagnostics: &'a Mutex<Diagnostics>,
    pub config: &'a RunConfig,
}

impl<'a> RunContext<'a> {
    /// Sink for task output, echoing to the console on verbose runs.
    pub(crate) fn log_sink(&self) -> Echo<&'a dyn LogSink> {
        Echo::new(self.sink, self.config.verbose)
    }

    /// Run the hook at `point`. A failed fatal hook returns its stderr; a
    /// failed advisory hook is recorded as a warning and the task goes on.
    pub(crate) async fn hook(&self, point: HookPoint, hook: &HookContext) -> Result<(), String> {
        let Some(hooks) = self.hooks else {
            return Ok(());
        };
        let Some(result) = hooks.run(point, hook).await else {
            return Ok(());
        };
        if result.success {
            return Ok(());
        }

        if point.is_fatal() {
            return Err(result.stderr);
        }
        self.diagnostics.lock().warn(Warning::hook_failed(format!(
            "{} hook failed for {}",
            point, hook.unit
        )));
        Ok(())
    }
}
