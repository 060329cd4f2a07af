// ABOUTME: Per-run configuration handed to the orchestrator.
// ABOUTME: Concurrency mode, abort and rollback policies, verbosity.

use serde::Deserialize;

/// How the scheduler runs a batch of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Concurrency {
    /// Start every task at once.
    #[default]
    Parallel,
    /// One task at a time, in order.
    Sequential,
}

/// Immutable settings for one orchestration call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunConfig {
    pub concurrency: Concurrency,
    /// Stop starting deploy tasks after the first failure.
    pub exit_on_failure: bool,
    /// Roll back units that deployed when the run fails.
    pub rollback_on_failure: bool,
    /// Stream executor output to the console. Presentation only.
    pub verbose: bool,
}

/// Command-line switches layered over the project file. A switch can only
/// turn a behavior on.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOverrides {
    pub run_in_band: bool,
    pub exit_on_failure: bool,
    pub rollback_on_failure: bool,
    pub verbose: bool,
}

impl RunConfig {
    pub fn with_overrides(mut self, overrides: RunOverrides) -> Self {
        if overrides.run_in_band {
            self.concurrency = Concurrency::Sequential;
        }
        self.exit_on_failure |= overrides.exit_on_failure;
        self.rollback_on_failure |= overrides.rollback_on_failure;
        self.verbose |= overrides.verbose;
        self
    }
}
