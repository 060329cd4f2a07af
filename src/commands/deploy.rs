// ABOUTME: Deploy command implementation.
// ABOUTME: Discovers units, wires executor, hooks and sinks, and runs the orchestrator.

use convoy::config::{Config, RunOverrides};
use convoy::deploy::Orchestrator;
use convoy::diagnostics::WarningKind;
use convoy::discovery;
use convoy::error::{Error, Result};
use convoy::executor::CommandExecutor;
use convoy::hooks::HookRunner;
use convoy::output::Output;
use convoy::sink::{FileSink, LogSink, NullSink};
use std::path::Path;

/// What the user asked the deploy command to do.
pub struct DeployRequest {
    pub service: Option<String>,
    pub flags: String,
    pub overrides: RunOverrides,
}

/// Deploy the selected units of the workspace rooted at `cwd`.
pub async fn deploy(cwd: &Path, request: DeployRequest, mut output: Output) -> Result<()> {
    output.start_timer();
    let config = Config::discover(cwd)?;

    let discovered = discovery::discover(cwd, config.manifests.iter())?;
    if discovered.is_empty() {
        return Err(Error::NoUnitsFound(cwd.to_path_buf()));
    }
    let units = discovery::select_units(&discovered, request.service.as_deref())?;

    let run_config = config.run_config().with_overrides(request.overrides);
    let executor = CommandExecutor::new(&config.command).timeout(config.command_timeout);
    let hooks = HookRunner::with_dir(config.hooks_dir(cwd));

    let sink: Box<dyn LogSink> = match config.log_file(cwd) {
        Some(path) => Box::new(FileSink::open(&path)?),
        None => Box::new(NullSink),
    };

    output.progress(&format!(
        "Deploying {} unit(s) with {}",
        units.len(),
        config.command
    ));

    let orchestrator = Orchestrator::new(&executor)
        .with_hooks(&hooks)
        .with_reporter(&output);

    let result = orchestrator
        .deploy_all(&units, &request.flags, &run_config, sink.as_ref())
        .await;

    // Rollback failures already went through the reporter.
    for warning in orchestrator.warnings() {
        if warning.kind == WarningKind::HookFailed {
            output.warning(&warning.message);
        }
    }

    result?;
    output.success("Deployment complete!");
    Ok(())
}
