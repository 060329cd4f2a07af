// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted executor and a recording reporter for integration tests.

use async_trait::async_trait;
use convoy::deploy::{Reporter, RunOutcome, SummaryEntry};
use convoy::executor::{ExecutorError, UnitExecutor};
use convoy::sink::UnitLog;
use convoy::types::{RollbackVersion, Unit, UnitId};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Once;
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("convoy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A unit named `name` living in a fake workspace.
#[allow(dead_code)]
pub fn unit(name: &str) -> Unit {
    Unit::new(UnitId::new(name).unwrap(), Path::new("/workspace").join(name))
}

#[allow(dead_code)]
pub fn units(names: &[&str]) -> Vec<Unit> {
    names.iter().map(|name| unit(name)).collect()
}

/// Canned response for one executor call.
#[derive(Debug, Clone)]
pub struct Script {
    output: Result<String, String>,
    delay: Option<Duration>,
}

#[allow(dead_code)]
impl Script {
    pub fn ok(output: &str) -> Self {
        Self {
            output: Ok(output.to_string()),
            delay: None,
        }
    }

    pub fn fail(log: &str) -> Self {
        Self {
            output: Err(log.to_string()),
            delay: None,
        }
    }

    /// Deploy output that reports a stack update.
    pub fn updated(name: &str) -> Self {
        Self::ok(&format!(
            "Serverless: Packaging service...\n\
             Serverless: Stack update finished...\n\
             Service Information\n\
             service: {name}\n\
             stage: dev"
        ))
    }

    /// Deploy output for a unit with nothing to change.
    pub fn unchanged() -> Self {
        Self::ok("Serverless: Service files not changed. Skipping deployment...")
    }

    /// Rollback listing naming the previous deployment.
    pub fn timestamp(version: &str) -> Self {
        Self::ok(&format!(
            "Serverless: Datetime: 2020-05-01T10:00:00.000Z\n\
             Serverless: Timestamp: {version}\n\
             Serverless: Files:"
        ))
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// One call the executor received, in start order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Deploy { unit: String, flags: String },
    RollbackLatest { unit: String },
    RollbackTo { unit: String, version: String },
}

/// Executor answering from per-unit scripts and recording every call.
///
/// Units are keyed by their directory name. Unscripted deploys report an
/// update, unscripted rollback listings name timestamp `1588327200000`.
#[derive(Default)]
pub struct FakeExecutor {
    deploys: HashMap<String, Script>,
    rollbacks: HashMap<String, Script>,
    versioned: HashMap<String, Script>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl FakeExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn deploy(mut self, unit: &str, script: Script) -> Self {
        self.deploys.insert(unit.to_string(), script);
        self
    }

    pub fn rollback(mut self, unit: &str, script: Script) -> Self {
        self.rollbacks.insert(unit.to_string(), script);
        self
    }

    pub fn rollback_to(mut self, unit: &str, script: Script) -> Self {
        self.versioned.insert(unit.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn deployed_units(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Deploy { unit, .. } => Some(unit),
                _ => None,
            })
            .collect()
    }

    pub fn rolled_back_units(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::RollbackLatest { unit } => Some(unit),
                _ => None,
            })
            .collect()
    }

    pub fn versioned_rollbacks(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::RollbackTo { unit, version } => Some((unit, version)),
                _ => None,
            })
            .collect()
    }

    async fn answer(
        &self,
        script: Script,
        command: &str,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        match script.delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }

        let text = match &script.output {
            Ok(text) | Err(text) => text,
        };
        for line in text.lines() {
            log.line(line);
        }

        script.output.map_err(|log| ExecutorError::CommandFailed {
            command: command.to_string(),
            exit_code: Some(1),
            log,
        })
    }
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| ".".to_string())
}

#[async_trait]
impl UnitExecutor for FakeExecutor {
    async fn deploy(
        &self,
        path: &Path,
        flags: &str,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let unit = dir_name(path);
        self.calls.lock().push(Call::Deploy {
            unit: unit.clone(),
            flags: flags.to_string(),
        });
        let script = self
            .deploys
            .get(&unit)
            .cloned()
            .unwrap_or_else(|| Script::updated(&unit));
        self.answer(script, "sls deploy", log).await
    }

    async fn rollback_latest(
        &self,
        path: &Path,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let unit = dir_name(path);
        self.calls
            .lock()
            .push(Call::RollbackLatest { unit: unit.clone() });
        let script = self
            .rollbacks
            .get(&unit)
            .cloned()
            .unwrap_or_else(|| Script::timestamp("1588327200000"));
        self.answer(script, "sls rollback", log).await
    }

    async fn rollback_to_version(
        &self,
        path: &Path,
        version: &RollbackVersion,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let unit = dir_name(path);
        self.calls.lock().push(Call::RollbackTo {
            unit: unit.clone(),
            version: version.to_string(),
        });
        let script = self
            .versioned
            .get(&unit)
            .cloned()
            .unwrap_or_else(|| Script::ok("Serverless: Successfully rolled back"));
        self.answer(script, "sls rollback -t", log).await
    }
}

/// Reporter that keeps everything it is told.
#[derive(Default)]
pub struct RecordingReporter {
    summaries: Mutex<Vec<(RunOutcome, Vec<SummaryEntry>)>>,
    warnings: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingReporter {
    pub fn summaries(&self) -> Vec<(RunOutcome, Vec<SummaryEntry>)> {
        self.summaries.lock().clone()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().clone()
    }
}

impl Reporter for RecordingReporter {
    fn summary(&self, outcome: RunOutcome, entries: &[SummaryEntry]) {
        self.summaries.lock().push((outcome, entries.to_vec()));
    }

    fn warning(&self, message: &str) {
        self.warnings.lock().push(message.to_string());
    }
}
