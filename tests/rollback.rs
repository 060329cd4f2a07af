// ABOUTME: Integration tests for the rollback task on its own.
// ABOUTME: Tests version discovery, the targeted second call, and ledger isolation.

mod support;

use convoy::config::RunConfig;
use convoy::deploy::{DeployErrorKind, OutcomeLedger, RollbackTask, RunContext};
use convoy::diagnostics::Diagnostics;
use convoy::sink::NullSink;
use parking_lot::Mutex;
use support::{Call, FakeExecutor, Script, unit};

struct Harness {
    ledger: OutcomeLedger,
    diagnostics: Mutex<Diagnostics>,
    config: RunConfig,
}

impl Harness {
    fn new() -> Self {
        Self {
            ledger: OutcomeLedger::new(),
            diagnostics: Mutex::new(Diagnostics::default()),
            config: RunConfig::default(),
        }
    }

    fn context<'a>(&'a self, executor: &'a FakeExecutor) -> RunContext<'a> {
        RunContext {
            executor,
            sink: &NullSink,
            hooks: None,
            ledger: &self.ledger,
            diagnostics: &self.diagnostics,
            config: &self.config,
        }
    }
}

#[tokio::test]
async fn rolls_back_to_discovered_timestamp() {
    let executor = FakeExecutor::new().rollback(
        "api",
        Script::ok("Serverless: Timestamp: 1537348800123\nServerless: Files:\n- sls.zip"),
    );
    let harness = Harness::new();
    let api = unit("api");

    let version = RollbackTask::new(harness.context(&executor), &api)
        .run()
        .await
        .unwrap();

    assert_eq!(version.as_str(), "1537348800123");
    assert_eq!(
        executor.calls(),
        vec![
            Call::RollbackLatest {
                unit: "api".to_string()
            },
            Call::RollbackTo {
                unit: "api".to_string(),
                version: "1537348800123".to_string()
            },
        ]
    );
}

#[tokio::test]
async fn first_timestamp_wins() {
    let executor =
        FakeExecutor::new().rollback("api", Script::ok("Timestamp: 200\nTimestamp: 100"));
    let harness = Harness::new();
    let api = unit("api");

    let version = RollbackTask::new(harness.context(&executor), &api)
        .run()
        .await
        .unwrap();
    assert_eq!(version.as_str(), "200");
}

#[tokio::test]
async fn no_timestamp_is_cannot_roll_back() {
    let executor = FakeExecutor::new().rollback("api", Script::ok("Serverless: nothing here"));
    let harness = Harness::new();
    let api = unit("api");

    let err = RollbackTask::new(harness.context(&executor), &api)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::CannotRollback);
    assert_eq!(err.unit().as_str(), "api");
    assert!(executor.versioned_rollbacks().is_empty());
}

#[tokio::test]
async fn failed_discovery_call_is_unit_execution_error() {
    let executor = FakeExecutor::new().rollback("api", Script::fail("stack not found"));
    let harness = Harness::new();
    let api = unit("api");

    let err = RollbackTask::new(harness.context(&executor), &api)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::UnitExecution);
    assert_eq!(err.diagnostic(), "stack not found");
}

#[tokio::test]
async fn failed_targeted_call_is_unit_execution_error() {
    let executor = FakeExecutor::new().rollback_to("api", Script::fail("version gone"));
    let harness = Harness::new();
    let api = unit("api");

    let err = RollbackTask::new(harness.context(&executor), &api)
        .run()
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::UnitExecution);
    assert_eq!(executor.versioned_rollbacks().len(), 1);
}

#[tokio::test]
async fn rollback_never_touches_the_ledger() {
    let executor = FakeExecutor::new();
    let harness = Harness::new();

    for name in ["api", "web"] {
        let target = unit(name);
        RollbackTask::new(harness.context(&executor), &target)
            .run()
            .await
            .unwrap();
    }

    assert!(harness.ledger.snapshot().is_empty());
    assert_eq!(executor.versioned_rollbacks().len(), 2);
}
