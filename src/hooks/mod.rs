// ABOUTME: Hooks system for per-unit deploy and rollback lifecycle events.
// ABOUTME: Discovers and executes shell scripts before and after each unit operation.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

use crate::types::{Unit, UnitId};

/// Default hooks location, relative to the workspace root.
pub const HOOKS_DIR: &str = ".convoy/hooks";

/// Hook execution points in a unit's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPoint {
    /// Before the unit deploys. Failure fails the unit.
    BeforeDeploy,
    /// After the unit deployed or was skipped. Failure logs a warning.
    AfterDeploy,
    /// Before the unit rolls back. Failure fails the unit's rollback.
    BeforeRollback,
    /// After the unit rolled back. Failure logs a warning.
    AfterRollback,
}

impl HookPoint {
    /// Get the hook filename for this point.
    pub fn filename(&self) -> &'static str {
        match self {
            HookPoint::BeforeDeploy => "before-deploy",
            HookPoint::AfterDeploy => "after-deploy",
            HookPoint::BeforeRollback => "before-rollback",
            HookPoint::AfterRollback => "after-rollback",
        }
    }

    /// Whether failure at this hook point should fail the unit.
    pub fn is_fatal(&self) -> bool {
        matches!(self, HookPoint::BeforeDeploy | HookPoint::BeforeRollback)
    }
}

impl fmt::Display for HookPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.filename())
    }
}

/// Context passed to hooks via environment variables.
#[derive(Debug, Clone)]
pub struct HookContext {
    pub unit: UnitId,
    pub path: PathBuf,
    pub flags: String,
}

impl HookContext {
    pub fn new(unit: &Unit, flags: &str) -> Self {
        Self {
            unit: unit.id.clone(),
            path: unit.path.clone(),
            flags: flags.to_string(),
        }
    }

    /// Convert context to environment variables.
    pub fn to_env(&self, point: HookPoint) -> HashMap<String, String> {
        let mut env = HashMap::new();
        env.insert("CONVOY_UNIT".to_string(), self.unit.to_string());
        env.insert(
            "CONVOY_UNIT_PATH".to_string(),
            self.path.display().to_string(),
        );
        env.insert("CONVOY_FLAGS".to_string(), self.flags.clone());
        env.insert("CONVOY_PHASE".to_string(), point.filename().to_string());
        env
    }
}

/// Result of running a hook.
#[derive(Debug)]
pub struct HookResult {
    pub success: bool,
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

/// Discovers and runs hooks from a hooks directory.
#[derive(Debug, Clone)]
pub struct HookRunner {
    hooks_dir: PathBuf,
}

impl HookRunner {
    /// Create a hook runner looking in `.convoy/hooks` under the workspace root.
    pub fn new(workspace: &Path) -> Self {
        Self::with_dir(workspace.join(HOOKS_DIR))
    }

    /// Create a hook runner for an explicit hooks directory.
    pub fn with_dir(hooks_dir: impl Into<PathBuf>) -> Self {
        Self {
            hooks_dir: hooks_dir.into(),
        }
    }

    /// Check if a hook exists for the given point.
    pub fn hook_exists(&self, point: HookPoint) -> bool {
        self.hook_path(point).is_file()
    }

    fn hook_path(&self, point: HookPoint) -> PathBuf {
        self.hooks_dir.join(point.filename())
    }

    /// Run a hook if it exists, with the unit directory as working directory.
    ///
    /// Returns None if the hook doesn't exist, or Some(HookResult) if it was run.
    pub async fn run(&self, point: HookPoint, context: &HookContext) -> Option<HookResult> {
        let hook_path = self.hook_path(point);

        if !hook_path.is_file() {
            return None;
        }

        tracing::info!(
            unit = %context.unit,
            "Running {} hook: {}",
            point,
            hook_path.display()
        );

        let output = Command::new(&hook_path)
            .envs(context.to_env(point))
            .current_dir(&context.path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await;

        match output {
            Ok(output) => {
                let result = HookResult {
                    success: output.status.success(),
                    exit_code: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if result.success {
                    tracing::info!(unit = %context.unit, "{} hook completed successfully", point);
                } else {
                    tracing::warn!(
                        unit = %context.unit,
                        "{} hook failed with exit code {:?}",
                        point,
                        result.exit_code
                    );
                }

                Some(result)
            }
            Err(e) => {
                tracing::error!(unit = %context.unit, "Failed to execute {} hook: {}", point, e);
                Some(HookResult {
                    success: false,
                    exit_code: None,
                    stdout: String::new(),
                    stderr: e.to_string(),
                })
            }
        }
    }
}
