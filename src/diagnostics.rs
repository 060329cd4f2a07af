// ABOUTME: Diagnostics accumulator for non-fatal warnings during a run.
// ABOUTME: Collects warnings that shouldn't change the run's result but should be shown to users.

/// Collects non-fatal warnings during deploy and rollback runs.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    /// Get all collected warnings.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Create a rollback sweep failure warning.
    pub fn rollback_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::RollbackFailed,
            message: message.into(),
        }
    }

    /// Create an advisory hook failure warning.
    pub fn hook_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::HookFailed,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// One or more units failed to roll back after a failed deploy.
    RollbackFailed,
    /// An after-deploy or after-rollback hook failed.
    HookFailed,
}
