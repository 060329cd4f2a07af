// ABOUTME: Executor error types with SNAFU context selectors.
// ABOUTME: Every failure exposes the diagnostic text recorded for the unit.

use snafu::Snafu;
use std::time::Duration;

/// Failure of a single executor call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ExecutorError {
    #[snafu(display("executable `{program}` not found on PATH"))]
    ProgramNotFound { program: String },

    #[snafu(display("failed to run `{command}`: {source}"))]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[snafu(display("`{command}` failed ({})", describe_exit(*exit_code)))]
    CommandFailed {
        command: String,
        exit_code: Option<i32>,
        log: String,
    },

    #[snafu(display("`{command}` timed out after {}s", after.as_secs()))]
    TimedOut { command: String, after: Duration },
}

fn describe_exit(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

impl ExecutorError {
    /// Diagnostic text worth showing next to the unit in a summary.
    ///
    /// For a failed command this is the captured output; other failures fall
    /// back to their display message.
    pub fn log(&self) -> String {
        match self {
            ExecutorError::CommandFailed { log, .. } if !log.trim().is_empty() => log.clone(),
            other => other.to_string(),
        }
    }
}
