// ABOUTME: Output formatting for CLI feedback and run summaries.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::deploy::{Reporter, RunOutcome, SummaryEntry};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
#[derive(Debug)]
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => self.emit(&JsonEvent {
                event: "success",
                message,
                duration_secs: self.duration(),
            }),
        }
    }

    /// Print a warning message.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Warning: {message}");
            }
            OutputMode::Json => self.emit_err(&JsonEvent {
                event: "warning",
                message,
                duration_secs: self.duration(),
            }),
        }
    }

    fn emit<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    }

    fn emit_err<T: Serialize>(&self, event: &T) {
        if let Ok(json) = serde_json::to_string(event) {
            eprintln!("{json}");
        }
    }
}

impl Reporter for Output {
    fn summary(&self, outcome: RunOutcome, entries: &[SummaryEntry]) {
        match self.mode {
            OutputMode::Normal => {
                println!("{}", render_summary(outcome, entries));
            }
            OutputMode::Quiet => {
                for entry in entries {
                    println!("{} {}", entry.unit, entry.status);
                }
            }
            OutputMode::Json => self.emit(&JsonSummary {
                event: "summary",
                outcome,
                units: entries,
            }),
        }
    }

    fn warning(&self, message: &str) {
        Output::warning(self, message);
    }
}

/// Human summary: a headline, then `[unit] [status]:` followed by its info.
pub fn render_summary(outcome: RunOutcome, entries: &[SummaryEntry]) -> String {
    let headline = match outcome {
        RunOutcome::Completed => "Deployment completed successfully",
        RunOutcome::Failed => "Deployment failed",
    };

    let mut out = format!("{headline}\n");
    for entry in entries {
        out.push_str(&format!("\n[{}] [{}]:\n", entry.unit, entry.status));
        if !entry.info.is_empty() {
            out.push_str(&entry.info);
            out.push('\n');
        }
    }
    out
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    event: &'a str,
    outcome: RunOutcome,
    units: &'a [SummaryEntry],
}
