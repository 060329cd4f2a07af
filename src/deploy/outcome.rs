// ABOUTME: Per-unit outcome records written once by each deploy task.
// ABOUTME: A status is one of completed, skipped, or failed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Final status of one unit in one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutcomeStatus {
    /// The unit's stack was updated.
    Completed,
    /// The executor succeeded but nothing changed.
    Skipped,
    /// The executor (or a fatal hook) failed.
    Failed,
}

impl OutcomeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeStatus::Completed => "completed",
            OutcomeStatus::Skipped => "skipped",
            OutcomeStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for OutcomeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded result of one unit: a status plus the output excerpt worth
/// showing in a summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    pub status: OutcomeStatus,
    pub info: String,
}

impl OutcomeRecord {
    pub fn completed(info: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Completed,
            info: info.into(),
        }
    }

    pub fn skipped(info: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Skipped,
            info: info.into(),
        }
    }

    pub fn failed(info: impl Into<String>) -> Self {
        Self {
            status: OutcomeStatus::Failed,
            info: info.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&OutcomeRecord::skipped("nothing changed")).unwrap();
        assert_eq!(json, r#"{"status":"skipped","info":"nothing changed"}"#);
    }
}
