// ABOUTME: Classification of executor output by its text markers.
// ABOUTME: The only place that knows the deployment tool's log phrases.

use crate::types::RollbackVersion;

/// Printed by the executor when a unit's stack was actually updated.
/// Matched case-insensitively.
pub const STACK_UPDATED_MARKER: &str = "stack update finished";

/// Start of the human summary the executor prints after a deploy.
pub const SERVICE_INFO_MARKER: &str = "Service Information";

/// Precedes the version token in rollback output.
pub const TIMESTAMP_MARKER: &str = "Timestamp: ";

/// What a successful deploy call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployClass {
    /// The stack was updated. `info` is the service summary when present.
    Updated { info: String },
    /// Nothing changed (for example an unchanged service).
    Unchanged { info: String },
}

/// Classify the captured output of a successful deploy call.
pub fn classify_deploy(output: &str) -> DeployClass {
    let output = output.trim_end();
    if output.to_ascii_lowercase().contains(STACK_UPDATED_MARKER) {
        let info = output
            .find(SERVICE_INFO_MARKER)
            .map_or(output, |start| &output[start..]);
        DeployClass::Updated {
            info: info.to_string(),
        }
    } else {
        DeployClass::Unchanged {
            info: output.to_string(),
        }
    }
}

/// Extract the first `Timestamp: <digits>` version from rollback output.
pub fn find_rollback_version(output: &str) -> Option<RollbackVersion> {
    output.match_indices(TIMESTAMP_MARKER).find_map(|(start, _)| {
        let rest = &output[start + TIMESTAMP_MARKER.len()..];
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        RollbackVersion::new(&rest[..end]).ok()
    })
}
