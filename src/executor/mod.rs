// ABOUTME: The unit executor seam: runs deploy and rollback for one unit.
// ABOUTME: convoy never deploys anything itself, it delegates to an executor.

mod command;
mod error;

pub use command::{CommandExecutor, DEFAULT_PROGRAM, find_program};
pub use error::ExecutorError;

use async_trait::async_trait;
use std::path::Path;

use crate::sink::UnitLog;
use crate::types::RollbackVersion;

/// Runs the external deployment tool for a single unit.
///
/// Each call returns the full captured output on success. Implementations
/// stream output lines into `log` while the command runs. Failures carry the
/// tool's diagnostic text, see [`ExecutorError::log`].
#[async_trait]
pub trait UnitExecutor: Send + Sync {
    /// Deploy the unit located at `path`, passing `flags` through verbatim.
    async fn deploy(
        &self,
        path: &Path,
        flags: &str,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError>;

    /// Roll the unit back to its latest previous deployment.
    async fn rollback_latest(&self, path: &Path, log: UnitLog<'_>)
    -> Result<String, ExecutorError>;

    /// Roll the unit back to an explicit deployment version.
    async fn rollback_to_version(
        &self,
        path: &Path,
        version: &RollbackVersion,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError>;
}
