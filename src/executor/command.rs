// ABOUTME: Executor backed by an external CLI (the Serverless Framework by default).
// ABOUTME: Spawns the tool in the unit directory and streams its output.

use async_trait::async_trait;
use snafu::ResultExt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::error::SpawnSnafu;
use super::{ExecutorError, UnitExecutor};
use crate::sink::UnitLog;
use crate::types::RollbackVersion;

/// Program used when no `command` is configured.
pub const DEFAULT_PROGRAM: &str = "sls";

/// Runs `<program> deploy <flags>` and `<program> rollback [-t <version>]`.
#[derive(Debug, Clone)]
pub struct CommandExecutor {
    program: String,
    timeout: Option<Duration>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl CommandExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout: None,
        }
    }

    /// Kill and fail any single command that runs longer than `timeout`.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn ensure_program(&self) -> Result<PathBuf, ExecutorError> {
        find_program(&self.program).ok_or_else(|| ExecutorError::ProgramNotFound {
            program: self.program.clone(),
        })
    }

    async fn run(
        &self,
        dir: &Path,
        args: Vec<String>,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let program = self.ensure_program()?;
        let command = std::iter::once(self.program.as_str())
            .chain(args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ");

        tracing::debug!(unit = %log.unit(), dir = %dir.display(), "running {}", command);

        let run = capture(&program, dir, &args, &command, log);
        match self.timeout {
            Some(after) => tokio::time::timeout(after, run)
                .await
                .map_err(|_| ExecutorError::TimedOut {
                    command: command.clone(),
                    after,
                })?,
            None => run.await,
        }
    }
}

/// Spawn the command and collect stdout and stderr in arrival order.
async fn capture(
    program: &Path,
    dir: &Path,
    args: &[String],
    command: &str,
    log: UnitLog<'_>,
) -> Result<String, ExecutorError> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .context(SpawnSnafu { command })?;

    let mut stdout = child.stdout.take().map(|s| BufReader::new(s).lines());
    let mut stderr = child.stderr.take().map(|s| BufReader::new(s).lines());
    let mut output = String::new();

    while stdout.is_some() || stderr.is_some() {
        let line = tokio::select! {
            line = next_line(&mut stdout), if stdout.is_some() => line,
            line = next_line(&mut stderr), if stderr.is_some() => line,
        };
        if let Some(line) = line.context(SpawnSnafu { command })? {
            log.line(&line);
            output.push_str(&line);
            output.push('\n');
        }
    }

    let status = child.wait().await.context(SpawnSnafu { command })?;
    if status.success() {
        Ok(output)
    } else {
        Err(ExecutorError::CommandFailed {
            command: command.to_string(),
            exit_code: status.code(),
            log: output,
        })
    }
}

/// Read the next line, clearing the reader once it reaches end of stream.
async fn next_line<R>(
    reader: &mut Option<tokio::io::Lines<BufReader<R>>>,
) -> std::io::Result<Option<String>>
where
    R: tokio::io::AsyncRead + Unpin,
{
    let Some(lines) = reader.as_mut() else {
        return Ok(None);
    };
    let line = lines.next_line().await?;
    if line.is_none() {
        *reader = None;
    }
    Ok(line)
}

#[async_trait]
impl UnitExecutor for CommandExecutor {
    async fn deploy(
        &self,
        path: &Path,
        flags: &str,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let mut args = vec!["deploy".to_string()];
        args.extend(flags.split_whitespace().map(str::to_string));
        self.run(path, args, log).await
    }

    async fn rollback_latest(
        &self,
        path: &Path,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        self.run(path, vec!["rollback".to_string()], log).await
    }

    async fn rollback_to_version(
        &self,
        path: &Path,
        version: &RollbackVersion,
        log: UnitLog<'_>,
    ) -> Result<String, ExecutorError> {
        let args = vec![
            "rollback".to_string(),
            "-t".to_string(),
            version.to_string(),
        ];
        self.run(path, args, log).await
    }
}

/// Locate `program` the way a shell would: paths are checked directly, bare
/// names are searched on `PATH`.
pub fn find_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }

    let path = std::env::var_os("PATH")?;
    std::env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|full| full.is_file())
}
