// ABOUTME: Configuration types and parsing for convoy.yml.
// ABOUTME: Project-level defaults layered under command-line switches.

mod deserialize;
mod init;
mod run;

pub use init::init_config;
pub use run::{Concurrency, RunConfig, RunOverrides};

use crate::error::{Error, Result};
use crate::executor::DEFAULT_PROGRAM;
use crate::hooks::HOOKS_DIR;
use deserialize::deserialize_manifests;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "convoy.yml";
pub const CONFIG_FILENAME_ALT: &str = "convoy.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".convoy/config.yml";

/// Manifest file names that mark a Serverless Framework service.
pub const DEFAULT_MANIFESTS: [&str; 4] = [
    "serverless.yaml",
    "serverless.yml",
    "serverless.json",
    "serverless.js",
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_command")]
    pub command: String,

    #[serde(
        default = "default_manifests",
        deserialize_with = "deserialize_manifests"
    )]
    pub manifests: NonEmpty<String>,

    #[serde(default)]
    pub concurrency: Concurrency,

    #[serde(default)]
    pub exit_on_failure: bool,

    #[serde(default)]
    pub rollback_on_failure: bool,

    #[serde(default, with = "humantime_serde")]
    pub command_timeout: Option<Duration>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,

    #[serde(default)]
    pub hooks_dir: Option<PathBuf>,
}

fn default_command() -> String {
    DEFAULT_PROGRAM.to_string()
}

fn default_manifests() -> NonEmpty<String> {
    NonEmpty {
        head: DEFAULT_MANIFESTS[0].to_string(),
        tail: DEFAULT_MANIFESTS[1..].iter().map(|s| s.to_string()).collect(),
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            command: default_command(),
            manifests: default_manifests(),
            concurrency: Concurrency::default(),
            exit_on_failure: false,
            rollback_on_failure: false,
            command_timeout: None,
            log_file: None,
            hooks_dir: None,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find the config file in `dir`.
    pub fn find(dir: &Path) -> Option<PathBuf> {
        [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ]
        .into_iter()
        .find(|path| path.exists())
    }

    /// Load the workspace config, falling back to defaults when there is none.
    pub fn discover(dir: &Path) -> Result<Self> {
        match Self::find(dir) {
            Some(path) => {
                tracing::debug!("loading config from {}", path.display());
                Self::load(&path)
            }
            None => Ok(Self::default()),
        }
    }

    /// Run settings from this file, before command-line switches.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            concurrency: self.concurrency,
            exit_on_failure: self.exit_on_failure,
            rollback_on_failure: self.rollback_on_failure,
            verbose: false,
        }
    }

    /// Hooks directory, resolved against the workspace root.
    pub fn hooks_dir(&self, workspace: &Path) -> PathBuf {
        match &self.hooks_dir {
            Some(dir) => workspace.join(dir),
            None => workspace.join(HOOKS_DIR),
        }
    }

    /// Log file path, resolved against the workspace root.
    pub fn log_file(&self, workspace: &Path) -> Option<PathBuf> {
        self.log_file.as_ref().map(|file| workspace.join(file))
    }
}
