// ABOUTME: Workspace-relative unit identifiers.
// ABOUTME: Validates that a unit id is a clean relative path inside the workspace.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UnitIdError {
    #[error("unit id cannot be empty")]
    Empty,

    #[error("unit id must be relative to the workspace: {0}")]
    Absolute(String),

    #[error("unit id cannot leave the workspace: {0}")]
    ParentDir(String),
}

/// Identifier of one deployable unit: its directory relative to the workspace
/// root, using `/` separators. The root itself is `"."`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(String);

impl UnitId {
    pub fn new(value: &str) -> Result<Self, UnitIdError> {
        let value = value.trim().trim_end_matches('/');
        if value.is_empty() {
            return Err(UnitIdError::Empty);
        }

        let path = Path::new(value);
        if path.is_absolute() || value.starts_with('/') {
            return Err(UnitIdError::Absolute(value.to_string()));
        }

        if path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(UnitIdError::ParentDir(value.to_string()));
        }

        let normalized = value.trim_start_matches("./");
        if normalized.is_empty() {
            return Ok(Self::root());
        }

        Ok(Self(normalized.to_string()))
    }

    /// Id of a unit whose manifest sits directly in the workspace root.
    pub fn root() -> Self {
        Self(".".to_string())
    }

    /// Derive the id from a unit directory below `root`.
    pub fn from_dir(root: &Path, dir: &Path) -> Result<Self, UnitIdError> {
        let relative = dir.strip_prefix(root).unwrap_or(dir);
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        if joined.is_empty() {
            Ok(Self::root())
        } else {
            Self::new(&joined)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == "."
    }

    /// Whether this unit lives at or below `prefix`.
    pub fn is_under(&self, prefix: &str) -> bool {
        let prefix = prefix.trim_end_matches('/');
        prefix == "." || self.0 == prefix || self.0.starts_with(&format!("{prefix}/"))
    }

    /// Absolute directory of this unit inside `root`.
    pub fn resolve(&self, root: &Path) -> PathBuf {
        if self.is_root() {
            root.to_path_buf()
        } else {
            root.join(&self.0)
        }
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for UnitId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for UnitId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        UnitId::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A unit as handed to the orchestrator: its id plus the directory the
/// executor runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub path: PathBuf,
}

impl Unit {
    pub fn new(id: UnitId, path: impl Into<PathBuf>) -> Self {
        Self {
            id,
            path: path.into(),
        }
    }

    /// Build a unit whose directory is resolved against the workspace root.
    pub fn in_workspace(root: &Path, id: UnitId) -> Self {
        let path = id.resolve(root);
        Self { id, path }
    }
}
