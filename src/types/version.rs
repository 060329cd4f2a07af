// ABOUTME: Deployment version tokens reported by the executor.
// ABOUTME: A version is the numeric timestamp used to target a rollback.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RollbackVersionError {
    #[error("rollback version cannot be empty")]
    Empty,

    #[error("rollback version must be numeric: {0}")]
    NotNumeric(String),
}

/// Timestamp of a previous deployment, as printed by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RollbackVersion(String);

impl RollbackVersion {
    pub fn new(value: &str) -> Result<Self, RollbackVersionError> {
        if value.is_empty() {
            return Err(RollbackVersionError::Empty);
        }
        if !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(RollbackVersionError::NotNumeric(value.to_string()));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RollbackVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
