// ABOUTME: Validated domain types shared across convoy.
// ABOUTME: Unit identifiers and rollback version tokens.

mod unit_id;
mod version;

pub use unit_id::{Unit, UnitId, UnitIdError};
pub use version::{RollbackVersion, RollbackVersionError};
