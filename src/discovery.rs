// ABOUTME: Discovery of deployable units in a workspace and selection by query.
// ABOUTME: A unit is any directory holding one of the configured manifest files.

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use crate::types::{Unit, UnitId, UnitIdError};

/// Directories never searched for units.
const IGNORED_DIRS: [&str; 1] = ["node_modules"];

/// Errors during unit discovery and selection.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("invalid search pattern {pattern}: {message}")]
    Pattern { pattern: String, message: String },

    #[error("invalid unit directory {}: {source}", path.display())]
    InvalidUnit {
        path: PathBuf,
        #[source]
        source: UnitIdError,
    },

    #[error("no unit matches {0:?}")]
    UnitNotFound(String),
}

/// Find every unit below `root`, mapping unit id to its absolute directory.
///
/// Hidden directories and `node_modules` are skipped. A manifest directly in
/// `root` yields the unit `"."`.
pub fn discover(
    root: &Path,
    manifests: impl IntoIterator<Item = impl AsRef<str>>,
) -> Result<BTreeMap<UnitId, PathBuf>, DiscoveryError> {
    let mut units = BTreeMap::new();
    let base = glob::Pattern::escape(&root.to_string_lossy());

    for manifest in manifests {
        let pattern = format!("{base}/**/{}", glob::Pattern::escape(manifest.as_ref()));
        let paths = glob::glob(&pattern).map_err(|e| DiscoveryError::Pattern {
            pattern: pattern.clone(),
            message: e.msg.to_string(),
        })?;

        for entry in paths {
            let file = match entry {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("skipping unreadable path: {}", e);
                    continue;
                }
            };
            let Some(dir) = file.parent() else {
                continue;
            };
            if is_ignored(root, dir) {
                continue;
            }

            let id = UnitId::from_dir(root, dir).map_err(|source| DiscoveryError::InvalidUnit {
                path: dir.to_path_buf(),
                source,
            })?;
            tracing::debug!(unit = %id, "found {}", file.display());
            units.entry(id).or_insert_with(|| dir.to_path_buf());
        }
    }

    Ok(units)
}

fn is_ignored(root: &Path, dir: &Path) -> bool {
    let relative = dir.strip_prefix(root).unwrap_or(dir);
    relative.components().any(|c| match c {
        Component::Normal(name) => {
            let name = name.to_string_lossy();
            name.starts_with('.') || IGNORED_DIRS.contains(&name.as_ref())
        }
        _ => false,
    })
}

/// Pick the units a run should deploy.
///
/// - no query, `all` or `.`: every unit
/// - otherwise the units whose id contains `query`; a single match also
///   brings in every unit nested below it
pub fn select_units(
    discovered: &BTreeMap<UnitId, PathBuf>,
    query: Option<&str>,
) -> Result<Vec<Unit>, DiscoveryError> {
    let to_units = |pick: &dyn Fn(&UnitId) -> bool| -> Vec<Unit> {
        discovered
            .iter()
            .filter(|(id, _)| pick(id))
            .map(|(id, path)| Unit::new(id.clone(), path.clone()))
            .collect()
    };

    let query = match query.map(str::trim) {
        None | Some("all") | Some(".") | Some("") => return Ok(to_units(&|_| true)),
        Some(query) => query,
    };

    let matches: Vec<&UnitId> = discovered
        .keys()
        .filter(|id| id.as_str().contains(query))
        .collect();

    match matches.as_slice() {
        [] => Err(DiscoveryError::UnitNotFound(query.to_string())),
        [single] => Ok(to_units(&|id| id.is_under(single.as_str()))),
        _ => Ok(to_units(&|id| id.as_str().contains(query))),
    }
}
