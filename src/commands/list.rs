// ABOUTME: List command implementation.
// ABOUTME: Prints every unit discovered under the workspace root.

use convoy::config::Config;
use convoy::discovery;
use convoy::error::Result;
use std::path::Path;

/// Print one discovered unit id per line.
pub fn list(cwd: &Path) -> Result<()> {
    let config = Config::discover(cwd)?;
    let units = discovery::discover(cwd, config.manifests.iter())?;

    for id in units.keys() {
        println!("{id}");
    }
    Ok(())
}
