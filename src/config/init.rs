// ABOUTME: Config scaffolding for new workspaces.
// ABOUTME: Creates convoy.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::executor::DEFAULT_PROGRAM;

use super::CONFIG_FILENAME;

pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    std::fs::write(&config_path, generate_template_yaml())?;

    Ok(())
}

fn generate_template_yaml() -> String {
    format!(
        r#"# Deployment tool run in each unit directory
command: {DEFAULT_PROGRAM}

# Manifest files that mark a directory as a deployable unit
manifests:
  - serverless.yml
  - serverless.yaml
  - serverless.json
  - serverless.js

# parallel or sequential
concurrency: parallel

# Stop starting new deploys after the first failure
exit_on_failure: false

# Roll back units that deployed when the run fails
rollback_on_failure: false

# Kill a single deploy or rollback command after this long
# command_timeout: 30m

# Append all executor output to this file
# log_file: .convoy/deploy.log
"#
    )
}
