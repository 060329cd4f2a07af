// ABOUTME: Command module aggregator for the convoy CLI.
// ABOUTME: Re-exports deploy and list command handlers.

mod deploy;
mod list;

pub use deploy::{DeployRequest, deploy};
pub use list::list;
