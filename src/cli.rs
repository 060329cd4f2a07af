// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "convoy")]
#[command(about = "Deploy and roll back every serverless unit in a workspace")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output and stream unit logs to the console
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new convoy.yml configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Deploy units, optionally narrowed to a service or path prefix
    Deploy {
        /// Unit to deploy; `all` or omitted deploys every unit
        service: Option<String>,

        /// Deploy units one at a time, in order
        #[arg(short = 'b', long)]
        run_in_band: bool,

        /// Stop starting new units after the first failure
        #[arg(short, long)]
        exit_on_failure: bool,

        /// Roll back deployed units if any unit fails
        #[arg(short, long)]
        rollback_on_failure: bool,

        /// Minimal output for CI (only final result)
        #[arg(short, long, conflicts_with = "json")]
        quiet: bool,

        /// Output in JSON format for scripting
        #[arg(long)]
        json: bool,

        /// Flags passed verbatim to every deploy command
        #[arg(last = true, allow_hyphen_values = true)]
        flags: Vec<String>,
    },

    /// List discovered units
    List,
}
