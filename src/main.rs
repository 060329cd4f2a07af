// ABOUTME: Entry point for the convoy CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use convoy::config;
use convoy::error::{Error, Result};
use convoy::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

/// Exit code for a run cut short by Ctrl-C or SIGTERM.
const EXIT_INTERRUPTED: i32 = 130;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag, unless RUST_LOG is set
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    // Dropping the run future kills any running child processes.
    let result = tokio::select! {
        result = run(cli) => result,
        _ = shutdown_signal() => Err(Error::Interrupted),
    };

    match result {
        Ok(()) => {}
        Err(Error::Interrupted) => {
            eprintln!("Interrupted");
            std::process::exit(EXIT_INTERRUPTED);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;

    match cli.command {
        Commands::Init { force } => {
            config::init_config(&cwd, force)?;
            println!("Created {}", config::CONFIG_FILENAME);
            Ok(())
        }
        Commands::Deploy {
            service,
            run_in_band,
            exit_on_failure,
            rollback_on_failure,
            quiet,
            json,
            flags,
        } => {
            let mode = if json {
                OutputMode::Json
            } else if quiet {
                OutputMode::Quiet
            } else {
                OutputMode::Normal
            };
            let request = commands::DeployRequest {
                service,
                flags: flags.join(" "),
                overrides: config::RunOverrides {
                    run_in_band,
                    exit_on_failure,
                    rollback_on_failure,
                    verbose: cli.verbose,
                },
            };
            commands::deploy(&cwd, request, Output::new(mode)).await
        }
        Commands::List => commands::list(&cwd),
    }
}

#[cfg(unix)]
async fn shutdown_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(signal) => signal,
        Err(e) => {
            tracing::warn!("cannot listen for SIGTERM: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = terminate.recv() => {}
    }
}

#[cfg(not(unix))]
async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
