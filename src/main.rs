//! crateup - binary installer for CI runners
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use crateup::cli::{Cli, Commands};
use crateup::config::ConfigManager;
use crateup::error::CrateupResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> CrateupResult<()> {
    let cli = Cli::parse();

    // Initialize logging: 0 = warn, 1 = info, 2+ = debug
    let filter = match cli.verbose {
        0 => EnvFilter::new("crateup=warn"),
        1 => EnvFilter::new("crateup=info"),
        _ => EnvFilter::new("crateup=debug"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    // Load configuration; defaults apply when no file exists
    let manager = if let Some(path) = cli.config {
        ConfigManager::with_path(path)
    } else {
        ConfigManager::new()
    };
    let config = manager.load().await?;

    // Dispatch to command
    match cli.command {
        Commands::Install(args) => crateup::cli::commands::install(args, &config).await,
        Commands::Resolve(args) => crateup::cli::commands::resolve(args, &config).await,
        Commands::Key(args) => crateup::cli::commands::key(args).await,
        Commands::Config(args) => crateup::cli::commands::config(args, &config, &manager).await,
    }
}
