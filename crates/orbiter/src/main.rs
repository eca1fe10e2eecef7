//! Orbiter CLI binary.
//!
//! This binary provides command-line access to the resilient client:
//! - Complete a prompt with pacing, retries, budget and caching
//! - Inspect the effective configuration

use clap::Parser;
use orbiter::observability::{LoggingConfig, init_logging};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, Commands, handle_complete, show_config, user_message};

    // Load .env before reading any settings
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let logging = LoggingConfig::default()
        .with_log_level(log_level)
        .with_json_logs(cli.json_logs);
    if let Err(e) = init_logging(&logging) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    // Execute the requested command
    let result = match cli.command {
        Commands::Complete(args) => handle_complete(args, cli.config.as_deref()).await,
        Commands::Config => show_config(cli.config.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "Command failed");
            eprintln!("{}", user_message(&e));
            ExitCode::FAILURE
        }
    }
}
