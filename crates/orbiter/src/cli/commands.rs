//! CLI command definitions.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Orbiter - resilient LLM completions with pacing, retries, budgets and caching
#[derive(Parser, Debug)]
#[command(name = "orbiter")]
#[command(about = "Resilient LLM completions with pacing, retries, budgets and caching", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Configuration file (defaults to bundled, home and ./orbiter.toml layers)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Complete a prompt and print the response
    Complete(CompleteArgs),

    /// Print the effective configuration
    Config,
}

/// Arguments for `orbiter complete`
#[derive(Args, Debug, Clone)]
pub struct CompleteArgs {
    /// Prompt text, or `-` to read it from stdin
    pub prompt: String,

    /// Maximum tokens to generate
    #[arg(long, default_value_t = 1000)]
    pub max_tokens: u32,

    /// System prompt sent ahead of the user prompt
    #[arg(long)]
    pub system: Option<String>,

    /// Session token budget
    #[arg(long)]
    pub budget: Option<u64>,

    /// Model identifier (overrides OPENAI_MODEL and the config file)
    #[arg(long)]
    pub model: Option<String>,

    /// Provider quota tier to enforce (e.g., "tier1")
    #[arg(long)]
    pub tier: Option<String>,
}
