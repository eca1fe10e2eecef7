//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the orbiter binary.

mod commands;
mod complete;
mod config;

pub use commands::{Cli, Commands, CompleteArgs};
pub use complete::{handle_complete, user_message};
pub use config::show_config;
