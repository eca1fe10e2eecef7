//! Orbiter - Resilient LLM Request Client
//!
//! Orbiter wraps a chat-completion API behind a single
//! [`ResilientClient::complete`] call that paces requests, retries transient
//! failures with exponential backoff and jitter, enforces a session token
//! budget, and caches responses.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use orbiter::{RequestConfig, ResilientClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RequestConfig::builder()
//!         .system_prompt("You are a NASA mission planner.")
//!         .build()?;
//!     let client = ResilientClient::from_env(config)?;
//!
//!     let text = client.complete("Plan a lunar south pole landing", 800).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! Orbiter is organized as a workspace with focused crates:
//!
//! - `orbiter_error` - Error types
//! - `orbiter_core` - Configuration, request types and token accounting
//! - `orbiter_interface` - `CompletionTransport` trait definition
//! - `orbiter_rate_limit` - Pacing, retry backoff, quotas and TOML config
//! - `orbiter_cache` - Bounded LRU response cache
//! - `orbiter_models` - OpenAI-compatible HTTP transport
//!
//! This crate (`orbiter`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
pub mod observability;

pub use client::ResilientClient;

// Re-export workspace crates
pub use orbiter_cache::*;
pub use orbiter_core::*;
pub use orbiter_error::*;
pub use orbiter_interface::*;
pub use orbiter_models::*;
pub use orbiter_rate_limit::*;
