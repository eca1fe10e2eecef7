//! Request pacing, retry backoff and provider quotas.
//!
//! This crate provides the timing machinery of the resilient client:
//! - [`RequestPacer`] spaces dispatched requests by a minimum interval
//! - [`retry_with_backoff`] retries transient failures with exponential
//!   backoff and jitter
//! - [`QuotaLimiter`] keeps an account inside its provider tier
//! - [`OrbiterConfig`] loads client defaults and tiers from TOML
//!
//! ## Provider Tiers
//!
//! `OpenAITier` covers the published OpenAI usage tiers. Custom tiers are
//! loaded from configuration as [`TierConfig`]:
//! ```ignore
//! use orbiter_rate_limit::tiers::OpenAITier;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod backoff;
mod config;
mod pacer;
mod quota;
mod tier;
pub mod tiers;

pub use backoff::{BackoffSchedule, RetryFailure, RetryHint, backoff_delay, retry_with_backoff};
pub use config::{ClientDefaults, ModelTierConfig, OrbiterConfig, ProviderConfig, TierConfig};
pub use pacer::RequestPacer;
pub use quota::QuotaLimiter;
pub use tier::Tier;
pub use tiers::OpenAITier;
