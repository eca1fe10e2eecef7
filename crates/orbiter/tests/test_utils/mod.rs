//! Test utilities for Orbiter client tests.
//!
//! This module provides a scripted mock transport and config helpers.

pub mod mock_transport;

#[allow(unused_imports)]
pub use mock_transport::{MockBehavior, MockResponse, MockTransport};

use orbiter::{BackoffPolicy, RequestConfig};
use std::time::Duration;

/// Config with deterministic backoff (1s, 2s, 4s... no jitter).
pub fn create_test_config(
    min_request_interval: Duration,
    max_retries: u32,
    budget: Option<u64>,
) -> RequestConfig {
    let mut builder = RequestConfig::builder();
    builder
        .model("mock-model")
        .min_request_interval(min_request_interval)
        .max_retries(max_retries)
        .backoff(
            BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30))
                .with_jitter(Duration::ZERO),
        );
    if let Some(budget) = budget {
        builder.session_token_budget(budget);
    }
    builder.build().expect("Failed to build test config")
}
