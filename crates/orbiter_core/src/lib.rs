//! Core data types for the Orbiter resilient LLM client.
//!
//! This crate provides the configuration, request/response and accounting
//! types shared by every Orbiter crate.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod budget;
mod config;
mod request;
mod settings;
mod token_counting;

pub use budget::TokenBudget;
pub use config::{
    BackoffPolicy, DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_RETRIES, DEFAULT_MIN_REQUEST_INTERVAL,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, RequestConfig, RequestConfigBuilder,
};
pub use request::{RawCompletion, TransportRequest, TransportRequestBuilder};
pub use settings::{
    API_KEY_VAR, BASE_URL_VAR, ClientSettings, DEFAULT_BASE_URL, MODEL_VAR, ORGANIZATION_VAR,
};
pub use token_counting::{TokenUsage, estimate_tokens};
