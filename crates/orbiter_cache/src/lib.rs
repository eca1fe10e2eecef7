//! Response caching for completion requests.
//!
//! This crate provides a bounded LRU cache keyed by prompt and output
//! token limit, so identical requests within a session are answered
//! without another provider call.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod cache;

pub use cache::{CacheEntry, CacheKey, ResponseCache};
