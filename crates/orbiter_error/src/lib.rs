//! Error types for the Orbiter resilient LLM client.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! [`ClientError`] is what `complete` returns. [`TransportError`] is the
//! classified failure of one outbound attempt and decides retry policy via
//! [`RetryableError`].
//!
//! # Examples
//!
//! ```
//! use orbiter_error::{ClientError, ClientErrorKind, ClientResult};
//!
//! fn validate(prompt: &str) -> ClientResult<()> {
//!     if prompt.trim().is_empty() {
//!         return Err(ClientError::new(ClientErrorKind::InvalidInput(
//!             "prompt is empty".to_string(),
//!         )));
//!     }
//!     Ok(())
//! }
//!
//! assert!(validate("   ").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod client;
mod config;
mod error;
mod transport;

pub use builder::{BuilderError, BuilderErrorKind};
pub use client::{ClientError, ClientErrorKind, ClientResult};
pub use config::ConfigError;
pub use error::{OrbiterError, OrbiterErrorKind, OrbiterResult};
pub use transport::{RetryableError, TransportError, TransportErrorKind};
