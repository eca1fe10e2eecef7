//! Transport error classification and retry semantics.

use std::time::Duration;

/// Classified failure of a single outbound call.
///
/// Every raw provider or network failure is mapped onto one of these
/// classes before the client decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum TransportErrorKind {
    /// Provider rejected the call with a rate-limit response
    #[display("Rate limited by provider (retry after: {:?})", retry_after)]
    RateLimited {
        /// Delay the provider asked us to wait, when it sent one
        retry_after: Option<Duration>,
    },
    /// The call did not complete within the configured timeout
    #[display("Request timed out")]
    Timeout,
    /// The connection could not be established or was dropped
    #[display("Connection error: {}", _0)]
    Connection(String),
    /// Any other provider failure (auth, bad request, malformed response)
    #[display("Provider error: {}", _0)]
    Other(String),
}

impl TransportErrorKind {
    /// Check if this error class should be retried.
    ///
    /// Only rate limits, timeouts and connection failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportErrorKind::RateLimited { .. }
                | TransportErrorKind::Timeout
                | TransportErrorKind::Connection(_)
        )
    }

    /// Delay hint sent by the provider, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            TransportErrorKind::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Transport error with source location tracking.
///
/// # Examples
///
/// ```
/// use orbiter_error::{RetryableError, TransportError, TransportErrorKind};
///
/// let err = TransportError::new(TransportErrorKind::Timeout);
/// assert!(err.is_retryable());
///
/// let err = TransportError::new(TransportErrorKind::Other("401 Unauthorized".into()));
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Transport Error: {} at line {} in {}", kind, line, file)]
pub struct TransportError {
    /// The kind of error that occurred
    pub kind: TransportErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl TransportError {
    /// Create a new TransportError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: TransportErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TransportErrorKind {
        &self.kind
    }
}

impl From<TransportErrorKind> for TransportError {
    #[track_caller]
    fn from(kind: TransportErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Trait for errors that support retry logic.
///
/// Transient errors like rate limits, timeouts and dropped connections
/// return true. Permanent errors like 401 (unauthorized) or 400 (bad
/// request) return false and are surfaced on first occurrence.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    fn is_retryable(&self) -> bool;

    /// Delay requested by the remote side before the next attempt.
    fn retry_after(&self) -> Option<Duration> {
        None
    }
}

impl RetryableError for TransportError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    fn retry_after(&self) -> Option<Duration> {
        self.kind.retry_after()
    }
}
