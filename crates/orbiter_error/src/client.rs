//! Errors surfaced by the resilient client to its callers.

use crate::TransportErrorKind;

/// Failure conditions visible at the `complete` boundary.
///
/// Transient transport failures never appear here on their own; they are
/// retried inside the client and only surface wrapped in `RetriesExhausted`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ClientErrorKind {
    /// Prompt or output size failed validation
    #[display("Invalid input: {}", _0)]
    InvalidInput(String),
    /// The call would push the session over its token budget
    #[display(
        "Token budget exceeded: request needs ~{} tokens, {} remaining",
        requested,
        remaining
    )]
    BudgetExceeded {
        /// Tokens left in the session budget
        remaining: u64,
        /// Estimated tokens the rejected call would have used
        requested: u64,
    },
    /// Every attempt failed with a transient error
    #[display("Retries exhausted after {} attempts: {}", attempts, last)]
    RetriesExhausted {
        /// Total attempts made, including the first
        attempts: u32,
        /// The last transient error observed
        last: TransportErrorKind,
    },
    /// A non-transient provider failure
    #[display("{}", _0)]
    Other(String),
}

/// Client error with location tracking.
///
/// # Examples
///
/// ```
/// use orbiter_error::{ClientError, ClientErrorKind};
///
/// let err = ClientError::new(ClientErrorKind::InvalidInput("prompt is empty".into()));
/// assert!(err.is_invalid_input());
/// assert!(format!("{}", err).contains("prompt is empty"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Client Error: {} at line {} in {}", kind, line, file)]
pub struct ClientError {
    kind: ClientErrorKind,
    line: u32,
    file: &'static str,
}

impl ClientError {
    /// Create a new client error with caller location tracking.
    #[track_caller]
    pub fn new(kind: ClientErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ClientErrorKind {
        &self.kind
    }

    /// True when the input was rejected before any dispatch.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.kind, ClientErrorKind::InvalidInput(_))
    }

    /// True when the session budget refused the call.
    pub fn is_budget_exceeded(&self) -> bool {
        matches!(self.kind, ClientErrorKind::BudgetExceeded { .. })
    }

    /// True when transient failures persisted through every retry.
    pub fn is_retries_exhausted(&self) -> bool {
        matches!(self.kind, ClientErrorKind::RetriesExhausted { .. })
    }
}

impl From<ClientErrorKind> for ClientError {
    #[track_caller]
    fn from(kind: ClientErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
