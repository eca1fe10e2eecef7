//! Top-level error wrapper types.

use crate::{BuilderError, ClientError, ConfigError, TransportError};

/// Union of every error the Orbiter crates produce.
///
/// Library callers usually match on [`ClientError`] directly; this wrapper
/// exists for binaries and glue code that propagate everything with `?`.
///
/// # Examples
///
/// ```
/// use orbiter_error::{ConfigError, OrbiterError};
///
/// let err: OrbiterError = ConfigError::new("missing credential").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum OrbiterErrorKind {
    /// Request-level failure from the resilient client
    #[from(ClientError)]
    Client(ClientError),
    /// Classified transport failure
    #[from(TransportError)]
    Transport(TransportError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Orbiter error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Orbiter Error: {}", _0)]
pub struct OrbiterError(Box<OrbiterErrorKind>);

impl OrbiterError {
    /// Create a new error from a kind.
    pub fn new(kind: OrbiterErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &OrbiterErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to OrbiterErrorKind
impl<T> From<T> for OrbiterError
where
    T: Into<OrbiterErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Orbiter operations.
pub type OrbiterResult<T> = std::result::Result<T, OrbiterError>;
