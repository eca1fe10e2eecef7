//! Outcome classification for single call attempts.

use orbiter_core::RawCompletion;
use orbiter_error::{TransportError, TransportErrorKind};

/// How one call attempt ended.
///
/// The attempt itself is a `Result<RawCompletion, TransportError>`; this is
/// its tag, used for outcome counts and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum OutcomeClass {
    /// Provider returned text
    Success,
    /// Provider asked us to slow down
    RateLimited,
    /// The attempt timed out
    Timeout,
    /// The connection failed or dropped
    ConnectionError,
    /// Any other failure; never retried
    OtherError,
}

impl OutcomeClass {
    /// Class of a transport result, without consuming it.
    pub fn of(result: &Result<RawCompletion, TransportError>) -> Self {
        match result {
            Ok(_) => OutcomeClass::Success,
            Err(err) => match err.kind() {
                TransportErrorKind::RateLimited { .. } => OutcomeClass::RateLimited,
                TransportErrorKind::Timeout => OutcomeClass::Timeout,
                TransportErrorKind::Connection(_) => OutcomeClass::ConnectionError,
                TransportErrorKind::Other(_) => OutcomeClass::OtherError,
            },
        }
    }

    /// Whether a retry could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            OutcomeClass::RateLimited | OutcomeClass::Timeout | OutcomeClass::ConnectionError
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_not_transient() {
        let class = OutcomeClass::of(&Ok(RawCompletion::with_total_tokens("ok", 10)));
        assert_eq!(class, OutcomeClass::Success);
        assert!(!class.is_transient());
    }

    #[test]
    fn errors_map_to_matching_class() {
        let cases = [
            (
                TransportErrorKind::RateLimited { retry_after: None },
                OutcomeClass::RateLimited,
            ),
            (TransportErrorKind::Timeout, OutcomeClass::Timeout),
            (
                TransportErrorKind::Connection("reset".into()),
                OutcomeClass::ConnectionError,
            ),
            (TransportErrorKind::Other("401".into()), OutcomeClass::OtherError),
        ];

        for (kind, class) in cases {
            let transient = kind.is_retryable();
            let result = Err(TransportError::new(kind));
            assert_eq!(OutcomeClass::of(&result), class);
            assert_eq!(class.is_transient(), transient);
        }
    }
}
