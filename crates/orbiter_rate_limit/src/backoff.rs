//! Exponential backoff with additive jitter, and the retry driver built on it.

use orbiter_core::BackoffPolicy;
use orbiter_error::RetryableError;
use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, warn};

/// Wait before retry `attempt` (0-indexed) for a given jitter draw in `[0, 1]`.
///
/// Computes `min(base * 2^attempt + jitter * draw, max_delay)` without
/// overflowing for large attempt numbers.
///
/// # Examples
///
/// ```
/// use orbiter_core::BackoffPolicy;
/// use orbiter_rate_limit::backoff_delay;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30));
/// assert_eq!(backoff_delay(&policy, 0, 0.0), Duration::from_secs(1));
/// assert_eq!(backoff_delay(&policy, 2, 0.5), Duration::from_millis(4_500));
/// assert_eq!(backoff_delay(&policy, 10, 0.0), Duration::from_secs(30));
/// ```
pub fn backoff_delay(policy: &BackoffPolicy, attempt: u32, draw: f64) -> Duration {
    let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
    let exponential = policy.base().saturating_mul(factor);
    let jitter = policy.jitter().mul_f64(draw.clamp(0.0, 1.0));
    exponential.saturating_add(jitter).min(*policy.max_delay())
}

/// Delay requested by the remote side for the next retry.
///
/// Shared between the operation that observes the hint and the
/// [`BackoffSchedule`] that turns it into the next wait. Clones share
/// the same slot.
#[derive(Debug, Clone, Default)]
pub struct RetryHint(Arc<Mutex<Option<Duration>>>);

impl RetryHint {
    /// Create an empty hint slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the pending hint.
    pub fn set(&self, delay: Option<Duration>) {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    /// Take the pending hint, leaving the slot empty.
    pub fn take(&self) -> Option<Duration> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).take()
    }
}

/// Iterator of retry waits for a bounded number of retries.
///
/// Yields exactly `max_retries` delays, each drawn with fresh jitter. A
/// pending [`RetryHint`] replaces the computed delay, capped at the
/// policy's `max_delay`.
#[derive(Debug, Clone)]
pub struct BackoffSchedule {
    policy: BackoffPolicy,
    attempt: u32,
    max_retries: u32,
    hint: RetryHint,
}

impl BackoffSchedule {
    /// Create a schedule allowing `max_retries` retries.
    pub fn new(policy: BackoffPolicy, max_retries: u32) -> Self {
        Self {
            policy,
            attempt: 0,
            max_retries,
            hint: RetryHint::new(),
        }
    }

    /// Read remote delay hints from `hint`.
    pub fn with_hint(mut self, hint: RetryHint) -> Self {
        self.hint = hint;
        self
    }
}

impl Iterator for BackoffSchedule {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_retries {
            return None;
        }
        let draw = if self.policy.jitter().is_zero() {
            0.0
        } else {
            rand::random::<f64>()
        };
        let computed = backoff_delay(&self.policy, self.attempt, draw);
        self.attempt += 1;
        match self.hint.take() {
            Some(hint) => Some(hint.min(*self.policy.max_delay())),
            None => Some(computed),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.max_retries.saturating_sub(self.attempt) as usize;
        (left, Some(left))
    }
}

/// Why a retried operation finally failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryFailure<E> {
    /// A non-retryable error ended the loop on the given attempt.
    Permanent {
        /// Attempts made, including the failing one
        attempts: u32,
        /// The error
        error: E,
    },
    /// Every allowed attempt failed with a transient error.
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// The last transient error
        last: E,
    },
}

/// Run `operation` with exponential backoff on transient errors.
///
/// The operation receives the 0-indexed attempt number. Retryable errors
/// are retried up to `max_retries` times; a provider `retry_after` hint,
/// capped at the policy's `max_delay`, replaces the computed wait. Errors
/// that are not retryable end the loop immediately.
///
/// # Example
///
/// ```rust,ignore
/// let text = retry_with_backoff(&policy, 3, |attempt| async move {
///     transport.send(&request).await
/// })
/// .await?;
/// ```
pub async fn retry_with_backoff<F, Fut, R, E>(
    policy: &BackoffPolicy,
    max_retries: u32,
    operation: F,
) -> Result<R, RetryFailure<E>>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<R, E>>,
    E: RetryableError + std::fmt::Display,
{
    let attempts = AtomicU32::new(0);
    let hint = RetryHint::new();
    let schedule = BackoffSchedule::new(*policy, max_retries).with_hint(hint.clone());

    let result = Retry::spawn(schedule, || {
        let attempt = attempts.fetch_add(1, Ordering::Relaxed);
        let fut = operation(attempt);
        let hint = hint.clone();
        async move {
            match fut.await {
                Ok(value) => Ok(value),
                // Last allowed attempt: stop even if the provider sent a hint.
                Err(e) if e.is_retryable() && attempt >= max_retries => {
                    warn!(attempt, error = %e, "Transient error on final attempt");
                    Err(RetryError::Permanent(e))
                }
                Err(e) if e.is_retryable() => {
                    warn!(attempt, error = %e, "Transient error, will retry");
                    hint.set(e.retry_after());
                    Err(RetryError::Transient {
                        err: e,
                        retry_after: None,
                    })
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Permanent error, failing immediately");
                    Err(RetryError::Permanent(e))
                }
            }
        }
    })
    .await;

    let attempts = attempts.load(Ordering::Relaxed);
    result.map_err(|error| {
        if error.is_retryable() {
            debug!(attempts, "Retries exhausted");
            RetryFailure::Exhausted {
                attempts,
                last: error,
            }
        } else {
            RetryFailure::Permanent { attempts, error }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> BackoffPolicy {
        BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30))
    }

    #[test]
    fn delay_doubles_per_attempt() {
        let policy = policy().with_jitter(Duration::ZERO);
        let delays: Vec<_> = (0..4).map(|i| backoff_delay(&policy, i, 0.0)).collect();
        assert_eq!(
            delays,
            vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
                Duration::from_secs(8)
            ]
        );
    }

    #[test]
    fn delay_is_capped() {
        assert_eq!(backoff_delay(&policy(), 5, 1.0), Duration::from_secs(30));
        assert_eq!(backoff_delay(&policy(), 200, 0.0), Duration::from_secs(30));
    }

    #[test]
    fn jitter_adds_at_most_one_ceiling() {
        let policy = policy();
        for draw in [0.0, 0.25, 0.99, 1.0, 7.0] {
            let delay = backoff_delay(&policy, 1, draw);
            assert!(delay >= Duration::from_secs(2));
            assert!(delay <= Duration::from_secs(3));
        }
    }

    #[test]
    fn schedule_yields_max_retries_delays() {
        let schedule = BackoffSchedule::new(policy(), 3);
        assert_eq!(schedule.size_hint(), (3, Some(3)));
        let delays: Vec<_> = schedule.collect();
        assert_eq!(delays.len(), 3);
        assert!(delays[0] >= Duration::from_secs(1) && delays[0] <= Duration::from_secs(2));
        assert!(delays[2] >= Duration::from_secs(4) && delays[2] <= Duration::from_secs(5));
    }

    #[test]
    fn hint_replaces_computed_delay_once() {
        let hint = RetryHint::new();
        let mut schedule =
            BackoffSchedule::new(policy().with_jitter(Duration::ZERO), 3).with_hint(hint.clone());

        hint.set(Some(Duration::from_secs(7)));
        assert_eq!(schedule.next(), Some(Duration::from_secs(7)));
        // Exponent still advanced past the hinted retry
        assert_eq!(schedule.next(), Some(Duration::from_secs(2)));

        hint.set(Some(Duration::from_secs(600)));
        assert_eq!(schedule.next(), Some(Duration::from_secs(30)));
        assert_eq!(schedule.next(), None);
    }

    #[test]
    fn zero_retries_yields_nothing() {
        assert_eq!(BackoffSchedule::new(policy(), 0).count(), 0);
    }
}
