//! Minimum-interval request pacing.

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// Enforces a minimum spacing between dispatched requests.
///
/// The pacer holds no clock state of its own: the caller owns the
/// timestamp of its last dispatch and commits the returned instant only
/// once the request has really gone out. Dropping the future returned by
/// [`RequestPacer::wait_turn`] therefore leaves the caller's state intact.
///
/// # Example
///
/// ```rust,ignore
/// let pacer = RequestPacer::new(Duration::from_secs(3));
/// let dispatched_at = pacer.wait_turn(state.last_request_at).await;
/// let response = transport.send(&request).await;
/// state.last_request_at = Some(dispatched_at);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestPacer {
    min_interval: Duration,
}

impl RequestPacer {
    /// Create a pacer with the given minimum interval.
    pub fn new(min_interval: Duration) -> Self {
        Self { min_interval }
    }

    /// Configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// How long a request issued at `now` must wait.
    ///
    /// Returns zero when nothing was dispatched yet or the interval has
    /// already elapsed. Never negative, even if `last` is in the future.
    pub fn delay_at(&self, last: Option<Instant>, now: Instant) -> Duration {
        match last {
            Some(last) => {
                let elapsed = now.saturating_duration_since(last);
                self.min_interval.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        }
    }

    /// Suspend until a request may be dispatched, then return the dispatch instant.
    pub async fn wait_turn(&self, last: Option<Instant>) -> Instant {
        let delay = self.delay_at(last, Instant::now());
        if !delay.is_zero() {
            debug!(delay_ms = delay.as_millis() as u64, "Pacing request");
            tokio::time::sleep(delay).await;
        }
        Instant::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_is_immediate() {
        let pacer = RequestPacer::new(Duration::from_secs(3));
        assert_eq!(pacer.delay_at(None, Instant::now()), Duration::ZERO);
    }

    #[test]
    fn delay_is_remaining_interval() {
        let pacer = RequestPacer::new(Duration::from_secs(3));
        let last = Instant::now();
        let now = last + Duration::from_secs(1);
        assert_eq!(pacer.delay_at(Some(last), now), Duration::from_secs(2));
    }

    #[test]
    fn elapsed_interval_needs_no_wait() {
        let pacer = RequestPacer::new(Duration::from_secs(3));
        let last = Instant::now();
        let now = last + Duration::from_secs(10);
        assert_eq!(pacer.delay_at(Some(last), now), Duration::ZERO);
    }

    #[test]
    fn last_after_now_is_clamped() {
        let pacer = RequestPacer::new(Duration::from_secs(3));
        let now = Instant::now();
        let last = now + Duration::from_secs(1);
        assert_eq!(pacer.delay_at(Some(last), now), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn wait_turn_sleeps_until_interval_elapsed() {
        let pacer = RequestPacer::new(Duration::from_secs(3));
        let last = Instant::now();
        let dispatched = pacer.wait_turn(Some(last)).await;
        assert!(dispatched.duration_since(last) >= Duration::from_secs(3));
    }
}
