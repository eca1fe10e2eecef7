//! Provider quota enforcement using governor.
//!
//! [`QuotaLimiter`] enforces the per-minute request and token quotas of a
//! provider tier with the GCRA algorithm. It complements the per-instance
//! [`RequestPacer`](crate::RequestPacer): the pacer spaces one session's
//! requests, the quota limiter keeps a whole account inside its tier.

use crate::Tier;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::debug;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Rate limiter enforcing RPM and TPM quotas of a tier.
///
/// Cloning shares the underlying quota state, so one limiter can be handed
/// to every client that draws from the same account.
///
/// # Example
///
/// ```rust,ignore
/// use orbiter_rate_limit::{QuotaLimiter, OpenAITier};
///
/// let limiter = QuotaLimiter::new(OpenAITier::Tier1);
/// limiter.acquire(1_200).await;
/// ```
#[derive(Clone)]
pub struct QuotaLimiter {
    tier_name: String,
    rpm_limiter: Option<Arc<DirectRateLimiter>>,
    tpm_limiter: Option<Arc<DirectRateLimiter>>,
    tpm_burst: u32,
}

impl QuotaLimiter {
    /// Create a quota limiter from a tier.
    ///
    /// Only limits the tier reports are enforced; `None` means unlimited.
    pub fn new<T: Tier>(tier: T) -> Self {
        let rpm_limiter = tier.rpm().and_then(NonZeroU32::new).map(|n| {
            Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n)))
        });

        // Governor counts in u32; larger TPM quotas are capped.
        let tpm = tier.tpm().map(|tpm| tpm.min(u64::from(u32::MAX)) as u32);
        let tpm_limiter = tpm.and_then(NonZeroU32::new).map(|n| {
            Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n)))
        });

        debug!(
            tier = tier.name(),
            rpm = ?tier.rpm(),
            tpm = ?tier.tpm(),
            "Creating quota limiter"
        );

        Self {
            tier_name: tier.name().to_string(),
            rpm_limiter,
            tpm_limiter,
            tpm_burst: tpm.unwrap_or(u32::MAX),
        }
    }

    /// Name of the tier this limiter enforces.
    pub fn tier_name(&self) -> &str {
        &self.tier_name
    }

    /// Token cells to draw for an estimate: at least one, at most a full burst.
    fn token_cells(&self, estimated_tokens: u64) -> NonZeroU32 {
        let cells = estimated_tokens
            .clamp(1, u64::from(self.tpm_burst.max(1))) as u32;
        NonZeroU32::new(cells).unwrap_or(NonZeroU32::MIN)
    }

    /// Wait until both quotas allow a request of `estimated_tokens`.
    pub async fn acquire(&self, estimated_tokens: u64) {
        if let Some(limiter) = &self.rpm_limiter {
            limiter.until_ready().await;
        }

        if let Some(limiter) = &self.tpm_limiter {
            let cells = self.token_cells(estimated_tokens);
            if limiter.until_n_ready(cells).await.is_err() {
                // Larger than the whole burst; fall back to one cell.
                limiter.until_ready().await;
            }
        }
    }

    /// Check both quotas without waiting.
    ///
    /// Returns false if any quota would block.
    pub fn try_acquire(&self, estimated_tokens: u64) -> bool {
        if let Some(limiter) = &self.rpm_limiter
            && limiter.check().is_err()
        {
            return false;
        }

        if let Some(limiter) = &self.tpm_limiter {
            let cells = self.token_cells(estimated_tokens);
            return matches!(limiter.check_n(cells), Ok(Ok(())));
        }

        true
    }
}

impl std::fmt::Debug for QuotaLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuotaLimiter")
            .field("tier_name", &self.tier_name)
            .field("rpm", &self.rpm_limiter.is_some())
            .field("tpm", &self.tpm_limiter.is_some())
            .finish()
    }
}
