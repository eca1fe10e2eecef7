//! Session token budget accounting.

/// Cumulative token budget for one session.
///
/// The consumed counter only grows; [`TokenBudget::reset`] is the single
/// way to bring it back to zero.
///
/// # Examples
///
/// ```
/// use orbiter_core::TokenBudget;
///
/// let mut budget = TokenBudget::new(Some(1_000));
/// assert!(budget.check(400).is_ok());
/// budget.record(400);
/// assert_eq!(budget.remaining(), Some(600));
///
/// // Would overflow: reports what is left and leaves the counter alone.
/// assert_eq!(budget.check(700), Err(600));
/// assert_eq!(budget.consumed(), 400);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TokenBudget {
    limit: Option<u64>,
    consumed: u64,
}

impl TokenBudget {
    /// Create a budget with an optional cap (None = unlimited).
    pub fn new(limit: Option<u64>) -> Self {
        Self { limit, consumed: 0 }
    }

    /// Configured cap.
    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    /// Tokens recorded so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Tokens left before the cap, or None when unlimited.
    pub fn remaining(&self) -> Option<u64> {
        self.limit.map(|limit| limit.saturating_sub(self.consumed))
    }

    /// Check whether `estimate` more tokens fit.
    ///
    /// # Errors
    ///
    /// Returns the remaining allowance when the estimate does not fit.
    pub fn check(&self, estimate: u64) -> Result<(), u64> {
        match self.limit {
            Some(limit) if self.consumed.saturating_add(estimate) > limit => {
                Err(limit.saturating_sub(self.consumed))
            }
            _ => Ok(()),
        }
    }

    /// Record tokens used by a successful call.
    pub fn record(&mut self, tokens: u64) {
        self.consumed = self.consumed.saturating_add(tokens);
    }

    /// Start a fresh session with the same cap.
    pub fn reset(&mut self) {
        self.consumed = 0;
    }
}
