//! Tier trait for representing provider quota constraints.

/// Quota constraints of a provider usage tier.
///
/// All methods return `Option<T>` where `None` indicates unlimited.
///
/// # Example
///
/// ```
/// use orbiter_rate_limit::Tier;
///
/// struct Sandbox;
///
/// impl Tier for Sandbox {
///     fn rpm(&self) -> Option<u32> { Some(3) }
///     fn tpm(&self) -> Option<u64> { Some(40_000) }
///     fn name(&self) -> &str { "Sandbox" }
/// }
///
/// assert_eq!(Sandbox.rpm(), Some(3));
/// ```
pub trait Tier: Send + Sync {
    /// Requests per minute limit.
    fn rpm(&self) -> Option<u32>;

    /// Tokens per minute limit.
    fn tpm(&self) -> Option<u64>;

    /// Name of the tier (e.g., "Free", "Tier 1").
    fn name(&self) -> &str;
}

impl<T: Tier + ?Sized> Tier for Box<T> {
    fn rpm(&self) -> Option<u32> {
        (**self).rpm()
    }

    fn tpm(&self) -> Option<u64> {
        (**self).tpm()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
