//! Immutable per-client request configuration.

use derive_getters::Getters;
use orbiter_error::BuilderError;
use std::time::Duration;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4o";
/// Minimum spacing between dispatched requests.
pub const DEFAULT_MIN_REQUEST_INTERVAL: Duration = Duration::from_secs(3);
/// Additional attempts after the first transient failure.
pub const DEFAULT_MAX_RETRIES: u32 = 3;
/// Per-attempt timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// Number of responses kept in the LRU cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 256;
/// Sampling temperature sent with every request.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

/// Exponential backoff parameters shared by every call site.
///
/// The wait before retry `i` (0-indexed) is
/// `min(base * 2^i + random(0, jitter), max_delay)`.
///
/// # Examples
///
/// ```
/// use orbiter_core::BackoffPolicy;
/// use std::time::Duration;
///
/// let policy = BackoffPolicy::default();
/// assert_eq!(*policy.base(), Duration::from_secs(1));
///
/// let deterministic = BackoffPolicy::new(Duration::from_millis(500), Duration::from_secs(10))
///     .with_jitter(Duration::ZERO);
/// assert_eq!(*deterministic.jitter(), Duration::ZERO);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Getters, derive_setters::Setters)]
#[setters(prefix = "with_")]
pub struct BackoffPolicy {
    /// Delay before the first retry, before jitter
    base: Duration,
    /// Upper bound for any single wait
    max_delay: Duration,
    /// Ceiling of the uniformly random offset added to each wait
    jitter: Duration,
}

impl BackoffPolicy {
    /// Create a policy with the default one-second jitter.
    pub fn new(base: Duration, max_delay: Duration) -> Self {
        Self {
            base,
            max_delay,
            jitter: Duration::from_secs(1),
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(30))
    }
}

/// Configuration for one logical client instance.
///
/// Built once at process start and handed to the client constructor; the
/// call path never reads ambient state.
///
/// # Examples
///
/// ```
/// use orbiter_core::RequestConfigBuilder;
/// use std::time::Duration;
///
/// let config = RequestConfigBuilder::default()
///     .model("gpt-4o-mini")
///     .min_request_interval(Duration::from_secs(1))
///     .max_retries(2u32)
///     .session_token_budget(10_000u64)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.model(), "gpt-4o-mini");
/// assert_eq!(*config.session_token_budget(), Some(10_000));
/// assert_eq!(*config.timeout(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, PartialEq, Getters, derive_builder::Builder)]
#[builder(build_fn(validate = "Self::validate", error = "BuilderError"))]
pub struct RequestConfig {
    /// Model identifier sent to the provider
    #[builder(setter(into), default = "default_model()")]
    model: String,

    /// Minimum spacing between two dispatched requests
    #[builder(default = "DEFAULT_MIN_REQUEST_INTERVAL")]
    min_request_interval: Duration,

    /// Additional attempts allowed after a transient failure
    #[builder(default = "DEFAULT_MAX_RETRIES")]
    max_retries: u32,

    /// Timeout applied to each attempt
    #[builder(default = "DEFAULT_TIMEOUT")]
    timeout: Duration,

    /// Cumulative token cap for the session (None = unlimited)
    #[builder(setter(strip_option), default)]
    session_token_budget: Option<u64>,

    /// Retry backoff parameters
    #[builder(default)]
    backoff: BackoffPolicy,

    /// Maximum cached responses (0 disables the cache)
    #[builder(default = "DEFAULT_CACHE_CAPACITY")]
    cache_capacity: usize,

    /// System prompt sent ahead of every user prompt
    #[builder(setter(into, strip_option), default)]
    system_prompt: Option<String>,

    /// Sampling temperature
    #[builder(setter(strip_option), default = "Some(DEFAULT_TEMPERATURE)")]
    temperature: Option<f32>,
}

impl RequestConfig {
    /// Creates a new builder.
    pub fn builder() -> RequestConfigBuilder {
        RequestConfigBuilder::default()
    }

    /// Same configuration with a different model.
    ///
    /// A blank model is ignored.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = model.into();
        if !model.trim().is_empty() {
            self.model = model;
        }
        self
    }
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            min_request_interval: DEFAULT_MIN_REQUEST_INTERVAL,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: DEFAULT_TIMEOUT,
            session_token_budget: None,
            backoff: BackoffPolicy::default(),
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            system_prompt: None,
            temperature: Some(DEFAULT_TEMPERATURE),
        }
    }
}

impl RequestConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(model) = &self.model
            && model.trim().is_empty()
        {
            return Err("model must not be empty".to_string());
        }
        if let Some(timeout) = self.timeout
            && timeout.is_zero()
        {
            return Err("timeout must be greater than zero".to_string());
        }
        if let Some(backoff) = &self.backoff
            && backoff.max_delay < backoff.base
        {
            return Err(format!(
                "backoff max_delay ({:?}) must not be below base ({:?})",
                backoff.max_delay, backoff.base
            ));
        }
        if let Some(Some(temperature)) = self.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(format!(
                "temperature must be in [0.0, 2.0], got {}",
                temperature
            ));
        }
        Ok(())
    }
}
