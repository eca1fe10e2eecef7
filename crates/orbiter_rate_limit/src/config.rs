//! TOML configuration for client defaults and provider tiers.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from orbiter.toml)
//! - User overrides (~/.config/orbiter/orbiter.toml, then ./orbiter.toml)
//! - Automatic merging with user values taking precedence

use crate::Tier;
use config::{Config, File, FileFormat};
use orbiter_core::{
    BackoffPolicy, DEFAULT_CACHE_CAPACITY, DEFAULT_MAX_RETRIES, DEFAULT_MIN_REQUEST_INTERVAL,
    DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT, RequestConfig,
};
use orbiter_error::{ConfigError, OrbiterError, OrbiterResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// Model-specific quota overrides.
///
/// Only specified fields override the tier defaults.
///
/// ```toml
/// [providers.openai.tiers.tier1.models."gpt-4o-mini"]
/// tpm = 2_000_000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, Default)]
pub struct ModelTierConfig {
    /// Requests per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u32>,

    /// Tokens per minute limit (overrides tier default)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,
}

/// Quota configuration for a provider tier.
///
/// Implements [`Tier`], so a loaded tier can drive a
/// [`QuotaLimiter`](crate::QuotaLimiter) directly. `None` means unlimited.
///
/// ```toml
/// [providers.openai.tiers.free]
/// name = "Free"
/// rpm = 3
/// tpm = 40_000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TierConfig {
    /// Name of the tier (e.g., "Free", "Tier 1")
    pub name: String,

    /// Requests per minute limit
    #[serde(default)]
    pub rpm: Option<u32>,

    /// Tokens per minute limit
    #[serde(default)]
    pub tpm: Option<u64>,

    /// Model-specific overrides
    #[serde(default)]
    pub models: HashMap<String, ModelTierConfig>,
}

impl Tier for TierConfig {
    fn rpm(&self) -> Option<u32> {
        self.rpm
    }

    fn tpm(&self) -> Option<u64> {
        self.tpm
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl TierConfig {
    /// Tier configuration with the overrides for `model_name` applied.
    ///
    /// Returns the tier defaults when the model has no overrides.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use orbiter_rate_limit::{OrbiterConfig, Tier};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = OrbiterConfig::load()?;
    /// let tier = config.get_tier("openai", Some("tier1")).unwrap();
    /// println!("gpt-4o-mini TPM: {:?}", tier.for_model("gpt-4o-mini").tpm());
    /// # Ok(())
    /// # }
    /// ```
    pub fn for_model(&self, model_name: &str) -> TierConfig {
        match self.models.get(model_name) {
            Some(overrides) => TierConfig {
                name: self.name.clone(),
                rpm: overrides.rpm.or(self.rpm),
                tpm: overrides.tpm.or(self.tpm),
                models: HashMap::new(),
            },
            None => self.clone(),
        }
    }
}

/// Configuration for a specific provider.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderConfig {
    /// Name of the default tier for this provider
    pub default_tier: String,

    /// Map of tier name to tier configuration
    #[serde(default)]
    pub tiers: HashMap<String, TierConfig>,
}

/// Client defaults as written in TOML.
///
/// Durations are fractional seconds. Missing fields fall back to the
/// library defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientDefaults {
    /// Model identifier
    pub model: String,
    /// Minimum spacing between dispatched requests
    pub min_request_interval_secs: f64,
    /// Additional attempts after a transient failure
    pub max_retries: u32,
    /// Per-attempt timeout
    pub timeout_secs: f64,
    /// Cumulative session token cap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token_budget: Option<u64>,
    /// Maximum cached responses (0 disables the cache)
    pub cache_capacity: usize,
    /// System prompt sent with every request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Delay before the first retry
    pub backoff_base_secs: f64,
    /// Upper bound for any retry wait
    pub backoff_max_secs: f64,
    /// Ceiling of the random offset added to each retry wait
    pub backoff_jitter_secs: f64,
    /// Provider quota tier to enforce (e.g., "tier1")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<String>,
}

impl Default for ClientDefaults {
    fn default() -> Self {
        let backoff = BackoffPolicy::default();
        Self {
            model: DEFAULT_MODEL.to_string(),
            min_request_interval_secs: DEFAULT_MIN_REQUEST_INTERVAL.as_secs_f64(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT.as_secs_f64(),
            session_token_budget: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            system_prompt: None,
            temperature: Some(DEFAULT_TEMPERATURE),
            backoff_base_secs: backoff.base().as_secs_f64(),
            backoff_max_secs: backoff.max_delay().as_secs_f64(),
            backoff_jitter_secs: backoff.jitter().as_secs_f64(),
            tier: None,
        }
    }
}

#[track_caller]
fn seconds(field: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|e| {
        ConfigError::new(format!("{} must be a non-negative number of seconds: {}", field, e))
    })
}

impl ClientDefaults {
    /// Convert to a validated [`RequestConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error for negative or non-finite durations, and for
    /// values the request configuration rejects.
    pub fn to_request_config(&self) -> OrbiterResult<RequestConfig> {
        let backoff = BackoffPolicy::new(
            seconds("backoff_base_secs", self.backoff_base_secs)?,
            seconds("backoff_max_secs", self.backoff_max_secs)?,
        )
        .with_jitter(seconds("backoff_jitter_secs", self.backoff_jitter_secs)?);

        let mut builder = RequestConfig::builder();
        builder
            .model(self.model.clone())
            .min_request_interval(seconds(
                "min_request_interval_secs",
                self.min_request_interval_secs,
            )?)
            .max_retries(self.max_retries)
            .timeout(seconds("timeout_secs", self.timeout_secs)?)
            .backoff(backoff)
            .cache_capacity(self.cache_capacity);
        if let Some(temperature) = self.temperature {
            builder.temperature(temperature);
        }
        if let Some(budget) = self.session_token_budget {
            builder.session_token_budget(budget);
        }
        if let Some(system_prompt) = &self.system_prompt {
            builder.system_prompt(system_prompt.clone());
        }
        Ok(builder.build()?)
    }
}

/// Top-level Orbiter configuration.
///
/// Loads client defaults and provider tiers from TOML with precedence:
/// 1. Bundled defaults (orbiter.toml shipped with the library)
/// 2. User config in home directory (~/.config/orbiter/orbiter.toml)
/// 3. User config in current directory (./orbiter.toml)
///
/// # Example
///
/// ```no_run
/// use orbiter_rate_limit::OrbiterConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OrbiterConfig::load()?;
/// let request_config = config.request_config()?;
/// println!("model: {}", request_config.model());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct OrbiterConfig {
    /// Client defaults
    #[serde(default)]
    pub client: ClientDefaults,

    /// Map of provider name to provider configuration
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl OrbiterConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> OrbiterResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                OrbiterError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                OrbiterError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> OrbiterResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../orbiter.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/orbiter/orbiter.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("orbiter").required(false));

        builder
            .build()
            .map_err(|e| {
                OrbiterError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                OrbiterError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Request configuration built from the `[client]` section.
    pub fn request_config(&self) -> OrbiterResult<RequestConfig> {
        self.client.to_request_config()
    }

    /// Get tier configuration for a provider.
    ///
    /// Uses the provider's default tier when `tier_name` is `None`.
    /// Returns `None` for unknown providers or tiers.
    #[instrument(skip(self))]
    pub fn get_tier(&self, provider: &str, tier_name: Option<&str>) -> Option<TierConfig> {
        let provider_config = self.providers.get(provider)?;

        let tier = tier_name.unwrap_or(&provider_config.default_tier);

        debug!(provider, tier, "Looking up tier configuration");

        provider_config.tiers.get(tier).cloned()
    }

    /// Tier named in `[client] tier` for `provider`, with model overrides applied.
    ///
    /// Returns `None` when no tier is configured for the client.
    pub fn client_tier(&self, provider: &str) -> Option<TierConfig> {
        let tier_name = self.client.tier.as_deref()?;
        self.get_tier(provider, Some(tier_name))
            .map(|tier| tier.for_model(&self.client.model))
    }
}
