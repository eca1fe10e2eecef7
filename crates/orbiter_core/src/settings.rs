//! Provider credentials and endpoint settings.

use derive_getters::Getters;
use orbiter_error::ConfigError;
use std::fmt;

/// Environment variable holding the API credential.
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the model identifier.
pub const MODEL_VAR: &str = "OPENAI_MODEL";
/// Environment variable holding the organization identifier.
pub const ORGANIZATION_VAR: &str = "OPENAI_ORG_ID";
/// Environment variable overriding the API base URL.
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Credentials and endpoint for an OpenAI-compatible provider.
///
/// Read once at process start. A missing credential is a configuration
/// error, so no client can be built without one.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct ClientSettings {
    /// API credential
    api_key: String,
    /// Model identifier overriding the request configuration, if set
    model: Option<String>,
    /// Organization or tenant identifier
    organization: Option<String>,
    /// API base URL (without trailing slash)
    base_url: String,
}

impl ClientSettings {
    /// Create settings with an explicit credential and default endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential is blank.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::new(format!("{} must not be empty", API_KEY_VAR)));
        }
        Ok(Self {
            api_key,
            model: None,
            organization: None,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Read settings from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `OPENAI_API_KEY` is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// Blank optional values are treated as absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use orbiter_core::ClientSettings;
    ///
    /// let settings = ClientSettings::from_lookup(|key| match key {
    ///     "OPENAI_API_KEY" => Some("sk-test".to_string()),
    ///     "OPENAI_ORG_ID" => Some("org-nasa".to_string()),
    ///     _ => None,
    /// })
    /// .unwrap();
    ///
    /// assert_eq!(*settings.model(), None);
    /// assert_eq!(settings.organization().as_deref(), Some("org-nasa"));
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = non_blank(API_KEY_VAR).ok_or_else(|| {
            ConfigError::new(format!(
                "{} environment variable is required",
                API_KEY_VAR
            ))
        })?;

        let mut settings = Self::new(api_key)?;
        settings.model = non_blank(MODEL_VAR);
        settings.organization = non_blank(ORGANIZATION_VAR);
        if let Some(base_url) = non_blank(BASE_URL_VAR) {
            settings = settings.with_base_url(base_url);
        }
        Ok(settings)
    }

    /// Override the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the organization identifier.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Override the API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

// Keep the credential out of logs.
impl fmt::Debug for ClientSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientSettings")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("organization", &self.organization)
            .field("base_url", &self.base_url)
            .finish()
    }
}
