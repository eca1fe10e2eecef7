//! Outbound request and raw response types.

use crate::TokenUsage;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Everything a transport needs to perform one completion call.
///
/// # Examples
///
/// ```
/// use orbiter_core::TransportRequest;
/// use std::time::Duration;
///
/// let request = TransportRequest::builder()
///     .model("gpt-4o")
///     .prompt("Summarize the Artemis II crew timeline")
///     .max_output_tokens(800u32)
///     .timeout(Duration::from_secs(60))
///     .build()
///     .unwrap();
///
/// assert_eq!(*request.max_output_tokens(), 800);
/// assert_eq!(*request.system_prompt(), None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(build_fn(error = "orbiter_error::BuilderError"))]
pub struct TransportRequest {
    /// Model identifier
    #[builder(setter(into))]
    model: String,
    /// Optional system prompt sent before the user prompt
    #[builder(setter(into, strip_option), default)]
    system_prompt: Option<String>,
    /// User prompt text
    #[builder(setter(into))]
    prompt: String,
    /// Maximum tokens the provider may generate
    max_output_tokens: u32,
    /// Sampling temperature
    #[builder(setter(strip_option), default)]
    temperature: Option<f32>,
    /// Timeout for this single call
    #[serde(with = "duration_secs")]
    timeout: Duration,
}

impl TransportRequest {
    /// Creates a new builder.
    pub fn builder() -> TransportRequestBuilder {
        TransportRequestBuilder::default()
    }
}

/// Text and usage extracted from a successful provider response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct RawCompletion {
    /// Generated text
    text: String,
    /// Token usage reported by the provider, if any
    usage: Option<TokenUsage>,
}

impl RawCompletion {
    /// Create a completion with provider-reported usage.
    pub fn new(text: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            text: text.into(),
            usage,
        }
    }

    /// Create a completion reporting only a total token count.
    pub fn with_total_tokens(text: impl Into<String>, total_tokens: u64) -> Self {
        Self::new(text, Some(TokenUsage::from_total(total_tokens)))
    }

    /// Total tokens reported by the provider.
    pub fn total_tokens(&self) -> Option<u64> {
        self.usage.as_ref().map(|u| *u.total_tokens())
    }

    /// Take ownership of the generated text.
    pub fn into_text(self) -> String {
        self.text
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}
