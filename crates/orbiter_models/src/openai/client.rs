//! OpenAI chat-completions client.

use crate::openai::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use orbiter_core::{ClientSettings, RawCompletion, TokenUsage, TransportRequest};
use orbiter_error::{TransportError, TransportErrorKind};
use orbiter_interface::CompletionTransport;
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Longest error body excerpt carried into an error message.
const MAX_ERROR_BODY: usize = 512;

/// Transport for OpenAI and OpenAI-compatible chat-completions APIs.
///
/// Performs exactly one HTTP call per [`send`](CompletionTransport::send).
/// The per-request timeout comes from the [`TransportRequest`].
#[derive(Debug, Clone)]
pub struct OpenAiTransport {
    client: Client,
    settings: ClientSettings,
}

impl OpenAiTransport {
    /// Creates a transport with a fresh HTTP client.
    #[instrument(skip_all, fields(base_url = %settings.base_url()))]
    pub fn new(settings: ClientSettings) -> Self {
        Self::with_client(settings, Client::new())
    }

    /// Creates a transport sharing an existing HTTP client.
    pub fn with_client(settings: ClientSettings, client: Client) -> Self {
        Self { client, settings }
    }

    /// Settings this transport was built with.
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.settings.base_url())
    }
}

/// Parse a `Retry-After` header given in seconds.
///
/// HTTP-date values are ignored; the caller falls back to its own backoff.
pub fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    let value = headers.get("retry-after")?.to_str().ok()?.trim();
    value
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
        .or_else(|| {
            value
                .parse::<f64>()
                .ok()
                .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
        })
}

/// Classify a non-success HTTP status.
///
/// # Examples
///
/// ```
/// use orbiter_error::TransportErrorKind;
/// use orbiter_models::classify_status;
///
/// assert_eq!(classify_status(504, None, ""), TransportErrorKind::Timeout);
/// assert!(matches!(
///     classify_status(401, None, "invalid api key"),
///     TransportErrorKind::Other(_)
/// ));
/// ```
pub fn classify_status(status: u16, retry_after: Option<Duration>, body: &str) -> TransportErrorKind {
    match status {
        429 => TransportErrorKind::RateLimited { retry_after },
        408 | 504 => TransportErrorKind::Timeout,
        502 | 503 => TransportErrorKind::Connection(format!("HTTP {}", status)),
        _ => {
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            TransportErrorKind::Other(format!("HTTP {}: {}", status, excerpt))
        }
    }
}

/// Classify a reqwest failure that produced no usable response.
fn classify_reqwest_error(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() || err.is_request() || err.is_body() {
        TransportErrorKind::Connection(err.to_string())
    } else if err.is_decode() {
        TransportErrorKind::Other(format!("malformed response: {}", err))
    } else {
        TransportErrorKind::Other(err.to_string())
    }
}

#[async_trait]
impl CompletionTransport for OpenAiTransport {
    #[instrument(
        skip(self, request),
        fields(
            provider = "openai",
            model = %request.model(),
            max_output_tokens = request.max_output_tokens()
        )
    )]
    async fn send(&self, request: &TransportRequest) -> Result<RawCompletion, TransportError> {
        let body = ChatCompletionRequest::from(request);
        let url = self.endpoint();
        debug!(url = %url, "Sending chat completion request");

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(self.settings.api_key())
            .timeout(*request.timeout())
            .json(&body);
        if let Some(organization) = self.settings.organization() {
            builder = builder.header("OpenAI-Organization", organization);
        }

        let response = builder.send().await.map_err(|e| {
            let kind = classify_reqwest_error(&e);
            warn!(error = %e, class = %kind, "Request failed before a response");
            TransportError::new(kind)
        })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = parse_retry_after(response.headers());
            let error_text = response.text().await.unwrap_or_default();
            let kind = classify_status(status.as_u16(), retry_after, &error_text);
            warn!(status = %status, class = %kind, "Provider returned error status");
            return Err(TransportError::new(kind));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| TransportError::new(classify_reqwest_error(&e)))?;

        let text = parsed.first_content().ok_or_else(|| {
            TransportError::new(TransportErrorKind::Other(
                "malformed response: no message content".to_string(),
            ))
        })?;

        let usage = parsed.usage().map(TokenUsage::from);
        debug!(
            total_tokens = ?usage.map(|u| *u.total_tokens()),
            "Chat completion succeeded"
        );

        Ok(RawCompletion::new(text, usage))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
