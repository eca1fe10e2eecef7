//! Trait definitions for completion transports.

use async_trait::async_trait;
use orbiter_core::{RawCompletion, TransportRequest};
use orbiter_error::TransportError;
use std::sync::Arc;

/// The outbound-call seam of the resilient client.
///
/// Implementations perform exactly one provider call per `send` and
/// classify every failure into a [`TransportError`]. Pacing, retries,
/// budgets and caching all live above this trait.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Perform one completion call.
    async fn send(&self, request: &TransportRequest) -> Result<RawCompletion, TransportError>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;
}

#[async_trait]
impl<T> CompletionTransport for Arc<T>
where
    T: CompletionTransport + ?Sized,
{
    async fn send(&self, request: &TransportRequest) -> Result<RawCompletion, TransportError> {
        (**self).send(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}

#[async_trait]
impl<T> CompletionTransport for Box<T>
where
    T: CompletionTransport + ?Sized,
{
    async fn send(&self, request: &TransportRequest) -> Result<RawCompletion, TransportError> {
        (**self).send(request).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }
}
