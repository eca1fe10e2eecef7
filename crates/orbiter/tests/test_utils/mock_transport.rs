//! Scripted mock transport for testing.

use async_trait::async_trait;
use orbiter::{
    CompletionTransport, RawCompletion, TransportError, TransportErrorKind, TransportRequest,
};
use std::sync::Mutex;
use tokio::time::Instant;

/// A single mock response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Return text with an optional provider-reported token count
    Success { text: String, tokens: Option<u64> },
    /// Fail with the given class
    Error(TransportErrorKind),
}

impl MockResponse {
    /// Success reporting `tokens` total tokens.
    pub fn ok(text: impl Into<String>, tokens: u64) -> Self {
        MockResponse::Success {
            text: text.into(),
            tokens: Some(tokens),
        }
    }

    fn into_result(self) -> Result<RawCompletion, TransportError> {
        match self {
            MockResponse::Success { text, tokens: Some(tokens) } => {
                Ok(RawCompletion::with_total_tokens(text, tokens))
            }
            MockResponse::Success { text, tokens: None } => Ok(RawCompletion::new(text, None)),
            MockResponse::Error(kind) => Err(TransportError::new(kind)),
        }
    }
}

/// Behavior configuration for mock responses.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Always return the same response
    Always(MockResponse),
    /// Return a sequence of responses, repeating the last one when exhausted
    Sequence(Vec<MockResponse>),
}

/// Mock transport for testing.
///
/// Records every dispatch so tests can check call counts, request
/// contents and spacing without a network.
pub struct MockTransport {
    behavior: MockBehavior,
    calls: Mutex<Vec<(Instant, TransportRequest)>>,
}

impl MockTransport {
    /// Mock that always succeeds with `text` reporting `tokens`.
    pub fn new_success(text: impl Into<String>, tokens: u64) -> Self {
        Self::new_with_behavior(MockBehavior::Always(MockResponse::ok(text, tokens)))
    }

    /// Mock that always fails with `kind`.
    pub fn new_error(kind: TransportErrorKind) -> Self {
        Self::new_with_behavior(MockBehavior::Always(MockResponse::Error(kind)))
    }

    /// Mock with a sequence of responses.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        Self::new_with_behavior(MockBehavior::Sequence(responses))
    }

    /// Mock with custom behavior.
    pub fn new_with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Number of times send() was called.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Instants at which send() was called.
    pub fn dispatch_times(&self) -> Vec<Instant> {
        self.calls.lock().unwrap().iter().map(|(at, _)| *at).collect()
    }

    /// The most recent request.
    #[allow(dead_code)]
    pub fn last_request(&self) -> Option<TransportRequest> {
        self.calls.lock().unwrap().last().map(|(_, req)| req.clone())
    }

    fn next_response(&self, index: usize) -> MockResponse {
        match &self.behavior {
            MockBehavior::Always(response) => response.clone(),
            MockBehavior::Sequence(responses) => responses
                .get(index)
                .or_else(|| responses.last())
                .cloned()
                .unwrap_or_else(|| {
                    MockResponse::Error(TransportErrorKind::Other("empty script".to_string()))
                }),
        }
    }
}

#[async_trait]
impl CompletionTransport for MockTransport {
    async fn send(&self, request: &TransportRequest) -> Result<RawCompletion, TransportError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push((Instant::now(), request.clone()));
            calls.len() - 1
        };
        self.next_response(index).into_result()
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
