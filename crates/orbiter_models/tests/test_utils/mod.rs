//! Test utilities for transport tests.

use orbiter_core::{ClientSettings, TransportRequest};
use orbiter_models::OpenAiTransport;
use serde_json::{Value, json};
use std::time::Duration;

/// Credential used against mock servers.
pub const TEST_API_KEY: &str = "sk-test-orbiter";

/// Transport pointed at a mock server.
pub fn create_test_transport(base_url: &str) -> OpenAiTransport {
    let settings = ClientSettings::new(TEST_API_KEY)
        .expect("Failed to build settings")
        .with_base_url(base_url);
    OpenAiTransport::new(settings)
}

/// Helper to create a test TransportRequest using the builder pattern.
pub fn create_test_request(prompt: &str, system: Option<&str>, timeout: Duration) -> TransportRequest {
    let mut builder = TransportRequest::builder();
    builder
        .model("gpt-4o")
        .prompt(prompt)
        .max_output_tokens(200u32)
        .temperature(0.1)
        .timeout(timeout);
    if let Some(system) = system {
        builder.system_prompt(system);
    }
    builder.build().expect("Failed to build test request")
}

/// Chat-completions success body.
pub fn completion_body(content: &str, total_tokens: u64) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }],
        "usage": {
            "prompt_tokens": total_tokens / 2,
            "completion_tokens": total_tokens - total_tokens / 2,
            "total_tokens": total_tokens
        }
    })
}
