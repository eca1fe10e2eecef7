//! HTTP-level tests for the OpenAI transport.

mod test_utils;

use orbiter_core::ClientSettings;
use orbiter_error::TransportErrorKind;
use orbiter_interface::CompletionTransport;
use orbiter_models::OpenAiTransport;
use serde_json::json;
use std::time::Duration;
use test_utils::{TEST_API_KEY, completion_body, create_test_request, create_test_transport};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_success_returns_text_and_usage() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", format!("Bearer {}", TEST_API_KEY).as_str()))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "max_tokens": 200,
            "messages": [
                { "role": "system", "content": "You are a NASA mission planner." },
                { "role": "user", "content": "Outline a lunar flyby" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Depart TLI, coast, flyby.", 42)))
        .expect(1)
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let request = create_test_request(
        "Outline a lunar flyby",
        Some("You are a NASA mission planner."),
        TIMEOUT,
    );

    let completion = transport.send(&request).await?;
    assert_eq!(completion.text(), "Depart TLI, coast, flyby.");
    assert_eq!(completion.total_tokens(), Some(42));
    Ok(())
}

#[tokio::test]
async fn test_organization_header_is_sent() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(header("openai-organization", "org-jpl"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("ok", 5)))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ClientSettings::new(TEST_API_KEY)?
        .with_base_url(server.uri())
        .with_organization("org-jpl");
    let transport = OpenAiTransport::new(settings);

    let completion = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await?;
    assert_eq!(completion.text(), "ok");
    Ok(())
}

#[tokio::test]
async fn test_missing_usage_is_none() -> anyhow::Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": "ok" } }]
        })))
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let completion = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await?;
    assert_eq!(completion.total_tokens(), None);
    Ok(())
}

#[tokio::test]
async fn test_429_is_rate_limited_with_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(429)
                .insert_header("retry-after", "7")
                .set_body_string("Rate limit reached for gpt-4o"),
        )
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let err = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await
        .unwrap_err();

    assert_eq!(
        *err.kind(),
        TransportErrorKind::RateLimited {
            retry_after: Some(Duration::from_secs(7))
        }
    );
}

#[tokio::test]
async fn test_gateway_errors_are_transient() {
    for (status, expect_timeout) in [(504u16, true), (408, true), (502, false), (503, false)] {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(status))
            .mount(&server)
            .await;

        let transport = create_test_transport(&server.uri());
        let err = transport
            .send(&create_test_request("ping", None, TIMEOUT))
            .await
            .unwrap_err();

        assert!(err.kind().is_retryable(), "status {} should be transient", status);
        assert_eq!(
            matches!(err.kind(), TransportErrorKind::Timeout),
            expect_timeout,
            "status {}",
            status
        );
    }
}

#[tokio::test]
async fn test_auth_failure_is_permanent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Incorrect API key provided"))
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let err = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await
        .unwrap_err();

    match err.kind() {
        TransportErrorKind::Other(message) => {
            assert!(message.contains("401"));
            assert!(message.contains("Incorrect API key"));
        }
        other => panic!("expected Other, got {:?}", other),
    }
}

#[tokio::test]
async fn test_missing_content_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let err = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await
        .unwrap_err();

    assert!(matches!(
        err.kind(),
        TransportErrorKind::Other(message) if message.contains("malformed response")
    ));
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("too late", 5))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = create_test_transport(&server.uri());
    let err = transport
        .send(&create_test_request("ping", None, Duration::from_millis(100)))
        .await
        .unwrap_err();

    assert_eq!(*err.kind(), TransportErrorKind::Timeout);
}

#[tokio::test]
async fn test_unreachable_host_is_connection_error() {
    // Port 9 (discard) is closed on test hosts
    let transport = create_test_transport("http://127.0.0.1:9");
    let err = transport
        .send(&create_test_request("ping", None, TIMEOUT))
        .await
        .unwrap_err();

    assert!(matches!(err.kind(), TransportErrorKind::Connection(_)));
}
