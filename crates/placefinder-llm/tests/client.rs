//! Integration tests for `CompletionClient` using wiremock HTTP mocks.

use std::time::{Duration, Instant};

use placefinder_llm::{CompletionClient, CompletionConfig, LlmError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BASE_DELAY_MS: u64 = 25;

fn test_client(server: &MockServer, max_retries: u32) -> CompletionClient {
    CompletionClient::new(CompletionConfig {
        api_key: "sk-test".to_string(),
        api_url: format!("{}/v1/chat/completions", server.uri()),
        max_retries,
        base_delay_ms: BASE_DELAY_MS,
        timeout_ms: 5_000,
        ..CompletionConfig::default()
    })
    .expect("client construction should not fail")
}

fn chat_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn complete_sends_expected_request_and_returns_first_choice() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "deepseek-chat",
            "messages": [{ "role": "user", "content": "find ramen in Bandung" }],
            "temperature": 0.3,
            "max_tokens": 2000
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("{\"queries\":[]}")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let text = client
        .complete("find ramen in Bandung")
        .await
        .expect("completion should succeed");

    assert_eq!(text, "{\"queries\":[]}");
}

#[tokio::test]
async fn complete_without_api_key_fails_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let client = CompletionClient::new(CompletionConfig {
        api_key: String::new(),
        api_url: format!("{}/v1/chat/completions", server.uri()),
        ..CompletionConfig::default()
    })
    .expect("client");

    let err = client.complete("anything").await.unwrap_err();
    assert!(matches!(err, LlmError::Configuration), "got {err:?}");
}

#[tokio::test]
async fn complete_retries_rate_limit_twice_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429)
                .set_body_json(json!({ "error": { "message": "Rate limit reached" } })),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let started = Instant::now();
    let text = client.complete("prompt").await.expect("should recover");

    assert_eq!(text, "ok");
    // base, then 2 × base
    assert!(
        started.elapsed() >= Duration::from_millis(BASE_DELAY_MS * 3),
        "expected two back-off waits, elapsed {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn complete_retries_after_request_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chat_body("too late"))
                .set_delay(Duration::from_secs(2)),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_body("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let client = CompletionClient::new(CompletionConfig {
        api_key: "sk-test".to_string(),
        api_url: format!("{}/v1/chat/completions", server.uri()),
        max_retries: 1,
        base_delay_ms: BASE_DELAY_MS,
        timeout_ms: 200,
        ..CompletionConfig::default()
    })
    .expect("client construction should not fail");

    let text = client
        .complete("prompt")
        .await
        .expect("timed-out attempt should be retried");

    assert_eq!(text, "ok");
}

#[tokio::test]
async fn complete_fails_immediately_on_unauthorized() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": { "message": "Authentication Fails" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::Auth), "got {err:?}");
}

#[tokio::test]
async fn complete_fails_immediately_when_prompt_too_long() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            json!({ "error": { "message": "The input is too long for this model" } }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let err = client.complete("prompt").await.unwrap_err();

    assert!(matches!(err, LlmError::PayloadTooLarge), "got {err:?}");
}

#[tokio::test]
async fn complete_does_not_retry_other_client_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "error": { "message": "invalid max_tokens" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server, 3);
    let err = client.complete("prompt").await.unwrap_err();

    assert!(
        matches!(
            err,
            LlmError::Completion { status: Some(422), ref message } if message == "invalid max_tokens"
        ),
        "got {err:?}"
    );
}

#[tokio::test]
async fn complete_surfaces_server_error_after_exhausting_retries() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let client = test_client(&server, 2);
    let err = client.complete("prompt").await.unwrap_err();

    assert!(
        matches!(err, LlmError::Completion { status: Some(503), .. }),
        "got {err:?}"
    );
    assert_eq!(err.status(), Some(503));
}

#[tokio::test]
async fn complete_returns_empty_text_when_choices_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server, 0);
    let text = client.complete("prompt").await.expect("should succeed");

    assert_eq!(text, "");
}

#[tokio::test]
async fn complete_treats_connection_refused_as_network_failure() {
    let client = CompletionClient::new(CompletionConfig {
        api_key: "sk-test".to_string(),
        api_url: "http://127.0.0.1:1/v1/chat/completions".to_string(),
        max_retries: 1,
        base_delay_ms: 1,
        timeout_ms: 2_000,
        ..CompletionConfig::default()
    })
    .expect("client");

    let err = client.complete("prompt").await.unwrap_err();

    assert!(
        matches!(err, LlmError::Completion { status: None, .. }),
        "got {err:?}"
    );
}
