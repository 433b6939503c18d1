//! Coaching provider against a mock HTTP server.

use std::sync::Arc;

use lockin_core::coach::{
    COMPLETION_EMPTY_FALLBACK, COMPLETION_ERROR_FALLBACK, INTERVENTION_EMPTY_FALLBACK,
    INTERVENTION_ERROR_FALLBACK, START_ERROR_FALLBACK,
};
use lockin_core::storage::CoachConfig;
use lockin_core::{Coach, CoachError, CoachProvider, DurationMinutes, GeminiProvider};
use mockito::{Matcher, Server};

const PATH: &str = "/v1beta/models/test-model:generateContent";

fn config(base_url: String) -> CoachConfig {
    CoachConfig {
        enabled: true,
        model: "test-model".into(),
        base_url,
        timeout_secs: 5,
    }
}

fn reply(text: &str) -> String {
    serde_json::json!({
        "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
    })
    .to_string()
}

#[tokio::test]
async fn returns_generated_text() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_header("x-goog-api-key", "secret")
        .match_body(Matcher::Regex(r#""role":"user""#.into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(reply("  phone down. mind up.\n"))
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    let coach = Coach::new(Arc::new(provider));
    let text = coach
        .start_message("Quit Instagram", DurationMinutes::DEFAULT)
        .await;

    assert_eq!(text, "phone down. mind up.");
    mock.assert_async().await;
}

#[tokio::test]
async fn prompt_carries_intent_and_duration() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("Quit Reddit".into()),
            Matcher::Regex("25 minutes".into()),
        ]))
        .with_status(200)
        .with_body(reply("go."))
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    assert_eq!(provider.start_message("Quit Reddit", 25).await.unwrap(), "go.");
    mock.assert_async().await;
}

#[tokio::test]
async fn server_errors_fall_back_per_operation() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("internal")
        .expect(3)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    let coach = Coach::new(Arc::new(provider));

    assert_eq!(
        coach.start_message("x", DurationMinutes::DEFAULT).await,
        START_ERROR_FALLBACK
    );
    assert_eq!(coach.intervention_message("x").await, INTERVENTION_ERROR_FALLBACK);
    assert_eq!(coach.completion_message("x").await, COMPLETION_ERROR_FALLBACK);
    mock.assert_async().await;
}

#[tokio::test]
async fn status_error_is_reported_by_the_provider() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(429)
        .with_body("slow down")
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    match provider.completion_message("x").await {
        Err(CoachError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "slow down");
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn no_candidates_uses_empty_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"candidates": []}"#)
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    assert!(matches!(
        provider.completion_message("x").await,
        Err(CoachError::EmptyResponse)
    ));
    let coach = Coach::new(Arc::new(provider));
    assert_eq!(coach.completion_message("x").await, COMPLETION_EMPTY_FALLBACK);
}

#[tokio::test]
async fn whitespace_text_is_an_empty_response() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(reply("  \n "))
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    assert!(matches!(
        provider.intervention_message("x").await,
        Err(CoachError::EmptyResponse)
    ));
    let coach = Coach::new(Arc::new(provider));
    assert_eq!(coach.intervention_message("x").await, INTERVENTION_EMPTY_FALLBACK);
}

#[tokio::test]
async fn malformed_body_uses_error_fallback() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body("<html>")
        .create_async()
        .await;

    let provider = GeminiProvider::new(&config(server.url()), "secret").unwrap();
    assert!(matches!(
        provider.intervention_message("x").await,
        Err(CoachError::Decode(_))
    ));
    let coach = Coach::new(Arc::new(provider));
    assert_eq!(coach.intervention_message("x").await, INTERVENTION_ERROR_FALLBACK);
}

#[tokio::test]
async fn unreachable_server_uses_error_fallback() {
    // Port 9 (discard) on localhost is closed on any sane test machine.
    let provider = GeminiProvider::new(&config("http://127.0.0.1:9".into()), "secret").unwrap();
    let coach = Coach::new(Arc::new(provider));
    assert_eq!(
        coach.start_message("x", DurationMinutes::DEFAULT).await,
        START_ERROR_FALLBACK
    );
}
