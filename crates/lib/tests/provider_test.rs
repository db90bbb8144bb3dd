//! # AI Provider Wire Tests
//!
//! Runs the OpenAI and Gemini providers against an `httpmock` server to verify
//! the request shape and how responses map to choices.

use httpmock::prelude::*;
use secrecy::SecretString;
use serde_json::json;
use std::time::Duration;
use synopdf::{
    providers::factory::{create_provider, ProviderKind},
    ContentGenerator, GenerationError, PromptError,
};

#[tokio::test]
async fn test_openai_sends_single_user_message() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1/chat/completions")
            .header("authorization", "Bearer sk-test")
            .json_body(json!({
                "model": "gpt-4",
                "messages": [{"role": "user", "content": "Fasse zusammen."}]
            }));
        then.status(200).json_body(json!({
            "choices": [{"message": {"role": "assistant", "content": "Zusammenfassung"}}]
        }));
    });

    let provider = create_provider(
        ProviderKind::Openai,
        Some(&server.url("/v1/chat/completions")),
        &SecretString::from("sk-test"),
        "gpt-4",
    )
    .unwrap();
    let choices = provider.complete("Fasse zusammen.").await.unwrap();

    mock.assert();
    assert_eq!(choices, vec!["Zusammenfassung".to_string()]);
}

#[tokio::test]
async fn test_openai_null_content_and_missing_choices() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/null");
        then.status(200)
            .json_body(json!({"choices": [{"message": {"role": "assistant", "content": null}}]}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/none");
        then.status(200).json_body(json!({"id": "chatcmpl-1"}));
    });

    let null_provider = create_provider(
        ProviderKind::Openai,
        Some(&server.url("/null")),
        &SecretString::from("k"),
        "m",
    )
    .unwrap();
    assert_eq!(null_provider.complete("p").await.unwrap(), vec![String::new()]);

    let none_provider = create_provider(
        ProviderKind::Openai,
        Some(&server.url("/none")),
        &SecretString::from("k"),
        "m",
    )
    .unwrap();
    assert!(none_provider.complete("p").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_openai_error_status_is_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(401)
            .json_body(json!({"error": {"message": "Incorrect API key provided"}}));
    });

    let provider = create_provider(
        ProviderKind::Openai,
        Some(&server.url("/v1/chat/completions")),
        &SecretString::from("bad"),
        "gpt-4",
    )
    .unwrap();
    let err = provider.complete("p").await.unwrap_err();

    match err {
        PromptError::AiApi { status, body } => {
            assert_eq!(status, 401);
            assert!(body.contains("Incorrect API key"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_surfaces_as_generation_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/v1/chat/completions");
        then.status(200).body("not json");
    });

    let provider = create_provider(
        ProviderKind::Openai,
        Some(&server.url("/v1/chat/completions")),
        &SecretString::from("k"),
        "gpt-4",
    )
    .unwrap();
    let generator = ContentGenerator::new(provider, Duration::from_secs(5));
    let err = generator.generate("p").await.unwrap_err();

    assert!(matches!(
        err,
        GenerationError::Provider(PromptError::AiDeserialization(_))
    ));
}

#[tokio::test]
async fn test_gemini_joins_candidate_parts() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/v1beta/models/gemini-test:generateContent")
            .query_param("key", "g-key")
            .body_contains("Fasse zusammen.");
        then.status(200).json_body(json!({
            "candidates": [{"content": {"parts": [{"text": "Teil 1. "}, {"text": "Teil 2."}]}}]
        }));
    });

    let provider = create_provider(
        ProviderKind::Gemini,
        Some(&server.url("/v1beta/models/gemini-test:generateContent")),
        &SecretString::from("g-key"),
        "gemini-test",
    )
    .unwrap();
    let choices = provider.complete("Fasse zusammen.").await.unwrap();

    mock.assert();
    assert_eq!(choices, vec!["Teil 1. Teil 2.".to_string()]);
}
