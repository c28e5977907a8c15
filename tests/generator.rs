mod common;

use drmc_concierge::agent::{
    GenerationFailure,
    ResponseGenerator,
    EMPTY_FALLBACK,
    UNAVAILABLE_FALLBACK,
    UNCONFIGURED_FALLBACK,
};
use drmc_concierge::knowledge::KnowledgeBase;
use drmc_concierge::llm::LlmConfig;
use drmc_concierge::models::chat::Turn;
use serde_json::{ json, Value };
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{ header, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

const GENERATE_PATH: &str = "/models/test-model:generateContent";

#[tokio::test]
async fn returns_model_text_and_sends_full_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                common::gemini_reply("Please use the [Job Application Portal](/apply/job-application).")
            )
        )
        .expect(1)
        .mount(&server).await;

    let generator = ResponseGenerator::new(common::llm_config(&server.uri()), &KnowledgeBase::builtin());
    let reply = generator.generate(&[Turn::model("Hello!")], "I want to apply for a job").await;
    assert_eq!(reply, "Please use the [Job Application Portal](/apply/job-application).");

    let requests = server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    let instruction = body["systemInstruction"]["parts"][0]["text"].as_str().unwrap();
    assert!(instruction.contains("[Job Application Portal](/apply/job-application)"));
    assert_eq!(
        body["contents"],
        json!([
            { "role": "model", "parts": [{ "text": "Hello!" }] },
            { "role": "user", "parts": [{ "text": "I want to apply for a job" }] }
        ])
    );
}

#[tokio::test]
async fn missing_key_makes_no_outbound_call() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::gemini_reply("unused")))
        .expect(0)
        .mount(&server).await;

    let config = LlmConfig { api_key: None, ..common::llm_config(&server.uri()) };
    let generator = ResponseGenerator::new(config, &KnowledgeBase::builtin());

    assert_eq!(generator.generate(&[], "hello").await, UNCONFIGURED_FALLBACK);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn service_error_returns_unavailable_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server).await;

    let generator = ResponseGenerator::new(common::llm_config(&server.uri()), &KnowledgeBase::builtin());
    assert!(
        matches!(
            generator.try_generate(&[], "hello").await,
            Err(GenerationFailure::TransportOrServiceFailure(_))
        )
    );
    assert_eq!(generator.generate(&[], "hello").await, UNAVAILABLE_FALLBACK);
}

#[tokio::test]
async fn unreachable_service_returns_unavailable_fallback() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let generator = ResponseGenerator::new(common::llm_config(&uri), &KnowledgeBase::builtin());
    assert_eq!(generator.generate(&[], "hello").await, UNAVAILABLE_FALLBACK);
}

#[tokio::test]
async fn slow_service_times_out_to_unavailable_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::gemini_reply("too late"))
                .set_delay(Duration::from_secs(2))
        )
        .mount(&server).await;

    let config = LlmConfig { timeout: Duration::from_millis(200), ..common::llm_config(&server.uri()) };
    let generator = ResponseGenerator::new(config, &KnowledgeBase::builtin());
    assert_eq!(generator.generate(&[], "hello").await, UNAVAILABLE_FALLBACK);
}

#[tokio::test]
async fn empty_completion_returns_rephrase_fallback() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server).await;

    let generator = ResponseGenerator::new(common::llm_config(&server.uri()), &KnowledgeBase::builtin());
    assert_eq!(generator.generate(&[], "hello").await, EMPTY_FALLBACK);
}

#[tokio::test]
async fn concurrent_first_use_builds_one_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::gemini_reply("ok")))
        .expect(8)
        .mount(&server).await;

    let generator = Arc::new(
        ResponseGenerator::new(common::llm_config(&server.uri()), &KnowledgeBase::builtin())
    );
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let generator = generator.clone();
            tokio::spawn(async move { generator.generate(&[], &format!("question {}", i)).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap(), "ok");
    }
    assert!(generator.is_configured());
}
