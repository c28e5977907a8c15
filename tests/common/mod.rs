#![allow(dead_code)]

use axum::body::Body;
use axum::http::Response;
use drmc_concierge::agent::ResponseGenerator;
use drmc_concierge::forms::{ FormEndpoints, FormRelay };
use drmc_concierge::knowledge::KnowledgeBase;
use drmc_concierge::llm::LlmConfig;
use drmc_concierge::server::AppState;
use drmc_concierge::session::SessionRegistry;
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

pub fn llm_config(base_url: &str) -> LlmConfig {
    LlmConfig {
        api_key: Some("test-key".to_string()),
        completion_model: Some("test-model".to_string()),
        base_url: Some(base_url.to_string()),
        timeout: Duration::from_secs(5),
    }
}

pub fn endpoints(base_url: &str) -> FormEndpoints {
    FormEndpoints {
        job_application: format!("{}/f/job", base_url),
        consultancy_request: format!("{}/f/consultancy", base_url),
        training_registration: format!("{}/f/training", base_url),
        service_booking: format!("{}/f/booking", base_url),
    }
}

pub fn app_state(llm: LlmConfig, endpoints: FormEndpoints) -> AppState {
    let knowledge = Arc::new(KnowledgeBase::builtin());
    AppState {
        generator: Arc::new(ResponseGenerator::new(llm, &knowledge)),
        knowledge,
        sessions: SessionRegistry::new(),
        forms: Arc::new(FormRelay::new(endpoints, Duration::from_secs(5)).unwrap()),
    }
}

pub fn gemini_reply(text: &str) -> Value {
    serde_json::json!({
        "candidates": [
            { "content": { "role": "model", "parts": [{ "text": text }] }, "finishReason": "STOP" }
        ]
    })
}

pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub const BOUNDARY: &str = "----drmc-test-boundary";

/// Builds a multipart/form-data body from text fields and optional file parts
/// given as (field, file name, content type, bytes).
pub fn multipart_body(fields: &[(&str, &str)], files: &[(&str, &str, &str, Vec<u8>)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY,
                name,
                value
            ).as_bytes()
        );
    }
    for (name, file_name, content_type, bytes) in files {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY,
                name,
                file_name,
                content_type
            ).as_bytes()
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
