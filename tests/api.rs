mod common;

use axum::body::Body;
use axum::http::{ header, Request, StatusCode };
use drmc_concierge::agent::UNCONFIGURED_FALLBACK;
use drmc_concierge::llm::LlmConfig;
use drmc_concierge::models::chat::GREETING;
use drmc_concierge::server::api::router;
use serde_json::json;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{ body_string_contains, header as header_matcher, method, path };
use wiremock::{ Mock, MockServer, ResponseTemplate };

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_multipart(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", common::BOUNDARY)
        )
        .body(Body::from(body))
        .unwrap()
}

fn unconfigured_app() -> axum::Router {
    router(common::app_state(LlmConfig::default(), common::endpoints("http://127.0.0.1:9")))
}

#[tokio::test]
async fn health_reports_unconfigured_chat() {
    let response = unconfigured_app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chat_configured"], false);
}

#[tokio::test]
async fn services_listing_and_detail() {
    let app = unconfigured_app();

    let response = app.clone().oneshot(get("/api/services")).await.unwrap();
    let body = common::json_body(response).await;
    assert_eq!(body.as_array().unwrap().len(), 5);
    assert_eq!(body[0]["shortDescription"], "Connecting top talent with leading organizations.");

    let response = app.clone().oneshot(get("/api/services/career-dev")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(common::json_body(response).await["title"], "Career Development");

    let response = app.oneshot(get("/api/services/unknown")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.headers()[header::LOCATION], "/services");
}

#[tokio::test]
async fn company_profile_is_served() {
    let response = unconfigured_app().oneshot(get("/api/company")).await.unwrap();
    let body = common::json_body(response).await;
    assert_eq!(body["contact"]["whatsapp"], "09136073791");
}

#[tokio::test]
async fn chat_session_lifecycle() {
    let app = unconfigured_app();

    let response = app.clone().oneshot(post_json("/api/chat/sessions", json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = common::json_body(response).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    assert_eq!(created["state"], "idle");
    assert_eq!(created["messages"][0]["text"], GREETING);

    let response = app
        .clone()
        .oneshot(post_json(&format!("/api/chat/sessions/{}/messages", id), json!({ "text": "Hi there" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let turn = common::json_body(response).await;
    assert_eq!(turn["user"]["role"], "user");
    assert_eq!(turn["reply"]["role"], "model");
    assert_eq!(turn["reply"]["text"], UNCONFIGURED_FALLBACK);
    assert_eq!(turn["reply"]["segments"][0]["kind"], "text");

    let response = app.clone().oneshot(get(&format!("/api/chat/sessions/{}", id))).await.unwrap();
    let snapshot = common::json_body(response).await;
    let messages = snapshot["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0]["id"], created["messages"][0]["id"]);
    assert_eq!(messages[1]["text"], "Hi there");

    let delete = Request::builder()
        .method("DELETE")
        .uri(format!("/api/chat/sessions/{}", id))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(delete).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.oneshot(get(&format!("/api/chat/sessions/{}", id))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blank_message_is_bad_request() {
    let app = unconfigured_app();
    let created = common::json_body(
        app.clone().oneshot(post_json("/api/chat/sessions", json!({}))).await.unwrap()
    ).await;
    let id = created["session_id"].as_str().unwrap();

    let response = app
        .oneshot(post_json(&format!("/api/chat/sessions/{}/messages", id), json!({ "text": "  " })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn model_links_come_back_as_segments() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(
                common::gemini_reply("Ready? [Book This Service](/book-service) today.")
            )
        )
        .mount(&server).await;

    let app = router(common::app_state(common::llm_config(&server.uri()), common::endpoints(&server.uri())));
    let created = common::json_body(
        app.clone().oneshot(post_json("/api/chat/sessions", json!({}))).await.unwrap()
    ).await;
    let id = created["session_id"].as_str().unwrap();

    let response = app
        .oneshot(post_json(&format!("/api/chat/sessions/{}/messages", id), json!({ "text": "How do I book?" })))
        .await
        .unwrap();
    let turn = common::json_body(response).await;
    let segments = turn["reply"]["segments"].as_array().unwrap();
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[1], json!({ "kind": "link", "label": "Book This Service", "target": "/book-service", "internal": true }));
}

async fn delayed_model_app(reply: &str, delay: Duration) -> (MockServer, axum::Router, String) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::gemini_reply(reply)).set_delay(delay)
        )
        .mount(&server).await;

    let app = router(common::app_state(common::llm_config(&server.uri()), common::endpoints(&server.uri())));
    let created = common::json_body(
        app.clone().oneshot(post_json("/api/chat/sessions", json!({}))).await.unwrap()
    ).await;
    let id = created["session_id"].as_str().unwrap().to_string();
    (server, app, id)
}

#[tokio::test]
async fn concurrent_message_gets_conflict() {
    let (_server, app, id) = delayed_model_app("first answer", Duration::from_millis(500)).await;
    let uri = format!("/api/chat/sessions/{}/messages", id);

    let first = tokio::spawn(app.clone().oneshot(post_json(&uri, json!({ "text": "first" }))));
    tokio::time::sleep(Duration::from_millis(100)).await;
    let second = app.clone().oneshot(post_json(&uri, json!({ "text": "second" }))).await.unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(first.status(), StatusCode::OK);
    assert_eq!(common::json_body(first).await["reply"]["text"], "first answer");

    let snapshot = common::json_body(
        app.oneshot(get(&format!("/api/chat/sessions/{}", id))).await.unwrap()
    ).await;
    let messages = snapshot["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1]["text"], "first");
    assert_eq!(snapshot["state"], "idle");
}

#[tokio::test]
async fn abandoned_request_does_not_block_the_session() {
    let (_server, app, id) = delayed_model_app("late answer", Duration::from_millis(600)).await;
    let uri = format!("/api/chat/sessions/{}/messages", id);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        app.clone().oneshot(post_json(&uri, json!({ "text": "first" })))
    ).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(900)).await;
    let snapshot = common::json_body(
        app.clone().oneshot(get(&format!("/api/chat/sessions/{}", id))).await.unwrap()
    ).await;
    assert_eq!(snapshot["state"], "idle");
    assert_eq!(snapshot["messages"][2]["text"], "late answer");

    let response = app.oneshot(post_json(&uri, json!({ "text": "second" }))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn form_catalogue_lists_every_form() {
    let response = unconfigured_app().oneshot(get("/api/forms")).await.unwrap();
    let forms = common::json_body(response).await;
    let forms = forms.as_array().unwrap();
    assert_eq!(forms.len(), 4);
    assert_eq!(forms[0]["slug"], "job-application");
    assert_eq!(forms[0]["title"], "Job Application");
    assert_eq!(forms[3]["path"], "/book-service");
    assert_eq!(forms[3]["subtitle"], "Schedule a service with our experts.");
}

#[tokio::test]
async fn booking_form_is_relayed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/f/booking"))
        .and(header_matcher("accept", "application/json"))
        .and(body_string_contains("HR Consultancy"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .expect(1)
        .mount(&server).await;

    let app = router(common::app_state(LlmConfig::default(), common::endpoints(&server.uri())));
    let body = common::multipart_body(
        &[
            ("fullName", "Ada Obi"),
            ("email", "ada@example.com"),
            ("phone", "08030000000"),
            ("serviceInterest", "HR Consultancy"),
            ("message", "Please call me."),
        ],
        &[]
    );
    let response = app.oneshot(post_multipart("/api/forms/book-service", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let receipt = common::json_body(response).await;
    assert_eq!(receipt["redirect"], "/thank-you");
    assert_eq!(receipt["name"], "Ada Obi");
}

#[tokio::test]
async fn job_application_relays_cv() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/f/job"))
        .and(body_string_contains("filename=\"cv.docx\""))
        .and(body_string_contains("State of Residence"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server).await;

    let app = router(common::app_state(LlmConfig::default(), common::endpoints(&server.uri())));
    let body = common::multipart_body(
        &[
            ("fullName", "Ada Obi"),
            ("email", "ada@example.com"),
            ("phone", "08030000000"),
            ("stateOfResidence", "Lagos"),
            ("areaOfJobInterest", "Finance"),
            ("message", "Experienced accountant."),
        ],
        &[
            (
                "file",
                "cv.docx",
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
                b"PK fake docx".to_vec(),
            ),
        ]
    );
    let response = app.oneshot(post_multipart("/api/forms/job-application", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn job_application_without_cv_is_unprocessable() {
    let server = MockServer::start().await;
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let app = router(common::app_state(LlmConfig::default(), common::endpoints(&server.uri())));
    let body = common::multipart_body(
        &[
            ("fullName", "Ada Obi"),
            ("email", "ada@example.com"),
            ("phone", "08030000000"),
            ("stateOfResidence", "Lagos"),
            ("areaOfJobInterest", "Finance"),
            ("message", "Hello"),
        ],
        &[]
    );
    let response = app.oneshot(post_multipart("/api/forms/job-application", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = common::json_body(response).await;
    assert_eq!(error["message"], "Please upload your CV to proceed.");
}

#[tokio::test]
async fn intake_failure_is_retryable_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/f/training"))
        .respond_with(ResponseTemplate::new(422))
        .mount(&server).await;

    let app = router(common::app_state(LlmConfig::default(), common::endpoints(&server.uri())));
    let body = common::multipart_body(
        &[
            ("fullName", "Ada Obi"),
            ("email", "ada@example.com"),
            ("phone", "08030000000"),
            ("trainingArea", "Leadership"),
            ("participantLocation", "Abuja"),
            ("message", "Two participants."),
        ],
        &[]
    );
    let response = app.oneshot(post_multipart("/api/forms/training-registration", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error = common::json_body(response).await;
    assert_eq!(error["message"], "Something went wrong. Please try again.");
    assert_eq!(error["retryable"], true);
}

#[tokio::test]
async fn unknown_form_is_not_found() {
    let body = common::multipart_body(&[("fullName", "x")], &[]);
    let response = unconfigured_app().oneshot(post_multipart("/api/forms/newsletter", body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
