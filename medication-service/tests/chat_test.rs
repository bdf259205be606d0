//! Chat relay integration tests for medication-service.
//!
//! All tests run against a mock generator; no model endpoint is contacted.

mod common;

use common::TestApp;
use medication_service::services::generator::mock::MockTextGenerator;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn chat_relays_generated_reply() {
    let app = TestApp::spawn_with_generator(Arc::new(MockTextGenerator::with_reply(
        "Hello from the model",
    )))
    .await;

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .json(&json!({ "message": "Hi there" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reply"], "Hello from the model");

    app.cleanup().await;
}

#[tokio::test]
async fn chat_falls_back_when_generation_is_empty() {
    let app = TestApp::spawn_with_generator(Arc::new(MockTextGenerator::empty())).await;

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .json(&json!({ "message": "Hi there" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["reply"], "Sorry, I didn't understand that.");

    app.cleanup().await;
}

#[tokio::test]
async fn chat_generation_failure_returns_500() {
    let app = TestApp::spawn_with_generator(Arc::new(MockTextGenerator::failing())).await;

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .json(&json!({ "message": "Hi there" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert_eq!(response.status().as_u16(), 500);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "Internal server error");
    assert!(
        body["details"]
            .as_str()
            .unwrap_or_default()
            .contains("mock generator failure"),
        "Failure should carry the underlying message: {}",
        body
    );

    app.cleanup().await;
}

#[tokio::test]
async fn chat_echo_generator_sees_the_message() {
    let app = TestApp::spawn_with_generator(Arc::new(MockTextGenerator::echoing())).await;

    let response = app
        .client
        .post(format!("{}/chat", app.address))
        .json(&json!({ "message": "aspirin coverage" }))
        .send()
        .await
        .expect("Failed to send chat request");
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert!(
        body["reply"]
            .as_str()
            .unwrap_or_default()
            .contains("aspirin coverage")
    );

    app.cleanup().await;
}
