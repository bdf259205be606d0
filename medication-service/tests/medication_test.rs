//! Medication CRUD integration tests for medication-service.

mod common;

use common::TestApp;
use medication_service::models::MedicationResponse;

#[tokio::test]
async fn create_medication_works() {
    let app = TestApp::spawn().await;

    let response = app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    assert!(
        response.status().is_success(),
        "Create should succeed: {:?}",
        response.status()
    );

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "M1234");
    assert_eq!(body.medication_name, "Aspirin1");
    assert_eq!(body.coverage_percentage, 0.8);
    assert_eq!(body.deductible, 10.0);
    assert_eq!(body.total_cost, 2.0);

    app.cleanup().await;
}

#[tokio::test]
async fn create_with_duplicate_code_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    assert!(response.status().is_success());

    // Same code in a different case, different name
    let response = app.create_medication("m1234", "Ibuprofen", 0.5, 20.0).await;
    assert_eq!(response.status().as_u16(), 409);

    // The failed create must not have mutated the store
    assert_eq!(app.medication_count().await, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn create_with_duplicate_name_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    assert!(response.status().is_success());

    let response = app.create_medication("M9999", "ASPIRIN1", 0.5, 20.0).await;
    assert_eq!(response.status().as_u16(), 409);
    assert_eq!(app.medication_count().await, 1);

    app.cleanup().await;
}

#[tokio::test]
async fn update_medication_works() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    let id = app.medication_id("M1234").await;

    let response = app
        .update_medication(id, "M1234", "Aspirin One", 0.75, 8.0)
        .await;
    assert!(
        response.status().is_success(),
        "Update should succeed: {:?}",
        response.status()
    );

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.medication_name, "Aspirin One");
    assert_eq!(body.coverage_percentage, 0.75);
    assert_eq!(body.deductible, 8.0);
    assert_eq!(body.total_cost, 2.0);

    app.cleanup().await;
}

#[tokio::test]
async fn update_nonexistent_medication_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app.update_medication(9999, "M1234", "Aspirin1", 0.8, 10.0).await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn update_to_taken_code_is_rejected() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    app.create_medication("M1235", "Aspirin2", 0.7, 12.0).await;
    let id = app.medication_id("M1235").await;

    // Case difference must not slip past the collision check
    let response = app.update_medication(id, "m1234", "Aspirin2", 0.7, 12.0).await;
    assert_eq!(response.status().as_u16(), 409);

    app.cleanup().await;
}

#[tokio::test]
async fn update_keeping_own_code_succeeds() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    let id = app.medication_id("M1234").await;

    // Same code (different case) is not a collision with itself
    let response = app.update_medication(id, "m1234", "Aspirin1", 0.9, 10.0).await;
    assert!(
        response.status().is_success(),
        "Update with own code should succeed: {:?}",
        response.status()
    );

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.total_cost, 1.0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_medication_works() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    let id = app.medication_id("M1234").await;

    let response = app.delete_medication(id).await;
    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["detail"], "Medication deleted successfully");
    assert_eq!(body["code"], "M1234");

    // Gone from the store: lookup by its code now misses
    let response = app.lookup("code=M1234").await;
    assert_eq!(response.status().as_u16(), 404);

    // Deleting again is not a repeated success
    let response = app.delete_medication(id).await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_nonexistent_medication_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app.delete_medication(9999).await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}

#[tokio::test]
async fn lookup_without_parameters_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/medications", app.address))
        .send()
        .await
        .expect("Failed to send lookup request");
    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn lookup_by_code_is_case_insensitive() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;

    let response = app.lookup("code=m1234").await;
    assert!(response.status().is_success());

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "M1234");
    assert_eq!(body.total_cost, 2.0);

    app.cleanup().await;
}

#[tokio::test]
async fn lookup_by_name_is_case_insensitive() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;

    let response = app.lookup("name=aspirin1").await;
    assert!(response.status().is_success());

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.medication_name, "Aspirin1");

    app.cleanup().await;
}

#[tokio::test]
async fn lookup_prefers_code_when_both_are_given() {
    let app = TestApp::spawn().await;

    app.create_medication("M1234", "Aspirin1", 0.8, 10.0).await;
    app.create_medication("M1235", "Aspirin2", 0.7, 12.0).await;

    let response = app.lookup("code=M1234&name=Aspirin2").await;
    assert!(response.status().is_success());

    let body: MedicationResponse = response.json().await.expect("Failed to parse response");
    assert_eq!(body.code, "M1234");
    assert_eq!(body.medication_name, "Aspirin1");

    app.cleanup().await;
}

#[tokio::test]
async fn lookup_unknown_code_returns_not_found() {
    let app = TestApp::spawn().await;

    let response = app.lookup("code=M0000").await;
    assert_eq!(response.status().as_u16(), 404);

    app.cleanup().await;
}
