//! Tests de middleware.

mod helpers;

use axum::http::StatusCode;
use helpers::{TestApp, client};
use uuid::Uuid;

// === Request ID ===

#[tokio::test]
async fn response_includes_request_id() {
    let response = client().get("/health").await;

    response.assert_header_exists("x-request-id");
}

#[tokio::test]
async fn request_id_is_uuid_v4() {
    let response = client().get("/health").await;

    let id = response.header("x-request-id").unwrap();
    let parsed = Uuid::parse_str(id).unwrap();

    assert_eq!(parsed.get_version_num(), 4);
}

#[tokio::test]
async fn propagates_incoming_request_id() {
    let custom_id = "my-custom-request-id-12345";

    let response = client()
        .get_with_headers("/health", vec![("x-request-id", custom_id)])
        .await;

    response.assert_header("x-request-id", custom_id);
}

#[tokio::test]
async fn replaces_malformed_incoming_request_id() {
    let response = client()
        .get_with_headers("/health", vec![("x-request-id", "not a valid id!")])
        .await;

    let id = response.header("x-request-id").unwrap();
    assert!(Uuid::parse_str(id).is_ok(), "expected generated id, got {}", id);
}

#[tokio::test]
async fn generates_different_ids_for_each_request() {
    let response1 = client().get("/health").await;
    let response2 = client().get("/health").await;

    let id1 = response1.header("x-request-id").unwrap();
    let id2 = response2.header("x-request-id").unwrap();

    assert_ne!(id1, id2);
}

// === Router completo ===

#[tokio::test]
async fn request_id_present_on_error_responses() {
    let app = TestApp::new();

    let response = app.client.get("/api/db/nothing-here").await;

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_header_exists("x-request-id");
}

#[tokio::test]
async fn cors_headers_are_added_for_cross_origin_requests() {
    let app = TestApp::new();

    let response = app
        .client
        .get_with_headers("/api/db", vec![("origin", "http://localhost:5173")])
        .await;

    response
        .assert_status(StatusCode::OK)
        .assert_header("access-control-allow-origin", "*");
}
