mod helpers;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use helpers::{MockTranslator, TestApp};
use rinkside_deepl::TranslateError;
use rinkside_server::create_router;
use tower::ServiceExt;

#[tokio::test]
async fn health_check_returns_200() {
    let app = create_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn health_check_body_contains_status_up() {
    let response = helpers::client().get("/health").await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type_contains("application/json");
    let health: serde_json::Value = response.json();
    assert_eq!(health["status"], "UP");
}

#[test]
fn health_response_serializes_correctly() {
    use rinkside_server::HealthResponse;

    let response = HealthResponse::default();
    let json = serde_json::to_string(&response).unwrap();

    assert_eq!(json, r#"{"status":"UP"}"#);
}

#[tokio::test]
async fn upstream_health_is_up_when_translator_answers() {
    let app = TestApp::new();

    let response = app.client.get("/health/upstream").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "UP");
}

#[tokio::test]
async fn upstream_health_reports_down_with_mapped_status() {
    let translator = MockTranslator::new();
    translator.fail_with(Some(TranslateError::upstream(403, r#"{"message":"Forbidden"}"#)));
    let app = TestApp::with_translator(translator);

    let response = app.client.get("/health/upstream").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "DOWN");
    assert!(body["detail"].as_str().unwrap().contains("Forbidden"));
}

#[tokio::test]
async fn metrics_endpoint_serves_prometheus_text() {
    let app = TestApp::new();

    let response = app.client.get("/metrics").await;

    response
        .assert_status(StatusCode::OK)
        .assert_content_type_contains("text/plain");
}
