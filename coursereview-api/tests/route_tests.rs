//! Integration tests for the review listing, health, and OpenAPI routes

use axum::http::StatusCode;
use coursereview_test_utils::{fixtures, TEST_ANON_KEY};
use serde_json::json;
use wiremock::{
    matchers::{header, method, path, query_param},
    Mock, ResponseTemplate,
};

#[path = "support/mock_backend.rs"]
mod mock_backend;
use mock_backend::TestApp;

#[tokio::test]
async fn test_list_reviews_uses_public_key() {
    let app = TestApp::start().await;
    let row = fixtures::updated_row(&fixtures::update_body());

    Mock::given(method("GET"))
        .and(path("/rest/v1/Reviews"))
        .and(query_param("course_id", "eq.CS101"))
        .and(query_param("select", "*"))
        .and(header("apikey", TEST_ANON_KEY))
        .and(header("authorization", format!("Bearer {}", TEST_ANON_KEY).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([row.clone()])))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, response) = app
        .send("GET", "/api/courses/CS101/reviews", None, "")
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "data": [row] }));
}

#[tokio::test]
async fn test_list_reviews_backend_error() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/Reviews"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            fixtures::data_rejection("column Reviews.course_id does not exist"),
        ))
        .mount(&app.backend)
        .await;

    let (status, response) = app
        .send("GET", "/api/courses/CS101/reviews", None, "")
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response,
        json!({ "error": "column Reviews.course_id does not exist" })
    );
}

#[tokio::test]
async fn test_health_ping_and_live() {
    let app = TestApp::start().await;

    let (status, response) = app.send("GET", "/health/ping", None, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!("pong"));

    let (status, response) = app.send("GET", "/health/live", None, "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["version"], env!("CARGO_PKG_VERSION"));
    assert!(response["uptime_seconds"].is_u64());
}

#[tokio::test]
async fn test_health_ready_when_backend_up() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "swagger": "2.0" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, response) = app.send("GET", "/health/ready", None, "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["backend_latency_ms"].is_u64());
}

#[tokio::test]
async fn test_health_ready_when_backend_down() {
    let app = TestApp::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "project paused" })),
        )
        .mount(&app.backend)
        .await;

    let (status, response) = app.send("GET", "/health/ready", None, "").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(
        response,
        json!({ "error": "Backend check failed: project paused" })
    );
}

#[cfg(feature = "openapi")]
#[tokio::test]
async fn test_openapi_document_served() {
    let app = TestApp::start().await;

    let (status, response) = app.send("GET", "/openapi.json", None, "").await;

    assert_eq!(status, StatusCode::OK);
    assert!(response["paths"]["/api/update.review"]["put"].is_object());
}
