mod common;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
};
use common::TestApp;
use serde_json::Value;

#[tokio::test]
async fn health_endpoints_report_ok() {
    let app = TestApp::new().await;

    let (status, body) = app.call(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let health = app.ok(Method::GET, "/api/v1/health", None).await;
    assert_eq!(health["checks"]["database"], "healthy");
    assert_eq!(health["checks"]["notification_job"], "disabled");

    let status = app.ok(Method::GET, "/api/v1/status", None).await;
    assert_eq!(status["service"], "hotel-backoffice");
}

#[tokio::test]
async fn request_id_is_echoed_and_generated() {
    let app = TestApp::new().await;

    let request = Request::builder()
        .uri("/api/v1/status")
        .header("x-request-id", "front-desk-42")
        .body(Body::empty())
        .unwrap();
    let response = app.send(request).await;
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "front-desk-42"
    );
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["meta"]["request_id"], "front-desk-42");

    let response = app.request(Method::GET, "/api/v1/status", None).await;
    let generated = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(!generated.is_empty());
}

#[tokio::test]
async fn missing_records_return_error_body() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::GET,
            "/api/v1/rooms/4f8c2d1e-0000-4000-8000-000000000000",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert!(body["message"].as_str().unwrap().starts_with("Not found"));
    assert!(body["timestamp"].is_string());
    assert!(body["request_id"].is_string());
}

#[tokio::test]
async fn list_limit_is_clamped_to_maximum() {
    let app = TestApp::new().await;
    for identity in ["P0000001", "P0000002", "P0000003"] {
        app.create_customer(identity).await;
    }

    let page = app
        .ok(Method::GET, "/api/v1/customers?page=1&limit=500", None)
        .await;
    assert_eq!(page["limit"], 100);
    assert_eq!(page["total"], 3);
    assert_eq!(page["items"].as_array().unwrap().len(), 3);

    let second = app
        .ok(Method::GET, "/api/v1/customers?page=2&limit=2", None)
        .await;
    assert_eq!(second["page"], 2);
    assert_eq!(second["total_pages"], 2);
    assert_eq!(second["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;

    let (status, doc) = app.call(Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(doc["info"]["title"], "Hotel Back Office API");
    assert!(doc["paths"]["/api/v1/reservations"].is_object());
}

#[tokio::test]
async fn huge_page_numbers_return_an_empty_page() {
    let app = TestApp::new().await;
    app.create_customer("P0000009").await;

    let page = app
        .ok(
            Method::GET,
            "/api/v1/customers?page=18446744073709551615&limit=20",
            None,
        )
        .await;
    assert_eq!(page["page"], 1_000_000_000u64);
    assert_eq!(page["total"], 1);
    assert!(page["items"].as_array().unwrap().is_empty());
}
