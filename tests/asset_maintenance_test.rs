mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

async fn register(app: &TestApp, tag: &str) -> Value {
    app.ok(
        Method::POST,
        "/api/v1/assets",
        Some(json!({
            "asset_tag": tag,
            "name": "Rooftop chiller",
            "category": "hvac",
            "purchase_date": "2024-01-01",
            "purchase_cost": "18000.00",
            "maintenance_interval_days": 90,
            "warranty_expiry_date": "2027-01-01"
        })),
    )
    .await
}

#[tokio::test]
async fn schedule_starts_from_purchase_and_moves_with_each_visit() {
    let app = TestApp::new().await;
    let chiller = register(&app, "HVAC-001").await;
    assert_eq!(chiller["status"], "operational");
    assert_eq!(chiller["next_maintenance_date"], "2024-03-31");
    let id = chiller["id"].as_str().unwrap();

    let started = app
        .ok(
            Method::POST,
            &format!("/api/v1/assets/{id}/start-maintenance"),
            None,
        )
        .await;
    assert_eq!(started["status"], "under_maintenance");

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/assets/{id}/maintenance"),
            Some(json!({
                "performed_on": "2024-04-02",
                "description": "Replaced compressor belts",
                "cost": "240.00",
                "performed_by": "CoolAir Ltd"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["performed_on"], "2024-04-02");

    let asset = app
        .ok(Method::GET, &format!("/api/v1/assets/{id}"), None)
        .await;
    assert_eq!(asset["status"], "operational");
    assert_eq!(asset["last_maintenance_date"], "2024-04-02");
    assert_eq!(asset["next_maintenance_date"], "2024-07-01");

    app.ok(
        Method::POST,
        &format!("/api/v1/assets/{id}/maintenance"),
        Some(json!({
            "performed_on": "2024-06-20",
            "description": "Quarterly inspection"
        })),
    )
    .await;

    let history = app
        .ok(
            Method::GET,
            &format!("/api/v1/assets/{id}/maintenance"),
            None,
        )
        .await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["performed_on"], "2024-06-20");
    assert_eq!(history[1]["performed_on"], "2024-04-02");
}

#[tokio::test]
async fn future_visits_are_rejected() {
    let app = TestApp::new().await;
    let chiller = register(&app, "HVAC-002").await;
    let id = chiller["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/assets/{id}/maintenance"),
            Some(json!({
                "performed_on": "2999-01-01",
                "description": "Not yet"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn retired_assets_leave_the_schedule() {
    let app = TestApp::new().await;
    let chiller = register(&app, "HVAC-003").await;
    let id = chiller["id"].as_str().unwrap();

    let retired = app
        .ok(Method::POST, &format!("/api/v1/assets/{id}/retire"), None)
        .await;
    assert_eq!(retired["status"], "retired");
    assert!(retired["next_maintenance_date"].is_null());

    let (status, _) = app
        .call(Method::POST, &format!("/api/v1/assets/{id}/retire"), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/assets/{id}/start-maintenance"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // a final visit is still logged but schedules nothing
    app.ok(
        Method::POST,
        &format!("/api/v1/assets/{id}/maintenance"),
        Some(json!({
            "performed_on": "2024-05-01",
            "description": "Decommissioning check"
        })),
    )
    .await;
    let asset = app
        .ok(Method::GET, &format!("/api/v1/assets/{id}"), None)
        .await;
    assert_eq!(asset["status"], "retired");
    assert!(asset["next_maintenance_date"].is_null());
}

#[tokio::test]
async fn tags_are_unique_and_deleting_removes_history() {
    let app = TestApp::new().await;
    let chiller = register(&app, "HVAC-004").await;
    let id = chiller["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/assets",
            Some(json!({ "asset_tag": "HVAC-004", "name": "Copy", "category": "hvac" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    app.ok(
        Method::POST,
        &format!("/api/v1/assets/{id}/maintenance"),
        Some(json!({ "performed_on": "2024-02-01", "description": "Filter swap" })),
    )
    .await;

    let (status, _) = app
        .call(Method::DELETE, &format!("/api/v1/assets/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .call(Method::GET, &format!("/api/v1/assets/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
