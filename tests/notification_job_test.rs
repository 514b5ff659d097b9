mod common;

use axum::http::{Method, StatusCode};
use common::TestApp;
use serde_json::{json, Value};

async fn checked_in_stay(
    app: &TestApp,
    customer_id: &str,
    room_id: &str,
    check_in: &str,
    check_out: &str,
) {
    let (status, body) = app.book(customer_id, room_id, check_in, check_out).await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let id = body["data"]["id"].as_str().unwrap();
    app.ok(
        Method::POST,
        &format!("/api/v1/front-office/check-in/{id}"),
        Some(json!({ "date": check_in })),
    )
    .await;
}

/// One record per notification rule, all relevant on 2030-05-10.
async fn seed_operational_day(app: &TestApp) {
    let fx = app.seed_stay_fixture().await;
    let room_b = app.create_room("301", &fx.room_class_id).await;
    let room_c = app.create_room("302", &fx.room_class_id).await;

    // arriving today
    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-05-10", "2030-05-12")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    // leaving today
    checked_in_stay(
        app,
        &fx.customer_id,
        room_b["id"].as_str().unwrap(),
        "2030-05-08",
        "2030-05-10",
    )
    .await;
    // should have left yesterday
    checked_in_stay(
        app,
        &fx.customer_id,
        room_c["id"].as_str().unwrap(),
        "2030-05-05",
        "2030-05-09",
    )
    .await;

    // service due within the lookahead, warranty running out
    app.ok(
        Method::POST,
        "/api/v1/assets",
        Some(json!({
            "asset_tag": "LIFT-01",
            "name": "Guest lift",
            "category": "elevator",
            "purchase_date": "2030-02-20",
            "maintenance_interval_days": 90,
            "warranty_expiry_date": "2030-05-20"
        })),
    )
    .await;
    // service missed
    app.ok(
        Method::POST,
        "/api/v1/assets",
        Some(json!({
            "asset_tag": "BOIL-01",
            "name": "Boiler",
            "category": "hvac",
            "purchase_date": "2030-01-01",
            "maintenance_interval_days": 30
        })),
    )
    .await;

    let dept = app
        .ok(
            Method::POST,
            "/api/v1/hr/departments",
            Some(json!({ "name": "Spa" })),
        )
        .await;
    app.ok(
        Method::POST,
        "/api/v1/hr/staff",
        Some(json!({
            "employee_number": "S001",
            "first_name": "Mira",
            "last_name": "Therapist",
            "position": "Therapist",
            "department_id": dept["id"],
            "hire_date": "2029-01-01",
            "contract_end_date": "2030-05-15",
            "base_salary": "2400.00"
        })),
    )
    .await;

    app.ok(
        Method::POST,
        "/api/v1/restaurant/menu-items",
        Some(json!({
            "name": "House Red",
            "category": "wine",
            "price": "28.00",
            "stock_quantity": 1,
            "reorder_level": 2
        })),
    )
    .await;
}

async fn generate(app: &TestApp, date: &str) -> Value {
    app.ok(
        Method::POST,
        "/api/v1/notifications/generate",
        Some(json!({ "date": date })),
    )
    .await
}

#[tokio::test]
async fn every_rule_fires_once_per_subject() {
    let app = TestApp::new().await;
    seed_operational_day(&app).await;

    let report = generate(&app, "2030-05-10").await;
    assert_eq!(report["run_date"], "2030-05-10");
    assert_eq!(report["created"], 8, "{report}");
    assert_eq!(report["skipped"], 0);
    for kind in [
        "arrival_due",
        "departure_due",
        "departure_overdue",
        "maintenance_due",
        "maintenance_overdue",
        "warranty_expiring",
        "contract_expiring",
        "low_stock",
    ] {
        assert_eq!(report["by_kind"][kind], 1, "{kind}");
    }

    // rerunning the same day creates nothing new
    let rerun = generate(&app, "2030-05-10").await;
    assert_eq!(rerun["created"], 0);
    assert_eq!(rerun["skipped"], 8);

    let listed = app
        .ok(Method::GET, "/api/v1/notifications?limit=50", None)
        .await;
    assert_eq!(listed["total"], 8);
}

#[tokio::test]
async fn next_day_only_adds_what_changed() {
    let app = TestApp::new().await;
    seed_operational_day(&app).await;
    generate(&app, "2030-05-10").await;

    let report = generate(&app, "2030-05-11").await;
    // yesterday's departure is now overdue and low stock is raised for the new day
    assert_eq!(report["created"], 2, "{report}");
    assert_eq!(report["by_kind"]["departure_overdue"], 1);
    assert_eq!(report["by_kind"]["low_stock"], 1);
    assert_eq!(report["skipped"], 5);
}

#[tokio::test]
async fn severity_follows_the_kind() {
    let app = TestApp::new().await;
    seed_operational_day(&app).await;
    generate(&app, "2030-05-10").await;

    let overdue = app
        .ok(
            Method::GET,
            "/api/v1/notifications?kind=maintenance_overdue",
            None,
        )
        .await;
    assert_eq!(overdue["total"], 1);
    let item = &overdue["items"][0];
    assert_eq!(item["severity"], "critical");
    assert_eq!(item["reference_type"], "asset");
    assert_eq!(item["due_date"], "2030-01-31");

    let arrival = app
        .ok(Method::GET, "/api/v1/notifications?kind=arrival_due", None)
        .await;
    assert_eq!(arrival["items"][0]["severity"], "info");

    let stock = app
        .ok(Method::GET, "/api/v1/notifications?kind=low_stock", None)
        .await;
    assert_eq!(stock["items"][0]["severity"], "warning");
}

#[tokio::test]
async fn reading_notifications() {
    let app = TestApp::new().await;
    seed_operational_day(&app).await;
    generate(&app, "2030-05-10").await;

    let unread = app
        .ok(Method::GET, "/api/v1/notifications?unread=true", None)
        .await;
    assert_eq!(unread["total"], 8);
    let first_id = unread["items"][0]["id"].as_str().unwrap().to_string();

    let read = app
        .ok(
            Method::POST,
            &format!("/api/v1/notifications/{first_id}/read"),
            None,
        )
        .await;
    assert_eq!(read["is_read"], true);
    assert!(!read["read_at"].is_null());

    let all = app
        .ok(Method::POST, "/api/v1/notifications/read-all", None)
        .await;
    assert_eq!(all["updated"], 7);

    let unread = app
        .ok(Method::GET, "/api/v1/notifications?unread=true", None)
        .await;
    assert_eq!(unread["total"], 0);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/notifications/00000000-0000-0000-0000-000000000000/read",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn malformed_run_date_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/notifications/generate",
            Some(json!({ "date": "2030-13-45" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"].as_str().unwrap().contains("Invalid JSON body"));

    let listed = app.ok(Method::GET, "/api/v1/notifications", None).await;
    assert_eq!(listed["total"], 0);
}
