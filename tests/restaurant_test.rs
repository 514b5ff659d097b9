mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::{json, Value};

async fn menu_item(app: &TestApp, name: &str, price: &str, stock: i32, reorder: i32) -> Value {
    app.ok(
        Method::POST,
        "/api/v1/restaurant/menu-items",
        Some(json!({
            "name": name,
            "category": "drinks",
            "price": price,
            "stock_quantity": stock,
            "reorder_level": reorder
        })),
    )
    .await
}

async fn stock_of(app: &TestApp, id: &str) -> i64 {
    let item = app
        .ok(
            Method::GET,
            &format!("/api/v1/restaurant/menu-items/{id}"),
            None,
        )
        .await;
    item["stock_quantity"].as_i64().unwrap()
}

#[tokio::test]
async fn walk_in_orders_decrement_stock_and_snapshot_prices() {
    let app = TestApp::new().await;
    let espresso = menu_item(&app, "Espresso", "3.50", 10, 3).await;
    let id = espresso["id"].as_str().unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({
                "table_number": "T4",
                "items": [{ "menu_item_id": id, "quantity": 4 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let order = &body["data"];
    assert_eq!(order["order"]["status"], "open");
    assert!(order["order"]["order_number"]
        .as_str()
        .unwrap()
        .starts_with("ORD-"));
    assert_eq!(decimal(&order["order"]["total_amount"]), dec!(14));
    assert_eq!(order["items"].as_array().unwrap().len(), 1);
    assert_eq!(decimal(&order["items"][0]["unit_price"]), dec!(3.5));
    assert_eq!(stock_of(&app, id).await, 6);

    // price changes do not touch existing tickets
    app.ok(
        Method::PUT,
        &format!("/api/v1/restaurant/menu-items/{id}"),
        Some(json!({ "price": "4.00" })),
    )
    .await;
    let order_id = order["order"]["id"].as_str().unwrap();
    let fetched = app
        .ok(
            Method::GET,
            &format!("/api/v1/restaurant/orders/{order_id}"),
            None,
        )
        .await;
    assert_eq!(decimal(&fetched["order"]["total_amount"]), dec!(14));

    let paid = app
        .ok(
            Method::POST,
            &format!("/api/v1/restaurant/orders/{order_id}/pay"),
            None,
        )
        .await;
    assert_eq!(paid["status"], "paid");

    // paid tickets are final
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/restaurant/orders/{order_id}/cancel"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn insufficient_stock_rejects_the_whole_order() {
    let app = TestApp::new().await;
    let tea = menu_item(&app, "Green Tea", "2.50", 5, 1).await;
    let cake = menu_item(&app, "Cheesecake", "6.00", 1, 0).await;
    let tea_id = tea["id"].as_str().unwrap();
    let cake_id = cake["id"].as_str().unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({
                "items": [
                    { "menu_item_id": tea_id, "quantity": 2 },
                    { "menu_item_id": cake_id, "quantity": 2 }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Insufficient stock"));

    // the first line was rolled back
    assert_eq!(stock_of(&app, tea_id).await, 5);
    assert_eq!(stock_of(&app, cake_id).await, 1);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({ "items": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn cancelling_restores_stock() {
    let app = TestApp::new().await;
    let juice = menu_item(&app, "Orange Juice", "4.00", 8, 2).await;
    let id = juice["id"].as_str().unwrap();

    let order = app
        .ok(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({ "items": [{ "menu_item_id": id, "quantity": 7 }] })),
        )
        .await;
    assert_eq!(stock_of(&app, id).await, 1);

    let order_id = order["order"]["id"].as_str().unwrap();
    let cancelled = app
        .ok(
            Method::POST,
            &format!("/api/v1/restaurant/orders/{order_id}/cancel"),
            None,
        )
        .await;
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(stock_of(&app, id).await, 8);
}

#[tokio::test]
async fn stock_adjustments_cannot_go_negative() {
    let app = TestApp::new().await;
    let water = menu_item(&app, "Still Water", "2.00", 3, 5).await;
    let id = water["id"].as_str().unwrap();
    let uri = format!("/api/v1/restaurant/menu-items/{id}/stock");

    let (status, _) = app
        .call(Method::POST, &uri, Some(json!({ "delta": -4 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let restocked = app
        .ok(
            Method::POST,
            &uri,
            Some(json!({ "delta": 24, "reason": "Weekly delivery" })),
        )
        .await;
    assert_eq!(restocked["stock_quantity"], 27);
}

#[tokio::test]
async fn unavailable_items_and_room_charges_for_absent_guests_are_refused() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let soup = menu_item(&app, "Soup of the Day", "7.00", 10, 0).await;
    let soup_id = soup["id"].as_str().unwrap();

    let (_, body) = app
        .book(&fx.customer_id, &fx.room_id, "2030-02-01", "2030-02-03")
        .await;
    let reservation_id = body["data"]["id"].as_str().unwrap();

    // guest has not checked in yet
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({
                "reservation_id": reservation_id,
                "items": [{ "menu_item_id": soup_id, "quantity": 1 }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.ok(
        Method::PUT,
        &format!("/api/v1/restaurant/menu-items/{soup_id}"),
        Some(json!({ "is_available": false })),
    )
    .await;
    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({ "items": [{ "menu_item_id": soup_id, "quantity": 1 }] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn menu_items_on_tickets_cannot_be_deleted() {
    let app = TestApp::new().await;
    let salad = menu_item(&app, "Caesar Salad", "9.00", 4, 0).await;
    let id = salad["id"].as_str().unwrap();

    app.ok(
        Method::POST,
        "/api/v1/restaurant/orders",
        Some(json!({ "items": [{ "menu_item_id": id, "quantity": 1 }] })),
    )
    .await;

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/restaurant/menu-items/{id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let unused = menu_item(&app, "Tiramisu", "8.00", 2, 0).await;
    let (status, _) = app
        .call(
            Method::DELETE,
            &format!(
                "/api/v1/restaurant/menu-items/{}",
                unused["id"].as_str().unwrap()
            ),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn out_of_range_adjustments_are_rejected() {
    let app = TestApp::new().await;
    let bread = menu_item(&app, "Sourdough", "3.50", 12, 2).await;
    let id = bread["id"].as_str().unwrap();
    let uri = format!("/api/v1/restaurant/menu-items/{id}/stock");

    for delta in [i64::from(i32::MIN), -1_000_001, 1_000_001] {
        let (status, body) = app
            .call(Method::POST, &uri, Some(json!({ "delta": delta })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "delta {delta}: {body}");
    }
    assert_eq!(stock_of(&app, id).await, 12);

    let (status, body) = app
        .call(Method::POST, &uri, Some(json!({ "delta": -13 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("cannot remove 13"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_orders_never_oversell() {
    let app = TestApp::new().await;
    let special = menu_item(&app, "Chef's Special", "18.00", 5, 0).await;
    let id = special["id"].as_str().unwrap();
    let order = json!({ "items": [{ "menu_item_id": id, "quantity": 3 }] });

    let ((a, _), (b, _)) = tokio::join!(
        app.call(Method::POST, "/api/v1/restaurant/orders", Some(order.clone())),
        app.call(Method::POST, "/api/v1/restaurant/orders", Some(order.clone())),
    );

    let mut statuses = [a, b];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::CREATED, StatusCode::BAD_REQUEST]);
    assert_eq!(stock_of(&app, id).await, 2);
}

#[tokio::test]
async fn cancelling_twice_restocks_once() {
    let app = TestApp::new().await;
    let wine = menu_item(&app, "House Red", "9.00", 10, 1).await;
    let id = wine["id"].as_str().unwrap();

    let order = app
        .ok(
            Method::POST,
            "/api/v1/restaurant/orders",
            Some(json!({ "items": [{ "menu_item_id": id, "quantity": 4 }] })),
        )
        .await;
    let uri = format!(
        "/api/v1/restaurant/orders/{}/cancel",
        order["order"]["id"].as_str().unwrap()
    );

    app.ok(Method::POST, &uri, None).await;
    let (status, _) = app.call(Method::POST, &uri, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(stock_of(&app, id).await, 10);
}
