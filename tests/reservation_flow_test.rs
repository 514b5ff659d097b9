mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn booking_quotes_room_charge_from_class_rate() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;

    let (status, body) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-10", "2030-03-13")
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");

    let booking = &body["data"];
    assert_eq!(booking["status"], "confirmed");
    assert_eq!(decimal(&booking["nightly_rate"]), dec!(120));
    assert_eq!(decimal(&booking["room_charge"]), dec!(360));
    assert_eq!(decimal(&booking["total_amount"]), dec!(360));
    assert!(booking["reservation_number"]
        .as_str()
        .unwrap()
        .starts_with("RSV-"));

    let number = booking["reservation_number"].as_str().unwrap();
    let fetched = app
        .ok(
            Method::GET,
            &format!("/api/v1/reservations/by-number/{number}"),
            None,
        )
        .await;
    assert_eq!(fetched["id"], booking["id"]);
}

#[tokio::test]
async fn overlapping_stays_conflict_but_back_to_back_stays_do_not() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;

    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-10", "2030-03-13")
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // starts inside the existing stay
    let (status, body) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-12", "2030-03-15")
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");
    assert_eq!(body["error"], "Conflict");

    // encloses the existing stay
    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-09", "2030-03-14")
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // departure day of one stay is the arrival day of the next
    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-13", "2030-03-15")
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-07", "2030-03-10")
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_stays_and_capacity_are_rejected() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;

    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-03-10", "2030-03-10")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/reservations",
            Some(json!({
                "customer_id": fx.customer_id,
                "room_id": fx.room_id,
                "check_in_date": "2030-03-10",
                "check_out_date": "2030-03-12",
                "adults": 2,
                "children": 1
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .book(
            "00000000-0000-0000-0000-000000000000",
            &fx.room_id,
            "2030-03-10",
            "2030-03-12",
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn cancelled_bookings_release_the_room() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;

    let (_, body) = app
        .book(&fx.customer_id, &fx.room_id, "2030-05-01", "2030-05-04")
        .await;
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let availability = format!(
        "/api/v1/rooms/availability?check_in=2030-05-02&check_out=2030-05-03"
    );
    let free = app.ok(Method::GET, &availability, None).await;
    assert_eq!(free.as_array().unwrap().len(), 0);

    let cancelled = app
        .ok(
            Method::POST,
            &format!("/api/v1/reservations/{id}/cancel"),
            Some(json!({ "reason": "Flight cancelled" })),
        )
        .await;
    assert_eq!(cancelled["status"], "cancelled");
    assert_eq!(cancelled["cancellation_reason"], "Flight cancelled");

    let free = app.ok(Method::GET, &availability, None).await;
    let rooms = free.as_array().unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0]["room"]["id"], fx.room_id.as_str());
    assert_eq!(rooms[0]["nights"], 1);
    assert_eq!(decimal(&rooms[0]["total_price"]), dec!(120));

    // cancelling twice is a state error
    let (status, _) = app
        .call(
            Method::POST,
            &format!("/api/v1/reservations/{id}/cancel"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn availability_filters_by_class_and_party_size() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let suite = app.create_room_class("Suite", "300.00", 4).await;
    app.create_room("501", suite["id"].as_str().unwrap()).await;

    let all = app
        .ok(
            Method::GET,
            "/api/v1/rooms/availability?check_in=2030-06-01&check_out=2030-06-03",
            None,
        )
        .await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let family = app
        .ok(
            Method::GET,
            "/api/v1/rooms/availability?check_in=2030-06-01&check_out=2030-06-03&guests=4",
            None,
        )
        .await;
    let family = family.as_array().unwrap();
    assert_eq!(family.len(), 1);
    assert_eq!(family[0]["room"]["room_number"], "501");
    assert_eq!(decimal(&family[0]["total_price"]), dec!(600));

    let deluxe = app
        .ok(
            Method::GET,
            &format!(
                "/api/v1/rooms/availability?check_in=2030-06-01&check_out=2030-06-03&room_class_id={}",
                fx.room_class_id
            ),
            None,
        )
        .await;
    assert_eq!(deluxe.as_array().unwrap().len(), 1);

    let (status, _) = app
        .call(
            Method::GET,
            "/api/v1/rooms/availability?check_in=2030-06-03&check_out=2030-06-01",
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn moving_a_booking_onto_a_taken_room_conflicts() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let other_room = app.create_room("205", &fx.room_class_id).await;
    let other_room_id = other_room["id"].as_str().unwrap();

    let (_, first) = app
        .book(&fx.customer_id, &fx.room_id, "2030-07-01", "2030-07-05")
        .await;
    let (_, second) = app
        .book(&fx.customer_id, other_room_id, "2030-07-03", "2030-07-06")
        .await;
    let second_id = second["data"]["id"].as_str().unwrap();

    let (status, _) = app
        .call(
            Method::PUT,
            &format!("/api/v1/reservations/{second_id}"),
            Some(json!({ "room_id": fx.room_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // shrinking a stay never conflicts with itself
    let first_id = first["data"]["id"].as_str().unwrap();
    let updated = app
        .ok(
            Method::PUT,
            &format!("/api/v1/reservations/{first_id}"),
            Some(json!({ "check_out_date": "2030-07-03" })),
        )
        .await;
    assert_eq!(decimal(&updated["room_charge"]), dec!(240));

    // and now the move fits
    let moved = app
        .ok(
            Method::PUT,
            &format!("/api/v1/reservations/{second_id}"),
            Some(json!({ "room_id": fx.room_id })),
        )
        .await;
    assert_eq!(moved["room_id"], fx.room_id.as_str());
}

#[tokio::test]
async fn no_show_is_only_recorded_after_the_arrival_date() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let (_, body) = app
        .book(&fx.customer_id, &fx.room_id, "2030-08-10", "2030-08-12")
        .await;
    let id = body["data"]["id"].as_str().unwrap();
    let uri = format!("/api/v1/reservations/{id}/no-show");

    let (status, _) = app
        .call(Method::POST, &uri, Some(json!({ "date": "2030-08-10" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let marked = app
        .ok(Method::POST, &uri, Some(json!({ "date": "2030-08-11" })))
        .await;
    assert_eq!(marked["status"], "no_show");

    // the room is free again for the remaining night
    let (status, _) = app
        .book(&fx.customer_id, &fx.room_id, "2030-08-11", "2030-08-12")
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn referenced_records_cannot_be_deleted() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    app.book(&fx.customer_id, &fx.room_id, "2030-09-01", "2030-09-02")
        .await;

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/customers/{}", fx.customer_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/room-classes/{}", fx.room_class_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::DELETE,
            &format!("/api/v1/rooms/{}", fx.room_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let history = app
        .ok(
            Method::GET,
            &format!("/api/v1/customers/{}/reservations", fx.customer_id),
            None,
        )
        .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_identities_and_room_numbers_conflict() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/customers",
            Some(json!({
                "identity_number": "P1234567",
                "first_name": "Other",
                "last_name": "Guest"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            Method::POST,
            "/api/v1/rooms",
            Some(json!({ "room_number": "204", "room_class_id": fx.room_class_id, "floor": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_cancel_and_no_show_bodies_leave_the_booking_alone() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let (_, body) = app
        .book(&fx.customer_id, &fx.room_id, "2025-01-10", "2025-01-12")
        .await;
    let id = body["data"]["id"].as_str().unwrap();

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/reservations/{id}/no-show"),
            Some(json!({ "date": "next tuesday" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, body) = app
        .call(
            Method::POST,
            &format!("/api/v1/reservations/{id}/cancel"),
            Some(json!({ "reason": 42 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let reservation = app
        .ok(Method::GET, &format!("/api/v1/reservations/{id}"), None)
        .await;
    assert_eq!(reservation["status"], "confirmed");

    // an empty body still means "no reason given"
    let cancelled = app
        .ok(Method::POST, &format!("/api/v1/reservations/{id}/cancel"), None)
        .await;
    assert_eq!(cancelled["status"], "cancelled");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn concurrent_overlapping_bookings_admit_exactly_one() {
    let app = TestApp::new().await;
    let fx = app.seed_stay_fixture().await;
    let second_guest = app.create_customer("P7654321").await;
    let second_guest = second_guest["id"].as_str().unwrap();

    for round in 0..3 {
        let day = 10 + round * 5;
        let first_in = format!("2031-01-{day:02}");
        let first_out = format!("2031-01-{:02}", day + 3);
        let second_in = format!("2031-01-{:02}", day + 1);
        let second_out = format!("2031-01-{:02}", day + 4);

        let ((a, body_a), (b, body_b)) = tokio::join!(
            app.book(&fx.customer_id, &fx.room_id, &first_in, &first_out),
            app.book(second_guest, &fx.room_id, &second_in, &second_out),
        );

        let mut statuses = [a, b];
        statuses.sort();
        assert_eq!(
            statuses,
            [StatusCode::CREATED, StatusCode::CONFLICT],
            "round {round}: {body_a} / {body_b}"
        );
    }

    let booked = app
        .ok(
            Method::GET,
            &format!("/api/v1/reservations?room_id={}&limit=100", fx.room_id),
            None,
        )
        .await;
    assert_eq!(booked["total"], 3);
}
