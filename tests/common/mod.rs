#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use hotel_backoffice::{
    config::AppConfig,
    db,
    events::{self, EventSender},
    AppState,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

/// Helper harness for spinning up an application backed by a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    _db_dir: TempDir,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let db_dir = tempfile::tempdir().expect("failed to create temp dir");
        let db_path = db_dir.path().join("hotel_test.db");

        let mut cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.db_max_connections = 4;
        cfg.db_min_connections = 1;
        cfg.notification_job_enabled = false;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = AppState::new(Arc::new(pool), cfg, event_sender);
        let router = hotel_backoffice::build_router(state.clone(), CorsLayer::permissive());

        Self {
            router,
            state,
            _db_dir: db_dir,
            _event_task: event_task,
        }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.send(request).await
    }

    /// Sends a fully built request, for tests that need custom headers.
    pub async fn send(&self, request: Request<Body>) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Sends a request and returns the status with the decoded JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response body is not json")
        };
        (status, value)
    }

    /// Sends a request that must succeed and returns the envelope's `data`.
    pub async fn ok(&self, method: Method, uri: &str, body: Option<Value>) -> Value {
        let (status, value) = self.call(method, uri, body).await;
        assert!(status.is_success(), "{uri} returned {status}: {value}");
        value["data"].clone()
    }

    pub async fn create_room_class(&self, name: &str, base_rate: &str, capacity: i32) -> Value {
        self.ok(
            Method::POST,
            "/api/v1/room-classes",
            Some(json!({ "name": name, "base_rate": base_rate, "capacity": capacity })),
        )
        .await
    }

    pub async fn create_room(&self, room_number: &str, room_class_id: &str) -> Value {
        self.ok(
            Method::POST,
            "/api/v1/rooms",
            Some(json!({ "room_number": room_number, "room_class_id": room_class_id, "floor": 2 })),
        )
        .await
    }

    pub async fn create_customer(&self, identity_number: &str) -> Value {
        self.ok(
            Method::POST,
            "/api/v1/customers",
            Some(json!({
                "identity_number": identity_number,
                "first_name": "Ada",
                "last_name": "Guest",
                "email": "ada.guest@example.com"
            })),
        )
        .await
    }

    pub async fn book(
        &self,
        customer_id: &str,
        room_id: &str,
        check_in: &str,
        check_out: &str,
    ) -> (StatusCode, Value) {
        self.call(
            Method::POST,
            "/api/v1/reservations",
            Some(json!({
                "customer_id": customer_id,
                "room_id": room_id,
                "check_in_date": check_in,
                "check_out_date": check_out,
                "adults": 2
            })),
        )
        .await
    }

    /// Room class + room + customer ready for booking.
    pub async fn seed_stay_fixture(&self) -> StayFixture {
        let class = self.create_room_class("Deluxe", "120.00", 2).await;
        let room = self
            .create_room("204", class["id"].as_str().expect("class id"))
            .await;
        let customer = self.create_customer("P1234567").await;
        StayFixture {
            room_class_id: class["id"].as_str().expect("class id").to_string(),
            room_id: room["id"].as_str().expect("room id").to_string(),
            customer_id: customer["id"].as_str().expect("customer id").to_string(),
        }
    }
}

pub struct StayFixture {
    pub room_class_id: String,
    pub room_id: String,
    pub customer_id: String,
}

/// Parses a decimal serialized as a JSON string or number.
pub fn decimal(value: &Value) -> rust_decimal::Decimal {
    use std::str::FromStr;
    match value {
        Value::String(s) => rust_decimal::Decimal::from_str(s).expect("decimal string"),
        Value::Number(n) => {
            rust_decimal::Decimal::from_str(&n.to_string()).expect("decimal number")
        }
        other => panic!("expected decimal, got {other}"),
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self._event_task.abort();
    }
}
