use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use frontdesk_api::{app, payments::MockPaymentAdapter, AppState};
use frontdesk_catalog::{CatalogConfig, SlotCatalog};
use frontdesk_core::{ManualClock, SequentialIds};
use frontdesk_store::ReservationStore;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
    store: Arc<ReservationStore>,
}

/// One day, two slots: 09:00 and 10:00 UTC on 2024-05-01.
fn test_app() -> TestApp {
    let clock = Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()));
    let ids = Arc::new(SequentialIds::new());
    let config = CatalogConfig {
        days: 1,
        first_start_hour: 9,
        last_start_hour: 10,
        ..CatalogConfig::default()
    };
    let catalog = SlotCatalog::for_today(config, clock.as_ref(), ids.as_ref());
    let store = Arc::new(ReservationStore::new(catalog, clock.clone(), ids, Duration::minutes(15)));
    let router = app(AppState::new(store.clone(), Arc::new(MockPaymentAdapter)));

    TestApp { router, clock, store }
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(router, request).await
}

async fn get(router: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

fn slot_ids(body: &Value) -> Vec<String> {
    body["slots"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

fn customer(name: &str) -> Value {
    json!({ "name": name, "phone": "555-0100", "email": "someone@example.com" })
}

#[tokio::test]
async fn test_hold_checkout_confirm_flow() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();
    let s2 = Uuid::from_u128(2).to_string();

    let (status, body) = post_json(&t.router, "/api/availability", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(slot_ids(&body), vec![s1.clone(), s2.clone()]);

    let (status, hold) = post_json(&t.router, "/api/hold", json!({ "slotId": s1, "customer": customer("Alice") })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hold["appointmentId"], Uuid::from_u128(3).to_string());
    assert_eq!(hold["holdExpiresAt"], "2024-05-01T08:15:00Z");

    let (status, body) = post_json(&t.router, "/api/hold", json!({ "slotId": s1, "customer": customer("Bob") })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("no longer available"));

    let (_, body) = post_json(&t.router, "/api/availability", json!({})).await;
    assert_eq!(slot_ids(&body), vec![s2.clone()]);

    let appointment_id = hold["appointmentId"].as_str().unwrap().to_string();
    let (status, checkout) = post_json(&t.router, "/api/checkout", json!({ "appointmentId": appointment_id })).await;
    assert_eq!(status, StatusCode::OK);
    let session_id = checkout["sessionId"].as_str().unwrap().to_string();
    assert!(checkout["url"].as_str().unwrap().contains(&session_id));

    let (status, body) = post_json(&t.router, "/api/confirm", json!({ "sessionId": session_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confirmed"], true);

    // Confirming again is harmless
    let (status, body) = post_json(&t.router, "/api/confirm", json!({ "sessionId": session_id })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["confirmed"], true);

    let (status, reservation) = get(&t.router, &format!("/api/holds/{}", appointment_id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reservation["status"], "booked");
    assert_eq!(reservation["slotId"], s1);
    assert_eq!(reservation["slot"]["start"], "2024-05-01T09:00:00Z");
    assert_eq!(reservation["customer"]["name"], "Alice");
    assert!(reservation["paymentId"].as_str().unwrap().starts_with("pi_mock_"));

    let (status, _) = post_json(&t.router, "/api/checkout", json!({ "appointmentId": appointment_id })).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_expired_hold_frees_slot() {
    let t = test_app();
    let s2 = Uuid::from_u128(2).to_string();

    let (_, hold) = post_json(&t.router, "/api/hold", json!({ "slotId": s2, "customer": customer("Carol") })).await;
    let appointment_id = hold["appointmentId"].as_str().unwrap().to_string();

    let (_, body) = get(&t.router, "/api/availability").await;
    assert!(!slot_ids(&body).contains(&s2));

    t.clock.advance(Duration::minutes(16));

    let (_, body) = get(&t.router, "/api/availability?date=2024-05-01").await;
    assert!(slot_ids(&body).contains(&s2));

    let (status, _) = get(&t.router, &format!("/api/holds/{}", appointment_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&t.router, "/api/checkout", json!({ "appointmentId": appointment_id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_webhook_confirms_and_tolerates_redelivery() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();

    let (_, hold) = post_json(&t.router, "/api/hold", json!({ "slotId": s1, "customer": customer("Dana") })).await;
    let appointment_id = hold["appointmentId"].as_str().unwrap().to_string();

    let event = json!({
        "id": "evt_1",
        "type": "checkout.session.completed",
        "data": { "appointmentId": appointment_id, "paymentId": "pi_webhook" }
    });

    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/stripe/webhook")
            .header("stripe-signature", "t=1,v1=deadbeef")
            .body(Body::from(event.to_string()))
            .unwrap();
        let (status, body) = send(&t.router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["received"], true);
    }

    let reservation = t.store.get_hold(&Uuid::parse_str(&appointment_id).unwrap()).unwrap();
    assert!(reservation.is_booked());
    assert_eq!(reservation.payment_id.as_deref(), Some("pi_webhook"));

    // The redirect path arriving late still reports success and keeps the first payment id
    let session_id = format!("cs_mock_{}", Uuid::parse_str(&appointment_id).unwrap().simple());
    let (status, _) = post_json(&t.router, "/api/confirm", json!({ "sessionId": session_id })).await;
    assert_eq!(status, StatusCode::OK);
    let reservation = t.store.get_hold(&Uuid::parse_str(&appointment_id).unwrap()).unwrap();
    assert_eq!(reservation.payment_id.as_deref(), Some("pi_webhook"));
}

#[tokio::test]
async fn test_webhook_for_expired_hold_is_acknowledged() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();

    let (_, hold) = post_json(&t.router, "/api/hold", json!({ "slotId": s1, "customer": customer("Eve") })).await;
    t.clock.advance(Duration::minutes(30));

    let event = json!({
        "id": "evt_late",
        "type": "checkout.session.completed",
        "data": { "appointmentId": hold["appointmentId"] }
    });
    let request = Request::builder()
        .method("POST")
        .uri("/api/stripe/webhook")
        .header("stripe-signature", "t=1,v1=deadbeef")
        .body(Body::from(event.to_string()))
        .unwrap();
    let (status, _) = send(&t.router, request).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = get(&t.router, "/api/availability").await;
    assert!(slot_ids(&body).contains(&s1));
}

#[tokio::test]
async fn test_webhook_without_signature_rejected() {
    let t = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/api/stripe/webhook")
        .body(Body::from(r#"{"id":"evt_1","type":"checkout.session.completed","data":{}}"#))
        .unwrap();

    let (status, _) = send(&t.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_confirm_after_expiry_is_not_found() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();

    let (_, hold) = post_json(&t.router, "/api/hold", json!({ "slotId": s1, "customer": customer("Frank") })).await;
    let appointment_id = Uuid::parse_str(hold["appointmentId"].as_str().unwrap()).unwrap();
    t.clock.advance(Duration::minutes(15));

    let session_id = format!("cs_mock_{}", appointment_id.simple());
    let (status, _) = post_json(&t.router, "/api/confirm", json!({ "sessionId": session_id })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_validation_errors() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();

    let cases = [
        json!({ "customer": customer("Gina") }),
        json!({ "slotId": "", "customer": customer("Gina") }),
        json!({ "slotId": "not-a-uuid", "customer": customer("Gina") }),
        json!({ "slotId": s1 }),
        json!({ "slotId": s1, "customer": { "name": "Gina" } }),
        json!({ "slotId": s1, "customer": { "name": "  ", "phone": "555-0100" } }),
    ];
    for body in cases {
        let (status, response) = post_json(&t.router, "/api/hold", body.clone()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
        assert!(response["error"].is_string());
    }

    let (status, _) = post_json(&t.router, "/api/hold", json!({ "slotId": Uuid::from_u128(99).to_string(), "customer": customer("Gina") })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = post_json(&t.router, "/api/availability", json!({ "date": "May 1st" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&t.router, "/api/checkout", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(&t.router, "/api/confirm", json!({ "sessionId": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get(&t.router, "/api/holds/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was reserved by any of the above
    assert_eq!(t.store.list_open_slots(None).len(), 2);
}

#[tokio::test]
async fn test_malformed_bodies_are_json_bad_requests() {
    let t = test_app();

    let (status, body) = post_json(&t.router, "/api/hold", json!({ "slotId": 5, "customer": customer("Hal") })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/hold")
        .body(Body::from(json!({ "slotId": Uuid::from_u128(1).to_string(), "customer": customer("Hal") }).to_string()))
        .unwrap();
    let (status, body) = send(&t.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let request = Request::builder()
        .method("POST")
        .uri("/api/confirm")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&t.router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    assert_eq!(t.store.list_open_slots(None).len(), 2);
}

#[tokio::test]
async fn test_concurrent_holds_over_http() {
    let t = test_app();
    let s1 = Uuid::from_u128(1).to_string();

    let mut handles = Vec::new();
    for i in 0..10 {
        let router = t.router.clone();
        let body = json!({ "slotId": s1, "customer": customer(&format!("caller-{}", i)) });
        handles.push(tokio::spawn(async move { post_json(&router, "/api/hold", body).await.0 }));
    }

    let mut ok = 0;
    let mut conflict = 0;
    for handle in handles {
        match handle.await.unwrap() {
            StatusCode::OK => ok += 1,
            StatusCode::CONFLICT => conflict += 1,
            other => panic!("unexpected status {}", other),
        }
    }
    assert_eq!((ok, conflict), (1, 9));
}

#[tokio::test]
async fn test_health() {
    let t = test_app();
    let (status, body) = get(&t.router, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
