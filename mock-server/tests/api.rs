use std::time::Duration;

use axum::http::{self, Request, StatusCode};
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use mock_server::{router, AppState, Fault, Route};
use serde_json::Value;
use tower::ServiceExt;

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes: bytes::Bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

const ORDER: &str = r#"{"customer_id":"c-1","fabric_id":"F1","total_amount":110000,
    "delivery_date":"2025-12-31T00:00:00Z","details":{"description":"suit"}}"#;

// --- tenant scoping ---

#[tokio::test]
async fn missing_tenant_is_unauthorized() {
    let resp = router(AppState::new())
        .oneshot(get("/api/customers"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(body_text(resp).await.contains("tenant_id"));
}

#[tokio::test]
async fn customers_are_scoped_to_tenant() {
    let state = AppState::new();
    state.seed_customer("tenant-a", "山田太郎", Some("090-1111-2222")).await;
    let other = state.seed_customer("tenant-b", "佐藤花子", None).await;

    let resp = router(state.clone())
        .oneshot(get("/api/customers?tenant_id=tenant-a"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["customers"][0]["name"], "山田太郎");

    let resp = router(state)
        .oneshot(get(&format!("/api/customers/{}?tenant_id=tenant-a", other.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_text(resp).await, "customer not found");
}

#[tokio::test]
async fn customer_search_matches_phone() {
    let state = AppState::new();
    state.seed_customer("t", "山田太郎", Some("090-1111-2222")).await;
    state.seed_customer("t", "佐藤花子", Some("080-3333-4444")).await;

    let resp = router(state)
        .oneshot(get("/api/customers?tenant_id=t&search=080"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["customers"][0]["name"], "佐藤花子");
}

// --- orders ---

#[tokio::test]
async fn create_order_splits_tax() {
    let resp = router(AppState::new())
        .oneshot(json_request("POST", "/api/orders?tenant_id=t", ORDER))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let order = body_json(resp).await;
    assert_eq!(order["tenant_id"], "t");
    assert_eq!(order["status"], "Draft");
    assert_eq!(order["tax_excluded_amount"], 100000);
    assert_eq!(order["tax_amount"], 10000);
}

#[tokio::test]
async fn create_order_rejects_non_positive_amount() {
    let body = ORDER.replace("110000", "0");
    let resp = router(AppState::new())
        .oneshot(json_request("POST", "/api/orders?tenant_id=t", &body))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn customer_orders_lists_created_order() {
    let state = AppState::new();
    let customer = state.seed_customer("t", "山田太郎", None).await;
    let body = ORDER.replace("c-1", &customer.id);
    router(state.clone())
        .oneshot(json_request("POST", "/api/orders?tenant_id=t", &body))
        .await
        .unwrap();

    let resp = router(state)
        .oneshot(get(&format!("/api/customers/{}/orders?tenant_id=t", customer.id)))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 1);
    assert_eq!(json["orders"][0]["total_amount"], 110000);
    assert!(json["orders"][0].get("details").is_none());
}

#[tokio::test]
async fn generate_document_for_unknown_order() {
    let resp = router(AppState::new())
        .oneshot(json_request("POST", "/api/orders/nope/generate-document?tenant_id=t", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn generate_document_records_it() {
    let state = AppState::new();
    let resp = router(state.clone())
        .oneshot(json_request("POST", "/api/orders?tenant_id=t", ORDER))
        .await
        .unwrap();
    let order = body_json(resp).await;
    let id = order["id"].as_str().unwrap();

    let resp = router(state.clone())
        .oneshot(json_request(
            "POST",
            &format!("/api/orders/{id}/generate-document?tenant_id=t"),
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let document = body_json(resp).await;
    assert_eq!(document["order_id"], id);
    assert!(document["doc_url"].as_str().unwrap().ends_with(".pdf"));
    assert_eq!(state.documents().await.len(), 1);
}

// --- diagnoses ---

#[tokio::test]
async fn diagnoses_page_and_user_filter() {
    let state = AppState::new();
    for _ in 0..3 {
        state.seed_diagnosis("t", "u-1", "Classic").await;
    }
    state.seed_diagnosis("t", "u-2", "Modern").await;

    let resp = router(state.clone())
        .oneshot(get("/api/diagnoses?tenant_id=t&limit=2"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);

    let resp = router(state)
        .oneshot(get("/api/diagnoses?tenant_id=t&user_id=u-1"))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["total"], 3);
}

#[tokio::test]
async fn create_diagnosis_rejects_unknown_archetype() {
    let resp = router(AppState::new())
        .oneshot(json_request(
            "POST",
            "/api/diagnoses?tenant_id=t",
            r#"{"user_id":"u-1","archetype":"Punk"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn diagnosis_without_plan_or_result() {
    let resp = router(AppState::new())
        .oneshot(json_request(
            "POST",
            "/api/diagnoses?tenant_id=t",
            r#"{"user_id":"u-1","archetype":"Casual"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let json = body_json(resp).await;
    assert_eq!(json["plan_type"], "");
    assert!(json["diagnosis_result"].is_null());
}

#[tokio::test]
async fn delete_diagnosis_returns_204() {
    let state = AppState::new();
    let diagnosis = state.seed_diagnosis("t", "u-1", "Elegant").await;

    let resp = router(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/diagnoses/{}?tenant_id=t", diagnosis.id))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = router(state)
        .oneshot(get(&format!("/api/diagnoses/{}?tenant_id=t", diagnosis.id)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- appointments ---

#[tokio::test]
async fn booked_fitter_conflicts() {
    let state = AppState::new();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
    state.seed_appointment("t", "u-1", Some("f-1"), at).await;

    let resp = router(state)
        .oneshot(json_request(
            "POST",
            "/api/appointments?tenant_id=t",
            r#"{"user_id":"u-2","fitter_id":"f-1","appointment_datetime":"2025-06-01T10:00:00Z","duration_minutes":60}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn availability_excludes_booked_hours() {
    let state = AppState::new();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 10, 0, 0).unwrap();
    state.seed_appointment("t", "u-1", Some("f-1"), at).await;

    let resp = router(state)
        .oneshot(get(
            "/api/appointments/availability?tenant_id=t&fitter_id=f-1&date=2025-06-01",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["available"], true);
    let slots = json["slots"].as_array().unwrap();
    assert_eq!(slots.len(), 7);
    assert_eq!(slots[0], "11:00");
}

#[tokio::test]
async fn cancel_keeps_reason() {
    let state = AppState::new();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
    let appointment = state.seed_appointment("t", "u-1", None, at).await;

    let resp = router(state.clone())
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!(
                    "/api/appointments/{}?tenant_id=t&reason=sick",
                    appointment.id
                ))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = router(state)
        .oneshot(get(&format!("/api/appointments/{}?tenant_id=t", appointment.id)))
        .await
        .unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["status"], "Cancelled");
    assert_eq!(json["cancelled_reason"], "sick");
}

#[tokio::test]
async fn update_patches_only_given_fields() {
    let state = AppState::new();
    let at = Utc.with_ymd_and_hms(2025, 6, 1, 11, 0, 0).unwrap();
    let appointment = state.seed_appointment("t", "u-1", Some("f-1"), at).await;

    let resp = router(state)
        .oneshot(json_request(
            "PATCH",
            &format!("/api/appointments/{}?tenant_id=t", appointment.id),
            r#"{"status":"Confirmed"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "Confirmed");
    assert_eq!(json["fitter_id"], "f-1");
    assert_eq!(json["duration_minutes"], 60);
}

// --- faults ---

#[tokio::test]
async fn injected_fault_wins_over_handler() {
    let state = AppState::new();
    state
        .inject(
            Route::ListCustomers,
            Fault::status(StatusCode::NOT_FOUND, r#"{"error":"not found"}"#),
        )
        .await;

    let resp = router(state)
        .oneshot(get("/api/customers?tenant_id=t"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp).await["error"], "not found");
}

#[tokio::test(start_paused = true)]
async fn delay_fault_still_answers() {
    let state = AppState::new();
    state
        .inject(Route::ListAppointments, Fault::delay(Duration::from_secs(30)))
        .await;

    let resp = router(state)
        .oneshot(get("/api/appointments?tenant_id=t"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["total"], 0);
}
