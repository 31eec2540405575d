//! Integration test: booking form and JSON API endpoints

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use staywise::config::AppConfig;
use staywise::inference::PredictionService;
use staywise::server::{create_router, AppState};
use tempfile::TempDir;
use tower::ServiceExt;

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

fn test_config() -> AppConfig {
    AppConfig::new()
        .with_model_path(manifest_path("artifacts/model.json"))
        .with_encoder_path(manifest_path("artifacts/encoder.json"))
        .with_dataset_path(Some(manifest_path("data/hotel_reservations_sample.csv")))
}

fn test_app() -> axum::Router {
    create_router(Arc::new(AppState::new(test_config())))
}

fn disabled_app() -> axum::Router {
    let state = AppState::with_service(
        test_config(),
        PredictionService::disabled("Artifact error: artifacts/model.json: missing"),
    );
    create_router(Arc::new(state))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

fn cancelled_booking() -> Value {
    json!({
        "lead_time": 250,
        "no_of_adults": 1,
        "no_of_children": 0,
        "no_of_weekend_nights": 0,
        "no_of_week_nights": 1,
        "type_of_meal_plan": "Not Selected",
        "room_type_reserved": "Room_Type 3",
        "market_segment_type": "Offline",
        "required_car_parking_space": 0,
        "repeated_guest": 0,
        "no_of_previous_cancellations": 2,
        "no_of_previous_bookings_not_canceled": 0,
        "avg_price_per_room": 200.0,
        "no_of_special_requests": 0
    })
}

const KEPT_FORM: &str = "lead_time=0&no_of_adults=2&no_of_children=0&no_of_weekend_nights=1\
&no_of_week_nights=2&type_of_meal_plan=Meal+Plan+1&room_type_reserved=Room_Type+1\
&market_segment_type=Online&required_car_parking_space=0&repeated_guest=0\
&no_of_previous_cancellations=0&no_of_previous_bookings_not_canceled=0\
&avg_price_per_room=100&no_of_special_requests=1";

#[tokio::test]
async fn test_health_endpoint() {
    let response = test_app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["prediction_enabled"], true);
    assert_eq!(body["artifacts"]["n_features"], 27);
    assert!(body["disabled_reason"].is_null());
}

#[tokio::test]
async fn test_health_reports_degraded_when_disabled() {
    let response = disabled_app().oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["prediction_enabled"], false);
    assert!(body["disabled_reason"].as_str().unwrap().contains("missing"));
}

#[tokio::test]
async fn test_root_serves_form() {
    let response = test_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<form"));
    assert!(html.contains("market_segment_type"));
    assert!(!html.contains(r#"id="result""#));
    assert!(!html.contains(r#"id="disabled""#));
    // Reference dataset rows are embedded
    assert!(html.contains("INN00001"));
}

#[tokio::test]
async fn test_root_shows_disabled_form() {
    let response = disabled_app().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"id="disabled""#));
    assert!(html.contains(r#"type="submit" disabled"#));
}

#[tokio::test]
async fn test_form_submission_shows_result() {
    let response = test_app().oneshot(post_form("/predict", KEPT_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains(r#"id="result""#));
    assert!(html.contains("Prediction: not cancelled"));
    assert!(html.contains("Cancellation probability"));
}

#[tokio::test]
async fn test_form_unknown_category_shows_error() {
    let body = KEPT_FORM.replace("market_segment_type=Online", "market_segment_type=Travel+Agent");
    let response = test_app().oneshot(post_form("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains(r#"id="error""#));
    assert!(html.contains("Travel Agent"));
    assert!(!html.contains(r#"id="result""#));
}

#[tokio::test]
async fn test_form_malformed_number_rejected() {
    let body = KEPT_FORM.replace("lead_time=0", "lead_time=soon");
    let response = test_app().oneshot(post_form("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains(r#"id="error""#));
    assert!(html.contains("lead_time: &#39;soon&#39; is not a whole number"));
    assert!(html.contains(r#"name="no_of_special_requests" value="1""#));
    assert!(html.contains(r#"name="avg_price_per_room" value="100""#));
}

#[tokio::test]
async fn test_form_missing_field_named() {
    let body = KEPT_FORM.replace("&no_of_adults=2", "");
    let response = test_app().oneshot(post_form("/predict", &body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let html = body_text(response).await;
    assert!(html.contains("no_of_adults: value is required"));
    assert!(!html.contains(r#"id="result""#));
}

#[tokio::test]
async fn test_form_submission_when_disabled() {
    let response = disabled_app().oneshot(post_form("/predict", KEPT_FORM)).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let html = body_text(response).await;
    assert!(html.contains(r#"id="error""#));
    assert!(!html.contains(r#"id="result""#));
}

#[tokio::test]
async fn test_sample_page_prefills_form() {
    let response = test_app().oneshot(get("/samples/likely-cancelled")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"value="250""#));

    let response = test_app().oneshot(get("/samples/nope")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_predict_json() {
    let response = test_app()
        .oneshot(post_json("/api/predict", &cancelled_booking()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["label"], "cancelled");
    assert!((body["probability"].as_f64().unwrap() - 0.625).abs() < 1e-9);
    assert_eq!(body["features"].as_array().unwrap().len(), 27);
    assert_eq!(body["record"]["lead_time"], 250);
}

#[tokio::test]
async fn test_predict_json_missing_field() {
    let mut booking = cancelled_booking();
    booking.as_object_mut().unwrap().remove("room_type_reserved");

    let response = test_app().oneshot(post_json("/api/predict", &booking)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], true);
}

#[tokio::test]
async fn test_predict_json_when_disabled() {
    let response = disabled_app()
        .oneshot(post_json("/api/predict", &cancelled_booking()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["error"], true);
    assert!(body["message"].as_str().unwrap().contains("disabled"));
}

#[tokio::test]
async fn test_predict_batch() {
    let mut kept = cancelled_booking();
    kept["lead_time"] = json!(0);
    kept["no_of_previous_cancellations"] = json!(0);

    let response = test_app()
        .oneshot(post_json("/api/predict/batch", &json!([cancelled_booking(), kept])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["count"], 2);
    assert_eq!(body["predictions"][0]["label"], "cancelled");
}

#[tokio::test]
async fn test_predict_batch_rejects_empty_and_invalid() {
    let response = test_app()
        .oneshot(post_json("/api/predict/batch", &json!([])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let mut invalid = cancelled_booking();
    invalid["repeated_guest"] = json!(5);
    let response = test_app()
        .oneshot(post_json("/api/predict/batch", &json!([cancelled_booking(), invalid])))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"]
        .as_str()
        .unwrap()
        .contains("record 1"));
}

#[tokio::test]
async fn test_schema_endpoint() {
    let response = test_app().oneshot(get("/api/schema")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["scheme"], "combined");
    assert_eq!(body["unknown_category_policy"], "reject");
    let columns = body["expected_columns"].as_array().unwrap();
    assert_eq!(columns.len(), 27);
    assert_eq!(columns[0], "lead_time");
    assert_eq!(columns[26], "market_segment_type_Online");
}

#[tokio::test]
async fn test_samples_endpoint() {
    let response = test_app().oneshot(get("/api/samples")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|case| case["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["likely-kept", "likely-cancelled"]);
}

#[tokio::test]
async fn test_stats_count_predictions() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(post_json("/api/predict", &cancelled_booking()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/api/stats")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total_predictions"], 1);
}

#[tokio::test]
async fn test_dataset_preview() {
    let response = test_app().oneshot(get("/api/dataset/preview?rows=3")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["rows"], 3);
    assert_eq!(body["total_rows"], 12);
    assert!(body["columns"]
        .as_array()
        .unwrap()
        .iter()
        .any(|c| c["name"] == "booking_status"));
}

#[tokio::test]
async fn test_dataset_preview_without_dataset() {
    let state = AppState::new(test_config().with_dataset_path(None));
    let response = create_router(Arc::new(state))
        .oneshot(get("/api/dataset/preview"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reference_dataset_read_once_at_start() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("reservations.csv");
    fs::copy(manifest_path("data/hotel_reservations_sample.csv"), &path).unwrap();

    let state = AppState::new(test_config().with_dataset_path(Some(path.clone())));
    fs::remove_file(&path).unwrap();
    let app = create_router(Arc::new(state));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert!(body_text(response).await.contains("INN00001"));

    let response = app.oneshot(get("/api/dataset/preview?rows=2")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["rows"], 2);
}

#[tokio::test]
async fn test_unknown_route_returns_json_404() {
    let response = test_app().oneshot(get("/api/nothing-here")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["error"], true);
}
