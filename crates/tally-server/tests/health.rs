use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::DateTime;
use serde_json::Value;
use tally_config::ServerConfig;
use tower::ServiceExt;

fn health_request() -> Request<Body> {
    Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap()
}

async fn get_health(app: Router) -> (StatusCode, Option<String>, Value) {
    let response = app.oneshot(health_request()).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_health_status() {
    let (status, content_type, body) = get_health(tally_server::app(&ServerConfig::default())).await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().contains("application/json"));
    assert_eq!(body["status"], "OK");
    assert_eq!(body["message"], "Service is healthy");
    assert!(body["uptime"].as_f64().unwrap() >= 0.0);
}

#[tokio::test]
async fn test_health_timestamp_is_valid() {
    let (_, _, body) = get_health(tally_server::app(&ServerConfig::default())).await;

    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(DateTime::parse_from_rfc3339(timestamp).is_ok(), "bad timestamp {timestamp}");
}

#[tokio::test]
async fn test_uptime_non_decreasing() {
    let app = tally_server::app(&ServerConfig::default());

    let mut previous = 0.0;
    for _ in 0..3 {
        let (_, _, body) = get_health(app.clone()).await;
        let uptime = body["uptime"].as_f64().unwrap();
        assert!(uptime >= previous);
        previous = uptime;
    }
}

#[tokio::test]
async fn test_unknown_route_is_enveloped() {
    let request = Request::builder()
        .uri("/api/unknown")
        .body(Body::empty())
        .unwrap();
    let response = tally_server::app(&ServerConfig::default())
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["statusCode"], 404);
    assert_eq!(body["message"], "Cannot GET /api/unknown");
}
