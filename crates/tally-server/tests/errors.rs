//! Error normalization through a real Axum router.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tally_config::Environment;
use tally_server::normalizer::{normalize_errors, panic_response};
use tally_server::{AppError, ErrorNormalizer};
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

async fn panicking() -> &'static str {
    panic!("handler exploded")
}

fn test_app(environment: Environment) -> Router {
    Router::new()
        .route(
            "/custom",
            get(|| async { AppError::http(StatusCode::BAD_REQUEST, "Custom error message") }),
        )
        .route("/internal", get(|| async { AppError::internal("Server error") }))
        .route("/empty", get(|| async { AppError::internal("") }))
        .route("/panic", get(panicking))
        .route("/ok", get(|| async { "fine" }))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            ErrorNormalizer::new(environment),
            normalize_errors,
        ))
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_custom_status_and_message() {
    let (status, body) = get_json(test_app(Environment::Production), "/custom").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({ "status": "error", "statusCode": 400, "message": "Custom error message" })
    );
}

#[tokio::test]
async fn test_defaults_to_500() {
    let (status, body) = get_json(test_app(Environment::Production), "/internal").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["statusCode"], 500);
    assert_eq!(body["message"], "Server error");
}

#[tokio::test]
async fn test_empty_message_defaults() {
    let (status, body) = get_json(test_app(Environment::Production), "/empty").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Internal Server Error");
}

#[tokio::test]
async fn test_stack_only_in_development() {
    let (_, body) = get_json(test_app(Environment::Development), "/internal").await;
    assert!(!body["stack"].as_str().unwrap().is_empty());

    let (_, body) = get_json(test_app(Environment::Production), "/internal").await;
    assert!(body.get("stack").is_none());
}

#[tokio::test]
async fn test_panics_become_500_envelopes() {
    let (status, body) = get_json(test_app(Environment::Production), "/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "status": "error", "statusCode": 500, "message": "Internal Server Error" })
    );

    let (_, body) = get_json(test_app(Environment::Development), "/panic").await;
    assert!(body["stack"].as_str().unwrap().contains("handler exploded"));
}

#[tokio::test]
async fn test_successful_responses_pass_through() {
    let request = Request::builder().uri("/ok").body(Body::empty()).unwrap();
    let response = test_app(Environment::Development).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&body[..], b"fine");
}

#[tokio::test]
async fn test_different_status_codes() {
    let cases = [
        (StatusCode::NOT_FOUND, "Not Found"),
        (StatusCode::FORBIDDEN, "Forbidden"),
        (StatusCode::UNAUTHORIZED, "Unauthorized"),
    ];

    for (code, message) in cases {
        let app = Router::new()
            .route("/test", get(move || async move { AppError::http(code, message) }))
            .layer(middleware::from_fn_with_state(
                ErrorNormalizer::new(Environment::Production),
                normalize_errors,
            ));

        let (status, body) = get_json(app, "/test").await;
        assert_eq!(status, code);
        assert_eq!(
            body,
            json!({ "status": "error", "statusCode": code.as_u16(), "message": message })
        );
    }
}
