//! HTTP surface for tally: `/api/health` and `/api/calculate`.
//!
//! Every failure, including unknown routes, bad bodies and handler panics,
//! is rendered by the [`normalizer`] as a single JSON error envelope.

pub mod body;
pub mod error;
pub mod handlers;
pub mod normalizer;
pub mod server;

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::http::{Request, Response};
use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tally_config::ServerConfig;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub use error::AppError;
pub use normalizer::{ErrorEnvelope, ErrorNormalizer, Fault};

use crate::body::MAX_BODY_BYTES;
use crate::handlers::health::HealthReporter;

/// Shared, read-only server state.
pub struct AppState {
    pub health: HealthReporter,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            health: HealthReporter::start(),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the application router for `config`.
pub fn app(config: &ServerConfig) -> Router {
    router(
        Arc::new(AppState::new()),
        ErrorNormalizer::new(config.environment),
    )
}

/// Builds the router from explicit state and normalizer.
///
/// Layer order, outermost first: request tracing, error normalization,
/// panic capture, body limit.
pub fn router(state: Arc<AppState>, error_normalizer: ErrorNormalizer) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "request",
                method = %req.method(),
                uri = %req.uri(),
                version = ?req.version(),
            )
        })
        .on_response(|res: &Response<Body>, latency: Duration, _span: &tracing::Span| {
            info!(
                latency = %format!("{} ms", latency.as_millis()),
                status = %res.status().as_u16(),
                "finished processing request"
            );
        });

    let api = Router::new()
        .route(
            "/health",
            get(handlers::health::health).fallback(handlers::not_found),
        )
        .route(
            "/calculate",
            post(handlers::calculate::calculate).fallback(handlers::not_found),
        );

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CatchPanicLayer::custom(normalizer::panic_response))
        .layer(middleware::from_fn_with_state(
            error_normalizer,
            normalizer::normalize_errors,
        ))
        .layer(trace_layer)
        .with_state(state)
}
