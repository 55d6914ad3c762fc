//! HTTP route handlers for the tally server.

pub mod calculate;
pub mod health;

use axum::extract::OriginalUri;
use axum::http::Method;

use crate::error::AppError;

/// Fallback for unknown routes and unsupported methods.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> AppError {
    AppError::RouteNotFound {
        method,
        path: uri.path().to_string(),
    }
}
