//! Application error types and Axum response conversion.

use std::sync::Arc;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use tally_core::CalcError;
use thiserror::Error;

use crate::normalizer::{ErrorNormalizer, Fault};

/// Application-level errors raised by handlers and extractors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("Malformed JSON body: {0}")]
    MalformedJson(String),

    #[error("Malformed form body: {0}")]
    MalformedForm(String),

    #[error("Cannot {method} {path}")]
    RouteNotFound { method: Method, path: String },

    /// A fault that already knows its HTTP status.
    #[error("{message}")]
    Http { status: StatusCode, message: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),

    #[error("handler panicked: {0}")]
    Panic(String),
}

impl AppError {
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        AppError::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates an Internal error from any displayable error.
    pub fn internal(e: impl std::fmt::Display) -> Self {
        AppError::Internal(anyhow::anyhow!("{e}"))
    }
}

impl Fault for AppError {
    fn status(&self) -> Option<StatusCode> {
        match self {
            AppError::Calc(e) => StatusCode::from_u16(e.status_code()).ok(),
            AppError::MalformedJson(_) | AppError::MalformedForm(_) => Some(StatusCode::BAD_REQUEST),
            AppError::RouteNotFound { .. } => Some(StatusCode::NOT_FOUND),
            AppError::Http { status, .. } => Some(*status),
            AppError::Internal(_) | AppError::Panic(_) => None,
        }
    }

    fn message(&self) -> String {
        match self {
            // Panic payloads stay out of the public message.
            AppError::Panic(_) => String::new(),
            _ => self.to_string(),
        }
    }
}

/// Response extension carrying the original fault to
/// [`normalize_errors`](crate::normalizer::normalize_errors).
#[derive(Debug, Clone)]
pub struct RaisedFault(pub Arc<AppError>);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Production rendering unless the normalizer middleware re-renders it.
        let mut response = ErrorNormalizer::default().envelope(&self).into_response();
        response.extensions_mut().insert(RaisedFault(Arc::new(self)));
        response
    }
}
