//! Terminal error normalization.
//!
//! Handlers and extractors fail with [`AppError`]; its `IntoResponse` impl
//! attaches the fault to the response, and [`normalize_errors`] re-renders it
//! as an [`ErrorEnvelope`] under the configured [`Environment`]. Panics are
//! caught below the middleware and arrive as [`AppError::Panic`].

use std::any::Any;
use std::fmt;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tally_config::Environment;
use tally_core::EnvelopeStatus;
use tracing::{error, warn};

use crate::error::{AppError, RaisedFault};

const DEFAULT_MESSAGE: &str = "Internal Server Error";

/// Anything the normalizer can render into an [`ErrorEnvelope`].
pub trait Fault: fmt::Debug {
    /// HTTP status carried by the fault, if any.
    fn status(&self) -> Option<StatusCode> {
        None
    }

    /// Public message. May be empty.
    fn message(&self) -> String;

    /// Diagnostic rendering exposed as `stack` in development.
    fn diagnostic(&self) -> String {
        format!("{self:#?}")
    }
}

/// Uniform JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub status: EnvelopeStatus,
    pub status_code: u16,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorNormalizer {
    environment: Environment,
}

impl ErrorNormalizer {
    pub fn new(environment: Environment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Builds the envelope for `fault`: its status or 500, its message or
    /// the generic one, and a `stack` only in development.
    pub fn envelope(&self, fault: &dyn Fault) -> ErrorEnvelope {
        let status = fault.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = fault.message();
        let message = if message.is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            message
        };

        let stack = self.environment.is_development().then(|| {
            let diagnostic = fault.diagnostic();
            if diagnostic.trim().is_empty() {
                format!("Error: {message}")
            } else {
                diagnostic
            }
        });

        ErrorEnvelope {
            status: EnvelopeStatus::Error,
            status_code: status.as_u16(),
            message,
            stack,
        }
    }
}

/// Middleware re-rendering any response that carries a [`RaisedFault`].
pub async fn normalize_errors(
    State(normalizer): State<ErrorNormalizer>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(RaisedFault(fault)) = response.extensions_mut().remove::<RaisedFault>() else {
        return response;
    };

    let envelope = normalizer.envelope(&*fault);
    if envelope.status_code >= 500 {
        error!(status = envelope.status_code, error = %fault, "Request failed");
    } else {
        warn!(status = envelope.status_code, message = %envelope.message, "Request rejected");
    }

    envelope.into_response()
}

/// Panic handler for `CatchPanicLayer`; turns the payload into a fault so the
/// normalizer renders it like any other internal error.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Panic(detail).into_response()
}
