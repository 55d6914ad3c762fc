//! Health probe.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::AppState;

/// Health probe body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
    /// ISO-8601 UTC, millisecond precision.
    pub timestamp: String,
    /// Seconds since the reporter started.
    pub uptime: f64,
}

/// Reports wall-clock time and uptime measured from a monotonic start point.
#[derive(Debug, Clone, Copy)]
pub struct HealthReporter {
    started: Instant,
}

impl HealthReporter {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn report(&self) -> HealthStatus {
        HealthStatus {
            status: "OK".to_string(),
            message: "Service is healthy".to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            uptime: self.started.elapsed().as_secs_f64(),
        }
    }
}

/// GET /api/health - Liveness probe.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthStatus> {
    Json(state.health.report())
}
