//! Calculator HTTP handler.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::http::HeaderMap;
use axum::Json;
use tally_core::{CalculationResult, RawCalculation};
use tracing::debug;

use crate::body::decode_fields;
use crate::error::AppError;

/// POST /api/calculate - Validates the input and applies the operation.
pub async fn calculate(
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<CalculationResult>, AppError> {
    let body = body.map_err(|rejection| AppError::http(rejection.status(), rejection.body_text()))?;
    let fields = decode_fields(&headers, &body)?;

    let outcome = tally_core::calculate(&RawCalculation::from_fields(fields))?;
    debug!(
        operation = %outcome.operation,
        num1 = outcome.num1,
        num2 = outcome.num2,
        result = outcome.result,
        "Calculation complete"
    );

    Ok(Json(outcome))
}
