//! Core domain types and arithmetic for tally.
//!
//! - [`validate`] checks that `num1`, `num2` and `operation` are present and
//!   that both operands parse as decimals.
//! - [`Operation`] resolves the operation name and applies it.
//! - [`CalcError`] is the client-error taxonomy shared by both stages.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use tally_core::{calculate, Operation, RawCalculation};
//!
//! let raw = RawCalculation {
//!     num1: Some(json!(20)),
//!     num2: Some(json!("4")),
//!     operation: Some(json!("divide")),
//! };
//!
//! let outcome = calculate(&raw).unwrap();
//! assert_eq!(outcome.operation, Operation::Divide);
//! assert_eq!(outcome.result, 5.0);
//! ```

mod error;
mod operation;
mod validate;

pub use error::CalcError;
pub use operation::Operation;
pub use validate::{parse_decimal, validate, RawCalculation, Validated};

use serde::{Deserialize, Serialize};

/// Discriminator carried by every response envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Successful calculation, echoing the parsed operands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub status: EnvelopeStatus,
    pub operation: Operation,
    pub num1: f64,
    pub num2: f64,
    pub result: f64,
}

/// Runs the validator and then the dispatcher over raw input.
pub fn calculate(raw: &RawCalculation) -> Result<CalculationResult, CalcError> {
    let input = validate(raw)?;
    let operation = Operation::from_value(input.operation)?;
    let result = operation.apply(input.num1, input.num2)?;

    Ok(CalculationResult {
        status: EnvelopeStatus::Success,
        operation,
        num1: input.num1,
        num2: input.num2,
        result,
    })
}
