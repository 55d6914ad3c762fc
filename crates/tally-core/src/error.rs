use thiserror::Error;

/// Client-side failures detected while validating or computing a calculation.
///
/// Every variant carries a fixed message and maps to HTTP 400.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    /// `num1`, `num2` or `operation` was not supplied.
    #[error("Please provide num1, num2, and operation")]
    MissingField,

    /// An operand did not parse as a decimal number.
    #[error("num1 and num2 must be valid numbers")]
    InvalidNumber,

    /// The operation is not one of the supported names.
    #[error("Invalid operation. Use: add, subtract, multiply, or divide")]
    InvalidOperation,

    /// `divide` with a zero divisor.
    #[error("Cannot divide by zero")]
    DivideByZero,
}

impl CalcError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        400
    }
}
