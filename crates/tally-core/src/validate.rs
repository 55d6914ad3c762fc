//! Presence and numeric validation of raw calculator input.

use serde_json::{Map, Value};

use crate::CalcError;

/// Calculator input as it arrived on the wire.
///
/// `None` means the field was absent; `Some(Value::Null)` means it was sent
/// as `null`. The two are validated differently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCalculation {
    pub num1: Option<Value>,
    pub num2: Option<Value>,
    pub operation: Option<Value>,
}

impl RawCalculation {
    /// Picks the calculator fields out of a decoded request body. Unknown
    /// members are ignored.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        Self {
            num1: fields.remove("num1"),
            num2: fields.remove("num2"),
            operation: fields.remove("operation"),
        }
    }
}

/// Output of [`validate`]: both operands parsed, operation still unresolved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validated<'a> {
    pub num1: f64,
    pub num2: f64,
    pub operation: &'a Value,
}

/// Checks presence first, then numeric validity of both operands.
pub fn validate(raw: &RawCalculation) -> Result<Validated<'_>, CalcError> {
    let (Some(num1), Some(num2)) = (&raw.num1, &raw.num2) else {
        return Err(CalcError::MissingField);
    };
    let operation = match &raw.operation {
        Some(op) if !is_falsy(op) => op,
        _ => return Err(CalcError::MissingField),
    };

    let (Some(num1), Some(num2)) = (coerce_number(num1), coerce_number(num2)) else {
        return Err(CalcError::InvalidNumber);
    };

    Ok(Validated {
        num1,
        num2,
        operation,
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_decimal(s),
        Value::Array(items) => parse_decimal(&join_items(items)),
        _ => None,
    }
}

/// String form of an array operand: elements joined by `,`, nested arrays
/// rendered the same way, `null` as empty.
fn join_items(items: &[Value]) -> String {
    items
        .iter()
        .map(|item| match item {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            Value::Array(nested) => join_items(nested),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Bool(_) | Value::Number(_) => item.to_string(),
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Parses the longest decimal prefix of `input`, ignoring leading whitespace
/// and any trailing characters. Accepts an optional sign, digits with an
/// optional fraction, an optional exponent, or `Infinity`.
pub fn parse_decimal(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let rest = &bytes[sign_len..];

    if rest.starts_with(b"Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(rest);
    let mut end = int_digits;
    let mut frac_digits = 0;
    if rest.get(end) == Some(&b'.') {
        frac_digits = count_digits(&rest[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(rest.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(rest.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&rest[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..sign_len + end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
