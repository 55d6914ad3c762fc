//! Request body decoding into untyped calculator fields.

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Maximum accepted request body (100 KiB).
pub const MAX_BODY_BYTES: usize = 100 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Other,
}

/// Decodes the body according to its `Content-Type`.
///
/// JSON objects yield their members, JSON arrays and empty bodies yield no
/// fields, URL-encoded forms yield string or string-array fields.
/// Unrecognised content types are not read at all. Number literals outside
/// the f64 range are a syntax error.
pub fn decode_fields(headers: &HeaderMap, body: &[u8]) -> Result<Map<String, Value>, AppError> {
    match body_kind(headers) {
        BodyKind::Json => decode_json(body),
        BodyKind::Form => decode_form(body),
        BodyKind::Other => Ok(Map::new()),
    }
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) else {
        return BodyKind::Other;
    };

    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match mime.as_str() {
        "application/json" => BodyKind::Json,
        "application/x-www-form-urlencoded" => BodyKind::Form,
        m if m.starts_with("application/") && m.ends_with("+json") => BodyKind::Json,
        _ => BodyKind::Other,
    }
}

fn decode_json(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(Value::Array(_)) => Ok(Map::new()),
        Ok(other) => Err(AppError::MalformedJson(format!(
            "expected an object or array, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(AppError::MalformedJson(e.to_string())),
    }
}

fn decode_form(body: &[u8]) -> Result<Map<String, Value>, AppError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|e| AppError::MalformedForm(e.to_string()))?;

    // Repeated keys and `key[]` collect into arrays.
    let mut fields = Map::new();
    for (key, value) in pairs {
        let (key, is_list) = match key.strip_suffix("[]") {
            Some(base) => (base.to_string(), true),
            None => (key, false),
        };
        let value = Value::String(value);

        match fields.get_mut(&key) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None if is_list => {
                fields.insert(key, Value::Array(vec![value]));
            }
            None => {
                fields.insert(key, value);
            }
        }
    }

    Ok(fields)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
