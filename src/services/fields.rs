//! Typed accessors over loosely structured upstream records.
//!
//! A field that is absent is a schema problem and fails loudly. A field that
//! is present but `null` is data, and only the nullable accessors accept it.

use serde_json::Value;

use crate::error::PipelineError;

pub fn require<'a>(
    record: &'a Value,
    kind: &'static str,
    field: &str,
) -> Result<&'a Value, PipelineError> {
    record.get(field).ok_or_else(|| PipelineError::SchemaMismatch {
        record: kind,
        field: field.to_string(),
    })
}

fn invalid(kind: &'static str, field: &str, expected: &'static str) -> PipelineError {
    PipelineError::InvalidField {
        record: kind,
        field: field.to_string(),
        expected,
    }
}

pub fn require_u32(record: &Value, kind: &'static str, field: &str) -> Result<u32, PipelineError> {
    as_u32(require(record, kind, field)?).ok_or_else(|| invalid(kind, field, "unsigned integer"))
}

pub fn require_str<'a>(
    record: &'a Value,
    kind: &'static str,
    field: &str,
) -> Result<&'a str, PipelineError> {
    require(record, kind, field)?
        .as_str()
        .ok_or_else(|| invalid(kind, field, "string"))
}

pub fn require_bool(
    record: &Value,
    kind: &'static str,
    field: &str,
) -> Result<bool, PipelineError> {
    require(record, kind, field)?
        .as_bool()
        .ok_or_else(|| invalid(kind, field, "boolean"))
}

pub fn optional_u32(
    record: &Value,
    kind: &'static str,
    field: &str,
) -> Result<Option<u32>, PipelineError> {
    match require(record, kind, field)? {
        Value::Null => Ok(None),
        v => as_u32(v)
            .map(Some)
            .ok_or_else(|| invalid(kind, field, "unsigned integer or null")),
    }
}

pub fn optional_str<'a>(
    record: &'a Value,
    kind: &'static str,
    field: &str,
) -> Result<Option<&'a str>, PipelineError> {
    match require(record, kind, field)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.as_str())),
        _ => Err(invalid(kind, field, "string or null")),
    }
}

/// FPL ships the expected-goals family as decimal strings (`"1.37"`), other
/// metrics as plain numbers. Both are accepted.
pub fn require_decimal(
    record: &Value,
    kind: &'static str,
    field: &str,
) -> Result<f64, PipelineError> {
    match require(record, kind, field)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| invalid(kind, field, "number or numeric string"))
}

fn as_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
