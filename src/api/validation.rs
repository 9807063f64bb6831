//! Small validation helpers shared by the write shapes.

use serde_json::Value;

pub fn ensure_max_len(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn has_null_char(value: &str) -> bool {
    value.contains('\0')
}

/// Accepts integer ids and their decimal string form, like `3` or `"3"`.
pub fn parse_pk(value: &Value) -> Option<i64> {
    match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
}

pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
