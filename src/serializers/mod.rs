//! Read and write shapes for every resource.
//!
//! Write shapes are parsed field by field from the raw JSON body so that all
//! problems are reported together, keyed by the field that caused them.

pub mod facility;
pub mod route;
pub mod station;

use serde_json::{Map, Value};

use crate::{
    api::validation::{ensure_max_len, has_null_char, is_blank, json_type_name, parse_pk},
    errors::{AppError, FieldErrors, NON_FIELD_ERRORS},
};

pub use facility::{FacilityInput, FacilityView};
pub use route::{RouteInput, RouteView};
pub use station::{StationInput, StationView};

pub const REQUIRED: &str = "This field is required.";
pub const NOT_NULL: &str = "This field may not be null.";
pub const NOT_BLANK: &str = "This field may not be blank.";
pub const NOT_A_STRING: &str = "Not a valid string.";
pub const NULL_CHARACTERS: &str = "Null characters are not allowed.";

/// Full writes (create, PUT) require every required field; partial writes (PATCH) do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Full,
    Partial,
}

/// Field-by-field reader over a JSON object body.
pub(crate) struct Payload<'a> {
    object: &'a Map<String, Value>,
    mode: WriteMode,
    errors: FieldErrors,
}

impl<'a> Payload<'a> {
    pub(crate) fn new(value: &'a Value, mode: WriteMode) -> Result<Self, AppError> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                mode,
                errors: FieldErrors::new(),
            }),
            other => Err(AppError::Validation(FieldErrors::single(
                NON_FIELD_ERRORS,
                format!(
                    "Invalid data. Expected an object, but got {}.",
                    json_type_name(other)
                ),
            ))),
        }
    }

    /// Returns the raw value, or records a missing-field error when a full write needs it.
    fn field(&mut self, name: &str) -> Option<&'a Value> {
        let value = self.object.get(name);
        if value.is_none() && self.mode == WriteMode::Full {
            self.errors.add(name, REQUIRED);
        }
        value
    }

    /// Required text field, trimmed. Numbers are accepted in their textual form.
    pub(crate) fn text(&mut self, name: &str, max_len: usize, allow_blank: bool) -> Option<String> {
        let value = self.field(name)?;
        let text = match value {
            Value::Null => {
                self.errors.add(name, NOT_NULL);
                return None;
            }
            Value::String(text) => text.trim().to_string(),
            Value::Number(number) => number.to_string(),
            _ => {
                self.errors.add(name, NOT_A_STRING);
                return None;
            }
        };

        if !allow_blank && is_blank(&text) {
            self.errors.add(name, NOT_BLANK);
            return None;
        }
        let mut valid = true;
        if !ensure_max_len(&text, max_len) {
            self.errors.add(
                name,
                format!("Ensure this field has no more than {} characters.", max_len),
            );
            valid = false;
        }
        if has_null_char(&text) {
            self.errors.add(name, NULL_CHARACTERS);
            valid = false;
        }
        valid.then_some(text)
    }

    /// Optional text field: absence is never an error.
    pub(crate) fn optional_text(&mut self, name: &str, max_len: usize) -> Option<String> {
        if !self.object.contains_key(name) {
            return None;
        }
        self.text(name, max_len, true)
    }

    /// Reference to another entity by primary key.
    pub(crate) fn pk(&mut self, name: &str) -> Option<i64> {
        let value = self.field(name)?;
        if value.is_null() {
            self.errors.add(name, NOT_NULL);
            return None;
        }
        let pk = parse_pk(value);
        if pk.is_none() {
            self.errors.add(name, incorrect_pk_type(value));
        }
        pk
    }

    /// List of primary keys. Duplicates collapse, the result is sorted ascending.
    pub(crate) fn pk_list(&mut self, name: &str) -> Option<Vec<i64>> {
        let value = self.field(name)?;
        let items = match value {
            Value::Null => {
                self.errors.add(name, NOT_NULL);
                return None;
            }
            Value::Array(items) => items,
            other => {
                self.errors.add(
                    name,
                    format!(
                        "Expected a list of items but got type \"{}\".",
                        json_type_name(other)
                    ),
                );
                return None;
            }
        };

        let mut ids = Vec::with_capacity(items.len());
        let mut valid = true;
        for item in items {
            match parse_pk(item) {
                Some(id) => ids.push(id),
                None => {
                    self.errors.add(name, incorrect_pk_type(item));
                    valid = false;
                }
            }
        }
        if !valid {
            return None;
        }

        ids.sort_unstable();
        ids.dedup();
        Some(ids)
    }

    pub(crate) fn finish(self) -> Result<(), AppError> {
        self.errors.into_result()
    }
}

fn incorrect_pk_type(value: &Value) -> String {
    format!(
        "Incorrect type. Expected pk value, received {}.",
        json_type_name(value)
    )
}

pub fn missing_pk(id: i64) -> String {
    format!("Invalid pk \"{}\" - object does not exist.", id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_errors(result: Result<(), AppError>) -> FieldErrors {
        match result {
            Err(AppError::Validation(errors)) => errors,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn rejects_non_object_bodies() {
        let body = json!([1, 2]);
        let err = Payload::new(&body, WriteMode::Full).err().map(|e| e.code());
        assert_eq!(err, Some("VALIDATION_ERROR"));
    }

    #[test]
    fn full_mode_reports_missing_fields() {
        let body = json!({});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.text("name", 10, false), None);
        assert_eq!(payload.pk("station"), None);
        let errors = field_errors(payload.finish());
        assert_eq!(errors.get("name"), Some(&[REQUIRED.to_string()][..]));
        assert_eq!(errors.get("station"), Some(&[REQUIRED.to_string()][..]));
    }

    #[test]
    fn partial_mode_skips_missing_fields() {
        let body = json!({});
        let mut payload = Payload::new(&body, WriteMode::Partial).unwrap();
        assert_eq!(payload.text("name", 10, false), None);
        assert_eq!(payload.pk_list("station_ids"), None);
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn text_rules() {
        let body = json!({"blank": "  ", "long": "abcdef", "null": null, "flag": true, "num": 12});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.text("blank", 10, false), None);
        assert_eq!(payload.text("long", 5, false), None);
        assert_eq!(payload.text("null", 5, false), None);
        assert_eq!(payload.text("flag", 5, false), None);
        assert_eq!(payload.text("num", 5, false), Some("12".to_string()));
        let errors = field_errors(payload.finish());
        assert_eq!(errors.get("blank"), Some(&[NOT_BLANK.to_string()][..]));
        assert_eq!(
            errors.get("long"),
            Some(&["Ensure this field has no more than 5 characters.".to_string()][..])
        );
        assert_eq!(errors.get("null"), Some(&[NOT_NULL.to_string()][..]));
        assert_eq!(errors.get("flag"), Some(&[NOT_A_STRING.to_string()][..]));
    }

    #[test]
    fn text_is_trimmed_before_checks() {
        let body = json!({"name": "  Seoul  ", "location": "   ", "code": " abcde "});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.text("name", 10, false), Some("Seoul".to_string()));
        assert_eq!(payload.optional_text("location", 10), Some(String::new()));
        assert_eq!(payload.text("code", 5, false), Some("abcde".to_string()));
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn text_rejects_null_characters() {
        let body = json!({"name": "Se\0oul", "long": "abc\0def"});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.text("name", 10, false), None);
        assert_eq!(payload.text("long", 5, false), None);
        let errors = field_errors(payload.finish());
        assert_eq!(errors.get("name"), Some(&[NULL_CHARACTERS.to_string()][..]));
        assert_eq!(
            errors.get("long"),
            Some(
                &[
                    "Ensure this field has no more than 5 characters.".to_string(),
                    NULL_CHARACTERS.to_string(),
                ][..]
            )
        );
    }

    #[test]
    fn optional_text_allows_blank_and_absence() {
        let body = json!({"location": ""});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.optional_text("location", 10), Some(String::new()));
        assert_eq!(payload.optional_text("missing", 10), None);
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn pk_list_dedups_and_sorts() {
        let body = json!({"station_ids": [3, "1", 3, 2]});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.pk_list("station_ids"), Some(vec![1, 2, 3]));
        assert!(payload.finish().is_ok());
    }

    #[test]
    fn pk_list_rejects_bad_shapes() {
        let body = json!({"a": "1,2", "b": [1, "x"]});
        let mut payload = Payload::new(&body, WriteMode::Full).unwrap();
        assert_eq!(payload.pk_list("a"), None);
        assert_eq!(payload.pk_list("b"), None);
        let errors = field_errors(payload.finish());
        assert_eq!(
            errors.get("a"),
            Some(&["Expected a list of items but got type \"string\".".to_string()][..])
        );
        assert_eq!(
            errors.get("b"),
            Some(&["Incorrect type. Expected pk value, received string.".to_string()][..])
        );
    }
}
