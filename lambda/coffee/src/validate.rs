//! Field checks for Create and Update bodies. The first failing rule wins.

use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::model::{FieldKind, MutableField};

pub(crate) const EMPTY_BODY: &str = "Empty message body or does not parse to JSON";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Create,
    Update,
}

/// Parses the request body into a non-empty JSON object.
pub(crate) fn parse_body(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(ApiError::Validation(EMPTY_BODY.to_string())),
    }
}

pub(crate) fn check(body: &Map<String, Value>, mode: Mode) -> Result<(), ApiError> {
    for field in MutableField::ALL {
        let value = body.get(field.as_str()).filter(|v| !v.is_null());
        let valid = match (field.kind(), value) {
            (FieldKind::RequiredText, None) => mode == Mode::Update,
            (_, None) => true,
            (FieldKind::RequiredText, Some(Value::String(s))) => !s.is_empty(),
            (FieldKind::Text, Some(Value::String(_))) => true,
            (FieldKind::Number, Some(Value::Number(_))) => true,
            (FieldKind::StringList, Some(Value::Array(items))) => items.iter().all(Value::is_string),
            _ => false,
        };
        if !valid {
            return Err(ApiError::Validation(message(field, mode).to_string()));
        }
    }
    Ok(())
}

fn message(field: MutableField, mode: Mode) -> &'static str {
    match (field, mode) {
        (MutableField::Roaster, Mode::Create) => "Roaster must be provided and be of type string",
        (MutableField::Roaster, Mode::Update) => "Roaster must be of type string",
        (MutableField::Country, _) => "Country must be input as a string",
        (MutableField::Name, _) => "name must be input as a string or blank",
        (MutableField::Producer, _) => "producer must be input as a string or blank",
        (MutableField::Processing, _) => "processing must be input as a string or blank",
        (MutableField::Masl, _) => "MASL must be a number",
        (MutableField::Varietals, _) => "Varietals must be an array of strings or nothing",
        (MutableField::Notes, _) => "Notes must be an array of strings or nothing",
    }
}
