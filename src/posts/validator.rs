//! Request payload validation for posts
//!
//! Both `title` and `description` are required strings. Values are trimmed;
//! a whitespace-only string counts as missing.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use thiserror::Error;

use crate::store::PostFields;

/// Fields checked on create and update, in reporting order.
pub const POST_FIELDS: [&str; 2] = ["title", "description"];

/// Per-field validation messages.
///
/// Serializes as a JSON object keyed by field name, in the order the
/// fields were checked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("The given data was invalid.")]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, messages)) => messages.push(message.into()),
            None => self.fields.push((field.to_string(), vec![message.into()])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the failing fields.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, messages)| messages.as_slice())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// Check a single required string field.
fn required_string(
    body: &Value,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match body.get(field) {
        None | Some(Value::Null) => {
            errors.add(field, format!("The {} field is required.", field));
            None
        }
        Some(Value::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                errors.add(field, format!("The {} field is required.", field));
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Some(Value::Array(items)) if items.is_empty() => {
            errors.add(field, format!("The {} field is required.", field));
            None
        }
        Some(_) => {
            errors.add(field, format!("The {} must be a string.", field));
            None
        }
    }
}

/// Validate a create/update payload.
///
/// Anything other than a JSON object is treated as an empty object.
pub fn validate_post(body: &Value) -> Result<PostFields, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let title = required_string(body, POST_FIELDS[0], &mut errors);
    let description = required_string(body, POST_FIELDS[1], &mut errors);

    match (title, description) {
        (Some(title), Some(description)) if errors.is_empty() => {
            Ok(PostFields { title, description })
        }
        _ => Err(errors),
    }
}
