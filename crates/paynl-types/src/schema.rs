//! Typed parse helpers shared by the per-operation response schemas.
//!
//! Every response parser follows the same pipeline:
//!
//! 1. **Deserialize** the raw body into a JSON object ([`SchemaLoader::from_str`]).
//! 2. **Normalize** the raw mapping: drop optional fields whose value is empty
//!    ([`prune_empty`]) and turn keyed maps that really are lists into sequences
//!    ([`map_to_list`]).
//! 3. **Validate** field by field with [`SchemaLoader::required`] and
//!    [`SchemaLoader::optional`]. Failures are collected per field, not
//!    short-circuited, so the resulting [`SchemaError`] lists every problem.
//! 4. **Construct** the typed response, re-keying list-shaped collections by id
//!    ([`key_by_id`]).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Field name used for errors that are not tied to a single field.
pub const SCHEMA_FIELD: &str = "_schema";

/// Schema validation failure with the field-level messages attached.
///
/// Keys are wire field names; errors about the payload as a whole are stored
/// under [`SCHEMA_FIELD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("Schema validation failed: {}", FieldErrors(.errors))]
pub struct SchemaError {
    errors: BTreeMap<String, Vec<String>>,
}

impl SchemaError {
    /// Creates an error for the payload as a whole.
    pub fn schema(message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(SCHEMA_FIELD, message);
        error
    }

    /// Creates an error for a single field.
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(field, message);
        error
    }

    /// Records a message for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// All messages, keyed by wire field name.
    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    /// Messages recorded for `field`, if any.
    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

struct FieldErrors<'a>(&'a BTreeMap<String, Vec<String>>);

impl fmt::Display for FieldErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(", "))?;
        }
        Ok(())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(value: serde_json::Error) -> Self {
        Self::schema(format!("Invalid JSON: {value}"))
    }
}

/// Field-by-field loader over a normalized JSON object.
///
/// Collects validation failures instead of stopping at the first one. Check
/// [`SchemaLoader::is_valid`] before using the loaded values.
#[derive(Debug)]
pub struct SchemaLoader {
    data: Map<String, Value>,
    error: SchemaError,
}

impl SchemaLoader {
    pub fn new(data: Map<String, Value>) -> Self {
        Self {
            data,
            error: SchemaError::default(),
        }
    }

    /// Parses a raw body, which must be a JSON object.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(raw: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        match value {
            Value::Object(data) => Ok(Self::new(data)),
            other => Err(SchemaError::schema(format!(
                "Expected a JSON object, got {}",
                json_type(&other)
            ))),
        }
    }

    /// Mutable access to the raw mapping, for pre-load normalization.
    pub fn data_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.data
    }

    /// Loads a field that must be present and well-formed.
    pub fn required<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        match self.data.remove(field) {
            None | Some(Value::Null) => {
                self.fail(field, "Missing data for required field.".to_string());
                None
            }
            Some(value) => self.convert(field, value),
        }
    }

    /// Loads a field that may be absent or `null`.
    pub fn optional<T: DeserializeOwned>(&mut self, field: &str) -> Option<T> {
        match self.data.remove(field) {
            None | Some(Value::Null) => None,
            Some(value) => self.convert(field, value),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.error.is_empty()
    }

    /// Consumes the loader, returning the collected failures.
    pub fn into_error(self) -> SchemaError {
        if self.error.is_empty() {
            SchemaError::schema("Incomplete payload")
        } else {
            self.error
        }
    }

    fn convert<T: DeserializeOwned>(&mut self, field: &str, value: Value) -> Option<T> {
        match serde_json::from_value(value) {
            Ok(value) => Some(value),
            Err(e) => {
                self.fail(field, e.to_string());
                None
            }
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        #[cfg(feature = "telemetry")]
        tracing::debug!(field, %message, "paynl.schema.field_invalid");
        self.error.push(field, message);
    }
}

/// Human-readable name of a JSON value's type, for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

/// Whether a raw value counts as "not provided": `null`, `""`, `[]` or `{}`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Removes `field` from `data` when its value is empty. Returns whether it was removed.
pub fn prune_empty(data: &mut Map<String, Value>, field: &str) -> bool {
    if data.get(field).is_some_and(is_empty) {
        data.remove(field);
        true
    } else {
        false
    }
}

/// Replaces a keyed map under `field` with the sequence of its values.
///
/// Sequences and other values are left untouched.
pub fn map_to_list(data: &mut Map<String, Value>, field: &str) {
    if let Some(Value::Object(map)) = data.get_mut(field) {
        let items = std::mem::take(map).into_iter().map(|(_, v)| v).collect();
        data.insert(field.to_string(), Value::Array(items));
    }
}

/// Items that can be looked up by an id.
pub trait Keyed {
    fn key(&self) -> &str;
}

/// Re-keys a sequence into an id-keyed map.
///
/// When two items share an id the later one wins.
pub fn key_by_id<T: Keyed>(items: impl IntoIterator<Item = T>) -> BTreeMap<String, T> {
    items
        .into_iter()
        .map(|item| (item.key().to_string(), item))
        .collect()
}

/// `deserialize_with` helper for nested collections that may arrive as a
/// list, as a keyed map, or as an empty placeholder (`[]`, `""`, `null`).
///
/// The result is always keyed by each item's own id, never by the wire key.
pub mod id_keyed {
    use super::*;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<String, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Keyed,
    {
        let value = Value::deserialize(deserializer)?;
        let items = match value {
            v if is_empty(&v) => Vec::new(),
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected a list or a map, got {}",
                    json_type(&other)
                )));
            }
        };
        let items = items
            .into_iter()
            .map(serde_json::from_value::<T>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(serde::de::Error::custom)?;
        Ok(key_by_id(items))
    }
}
