//! `serde(with = ...)` modules for Pay.nl scalars.
//!
//! The API is not consistent about scalar types: the same field can be a
//! string in one response and a number in the next, and "not set" is spelled
//! `""` at least as often as `null`. These modules accept every spelling seen
//! on the wire and always serialize back to the canonical JSON type.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::schema::json_type;

/// Boolean flag sent as `"1"`/`"0"`, `1`/`0` or `true`/`false`.
///
/// `null` and `""` read as `false`.
pub mod flag {
    use super::*;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(*value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Bool(b) => Ok(b),
            Value::Null => Ok(false),
            Value::Number(n) => match n.as_i64() {
                Some(0) => Ok(false),
                Some(1) => Ok(true),
                _ => Err(D::Error::custom(format!("expected a flag (0 or 1), got {n}"))),
            },
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => Ok(true),
                "0" | "false" | "" => Ok(false),
                other => Err(D::Error::custom(format!(
                    "expected a flag (0 or 1), got \"{other}\""
                ))),
            },
            other => Err(D::Error::custom(format!(
                "expected a flag, got {}",
                json_type(&other)
            ))),
        }
    }
}

/// Required string that may arrive as a number (`"12"` or `12`).
pub mod text {
    use super::*;

    pub fn serialize<S: Serializer>(value: &str, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            other => Err(D::Error::custom(format!(
                "expected a string, got {}",
                json_type(&other)
            ))),
        }
    }
}

/// Optional string where both `null` and `""` mean "not set".
///
/// Use together with `#[serde(default)]` so that an absent key is accepted too.
pub mod opt_text {
    use super::*;

    pub fn serialize<S: Serializer>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(s)),
            Value::Number(n) => Ok(Some(n.to_string())),
            other => Err(D::Error::custom(format!(
                "expected a string, got {}",
                json_type(&other)
            ))),
        }
    }
}
