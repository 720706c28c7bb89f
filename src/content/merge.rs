//! Deep merge of CMS overrides over complete default documents

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("defaults could not be encoded: {0}")]
    Defaults(String),
    #[error("merged content does not match its shape: {0}")]
    Shape(String),
}

/// Merge `overrides` over `defaults`.
///
/// - objects merge key by key, keys only present in `overrides` are kept
/// - a non-empty override array replaces the default array wholesale
/// - `null`, empty arrays and values of a different JSON type never
///   replace a default
pub fn deep_merge(defaults: &Value, overrides: &Value) -> Value {
    match (defaults, overrides) {
        (_, Value::Null) => defaults.clone(),
        (Value::Null, _) => overrides.clone(),
        (Value::Object(base), Value::Object(patch)) => {
            let mut merged = base.clone();
            for (key, value) in patch {
                let next = match base.get(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (Value::Array(_), Value::Array(items)) => {
            if items.is_empty() {
                defaults.clone()
            } else {
                overrides.clone()
            }
        }
        (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Number(_), Value::Number(_)) => overrides.clone(),
        _ => {
            tracing::debug!(
                "Ignoring override of a different type: {} over {}",
                json_type(overrides),
                json_type(defaults)
            );
            defaults.clone()
        }
    }
}

/// Merge a CMS document over `defaults` and decode the result
pub fn merge_over<T>(defaults: &T, overrides: &Value) -> Result<T, MergeError>
where
    T: Serialize + DeserializeOwned,
{
    let base = serde_json::to_value(defaults).map_err(|e| MergeError::Defaults(e.to_string()))?;
    let merged = deep_merge(&base, overrides);
    serde_json::from_value(merged).map_err(|e| MergeError::Shape(e.to_string()))
}

/// Number of populated fields in a document; a non-empty array is one field
pub fn populated_fields(value: &Value) -> usize {
    match value {
        Value::Null => 0,
        Value::Object(map) => map.values().map(populated_fields).sum(),
        Value::Array(items) => usize::from(!items.is_empty()),
        _ => 1,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
