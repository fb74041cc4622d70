//! Lenient number handling for user input and persisted payloads.
//!
//! Anything that is not a finite number becomes `0.0`. These helpers never fail.
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Parses user input into a number, defaulting to zero.
pub fn coerce_number(input: &str) -> f64 {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .unwrap_or(0.0)
}

/// Coerces an arbitrary JSON value into a number.
pub fn coerce_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|n| n.is_finite()).unwrap_or(0.0),
        Value::String(s) => coerce_number(s),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    }
}

/// Serde helper for required money fields: absent, `null` or junk become zero.
pub fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce_value(&value))
}

/// Serde helper for optional numeric fields: `null` stays absent.
pub fn lenient_optional_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        other => Some(coerce_value(&other)),
    })
}

/// Serde helper for free-text fields that older payloads may hold as numbers.
pub fn lenient_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}
