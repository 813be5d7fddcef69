/*
 * Responsibility
 * - Strict wire codec for closed enums (text names only)
 * - Numbers and numeric strings are rejected so clients cannot address a
 *   variant by ordinal position
 * - Failures carry enough context (type name, raw value, allowed names) for
 *   the problem payload; the HTTP mapping itself lives in crate::error
 */
use serde_json::Value;
use thiserror::Error;

/// A closed set of variants with canonical uppercase wire names.
pub trait StrictEnum: Sized + Copy + 'static {
    /// Type name reported in diagnostics (`enumType`).
    const TYPE_NAME: &'static str;

    /// Every variant, in declaration order.
    const VARIANTS: &'static [Self];

    /// Canonical wire name.
    fn as_str(self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct InvalidEnumValue {
    pub enum_type: &'static str,
    pub provided_value: Option<String>,
    pub allowed_values: Vec<&'static str>,
    pub message: String,
}

impl InvalidEnumValue {
    fn new<E: StrictEnum>(provided_value: Option<String>, message: String) -> Self {
        Self {
            enum_type: E::TYPE_NAME,
            provided_value,
            allowed_values: allowed_values::<E>(),
            message,
        }
    }
}

pub fn allowed_values<E: StrictEnum>() -> Vec<&'static str> {
    E::VARIANTS.iter().map(|v| v.as_str()).collect()
}

/// Decode a raw JSON token into `E`.
pub fn decode<E: StrictEnum>(raw: &Value) -> Result<E, InvalidEnumValue> {
    match raw {
        Value::Number(n) => Err(InvalidEnumValue::new::<E>(
            Some(n.to_string()),
            format!("Numeric value not allowed for enum {}", E::TYPE_NAME),
        )),
        Value::String(s) => decode_str(s),
        other => Err(InvalidEnumValue::new::<E>(
            None,
            format!(
                "Invalid token for enum {}: {}",
                E::TYPE_NAME,
                token_kind(other)
            ),
        )),
    }
}

/// Decode a text token. Matching against the canonical names ignores ASCII case.
pub fn decode_str<E: StrictEnum>(s: &str) -> Result<E, InvalidEnumValue> {
    if s.trim().parse::<i64>().is_ok() {
        return Err(InvalidEnumValue::new::<E>(
            Some(s.to_string()),
            format!(
                "Numeric value in string not allowed for enum {}",
                E::TYPE_NAME
            ),
        ));
    }

    E::VARIANTS
        .iter()
        .copied()
        .find(|v| v.as_str().eq_ignore_ascii_case(s))
        .ok_or_else(|| {
            InvalidEnumValue::new::<E>(
                Some(s.to_string()),
                format!("Value '{}' not valid for enum {}", s, E::TYPE_NAME),
            )
        })
}

pub fn encode<E: StrictEnum>(value: E) -> Value {
    Value::String(value.as_str().to_string())
}

fn token_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "Null",
        Value::Bool(_) => "Boolean",
        Value::Number(_) => "Number",
        Value::String(_) => "String",
        Value::Array(_) => "Array",
        Value::Object(_) => "Object",
    }
}
