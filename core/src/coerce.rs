//! Numeric normalization for records whose numbers arrive as strings.
//!
//! Several backend endpoints serialize numeric columns as JSON strings
//! (`"score": "87"`). Coercion rewrites the named fields to JSON numbers and
//! leaves everything else untouched. A value that is already a number, or a
//! string that does not parse as one, is kept as-is, so applying the
//! coercion repeatedly gives the same result as applying it once.

use serde_json::{Map, Number, Value};

/// Records that declare which of their fields are numeric on the wire.
pub trait NumericFields {
    const NUMERIC_FIELDS: &'static [&'static str];
}

/// Return a shallow copy of `record` with each field in `fields` coerced to
/// a number. Non-object records are returned unchanged.
pub fn coerce_numeric_fields(record: &Value, fields: &[&str]) -> Value {
    match record {
        Value::Object(map) => Value::Object(coerce_map(map, fields)),
        other => other.clone(),
    }
}

fn coerce_map(map: &Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let value = if fields.contains(&key.as_str()) {
                coerce_value(value)
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}

/// Coerce a single JSON value. Integers are preferred over floats so `"12"`
/// and the DECIMAL rendering `"12.00"` both become `12`, not `12.0`.
pub fn coerce_value(value: &Value) -> Value {
    let Value::String(text) = value else {
        return value.clone();
    };
    let trimmed = text.trim();
    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::Number(int.into());
    }
    // NaN and infinities have no JSON representation and stay strings.
    let Some(float) = trimmed.parse::<f64>().ok().filter(|f| f.is_finite()) else {
        return value.clone();
    };
    match whole_number(float) {
        Some(int) => Value::Number(int.into()),
        None => Number::from_f64(float).map_or_else(|| value.clone(), Value::Number),
    }
}

/// `float` as an `i64` when it has no fractional part and is in range.
fn whole_number(float: f64) -> Option<i64> {
    // i64::MAX is not representable as f64; the bound rounds up to 2^63.
    let in_range = float >= i64::MIN as f64 && float < i64::MAX as f64;
    (float.fract() == 0.0 && in_range).then_some(float as i64)
}
