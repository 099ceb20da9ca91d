//! Lenient scalar coercion for client-supplied JSON

use serde_json::{Number, Value};

// Largest magnitude at which every integer is exactly representable in f64.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Read a finite number from a JSON number or a numeric string
pub fn number(value: Option<&Value>) -> Option<f64> {
    let parsed = match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                trimmed.parse::<f64>().ok()
            }
        }
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Read an integral number; fractional values count as absent
pub fn integer(value: Option<&Value>) -> Option<i64> {
    if let Some(Value::Number(n)) = value {
        if let Some(i) = n.as_i64() {
            return Some(i);
        }
    }
    let v = number(value)?;
    (v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER).then_some(v as i64)
}

/// Read a non-negative position, rounded down and saturated at `usize::MAX`
///
/// Callers clamp the result to their own length.
pub fn index(value: Option<&Value>) -> Option<usize> {
    number(value)
        .filter(|v| *v >= 0.0)
        .map(|v| v.floor().min(usize::MAX as f64) as usize)
}

/// Convert a finite f64 back to a JSON number, preferring the integer form
pub fn json_number(v: f64) -> Option<Number> {
    if v.fract() == 0.0 && v.abs() <= MAX_SAFE_INTEGER {
        Some(Number::from(v as i64))
    } else {
        Number::from_f64(v)
    }
}

/// `number` followed by `json_number`
pub fn number_value(value: Option<&Value>) -> Option<Number> {
    number(value).and_then(json_number)
}

/// Trimmed string content, empty for non-strings
pub fn trimmed(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Trimmed string content, `None` when missing or blank
pub fn non_blank(value: Option<&Value>) -> Option<String> {
    Some(trimmed(value)).filter(|s| !s.is_empty())
}
