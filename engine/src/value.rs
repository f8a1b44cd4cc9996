//! Coercion of query string text into native values, and the total order
//! used to compare values across filters and sorts.

use serde_json::{Number, Value};
use std::cmp::Ordering;

/// Convert a textual value into the most specific native type it resembles.
///
/// Integers, floats, booleans (`true`/`false`, `on`/`off`, `yes`/`no`) and
/// `null` are recognised; anything else stays a string.
pub fn native_value(text: &str) -> Value {
    let trimmed = text.trim();

    match trimmed.to_ascii_lowercase().as_str() {
        "true" | "on" | "yes" => return Value::Bool(true),
        "false" | "off" | "no" => return Value::Bool(false),
        "null" | "none" => return Value::Null,
        _ => {}
    }

    if let Ok(int) = trimmed.parse::<i64>() {
        return Value::from(int);
    }
    if let Ok(uint) = trimmed.parse::<u64>() {
        return Value::from(uint);
    }
    if let Ok(float) = trimmed.parse::<f64>() {
        if let Some(number) = Number::from_f64(float) {
            // "inf" and "nan" parse as floats but are not numbers here
            if float.is_finite() && trimmed.chars().any(|c| c.is_ascii_digit()) {
                return Value::Number(number);
            }
        }
    }

    Value::String(text.to_string())
}

/// Whether a value is an integer (signed or unsigned).
pub fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(a), Some(b)) = (a.as_i64(), b.as_i64()) {
        return a.cmp(&b);
    }
    if let (Some(a), Some(b)) = (a.as_u64(), b.as_u64()) {
        return a.cmp(&b);
    }
    let a = a.as_f64().unwrap_or(f64::NAN);
    let b = b.as_f64().unwrap_or(f64::NAN);
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Total order over JSON values.
///
/// Values of different kinds order as `null < bool < number < string <
/// array < object`; numbers compare numerically regardless of representation.
pub fn compare(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(a), Value::Array(b)) => {
            for (x, y) in a.iter().zip(b.iter()) {
                let ordering = compare(x, y);
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            a.len().cmp(&b.len())
        }
        (Value::Object(a), Value::Object(b)) => a
            .len()
            .cmp(&b.len())
            .then_with(|| Value::Object(a.clone()).to_string().cmp(&Value::Object(b.clone()).to_string())),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}
