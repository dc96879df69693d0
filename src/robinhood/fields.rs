//! Field projection helpers
//!
//! The API returns most numbers as JSON strings (`"182.3400"`), so numeric
//! projections accept either a JSON number or a string that parses as one.

use serde_json::Value;

use crate::error::{Error, Result};

/// Look up `field`, failing when it is absent
pub fn field<'a>(payload: &'a Value, field: &str) -> Result<&'a Value> {
    payload
        .get(field)
        .ok_or_else(|| Error::MissingField(field.to_string()))
}

/// Project `field` as a float
pub fn float_field(payload: &Value, name: &str) -> Result<f64> {
    let value = field(payload, name)?;
    match value {
        Value::Number(number) => number.as_f64().ok_or_else(|| coercion(name, value)),
        Value::String(text) => text.trim().parse::<f64>().map_err(|_| coercion(name, value)),
        _ => Err(coercion(name, value)),
    }
}

/// Project `field` as a string
pub fn string_field(payload: &Value, name: &str) -> Result<String> {
    match field(payload, name)? {
        Value::String(text) => Ok(text.clone()),
        other => Err(coercion(name, other)),
    }
}

/// First entry of a `results` listing
pub fn first_result(payload: Value) -> Result<Value> {
    match payload {
        Value::Object(mut map) => match map.remove("results") {
            Some(Value::Array(results)) => results
                .into_iter()
                .next()
                .ok_or_else(|| Error::MissingField("results[0]".to_string())),
            Some(other) => Err(coercion("results", &other)),
            None => Err(Error::MissingField("results".to_string())),
        },
        _ => Err(Error::MissingField("results".to_string())),
    }
}

/// Entries of a `results` listing
pub fn results(payload: &Value) -> Result<&Vec<Value>> {
    match field(payload, "results")? {
        Value::Array(items) => Ok(items),
        other => Err(coercion("results", other)),
    }
}

/// Python-style emptiness: `{}`, `[]`, `""` and `null` count as empty
pub fn is_empty(payload: &Value) -> bool {
    match payload {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn coercion(field: &str, value: &Value) -> Error {
    Error::Coercion {
        field: field.to_string(),
        value: value.to_string(),
    }
}
