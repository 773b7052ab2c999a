//! DynamoDB attribute conversion functions.
//!
//! Pure functions converting between the JSON-shaped [`AttributeMap`] the
//! store works with and DynamoDB `AttributeValue` maps. Testable in isolation
//! without DynamoDB access.

use std::collections::HashMap;

use aws_sdk_dynamodb::types::AttributeValue;
use jobli_core::storage::{AttributeMap, RepositoryError, Result};
use serde_json::{Number, Value};

/// Convert a JSON value to a DynamoDB attribute.
pub fn value_to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(b) => AttributeValue::Bool(*b),
        Value::Number(n) => AttributeValue::N(n.to_string()),
        Value::String(s) => AttributeValue::S(s.clone()),
        Value::Array(values) => AttributeValue::L(values.iter().map(value_to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(map_to_item(map)),
    }
}

/// Parse a DynamoDB number string, preferring integers.
fn parse_number(n: &str) -> Result<Number> {
    if let Ok(i) = n.parse::<i64>() {
        return Ok(Number::from(i));
    }
    if let Ok(u) = n.parse::<u64>() {
        return Ok(Number::from(u));
    }
    n.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| RepositoryError::InvalidData(format!("Invalid number: {}", n)))
}

/// Convert a DynamoDB attribute to a JSON value.
pub fn attribute_to_value(attribute: &AttributeValue) -> Result<Value> {
    match attribute {
        AttributeValue::Null(_) => Ok(Value::Null),
        AttributeValue::Bool(b) => Ok(Value::Bool(*b)),
        AttributeValue::N(n) => parse_number(n).map(Value::Number),
        AttributeValue::S(s) => Ok(Value::String(s.clone())),
        AttributeValue::L(values) => values
            .iter()
            .map(attribute_to_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        AttributeValue::M(map) => item_to_map(map).map(Value::Object),
        AttributeValue::Ss(values) => Ok(Value::Array(
            values.iter().cloned().map(Value::String).collect(),
        )),
        AttributeValue::Ns(values) => values
            .iter()
            .map(|n| parse_number(n).map(Value::Number))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(RepositoryError::InvalidData(format!(
            "Unsupported attribute type: {:?}",
            other
        ))),
    }
}

/// Convert an attribute map to a DynamoDB item.
pub fn map_to_item(map: &AttributeMap) -> HashMap<String, AttributeValue> {
    map.iter()
        .map(|(key, value)| (key.clone(), value_to_attribute(value)))
        .collect()
}

/// Convert a DynamoDB item to an attribute map.
pub fn item_to_map(item: &HashMap<String, AttributeValue>) -> Result<AttributeMap> {
    item.iter()
        .map(|(key, value)| Ok((key.clone(), attribute_to_value(value)?)))
        .collect()
}
