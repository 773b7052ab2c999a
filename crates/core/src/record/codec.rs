//! Attribute codec helpers.
//!
//! Pure functions for reading typed fields out of an [`AttributeMap`] and
//! writing them back. Decode failures are reported as
//! [`RepositoryError::InvalidData`].

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::storage::{AttributeMap, RepositoryError, Result};

// ============================================================================
// Common attribute names
// ============================================================================

pub const ATTR_ENTITY_TYPE: &str = "entityType";
pub const ATTR_VERSION: &str = "version";
pub const ATTR_CREATION_TIME: &str = "creationTime";
pub const ATTR_LAST_UPDATE_TIME: &str = "lastUpdateTime";
pub const ATTR_CREATED_BY: &str = "createdBy";
pub const ATTR_LAST_UPDATED_BY: &str = "lastUpdatedBy";

// ============================================================================
// Timestamps
// ============================================================================

/// Formats a timestamp as RFC 3339 in UTC with millisecond precision.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses an RFC 3339 timestamp into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid timestamp {value}: {e}")))
}

// ============================================================================
// Readers
// ============================================================================

fn missing(key: &str) -> RepositoryError {
    RepositoryError::InvalidData(format!("Missing or invalid field: {}", key))
}

pub fn get_string(item: &AttributeMap, key: &str) -> Result<String> {
    item.get(key)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing(key))
}

pub fn get_optional_string(item: &AttributeMap, key: &str) -> Option<String> {
    item.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn get_u64(item: &AttributeMap, key: &str) -> Result<u64> {
    item.get(key)
        .and_then(Value::as_u64)
        .ok_or_else(|| missing(key))
}

pub fn get_optional_u64(item: &AttributeMap, key: &str) -> Option<u64> {
    item.get(key).and_then(Value::as_u64)
}

pub fn get_i64(item: &AttributeMap, key: &str) -> Result<i64> {
    item.get(key)
        .and_then(Value::as_i64)
        .ok_or_else(|| missing(key))
}

pub fn get_i32(item: &AttributeMap, key: &str) -> Result<i32> {
    let value = get_i64(item, key)?;
    i32::try_from(value)
        .map_err(|_| RepositoryError::InvalidData(format!("Field {key} out of range: {value}")))
}

pub fn get_optional_bool(item: &AttributeMap, key: &str) -> Option<bool> {
    item.get(key).and_then(Value::as_bool)
}

/// Reads a list of strings. A missing attribute is an empty list.
pub fn get_string_list(item: &AttributeMap, key: &str) -> Result<Vec<String>> {
    match item.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(|| missing(key)))
            .collect(),
        Some(_) => Err(missing(key)),
    }
}

pub fn get_uuid(item: &AttributeMap, key: &str) -> Result<Uuid> {
    let s = get_string(item, key)?;
    Uuid::parse_str(&s)
        .map_err(|e| RepositoryError::InvalidData(format!("Invalid UUID {}: {}", key, e)))
}

pub fn get_optional_datetime(item: &AttributeMap, key: &str) -> Result<Option<DateTime<Utc>>> {
    get_optional_string(item, key)
        .map(|s| parse_timestamp(&s))
        .transpose()
}

/// Decodes a nested value (objects, lists of objects) through serde.
pub fn get_nested<T: DeserializeOwned>(item: &AttributeMap, key: &str) -> Result<Option<T>> {
    match item.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|e| RepositoryError::InvalidData(format!("Invalid field {}: {}", key, e))),
    }
}

// ============================================================================
// Writers
// ============================================================================

pub fn put_string(item: &mut AttributeMap, key: &str, value: impl Into<String>) {
    item.insert(key.to_string(), Value::String(value.into()));
}

/// Inserts `value` when present; `None` leaves the attribute absent.
pub fn put_optional<V: Into<Value>>(item: &mut AttributeMap, key: &str, value: Option<V>) {
    if let Some(value) = value {
        item.insert(key.to_string(), value.into());
    }
}

/// Encodes a nested value through serde.
pub fn put_nested<T: Serialize>(item: &mut AttributeMap, key: &str, value: &T) -> Result<()> {
    let encoded =
        serde_json::to_value(value).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    item.insert(key.to_string(), encoded);
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn item(value: Value) -> AttributeMap {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_timestamp_format_has_millis_and_z() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap();
        assert_eq!(format_timestamp(ts), "2024-03-15T10:30:00.000Z");
        assert_eq!(parse_timestamp("2024-03-15T10:30:00.000Z").unwrap(), ts);
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(RepositoryError::InvalidData(_))
        ));
    }

    #[test]
    fn test_get_string() {
        let map = item(json!({"name": "Dana", "age": 3}));
        assert_eq!(get_string(&map, "name").unwrap(), "Dana");
        assert_eq!(
            get_string(&map, "age"),
            Err(RepositoryError::InvalidData(
                "Missing or invalid field: age".to_string()
            ))
        );
        assert!(get_string(&map, "missing").is_err());
        assert_eq!(get_optional_string(&map, "missing"), None);
    }

    #[test]
    fn test_numbers() {
        let map = item(json!({"version": 4, "year": 2020, "neg": -1, "huge": 9_000_000_000_i64}));
        assert_eq!(get_u64(&map, "version").unwrap(), 4);
        assert_eq!(get_i32(&map, "year").unwrap(), 2020);
        assert!(get_u64(&map, "neg").is_err());
        assert!(get_i32(&map, "huge").is_err());
        assert_eq!(get_optional_u64(&map, "missing"), None);
    }

    #[test]
    fn test_string_list() {
        let map = item(json!({"langs": ["he", "en"], "bad": [1], "text": "x"}));
        assert_eq!(get_string_list(&map, "langs").unwrap(), vec!["he", "en"]);
        assert!(get_string_list(&map, "missing").unwrap().is_empty());
        assert!(get_string_list(&map, "bad").is_err());
        assert!(get_string_list(&map, "text").is_err());
    }

    #[test]
    fn test_uuid() {
        let map = item(json!({"id": "550e8400-e29b-41d4-a716-446655440000", "bad": "nope"}));
        assert_eq!(
            get_uuid(&map, "id").unwrap().to_string(),
            "550e8400-e29b-41d4-a716-446655440000"
        );
        assert!(get_uuid(&map, "bad").is_err());
    }

    #[test]
    fn test_put_optional_omits_none() {
        let mut map = AttributeMap::new();
        put_optional::<String>(&mut map, "about_me", None);
        put_optional(&mut map, "hobbies", Some("chess".to_string()));
        assert!(!map.contains_key("about_me"));
        assert_eq!(map.get("hobbies"), Some(&json!("chess")));
    }

    #[test]
    fn test_nested_round_trip() {
        let mut map = AttributeMap::new();
        put_nested(&mut map, "tags", &vec!["a".to_string()]).unwrap();
        let tags: Option<Vec<String>> = get_nested(&map, "tags").unwrap();
        assert_eq!(tags, Some(vec!["a".to_string()]));

        let none: Option<Vec<String>> = get_nested(&map, "missing").unwrap();
        assert_eq!(none, None);
    }
}
