//! Conversion of native data into engine values

use cel_interpreter::Value;
use cel_interpreter::objects::Map;
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;
use std::sync::Arc;

#[must_use]
pub fn string_value(s: &str) -> Value {
    Value::String(Arc::new(s.to_string()))
}

#[must_use]
pub fn timestamp_value<Tz: TimeZone>(time: &DateTime<Tz>) -> Value {
    Value::Timestamp(time.fixed_offset())
}

/// Builds a map value from named fields, later fields replacing earlier ones
#[must_use]
pub fn map_value(fields: impl IntoIterator<Item = (String, Value)>) -> Value {
    let fields: HashMap<Arc<String>, Value> = fields.into_iter().map(|(name, value)| (Arc::new(name), value)).collect();
    Value::Map(Map::from(fields))
}

/// Convert a JSON value to a CEL value
///
/// Non-negative integers become unsigned, negative ones signed, and any other
/// number a double. JSON has no timestamp type, so date-times stay strings; use
/// [`timestamp_value`] for those.
#[must_use]
pub fn json_to_value(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(Value::UInt)
            .or_else(|| n.as_i64().map(Value::Int))
            .or_else(|| n.as_f64().map(Value::Float))
            .unwrap_or(Value::Null),
        serde_json::Value::String(s) => string_value(s),
        serde_json::Value::Array(items) => {
            let items: Vec<Value> = items.iter().map(json_to_value).collect();
            Value::List(Arc::new(items))
        }
        serde_json::Value::Object(fields) => map_value(fields.iter().map(|(name, value)| (name.clone(), json_to_value(value)))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel_interpreter::objects::Key;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    #[test]
    fn test_json_scalars() {
        assert_eq!(json_to_value(&json!(null)), Value::Null);
        assert_eq!(json_to_value(&json!(true)), Value::Bool(true));
        assert_eq!(json_to_value(&json!(42)), Value::UInt(42));
        assert_eq!(json_to_value(&json!(-7)), Value::Int(-7));
        assert_eq!(json_to_value(&json!(1.5)), Value::Float(1.5));
        assert_eq!(json_to_value(&json!("projects/p")), string_value("projects/p"));
    }

    #[test]
    fn test_json_nested() {
        let value = json_to_value(&json!({
            "name": "projects/p",
            "Tags": [{"prj/dataset": "value_1"}],
        }));

        let Value::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map.map.get(&Key::String(Arc::new("name".to_string()))), Some(&string_value("projects/p")));

        let Some(Value::List(tags)) = map.map.get(&Key::String(Arc::new("Tags".to_string()))) else {
            panic!("expected a list of tags");
        };
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_timestamp_keeps_instant() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 21, 1, 14, 51).unwrap();
        let offset = utc.with_timezone(&FixedOffset::east_opt(3600).unwrap());
        assert_eq!(timestamp_value(&utc), timestamp_value(&offset));
    }

    #[test]
    fn test_map_value_last_field_wins() {
        let value = map_value(vec![
            ("a".to_string(), Value::Int(1)),
            ("a".to_string(), Value::Int(2)),
        ]);
        let Value::Map(map) = value else {
            panic!("expected a map");
        };
        assert_eq!(map.map.get(&Key::String(Arc::new("a".to_string()))), Some(&Value::Int(2)));
    }
}
