use crate::expr::{map_value, timestamp_value};
use cel_interpreter::Value;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Name of the request field holding the request time
pub const TIME_FIELD: &str = "time";

/// The request being authorized
///
/// Besides its time, a request can carry arbitrary attributes which are exposed
/// to expressions as `request.<name>`.
#[derive(Debug, Clone)]
pub struct Request {
    pub time: DateTime<Utc>,
    attributes: BTreeMap<String, Value>,
}

impl Request {
    #[must_use]
    pub const fn new(time: DateTime<Utc>) -> Self {
        Self {
            time,
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute; the request time cannot be shadowed
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let _ = self.attributes.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    #[must_use]
    pub fn to_value(&self) -> Value {
        let fields = self
            .attributes
            .iter()
            .filter(|(name, _)| name.as_str() != TIME_FIELD)
            .map(|(name, value)| (name.clone(), value.clone()))
            .chain(core::iter::once((TIME_FIELD.to_string(), timestamp_value(&self.time))));

        map_value(fields)
    }
}

impl From<&Request> for Value {
    fn from(request: &Request) -> Self {
        request.to_value()
    }
}

impl From<Request> for Value {
    fn from(request: Request) -> Self {
        request.to_value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cel_interpreter::objects::Key;
    use chrono::TimeZone;
    use std::sync::Arc;

    fn field(value: &Value, name: &str) -> Option<Value> {
        let Value::Map(map) = value else {
            panic!("expected a map, got {value:?}");
        };
        map.map.get(&Key::String(Arc::new(name.to_string()))).cloned()
    }

    #[test]
    fn test_time_is_a_timestamp() {
        let time = Utc.with_ymd_and_hms(2021, 3, 21, 1, 14, 51).unwrap();
        let value = Request::new(time).to_value();

        assert_eq!(field(&value, TIME_FIELD), Some(Value::Timestamp(time.fixed_offset())));
    }

    #[test]
    fn test_attributes_are_exposed() {
        let time = Utc.with_ymd_and_hms(2021, 3, 21, 1, 14, 51).unwrap();
        let request = Request::new(time).with_attribute("method", "GET");

        assert_eq!(request.attribute("method"), Some(&Value::from("GET")));
        assert_eq!(field(&request.to_value(), "method"), Some(Value::from("GET")));
    }

    #[test]
    fn test_time_attribute_does_not_shadow_time() {
        let time = Utc.with_ymd_and_hms(2021, 3, 21, 1, 14, 51).unwrap();
        let value = Request::new(time).with_attribute(TIME_FIELD, "yesterday").to_value();

        assert_eq!(field(&value, TIME_FIELD), Some(Value::Timestamp(time.fixed_offset())));
    }
}
