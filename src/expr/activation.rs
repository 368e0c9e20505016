use super::json_to_value;
use cel_interpreter::Value;

/// The values bound to `request` and `resource` for one evaluation
#[derive(Debug, Clone)]
pub struct Activation {
    request: Value,
    resource: Value,
}

impl Activation {
    #[must_use]
    pub fn new(request: impl Into<Value>, resource: impl Into<Value>) -> Self {
        Self {
            request: request.into(),
            resource: resource.into(),
        }
    }

    /// Builds an activation from JSON documents
    ///
    /// See [`json_to_value`] for how JSON maps onto engine values.
    #[must_use]
    pub fn from_json(request: &serde_json::Value, resource: &serde_json::Value) -> Self {
        Self {
            request: json_to_value(request),
            resource: json_to_value(resource),
        }
    }

    #[must_use]
    pub const fn request(&self) -> &Value {
        &self.request
    }

    #[must_use]
    pub const fn resource(&self) -> &Value {
        &self.resource
    }
}
