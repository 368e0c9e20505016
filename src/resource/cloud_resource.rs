use super::{TAGS_FIELD, Tag, Tags};
use crate::expr::{map_value, string_value};
use cel_interpreter::Value;

/// Name of the resource field holding its full resource name
pub const NAME_FIELD: &str = "name";

/// A cloud resource as seen by policies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub tags: Tags,
}

impl Resource {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Tags::default(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(Tag::new(key, value));
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = Tag>) -> Self {
        for tag in tags {
            self.tags.push(tag);
        }
        self
    }

    /// Converts the resource into its engine value
    ///
    /// The `Tags` field is left out when there are no tags, which predicates treat
    /// the same as an empty list.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let mut fields = vec![(NAME_FIELD.to_string(), string_value(&self.name))];
        if !self.tags.is_empty() {
            fields.push((TAGS_FIELD.to_string(), self.tags.to_value()));
        }

        map_value(fields)
    }
}

impl From<&Resource> for Value {
    fn from(resource: &Resource) -> Self {
        resource.to_value()
    }
}

impl From<Resource> for Value {
    fn from(resource: Resource) -> Self {
        resource.to_value()
    }
}
