use cel_interpreter::Value;
use cel_interpreter::objects::{Key, Map};
use std::collections::HashMap;
use std::sync::Arc;

/// Name of the resource field holding the tag sequence
pub const TAGS_FIELD: &str = "Tags";

/// A single key/value label attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// The outcome of looking up a tag key
///
/// Absence is a regular outcome here. Whether it should fail an evaluation is
/// decided by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagLookup<'a> {
    /// The first tag carrying the key, and its value
    Found(&'a str),

    /// No tag carries the key
    Absent,
}

impl TagLookup<'_> {
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// Compares the found value against `expected`, returning `None` when the tag is absent
    #[must_use]
    pub fn matches(&self, expected: &str) -> Option<bool> {
        match self {
            Self::Found(value) => Some(*value == expected),
            Self::Absent => None,
        }
    }
}

/// Errors raised when a resource value does not have the expected tag layout
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagsError {
    #[error("expected the resource to be a map, got {0}")]
    NotAMap(String),

    #[error("expected 'Tags' to be a list, got {0}")]
    NotAList(String),

    #[error("tag entry #{index} is not a map, got {found}")]
    EntryNotAMap { index: usize, found: String },

    #[error("tag entry #{index} has a non-string key or value")]
    NonStringPair { index: usize },
}

/// The ordered tag sequence of a resource
///
/// Order is insertion order and duplicate keys are kept. Lookups scan from the
/// start, so the first occurrence of a key shadows any later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<Tag>);

impl Tags {
    #[must_use]
    pub const fn new(tags: Vec<Tag>) -> Self {
        Self(tags)
    }

    /// Finds the first tag with exactly this key
    #[must_use]
    pub fn lookup(&self, key: &str) -> TagLookup<'_> {
        self.0
            .iter()
            .find(|tag| tag.key == key)
            .map_or(TagLookup::Absent, |tag| TagLookup::Found(&tag.value))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.lookup(key).is_found()
    }

    /// Appends a tag; an existing tag with the same key keeps precedence
    pub fn push(&mut self, tag: Tag) {
        self.0.push(tag);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.0.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extracts the tag sequence from a resource value
    ///
    /// A resource without a `Tags` field, or with a null one, has no tags. Each
    /// entry is a map normally holding a single key; entries holding several keys
    /// contribute all of them, ordered by key.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource is not a map or the tags are not a list of
    /// string-to-string maps.
    pub fn from_resource(resource: &Value) -> Result<Self, TagsError> {
        let Value::Map(resource) = resource else {
            return Err(TagsError::NotAMap(format!("{resource:?}")));
        };

        let entries = match resource.map.get(&Key::String(Arc::new(TAGS_FIELD.to_string()))) {
            None | Some(Value::Null) => return Ok(Self::default()),
            Some(Value::List(entries)) => entries,
            Some(other) => return Err(TagsError::NotAList(format!("{other:?}"))),
        };

        let mut tags = Vec::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Value::Map(entry) = entry else {
                return Err(TagsError::EntryNotAMap {
                    index,
                    found: format!("{entry:?}"),
                });
            };

            let mut pairs = entry
                .map
                .iter()
                .map(|(key, value)| match (key, value) {
                    (Key::String(key), Value::String(value)) => Ok(Tag::new(key.as_str(), value.as_str())),
                    _ => Err(TagsError::NonStringPair { index }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            pairs.sort_by(|a, b| a.key.cmp(&b.key));
            tags.extend(pairs);
        }

        Ok(Self(tags))
    }

    /// Converts the tags into the engine layout: a list of single-entry maps
    #[must_use]
    pub fn to_value(&self) -> Value {
        let entries: Vec<Value> = self
            .0
            .iter()
            .map(|tag| {
                let mut entry: HashMap<Arc<String>, Value> = HashMap::with_capacity(1);
                let _ = entry.insert(Arc::new(tag.key.clone()), Value::String(Arc::new(tag.value.clone())));
                Value::Map(Map::from(entry))
            })
            .collect();

        Value::List(Arc::new(entries))
    }
}

impl From<Vec<Tag>> for Tags {
    fn from(tags: Vec<Tag>) -> Self {
        Self(tags)
    }
}

impl FromIterator<Tag> for Tags {
    fn from_iter<I: IntoIterator<Item = Tag>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Tags {
    type Item = &'a Tag;
    type IntoIter = core::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
