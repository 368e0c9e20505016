//! Tag predicates registered with the expression engine
//!
//! Each predicate is called in member style on the resource, as in
//! `resource.matchTag('prj/dataset', 'value_1')`. The engine hands the receiver
//! over as a [`Value`]; the predicates read its tags through [`Tags`] and work on
//! the resulting [`TagLookup`](crate::resource::TagLookup).

use crate::resource::Tags;
use cel_interpreter::extractors::This;
use cel_interpreter::{Context, ExecutionError, Value};
use std::sync::Arc;
use strum::{Display, EnumIter, IntoStaticStr};

const LOG_TARGET: &str = "      tags";

/// The tag predicates callable on a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, Display, IntoStaticStr)]
pub enum TagFunction {
    /// `matchTag(key, value)`: compares the value of a tag addressed by its human key
    #[strum(serialize = "matchTag")]
    MatchTag,

    /// `matchTagId(tagKeyId, tagValueId)`: compares the value of a tag addressed by its ID form
    #[strum(serialize = "matchTagId")]
    MatchTagId,

    /// `hasTagKey(key)`: checks for a tag addressed by its human key
    #[strum(serialize = "hasTagKey")]
    HasTagKey,

    /// `hasTagKeyId(tagKeyId)`: checks for a tag addressed by its ID form
    #[strum(serialize = "hasTagKeyId")]
    HasTagKeyId,
}

impl TagFunction {
    /// The name expressions use to call the predicate
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub(crate) fn register_all(context: &mut Context<'_>) {
        context.add_function(Self::MatchTag.name(), match_tag);
        context.add_function(Self::MatchTagId.name(), match_tag_id);
        context.add_function(Self::HasTagKey.name(), has_tag_key);
        context.add_function(Self::HasTagKeyId.name(), has_tag_key_id);
    }
}

fn match_tag(This(resource): This<Value>, key: Arc<String>, value: Arc<String>) -> Result<bool, ExecutionError> {
    match_value(TagFunction::MatchTag, &resource, &key, &value)
}

fn match_tag_id(This(resource): This<Value>, tag_key_id: Arc<String>, tag_value_id: Arc<String>) -> Result<bool, ExecutionError> {
    match_value(TagFunction::MatchTagId, &resource, &tag_key_id, &tag_value_id)
}

fn has_tag_key(This(resource): This<Value>, key: Arc<String>) -> Result<bool, ExecutionError> {
    has_key(TagFunction::HasTagKey, &resource, &key)
}

fn has_tag_key_id(This(resource): This<Value>, tag_key_id: Arc<String>) -> Result<bool, ExecutionError> {
    has_key(TagFunction::HasTagKeyId, &resource, &tag_key_id)
}

/// Checks for the tag; absence is a plain `false`
fn has_key(function: TagFunction, resource: &Value, key: &str) -> Result<bool, ExecutionError> {
    let tags = Tags::from_resource(resource).map_err(|e| ExecutionError::function_error(function.name(), e))?;
    let found = tags.contains_key(key);
    log::trace!(target: LOG_TARGET, "{function}: tag '{key}' is {}", if found { "present" } else { "absent" });
    Ok(found)
}

/// Asserts the tag exists, then compares its value
fn match_value(function: TagFunction, resource: &Value, key: &str, expected: &str) -> Result<bool, ExecutionError> {
    let tags = Tags::from_resource(resource).map_err(|e| ExecutionError::function_error(function.name(), e))?;

    let lookup = tags.lookup(key);
    if let Some(matched) = lookup.matches(expected) {
        log::trace!(target: LOG_TARGET, "{function}: tag '{key}' is {lookup:?}, expected '{expected}'");
        return Ok(matched);
    }

    log::debug!(target: LOG_TARGET, "{function}: tag '{key}' is absent");
    Err(ExecutionError::function_error(
        function.name(),
        format!("no such attribute: resource has no tag '{key}'"),
    ))
}
