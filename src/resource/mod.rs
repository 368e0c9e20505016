//! Typed model of the values a policy is evaluated against
//!
//! A resource is a map carrying a `name` and an optional `Tags` field: an ordered
//! list of single-entry maps, each one tag key mapped to its value. Tags can be
//! addressed by their human key (`prj/dataset`) or by their ID form
//! (`tagKeys/123` and `tagValues/456`). Both forms share the same layout; the
//! predicate being called decides which form is expected.
//!
//! [`Tags`] reads that layout back out of an engine value, and [`TagLookup`]
//! reports whether a key was found without deciding whether absence is an error.

mod cloud_resource;
mod request;
mod tags;

pub use cloud_resource::Resource;
pub use request::Request;
pub use tags::{TAGS_FIELD, Tag, TagLookup, Tags, TagsError};
