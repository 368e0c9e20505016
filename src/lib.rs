#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Evaluation of CEL policy expressions over cloud resources and their tags
//!
//! A policy is a boolean CEL expression evaluated against two variables,
//! `request` and `resource`. On top of the engine built-ins, resources expose
//! tag predicates callable in member style:
//!
//! - `resource.matchTag(key, value)` and `resource.matchTagId(tagKeyId, tagValueId)`
//!   compare a tag's value and fail the evaluation when the tag is absent
//! - `resource.hasTagKey(key)` and `resource.hasTagKeyId(tagKeyId)` check for a
//!   tag and simply return `false` when it is absent
//!
//! # Module Organization
//!
//! - [`expr`]: Compilation, the expression environment, and evaluation
//! - [`resource`]: The tag model and the typed request/resource values
//! - [`policy`]: Named policies loaded from configuration
//!
//! # Example
//!
//! ```
//! use celgcp::{Activation, Evaluator, Request, Resource};
//! use chrono::{TimeZone, Utc};
//!
//! let evaluator = Evaluator::new(
//!     "resource.matchTag('prj/dataset', 'value_1') && request.time < timestamp('2024-03-21T01:14:51Z')",
//! )?;
//!
//! let request = Request::new(Utc.with_ymd_and_hms(2021, 3, 21, 1, 14, 51).unwrap());
//! let resource = Resource::new("projects/my-project/datasets/foo").with_tag("prj/dataset", "value_1");
//!
//! assert!(evaluator.evaluate(&Activation::new(request, &resource))?);
//! # Ok::<(), celgcp::Error>(())
//! ```

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

pub mod expr;
pub mod policy;
pub mod resource;

pub use crate::expr::{Activation, Environment, Error, Evaluator, TagFunction};
pub use crate::policy::Policy;
pub use crate::resource::{Request, Resource, Tag, TagLookup, Tags};
