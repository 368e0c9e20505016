//! Policy expression evaluation using CEL
//!
//! This module compiles policy expressions and evaluates them against a
//! `request` and a `resource`. The CEL engine provides the language itself:
//! boolean logic, comparisons, string methods such as `startsWith`, and
//! `timestamp(...)` literals. This module adds the tag predicates and maps
//! engine failures onto a two-kind [`Error`].
//!
//! # Implementation Model
//!
//! An [`Environment`] holds the engine's root context with the tag predicates
//! registered, and knows which variables and functions expressions may reference.
//! It is built once and shared by [`Evaluator`]s.
//!
//! [`Evaluator::new`] compiles the source and rejects references outside the
//! environment, so broken expressions fail before any evaluation.
//! [`Evaluator::evaluate`] binds the [`Activation`] in a child scope of the
//! environment and runs the program. Nothing is written to the evaluator, which
//! can be reused for any number of activations.
//!
//! The tag predicates come in two flavors:
//!
//! - `matchTag`/`matchTagId` assert the tag exists and fail the evaluation otherwise
//! - `hasTagKey`/`hasTagKeyId` answer whether the tag exists
//!
//! Since `&&` short-circuits, `resource.hasTagKeyId(k) && resource.matchTagId(k, v)`
//! evaluates to `false` rather than failing when the tag is missing.

mod activation;
mod environment;
mod error;
mod evaluator;
mod tag_functions;
mod value;

pub use activation::Activation;
pub use environment::{Environment, REQUEST, RESOURCE};
pub use error::Error;
pub use evaluator::Evaluator;
pub use tag_functions::TagFunction;
pub use value::{json_to_value, map_value, string_value, timestamp_value};
