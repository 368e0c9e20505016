//! Compilation and evaluation of a single policy expression

use super::environment::{REQUEST, RESOURCE};
use super::{Activation, Environment, Error};
use cel_interpreter::{Program, Value};
use std::sync::Arc;

const LOG_TARGET: &str = " evaluator";

/// A compiled policy expression, ready to be evaluated against any number of activations
#[derive(Debug, Clone)]
pub struct Evaluator {
    environment: Arc<Environment>,
    program: Arc<Program>,
    source: String,
}

impl Evaluator {
    /// Compiles `source` against a fresh [`Environment`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compilation`] if the source cannot be parsed or references
    /// undeclared variables or functions
    pub fn new(source: impl Into<String>) -> Result<Self, Error> {
        Self::with_environment(Arc::new(Environment::new()), source)
    }

    /// Compiles `source` against a shared [`Environment`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::Compilation`] if the source cannot be parsed or references
    /// undeclared variables or functions
    pub fn with_environment(environment: Arc<Environment>, source: impl Into<String>) -> Result<Self, Error> {
        let source = source.into();
        let program = Program::compile(&source).map_err(|e| Error::compilation(e.to_string()))?;
        environment.check(&source, &program)?;

        log::debug!(target: LOG_TARGET, "Compiled expression '{}'", source.trim());

        Ok(Self {
            environment,
            program: Arc::new(program),
            source,
        })
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub const fn environment(&self) -> &Arc<Environment> {
        &self.environment
    }

    /// Evaluates the expression with `request` and `resource` bound from `activation`
    ///
    /// `false` is a regular outcome. Evaluation short-circuits `&&` and `||`, so a
    /// guard such as `resource.hasTagKey(k) && resource.matchTag(k, v)` never fails
    /// on a missing tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Evaluation`] if evaluation fails, including when a
    /// `matchTag`/`matchTagId` call finds no such tag, or when the expression does
    /// not produce a boolean
    pub fn evaluate(&self, activation: &Activation) -> Result<bool, Error> {
        let mut scope = self.environment.context().new_inner_scope();
        scope.add_variable_from_value(REQUEST, activation.request().clone());
        scope.add_variable_from_value(RESOURCE, activation.resource().clone());

        match self.program.execute(&scope) {
            Ok(Value::Bool(result)) => {
                log::debug!(target: LOG_TARGET, "Expression '{}' evaluated to {result}", self.source.trim());
                Ok(result)
            }
            Ok(other) => Err(Error::evaluation(format!(
                "expression did not return a boolean, got '{other:?}' instead"
            ))),
            Err(e) => {
                log::debug!(target: LOG_TARGET, "Expression '{}' failed: {e}", self.source.trim());
                Err(Error::evaluation(e.to_string()))
            }
        }
    }
}
