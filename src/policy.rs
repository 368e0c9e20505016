//! Named policies loaded from configuration

use crate::Result;
use crate::expr::{Activation, Error, Evaluator};
use camino::Utf8Path;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;

const LOG_TARGET: &str = "    policy";

/// A named boolean expression deciding access to a resource
///
/// The expression is compiled when the policy is created, including when it is
/// deserialized, so a policy that exists always holds a valid expression.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(try_from = "PolicyDefinition", into = "PolicyDefinition")]
pub struct Policy {
    name: String,
    description: Option<String>,
    evaluator: Evaluator,
}

impl Policy {
    /// Create a new policy by compiling its expression
    ///
    /// # Errors
    /// Returns an error if the expression cannot be compiled
    pub fn new(name: String, description: Option<String>, expression: String) -> Result<Self> {
        let evaluator = Evaluator::new(expression).map_err(|e| app_err!("Could not compile policy '{name}': {e}"))?;

        Ok(Self {
            name,
            description,
            evaluator,
        })
    }

    /// Parse a policy from TOML text
    ///
    /// # Errors
    /// Returns an error if the text is not a valid policy
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).into_app_err("parsing policy")
    }

    /// Load a policy from a TOML file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold a valid policy
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = fs::read_to_string(path).into_app_err_with(|| format!("reading policy file '{path}'"))?;
        let policy: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing policy file '{path}'"))?;

        log::debug!(target: LOG_TARGET, "Loaded policy '{}' from '{path}'", policy.name);
        Ok(policy)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub fn expression(&self) -> &str {
        self.evaluator.source()
    }

    #[must_use]
    pub const fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Evaluate the policy against an activation
    ///
    /// # Errors
    /// Returns [`Error::Evaluation`] if the expression fails or does not produce a boolean
    pub fn evaluate(&self, activation: &Activation) -> Result<bool, Error> {
        self.evaluator.evaluate(activation)
    }
}

/// The configuration form of a policy, before its expression is compiled
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub expression: String,
}

impl TryFrom<PolicyDefinition> for Policy {
    type Error = ohno::AppError;

    fn try_from(definition: PolicyDefinition) -> Result<Self> {
        Self::new(definition.name, definition.description, definition.expression)
    }
}

impl From<Policy> for PolicyDefinition {
    fn from(policy: Policy) -> Self {
        Self {
            expression: policy.evaluator.source().to_string(),
            name: policy.name,
            description: policy.description,
        }
    }
}
