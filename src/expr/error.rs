/// Errors surfaced by policy compilation and evaluation
///
/// Missing tags and every other runtime fault share [`Error::Evaluation`]; the
/// message tells them apart. Expressions that must not fail on a missing tag
/// should guard it with `hasTagKey`/`hasTagKeyId`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The source is not valid CEL, or references a variable or function that is not declared
    #[error("could not compile expression: {message}")]
    Compilation { message: String },

    /// The expression failed at runtime or did not produce a boolean
    #[error("could not evaluate expression: {message}")]
    Evaluation { message: String },
}

impl Error {
    pub(crate) fn compilation(message: impl Into<String>) -> Self {
        Self::Compilation { message: message.into() }
    }

    pub(crate) fn evaluation(message: impl Into<String>) -> Self {
        Self::Evaluation { message: message.into() }
    }

    #[must_use]
    pub const fn is_compilation(&self) -> bool {
        matches!(self, Self::Compilation { .. })
    }

    #[must_use]
    pub const fn is_evaluation(&self) -> bool {
        matches!(self, Self::Evaluation { .. })
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Compilation { message } | Self::Evaluation { message } => message,
        }
    }
}
