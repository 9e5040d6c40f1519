//! Error types for building typed trees
//!
//! Everything here is structural and fatal for one construction attempt:
//! no partially-built node is ever returned alongside these errors.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Missing required field: {path}")]
    MissingRequiredField { path: String },

    #[error("Invalid shape at {path}: expected {expected}, found {found}")]
    InvalidShape {
        path: String,
        expected: String,
        found: String,
    },

    #[error("Unknown type: {0}")]
    UnknownType(String),

    #[error("Not a resource type: {0}")]
    NotAResource(String),

    #[error("Resource type mismatch: expected {expected}, found {found}")]
    ResourceTypeMismatch { expected: String, found: String },

    #[error("Choice {path} has more than one variant set: {}", variants.join(", "))]
    ChoiceExclusivity { path: String, variants: Vec<String> },

    #[error("Unknown field: {path}")]
    UnknownField { path: String },

    #[error("Maximum nesting depth exceeded at {path}")]
    DepthExceeded { path: String },
}

impl Error {
    pub(crate) fn shape(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::InvalidShape {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
