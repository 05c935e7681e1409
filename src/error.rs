//! Error types for document access, merging and filtering.
//!
//! Missing data is never an error: lookups return `Option::None` for absent
//! paths. Errors are reserved for structural misuse (writing through the
//! wrong container kind, merging a sequence into a map), malformed filter
//! conditions, and failures at the I/O boundary.

use thiserror::Error;

/// Errors raised by the accessor, merger and filter.
#[derive(Error, Debug)]
pub enum Error {
    /// A container of one kind was found where another kind was required.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A filter condition could not be evaluated (bad date, bad range, unknown operator).
    #[error("malformed condition: {0}")]
    MalformedCondition(String),

    /// A path or where-clause key could not be used as given.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub(crate) fn type_mismatch(expected: &'static str, found: &'static str) -> Self {
        Error::TypeMismatch { expected, found }
    }

    /// Returns true for errors caused by a bad filter condition.
    pub fn is_malformed_condition(&self) -> bool {
        matches!(self, Error::MalformedCondition(_))
    }
}

/// Result alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
