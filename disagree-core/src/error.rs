//! Error types for disagree-core.

use thiserror::Error;

/// Result type for disagree-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for disagree-core operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Input is not a rectangular table of scalar label values.
    #[error("Invalid input kind: {0}")]
    InvalidInputKind(String),

    /// A requested annotator is not a column of the table.
    #[error("Unknown annotator '{name}'. Possible options: {available:?}")]
    UnknownAnnotator {
        /// The name that was requested.
        name: String,
        /// Annotators present in the table, in column order.
        available: Vec<String>,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON syntax error while reading a table.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an invalid input kind error.
    #[must_use]
    pub fn invalid_input_kind(msg: impl Into<String>) -> Self {
        Self::InvalidInputKind(msg.into())
    }

    /// Create an unknown annotator error.
    #[must_use]
    pub fn unknown_annotator(name: impl Into<String>, available: &[String]) -> Self {
        Self::UnknownAnnotator {
            name: name.into(),
            available: available.to_vec(),
        }
    }
}
