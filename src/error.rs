//! Error types for disagree.

use thiserror::Error;

/// Result type for disagree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for disagree operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Table construction, normalization, or annotator lookup failed.
    #[error(transparent)]
    Core(#[from] disagree_core::Error),

    /// Two annotators share no jointly-labelled instance.
    #[error("Annotators '{first}' and '{second}' have not labelled any of the same instances")]
    NoOverlap {
        /// First annotator
        first: String,
        /// Second annotator
        second: String,
    },

    /// Unrecognized Krippendorff distance kind.
    #[error("Invalid distance kind '{0}'. Possible options: nominal, ordinal, interval, ratio")]
    InvalidDistanceKind(String),

    /// Unrecognized correlation measure.
    #[error("Invalid measure '{0}'. Possible options: pearson, kendall, spearman")]
    InvalidMeasure(String),

    /// A pairwise metric that does not take exactly two annotators.
    #[error("Invalid pairwise metric '{0}': it must take two annotators. Possible options: joint_probability, cohens_kappa")]
    InvalidCallableSignature(String),

    /// The statistic has no defined value for this input.
    #[error("Undefined statistic: {0}")]
    UndefinedStatistic(String),
}

impl Error {
    /// Create a no-overlap error.
    pub fn no_overlap(first: impl Into<String>, second: impl Into<String>) -> Self {
        Error::NoOverlap {
            first: first.into(),
            second: second.into(),
        }
    }

    /// Create an invalid distance kind error.
    pub fn invalid_distance_kind(kind: impl Into<String>) -> Self {
        Error::InvalidDistanceKind(kind.into())
    }

    /// Create an invalid measure error.
    pub fn invalid_measure(measure: impl Into<String>) -> Self {
        Error::InvalidMeasure(measure.into())
    }

    /// Create an invalid callable signature error.
    pub fn invalid_callable_signature(name: impl Into<String>) -> Self {
        Error::InvalidCallableSignature(name.into())
    }

    /// Create an undefined statistic error.
    pub fn undefined_statistic(msg: impl Into<String>) -> Self {
        Error::UndefinedStatistic(msg.into())
    }
}
