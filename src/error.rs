//! Error types for huella operations.
//!
//! Errors carry enough context to distinguish fatal training-time failures
//! from recoverable per-call rejections. A [`HuellaError::SchemaMismatch`]
//! means the encoder and the model disagree about the feature layout and the
//! pipeline must not be used. [`HuellaError::UnknownFeature`] and
//! [`HuellaError::InvalidRange`] reject a single request and leave the
//! pipeline fully usable.

use std::fmt;

/// Main error type for huella operations.
///
/// # Examples
///
/// ```
/// use huella::error::HuellaError;
///
/// let err = HuellaError::UnknownFeature {
///     feature: "paint_color".to_string(),
/// };
/// assert!(err.to_string().contains("paint_color"));
/// ```
#[derive(Debug)]
pub enum HuellaError {
    /// The encoded matrix width disagrees with the frozen feature schema.
    ///
    /// This can only happen through an encoder/trainer desync and is fatal:
    /// the pipeline refuses to initialize rather than serve predictions from
    /// misaligned columns.
    SchemaMismatch {
        /// Column count the schema declares.
        expected: usize,
        /// Column count actually produced.
        actual: usize,
    },

    /// An inference request named a feature that was not in the training set.
    UnknownFeature {
        /// The offending feature name.
        feature: String,
    },

    /// A ranking query asked for zero entries or more than the table holds.
    InvalidRange {
        /// Number of entries requested.
        requested: usize,
        /// Number of entries available.
        len: usize,
    },

    /// Matrix, vector, or frame dimensions do not match for the operation.
    DimensionMismatch {
        /// Expected dimensions (e.g., "120 rows").
        expected: String,
        /// Actual dimensions (e.g., "98 rows").
        actual: String,
    },

    /// I/O failure while reading a dataset.
    Io(std::io::Error),

    /// Malformed CSV input.
    Csv(csv::Error),

    /// Generic error with a string message.
    Other(String),
}

impl fmt::Display for HuellaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SchemaMismatch { expected, actual } => {
                write!(
                    f,
                    "Schema mismatch: schema declares {expected} encoded columns, got {actual}"
                )
            }
            Self::UnknownFeature { feature } => {
                write!(
                    f,
                    "Unknown feature '{feature}': not part of the training feature set"
                )
            }
            Self::InvalidRange { requested, len } => {
                write!(
                    f,
                    "Invalid range: requested {requested} entries from a ranking of {len}"
                )
            }
            Self::DimensionMismatch { expected, actual } => {
                write!(f, "Dimension mismatch: expected {expected}, got {actual}")
            }
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Csv(e) => write!(f, "CSV error: {e}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for HuellaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for HuellaError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for HuellaError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<&str> for HuellaError {
    fn from(msg: &str) -> Self {
        Self::Other(msg.to_string())
    }
}

impl From<String> for HuellaError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}

/// Allows comparing errors with string literals in tests.
impl PartialEq<&str> for HuellaError {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl PartialEq<HuellaError> for &str {
    fn eq(&self, other: &HuellaError) -> bool {
        *self == other.to_string()
    }
}

impl HuellaError {
    /// Creates a dimension mismatch error with context.
    pub fn dimension_mismatch(
        context: &str,
        expected: impl fmt::Display,
        actual: impl fmt::Display,
    ) -> Self {
        Self::DimensionMismatch {
            expected: format!("{context}: {expected}"),
            actual: actual.to_string(),
        }
    }

    /// Creates an unknown-feature error.
    pub fn unknown_feature(feature: impl Into<String>) -> Self {
        Self::UnknownFeature {
            feature: feature.into(),
        }
    }

    /// True when the error indicates a fatal schema desync.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }
}

/// Result type alias for huella operations.
pub type Result<T> = std::result::Result<T, HuellaError>;
