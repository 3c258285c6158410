//! Error types for classifier construction

use thiserror::Error;

/// Result type for classifier operations
pub type Result<T> = std::result::Result<T, ClassifierError>;

/// Classifier errors
///
/// Every variant describes a construction-time failure. Queries against a
/// built classifier never fail; an unclassified number is an empty set or
/// `None`.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("values for attribute {attribute} are not covered by the typed converter: {unmapped:?}")]
    DomainCoverage {
        attribute: String,
        unmapped: Vec<String>,
    },

    #[error("underlying classifier does not support partial matching for: {attribute}")]
    PartialMatchingUnsupported { attribute: String },

    #[error("underlying classifier is not single valued for: {attribute}")]
    NotSingleValued { attribute: String },

    #[error("metadata schema {actual} does not satisfy any accepted schema: {accepted:?}")]
    SchemaMismatch {
        accepted: Vec<String>,
        actual: String,
    },

    #[error("Unknown value: {0}")]
    UnknownValue(String),

    #[error("Duplicate value: {raw} is claimed by more than one typed value")]
    DuplicateValue { raw: String },

    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Invalid digit sequence: {0}")]
    InvalidDigits(String),

    #[error("Invalid schema version: {0}")]
    InvalidVersion(String),

    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ClassifierError {
    /// Whether this is one of the capability gate failures
    pub fn is_capability_failure(&self) -> bool {
        matches!(
            self,
            Self::PartialMatchingUnsupported { .. } | Self::NotSingleValued { .. }
        )
    }
}
