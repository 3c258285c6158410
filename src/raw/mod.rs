//! Raw Classifier Interface
//!
//! The contract every metadata engine fulfils. Engines are string keyed:
//! attributes (e.g. `"TYPE"`, `"REGION"`) and their values (e.g.
//! `"MOBILE"`, `"GB"`) are plain strings, and range matching is entirely the
//! engine's business. The typed layer in [`crate::classifier`] sits on top of
//! this trait and never looks inside an engine.
//!
//! Engines must be safe for concurrent reads, so the trait requires
//! `Send + Sync`.

pub mod table;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::{ClassifierError, Result};
use crate::number::DigitSequence;
use crate::version::SchemaVersion;

pub use table::TableClassifier;

// =============================================================================
// Match Results
// =============================================================================

/// Outcome of matching a digit sequence against number ranges
///
/// Variants are ordered best to worst, so the best of several results is
/// their minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchResult {
    /// The digits are a complete valid number
    Matched,
    /// The digits are a strict prefix of at least one valid number
    PartialMatch,
    /// The digits have a possible length but are not valid
    PossibleLength,
    /// A prefix of the digits is valid, but there are trailing digits
    ExcessDigits,
    /// No completion of the digits can be valid
    Invalid,
}

impl MatchResult {
    /// The best result of a set, or `Invalid` when empty
    pub fn best(results: impl IntoIterator<Item = MatchResult>) -> MatchResult {
        results.into_iter().min().unwrap_or(MatchResult::Invalid)
    }

    /// Whether the digits are, or could still become, a valid number
    pub fn is_possible(self) -> bool {
        self <= MatchResult::PartialMatch
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Matched => "MATCHED",
            Self::PartialMatch => "PARTIAL_MATCH",
            Self::PossibleLength => "POSSIBLE_LENGTH",
            Self::ExcessDigits => "EXCESS_DIGITS",
            Self::Invalid => "INVALID",
        };
        f.write_str(s)
    }
}

/// Length-only classification of a national number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LengthResult {
    /// Some valid number has this length
    Possible,
    /// Within the length bounds, but no valid number has exactly this length
    InvalidLength,
    TooShort,
    TooLong,
}

impl fmt::Display for LengthResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Possible => "POSSIBLE",
            Self::InvalidLength => "INVALID_LENGTH",
            Self::TooShort => "TOO_SHORT",
            Self::TooLong => "TOO_LONG",
        };
        f.write_str(s)
    }
}

// =============================================================================
// Engine Traits
// =============================================================================

/// Matches national numbers against the ranges of one or more attribute values
/// within a single calling code.
pub trait ValueMatcher {
    /// Match against the union of the ranges for every value in `raw_values`.
    ///
    /// The result is the best rank any single value achieves. An empty value
    /// list, or values unknown to the engine, contribute `Invalid`.
    fn match_values(&self, national_number: &DigitSequence, raw_values: &[&str]) -> MatchResult;
}

/// The string keyed metadata engine.
pub trait RawClassifier: Send + Sync {
    /// Schema version of the loaded metadata
    fn schema_version(&self) -> &SchemaVersion;

    /// All calling codes with metadata, in ascending order
    fn supported_calling_codes(&self) -> Vec<DigitSequence>;

    fn is_supported_calling_code(&self, calling_code: &DigitSequence) -> bool;

    /// Coarse, length-only test of a national number
    fn test_length(&self, calling_code: &DigitSequence, national_number: &DigitSequence)
        -> LengthResult;

    /// Match a national number against all valid ranges for its calling code
    fn match_number(&self, calling_code: &DigitSequence, national_number: &DigitSequence)
        -> MatchResult;

    /// Every value the engine can report for `attribute`. Unknown attributes
    /// have no values.
    fn possible_values(&self, attribute: &str) -> BTreeSet<String>;

    /// Whether no number can be classified with more than one value of `attribute`
    fn is_single_valued(&self, attribute: &str) -> bool;

    /// Whether partial matching data is present for `attribute`
    fn supports_value_matcher(&self, attribute: &str) -> bool;

    /// Values of `attribute` for a complete number; empty when invalid,
    /// partial or carrying excess digits.
    fn classify(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
        attribute: &str,
    ) -> BTreeSet<String>;

    /// The unique value of a single valued `attribute` for a complete number.
    fn classify_uniquely(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
        attribute: &str,
    ) -> Option<String>;

    /// A value matcher for `attribute` in one calling code. Unsupported
    /// calling codes yield a matcher for which everything is `Invalid`.
    fn value_matcher<'a>(
        &'a self,
        calling_code: &DigitSequence,
        attribute: &str,
    ) -> Box<dyn ValueMatcher + 'a>;

    /// An example valid national number for the calling code, if known
    fn example_number(&self, _calling_code: &DigitSequence) -> Option<DigitSequence> {
        None
    }
}

/// Engines that can be built from serialized metadata.
pub trait MetadataLoader: RawClassifier + Sized {
    /// Load metadata, failing unless its schema satisfies one of `accepted`.
    fn load(serialized: &str, accepted: &[SchemaVersion]) -> Result<Self>;
}

/// Check a loaded schema version against the accepted set
pub fn check_schema(actual: &SchemaVersion, accepted: &[SchemaVersion]) -> Result<()> {
    if accepted.iter().any(|a| actual.satisfies(a)) {
        Ok(())
    } else {
        Err(ClassifierError::SchemaMismatch {
            accepted: accepted.iter().map(|a| a.to_string()).collect(),
            actual: actual.to_string(),
        })
    }
}
