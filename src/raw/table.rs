//! Table Classifier
//!
//! An in-memory [`RawClassifier`] over an explicit table of complete, valid
//! national numbers. Every number lists its attribute values directly, so
//! "ranges" are just the numbers themselves. This is intended for small
//! fixed datasets, tests and tooling rather than full numbering plans.
//!
//! ## Format
//!
//! ```json
//! {
//!   "schema": { "namespace": "goui.net/phonenumbers/simple", "version": 1 },
//!   "attributes": {
//!     "TYPE": { "values": ["FIXED_LINE", "MOBILE"], "single_valued": true }
//!   },
//!   "calling_codes": {
//!     "44": {
//!       "example_number": "7400123456",
//!       "numbers": {
//!         "2087438000": { "TYPE": ["FIXED_LINE"] },
//!         "7400123456": { "TYPE": ["MOBILE"] }
//!       }
//!     }
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use super::{check_schema, LengthResult, MatchResult, MetadataLoader, RawClassifier, ValueMatcher};
use crate::error::{ClassifierError, Result};
use crate::number::{is_calling_code, DigitSequence};
use crate::version::SchemaVersion;

/// Attribute values assigned to one number
type NumberValues = BTreeMap<String, BTreeSet<String>>;

/// Top level table metadata document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetadata {
    pub schema: SchemaVersion,
    #[serde(default)]
    pub attributes: BTreeMap<String, AttributeInfo>,
    #[serde(default)]
    pub calling_codes: BTreeMap<DigitSequence, CallingCodeTable>,
}

/// Declaration of one attribute
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInfo {
    /// Every value the attribute can take
    pub values: BTreeSet<String>,
    #[serde(default)]
    pub single_valued: bool,
    /// Whether value matchers are available for this attribute
    #[serde(default = "default_true")]
    pub partial_matching: bool,
}

/// Numbers for one calling code
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallingCodeTable {
    #[serde(default)]
    pub example_number: Option<DigitSequence>,
    #[serde(default)]
    pub numbers: BTreeMap<DigitSequence, NumberValues>,
}

fn default_true() -> bool {
    true
}

/// Raw classifier backed by [`TableMetadata`]
#[derive(Debug, Clone)]
pub struct TableClassifier {
    metadata: TableMetadata,
}

impl TableClassifier {
    /// Validate metadata and build a classifier from it
    pub fn from_metadata(metadata: TableMetadata) -> Result<Self> {
        for (cc, table) in &metadata.calling_codes {
            if !is_calling_code(cc) {
                return Err(ClassifierError::InvalidMetadata(format!(
                    "calling code must have 1 to 3 digits: {}",
                    cc
                )));
            }
            if let Some(example) = &table.example_number {
                if !table.numbers.contains_key(example) {
                    return Err(ClassifierError::InvalidMetadata(format!(
                        "example number +{}{} is not a listed number",
                        cc, example
                    )));
                }
            }
            for (number, values) in &table.numbers {
                if number.is_empty() {
                    return Err(ClassifierError::InvalidMetadata(format!(
                        "empty national number for calling code {}",
                        cc
                    )));
                }
                for (attribute, assigned) in values {
                    let info = metadata
                        .attributes
                        .get(attribute)
                        .ok_or_else(|| ClassifierError::UnknownAttribute(attribute.clone()))?;
                    if let Some(undeclared) = assigned.iter().find(|v| !info.values.contains(*v)) {
                        return Err(ClassifierError::InvalidMetadata(format!(
                            "+{}{}: value {} is not declared for {}",
                            cc, number, undeclared, attribute
                        )));
                    }
                    if info.single_valued && assigned.len() > 1 {
                        return Err(ClassifierError::InvalidMetadata(format!(
                            "+{}{}: single valued attribute {} has values {:?}",
                            cc, number, attribute, assigned
                        )));
                    }
                }
            }
        }
        tracing::info!(
            schema = %metadata.schema,
            calling_codes = metadata.calling_codes.len(),
            attributes = metadata.attributes.len(),
            "loaded table metadata"
        );
        Ok(Self { metadata })
    }

    /// Load from a JSON file, checking the schema against `accepted`
    pub fn from_path(path: impl AsRef<Path>, accepted: &[SchemaVersion]) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::load(&content, accepted)
    }

    pub fn metadata(&self) -> &TableMetadata {
        &self.metadata
    }

    fn numbers(&self, calling_code: &DigitSequence) -> Option<&BTreeMap<DigitSequence, NumberValues>> {
        self.metadata.calling_codes.get(calling_code).map(|t| &t.numbers)
    }
}

impl MetadataLoader for TableClassifier {
    fn load(serialized: &str, accepted: &[SchemaVersion]) -> Result<Self> {
        let metadata: TableMetadata = serde_json::from_str(serialized)?;
        check_schema(&metadata.schema, accepted)?;
        Self::from_metadata(metadata)
    }
}

/// Rank a national number against one complete valid number
fn rank(national_number: &DigitSequence, valid: &DigitSequence) -> MatchResult {
    if national_number == valid {
        MatchResult::Matched
    } else if valid.starts_with(national_number) {
        MatchResult::PartialMatch
    } else if national_number.starts_with(valid) {
        MatchResult::ExcessDigits
    } else if national_number.len() == valid.len() {
        MatchResult::PossibleLength
    } else {
        MatchResult::Invalid
    }
}

impl RawClassifier for TableClassifier {
    fn schema_version(&self) -> &SchemaVersion {
        &self.metadata.schema
    }

    fn supported_calling_codes(&self) -> Vec<DigitSequence> {
        self.metadata.calling_codes.keys().cloned().collect()
    }

    fn is_supported_calling_code(&self, calling_code: &DigitSequence) -> bool {
        self.metadata.calling_codes.contains_key(calling_code)
    }

    fn test_length(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
    ) -> LengthResult {
        let lengths: BTreeSet<usize> = self
            .numbers(calling_code)
            .map(|n| n.keys().map(DigitSequence::len).collect())
            .unwrap_or_default();
        let len = national_number.len();
        match (lengths.first(), lengths.last()) {
            (Some(&min), _) if len < min => LengthResult::TooShort,
            (_, Some(&max)) if len > max => LengthResult::TooLong,
            _ if lengths.contains(&len) => LengthResult::Possible,
            _ => LengthResult::InvalidLength,
        }
    }

    fn match_number(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
    ) -> MatchResult {
        self.numbers(calling_code)
            .map(|n| MatchResult::best(n.keys().map(|valid| rank(national_number, valid))))
            .unwrap_or(MatchResult::Invalid)
    }

    fn possible_values(&self, attribute: &str) -> BTreeSet<String> {
        self.metadata
            .attributes
            .get(attribute)
            .map(|a| a.values.clone())
            .unwrap_or_default()
    }

    fn is_single_valued(&self, attribute: &str) -> bool {
        self.metadata
            .attributes
            .get(attribute)
            .is_some_and(|a| a.single_valued)
    }

    fn supports_value_matcher(&self, attribute: &str) -> bool {
        self.metadata
            .attributes
            .get(attribute)
            .is_some_and(|a| a.partial_matching)
    }

    fn classify(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
        attribute: &str,
    ) -> BTreeSet<String> {
        self.numbers(calling_code)
            .and_then(|n| n.get(national_number))
            .and_then(|values| values.get(attribute))
            .cloned()
            .unwrap_or_default()
    }

    fn classify_uniquely(
        &self,
        calling_code: &DigitSequence,
        national_number: &DigitSequence,
        attribute: &str,
    ) -> Option<String> {
        let values = self.classify(calling_code, national_number, attribute);
        if values.len() == 1 {
            values.into_iter().next()
        } else {
            None
        }
    }

    fn value_matcher<'a>(
        &'a self,
        calling_code: &DigitSequence,
        attribute: &str,
    ) -> Box<dyn ValueMatcher + 'a> {
        Box::new(TableValueMatcher {
            numbers: self.numbers(calling_code),
            attribute: attribute.to_string(),
        })
    }

    fn example_number(&self, calling_code: &DigitSequence) -> Option<DigitSequence> {
        let table = self.metadata.calling_codes.get(calling_code)?;
        table
            .example_number
            .clone()
            .or_else(|| table.numbers.keys().next().cloned())
    }
}

struct TableValueMatcher<'a> {
    numbers: Option<&'a BTreeMap<DigitSequence, NumberValues>>,
    attribute: String,
}

impl ValueMatcher for TableValueMatcher<'_> {
    fn match_values(&self, national_number: &DigitSequence, raw_values: &[&str]) -> MatchResult {
        let Some(numbers) = self.numbers else {
            return MatchResult::Invalid;
        };
        // The union of ranges is every number carrying at least one requested value.
        let ranks = numbers
            .iter()
            .filter(|(_, values)| {
                values
                    .get(&self.attribute)
                    .is_some_and(|assigned| raw_values.iter().any(|v| assigned.contains(*v)))
            })
            .map(|(valid, _)| rank(national_number, valid));
        MatchResult::best(ranks)
    }
}
