//! Typed Classifiers
//!
//! Type-safe views over one attribute of a [`RawClassifier`]. A view is
//! obtained from a [`ClassifierFactory`] and is narrowed to exactly the
//! capabilities the metadata supports:
//!
//! | View                         | classify | possible_values / match_values | identify |
//! |------------------------------|----------|--------------------------------|----------|
//! | [`Classifier`]               | yes      | no                             | no       |
//! | [`Matcher`]                  | yes      | yes                            | no       |
//! | [`SingleValuedClassifier`]   | yes      | no                             | yes      |
//! | [`SingleValuedMatcher`]      | yes      | yes                            | yes      |
//!
//! All four are implemented by one internal type which is never handed out
//! directly, since some of its methods are only meaningful after the
//! corresponding capability check has passed.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::converter::Converter;
use crate::error::{ClassifierError, Result};
use crate::number::PhoneNumber;
use crate::raw::{MatchResult, RawClassifier};

/// Bounds required of typed attribute values
pub trait ClassifierValue: Clone + Eq + Hash + Send + Sync + 'static {}

impl<T: Clone + Eq + Hash + Send + Sync + 'static> ClassifierValue for T {}

// =============================================================================
// Capability Views
// =============================================================================

/// Simple (non partial matching) classifier API supported by all classifiers.
pub trait Classifier<V>: Send + Sync {
    /// Classify a complete phone number into the set of values it has.
    ///
    /// For example, when classifying regions, `+447691123456` may belong to
    /// `{"GB", "GG", "JE"}`. Invalid numbers, partial numbers and numbers
    /// with extra digits are classified as nothing (an empty set).
    fn classify(&self, number: &PhoneNumber) -> HashSet<V>;
}

/// Classifier API with partial matching.
pub trait Matcher<V>: Classifier<V> {
    /// Values a phone number, or a prefix of one, could still be classified as.
    ///
    /// Intended for numbers which are being entered or checked for errors. For
    /// a complete valid number this is the same as [`Classifier::classify`].
    fn possible_values(&self, number: &PhoneNumber) -> HashSet<V>;

    /// Match a phone number, or prefix, against one or more values.
    ///
    /// Multiple values are matched against the union of their ranges, so the
    /// result is the best result of any single value. This suits business
    /// logic that treats several values the same way (e.g. `MOBILE` and
    /// `FIXED_LINE_OR_MOBILE`).
    fn match_values(&self, number: &PhoneNumber, values: &[V]) -> MatchResult;
}

/// Classifier API for attributes with at most one value per number.
pub trait SingleValuedClassifier<V>: Classifier<V> {
    /// Classify a complete phone number as its unique value, if any.
    ///
    /// Returns `None` in all the cases where [`Classifier::classify`] returns
    /// an empty set.
    fn identify(&self, number: &PhoneNumber) -> Option<V>;
}

/// Partial matching classifier API for single valued attributes.
pub trait SingleValuedMatcher<V>: Matcher<V> + SingleValuedClassifier<V> {}

// =============================================================================
// Typed Classifier
// =============================================================================

/// The single implementation behind every view.
struct TypedClassifier<V> {
    raw: Arc<dyn RawClassifier>,
    attribute: String,
    converter: Converter<V>,
}

impl<V: ClassifierValue> TypedClassifier<V> {
    /// Bind a converter to an attribute, failing if the converter cannot
    /// represent every value the engine reports for it.
    fn new(raw: Arc<dyn RawClassifier>, attribute: String, converter: Converter<V>) -> Result<Self> {
        let domain = raw.possible_values(&attribute);
        converter.ensure_values(&attribute, &domain)?;
        debug!(attribute = %attribute, values = domain.len(), "validated typed classifier");
        Ok(Self {
            raw,
            attribute,
            converter,
        })
    }

    fn ensure_matcher(self) -> Result<Self> {
        if !self.raw.supports_value_matcher(&self.attribute) {
            return Err(ClassifierError::PartialMatchingUnsupported {
                attribute: self.attribute,
            });
        }
        Ok(self)
    }

    fn ensure_single_valued(self) -> Result<Self> {
        if !self.raw.is_single_valued(&self.attribute) {
            return Err(ClassifierError::NotSingleValued {
                attribute: self.attribute,
            });
        }
        Ok(self)
    }

    fn convert(&self, raw: &str) -> Option<V> {
        match self.converter.from_raw(raw) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(
                    attribute = %self.attribute,
                    value = raw,
                    "engine reported a value outside its declared domain"
                );
                None
            }
        }
    }
}

impl<V: ClassifierValue> Classifier<V> for TypedClassifier<V> {
    fn classify(&self, number: &PhoneNumber) -> HashSet<V> {
        self.raw
            .classify(number.calling_code(), number.national_number(), &self.attribute)
            .iter()
            .filter_map(|raw| self.convert(raw))
            .collect()
    }
}

impl<V: ClassifierValue> Matcher<V> for TypedClassifier<V> {
    fn possible_values(&self, number: &PhoneNumber) -> HashSet<V> {
        let matcher = self.raw.value_matcher(number.calling_code(), &self.attribute);
        self.raw
            .possible_values(&self.attribute)
            .iter()
            .filter(|raw| {
                matcher
                    .match_values(number.national_number(), &[raw.as_str()])
                    .is_possible()
            })
            .filter_map(|raw| self.convert(raw))
            .collect()
    }

    fn match_values(&self, number: &PhoneNumber, values: &[V]) -> MatchResult {
        let raw_values: Vec<String> = values.iter().map(|v| self.converter.to_raw(v)).collect();
        let raw_refs: Vec<&str> = raw_values.iter().map(String::as_str).collect();
        self.raw
            .value_matcher(number.calling_code(), &self.attribute)
            .match_values(number.national_number(), &raw_refs)
    }
}

impl<V: ClassifierValue> SingleValuedClassifier<V> for TypedClassifier<V> {
    fn identify(&self, number: &PhoneNumber) -> Option<V> {
        self.raw
            .classify_uniquely(number.calling_code(), number.national_number(), &self.attribute)
            .and_then(|raw| self.convert(&raw))
    }
}

impl<V: ClassifierValue> SingleValuedMatcher<V> for TypedClassifier<V> {}

// =============================================================================
// Classifier Factory
// =============================================================================

type NewFn<V> = Box<dyn Fn() -> Result<TypedClassifier<V>> + Send + Sync>;

/// Builds capability views for one attribute.
///
/// Construction is deferred: nothing is validated until a view is requested,
/// and every request builds and validates a fresh classifier.
///
/// ```ignore
/// let type_matcher = base.for_values("TYPE", Converter::from_named_enum()?).single_valued_matcher()?;
/// ```
pub struct ClassifierFactory<V> {
    attribute: String,
    new_fn: NewFn<V>,
}

impl<V: ClassifierValue> ClassifierFactory<V> {
    pub fn new(raw: Arc<dyn RawClassifier>, attribute: impl Into<String>, converter: Converter<V>) -> Self {
        let attribute = attribute.into();
        let key = attribute.clone();
        Self {
            attribute,
            new_fn: Box::new(move || {
                TypedClassifier::new(Arc::clone(&raw), key.clone(), converter.clone())
            }),
        }
    }

    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// A simple (non partial matching) classifier. Use this when the
    /// metadata has partial matching disabled for the attribute.
    pub fn classifier(&self) -> Result<Box<dyn Classifier<V>>> {
        let classifier = (self.new_fn)()?;
        debug!(attribute = %self.attribute, "built classifier");
        Ok(Box::new(classifier))
    }

    /// A partial matching classifier.
    pub fn matcher(&self) -> Result<Box<dyn Matcher<V>>> {
        let matcher = (self.new_fn)()?.ensure_matcher()?;
        debug!(attribute = %self.attribute, "built matcher");
        Ok(Box::new(matcher))
    }

    /// A simple classifier for a single valued attribute, adding
    /// [`SingleValuedClassifier::identify`].
    pub fn single_valued_classifier(&self) -> Result<Box<dyn SingleValuedClassifier<V>>> {
        let classifier = (self.new_fn)()?.ensure_single_valued()?;
        debug!(attribute = %self.attribute, "built single valued classifier");
        Ok(Box::new(classifier))
    }

    /// A partial matching classifier for a single valued attribute.
    pub fn single_valued_matcher(&self) -> Result<Box<dyn SingleValuedMatcher<V>>> {
        let matcher = (self.new_fn)()?.ensure_single_valued()?.ensure_matcher()?;
        debug!(attribute = %self.attribute, "built single valued matcher");
        Ok(Box::new(matcher))
    }
}
