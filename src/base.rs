//! Classifier Base
//!
//! The composition root for schema specific classifiers. A classifier for a
//! known metadata schema wraps a [`ClassifierBase`] and, once at
//! construction, declares a typed view for each attribute it exposes:
//!
//! ```ignore
//! pub struct MyClassifier {
//!     base: ClassifierBase,
//!     line_type: Box<dyn SingleValuedMatcher<LineType>>,
//!     region: Box<dyn Matcher<String>>,
//! }
//!
//! impl MyClassifier {
//!     pub fn load(json: &str) -> Result<Self> {
//!         let base = ClassifierBase::load::<TableClassifier>(json, SchemaVersion::of("my/schema", 1), &[])?;
//!         Ok(Self {
//!             line_type: base.for_values("TYPE", Converter::from_named_enum()?).single_valued_matcher()?,
//!             region: base.for_strings("REGION").matcher()?,
//!             base,
//!         })
//!     }
//! }
//!
//! impl PhoneNumberClassifier for MyClassifier {
//!     fn base(&self) -> &ClassifierBase {
//!         &self.base
//!     }
//! }
//! ```
//!
//! Any schema or capability mismatch surfaces as an error from `load`, so a
//! successfully built classifier can be queried without further checks.

use std::sync::Arc;

use crate::classifier::{ClassifierFactory, ClassifierValue};
use crate::converter::Converter;
use crate::error::Result;
use crate::number::{DigitSequence, PhoneNumber};
use crate::raw::{LengthResult, MatchResult, MetadataLoader, RawClassifier};
use crate::version::SchemaVersion;

/// Shared state and factory methods for schema specific classifiers
#[derive(Clone)]
pub struct ClassifierBase {
    raw: Arc<dyn RawClassifier>,
}

impl ClassifierBase {
    pub fn new(raw: impl RawClassifier + 'static) -> Self {
        Self { raw: Arc::new(raw) }
    }

    pub fn from_shared(raw: Arc<dyn RawClassifier>) -> Self {
        Self { raw }
    }

    /// Load serialized metadata with engine `R`, accepting `schema` or any of `rest`.
    pub fn load<R: MetadataLoader + 'static>(
        serialized: &str,
        schema: SchemaVersion,
        rest: &[SchemaVersion],
    ) -> Result<Self> {
        let mut accepted = Vec::with_capacity(rest.len() + 1);
        accepted.push(schema);
        accepted.extend_from_slice(rest);
        Ok(Self::new(R::load(serialized, &accepted)?))
    }

    /// The underlying engine, for classifiers implementing custom logic on
    /// top of the raw data. Not intended to be exposed to end users.
    pub fn raw(&self) -> &Arc<dyn RawClassifier> {
        &self.raw
    }

    pub fn schema_version(&self) -> &SchemaVersion {
        self.raw.schema_version()
    }

    pub fn supported_calling_codes(&self) -> Vec<DigitSequence> {
        self.raw.supported_calling_codes()
    }

    pub fn is_supported_calling_code(&self, calling_code: &DigitSequence) -> bool {
        self.raw.is_supported_calling_code(calling_code)
    }

    /// Test a number against the possible lengths for its calling code.
    ///
    /// Anything other than `Possible` means the number cannot be valid for
    /// any type, but `Possible` does not mean it is valid.
    pub fn test_length(&self, number: &PhoneNumber) -> LengthResult {
        self.raw
            .test_length(number.calling_code(), number.national_number())
    }

    /// Match a number against the valid ranges for its calling code.
    ///
    /// More precise (and slower) than [`test_length`](Self::test_length). A
    /// `PartialMatch` means more digits could make the number valid, while
    /// `Invalid` means no additional digits can.
    pub fn match_number(&self, number: &PhoneNumber) -> MatchResult {
        self.raw
            .match_number(number.calling_code(), number.national_number())
    }

    pub fn example_number(&self, calling_code: &DigitSequence) -> Option<PhoneNumber> {
        self.raw
            .example_number(calling_code)
            .map(|nn| PhoneNumber::new(calling_code.clone(), nn))
    }

    /// A factory for typed views of `attribute` using `converter`.
    pub fn for_values<V: ClassifierValue>(
        &self,
        attribute: &str,
        converter: Converter<V>,
    ) -> ClassifierFactory<V> {
        ClassifierFactory::new(Arc::clone(&self.raw), attribute, converter)
    }

    /// A factory for string keyed views of `attribute`.
    ///
    /// Values are the raw metadata strings (e.g. `"FIXED_LINE"`), so prefer
    /// [`for_values`](Self::for_values) with a typed converter where possible.
    pub fn for_strings(&self, attribute: &str) -> ClassifierFactory<String> {
        self.for_values(attribute, Converter::identity())
    }
}

impl std::fmt::Debug for ClassifierBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierBase")
            .field("schema", self.raw.schema_version())
            .finish()
    }
}

/// Common number level operations for schema specific classifiers.
///
/// Implementors only provide [`base`](Self::base).
pub trait PhoneNumberClassifier {
    fn base(&self) -> &ClassifierBase;

    fn is_supported_calling_code(&self, calling_code: &DigitSequence) -> bool {
        self.base().is_supported_calling_code(calling_code)
    }

    fn test_length(&self, number: &PhoneNumber) -> LengthResult {
        self.base().test_length(number)
    }

    fn match_number(&self, number: &PhoneNumber) -> MatchResult {
        self.base().match_number(number)
    }

    fn example_number(&self, calling_code: &DigitSequence) -> Option<PhoneNumber> {
        self.base().example_number(calling_code)
    }
}
