//! Phone Number Classifier
//!
//! Type-safe classification over string keyed phone number metadata.
//!
//! A metadata engine ([`RawClassifier`]) knows, per calling code, which
//! values of each attribute (e.g. `"TYPE"`, `"TARIFF"`, `"REGION"`) a number
//! has. This crate turns that untyped data into typed, capability narrowed
//! views:
//!
//! ```text
//! ClassifierBase                  ← composition root, one per metadata schema
//!     │  for_values(attribute, Converter<V>)
//! ClassifierFactory<V>            ← deferred construction
//!     │  classifier() / matcher() / single_valued_*()
//! Box<dyn Classifier<V>>          ← validated view
//!     │
//! RawClassifier                   ← string keyed engine
//! ```
//!
//! ## Guarantees
//!
//! - **Domain coverage**: a view is only built if its converter can
//!   represent every value the engine reports for the attribute.
//! - **Capabilities**: matching and single valued views are only built if
//!   the metadata supports them, and the returned type only exposes the
//!   operations that are supported.
//! - **Infallible queries**: once built, views never fail. An unclassified
//!   number is an empty set or `None`.

pub mod base;
pub mod classifier;
pub mod config;
pub mod converter;
pub mod error;
pub mod number;
pub mod raw;
pub mod version;

pub use base::{ClassifierBase, PhoneNumberClassifier};
pub use classifier::{
    Classifier, ClassifierFactory, ClassifierValue, Matcher, SingleValuedClassifier,
    SingleValuedMatcher,
};
pub use config::ClassifierConfig;
pub use converter::{to_upper_snake_case, Converter, NamedValue, StringValue};
pub use error::{ClassifierError, Result};
pub use number::{DigitSequence, PhoneNumber};
pub use raw::{LengthResult, MatchResult, MetadataLoader, RawClassifier, TableClassifier, ValueMatcher};
pub use version::SchemaVersion;
