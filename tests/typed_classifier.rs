//! Typed classifier tests against the simple table fixture
//!
//! `SimpleClassifier` is built the way a schema specific classifier is
//! expected to be: a base plus one typed view per attribute.

use std::collections::HashSet;

use phonenumber_classifier::{
    ClassifierBase, ClassifierError, Converter, DigitSequence, LengthResult, MatchResult, Matcher,
    MetadataLoader, NamedValue, PhoneNumber, PhoneNumberClassifier, RawClassifier, Result, SchemaVersion,
    SingleValuedClassifier, SingleValuedMatcher, StringValue, TableClassifier,
};

const SIMPLE_JSON: &str = include_str!("fixtures/simple.json");

fn simple_schema() -> SchemaVersion {
    SchemaVersion::of("goui.net/phonenumbers/examples/simple", 1)
}

// =============================================================================
// Schema Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LineType {
    FixedLine,
    Mobile,
    TollFree,
    Voip,
}

impl NamedValue for LineType {
    const VARIANTS: &'static [Self] = &[
        LineType::FixedLine,
        LineType::Mobile,
        LineType::TollFree,
        LineType::Voip,
    ];

    fn name(&self) -> &'static str {
        match self {
            LineType::FixedLine => "FixedLine",
            LineType::Mobile => "Mobile",
            LineType::TollFree => "TollFree",
            LineType::Voip => "Voip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Tariff {
    Standard,
    TollFree,
    Premium,
}

impl StringValue for Tariff {
    const VARIANTS: &'static [Self] = &[Tariff::Standard, Tariff::TollFree, Tariff::Premium];

    fn raw_value(&self) -> &'static str {
        match self {
            Tariff::Standard => "STANDARD_RATE",
            Tariff::TollFree => "TOLL_FREE",
            Tariff::Premium => "PREMIUM_RATE",
        }
    }
}

/// Missing the VOIP and TOLL_FREE values the metadata reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PartialLineType {
    FixedLine,
    Mobile,
}

impl NamedValue for PartialLineType {
    const VARIANTS: &'static [Self] = &[PartialLineType::FixedLine, PartialLineType::Mobile];

    fn name(&self) -> &'static str {
        match self {
            PartialLineType::FixedLine => "FixedLine",
            PartialLineType::Mobile => "Mobile",
        }
    }
}

struct SimpleClassifier {
    base: ClassifierBase,
    line_type: Box<dyn SingleValuedMatcher<LineType>>,
    tariff: Box<dyn SingleValuedClassifier<Tariff>>,
    region: Box<dyn Matcher<String>>,
}

impl SimpleClassifier {
    fn load(json: &str) -> Result<Self> {
        let base = ClassifierBase::load::<TableClassifier>(json, simple_schema(), &[])?;
        Ok(Self {
            line_type: base
                .for_values("TYPE", Converter::<LineType>::from_named_enum()?)
                .single_valued_matcher()?,
            tariff: base
                .for_values("TARIFF", Converter::<Tariff>::from_string_enum()?)
                .single_valued_classifier()?,
            region: base.for_strings("REGION").matcher()?,
            base,
        })
    }
}

impl PhoneNumberClassifier for SimpleClassifier {
    fn base(&self) -> &ClassifierBase {
        &self.base
    }
}

fn simple() -> SimpleClassifier {
    SimpleClassifier::load(SIMPLE_JSON).unwrap()
}

fn number(cc: &str, nn: &str) -> PhoneNumber {
    PhoneNumber::from_parts(cc, nn).unwrap()
}

fn strings(values: &[&str]) -> HashSet<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Every (calling code, national number) pair in the fixture
fn all_numbers(raw: &TableClassifier) -> Vec<PhoneNumber> {
    raw.metadata()
        .calling_codes
        .iter()
        .flat_map(|(cc, table)| {
            table
                .numbers
                .keys()
                .map(move |nn| PhoneNumber::new(cc.clone(), nn.clone()))
        })
        .collect()
}

// =============================================================================
// Number Level Tests
// =============================================================================

#[test]
fn test_validation() {
    let c = simple();
    assert_eq!(c.match_number(&number("44", "2087438000")), MatchResult::Matched);
    assert_eq!(c.match_number(&number("44", "2087438")), MatchResult::PartialMatch);
    assert_eq!(c.match_number(&number("44", "208743800000")), MatchResult::ExcessDigits);
    assert_eq!(c.match_number(&number("44", "0000")), MatchResult::Invalid);
}

#[test]
fn test_lengths() {
    let c = simple();
    assert_eq!(c.test_length(&number("41", "446681800")), LengthResult::Possible);
    assert_eq!(c.test_length(&number("41", "44668180")), LengthResult::TooShort);
    assert!(c.is_supported_calling_code(&DigitSequence::parse("41").unwrap()));
    assert!(!c.is_supported_calling_code(&DigitSequence::parse("1").unwrap()));
}

#[test]
fn test_example_number() {
    let c = simple();
    let example = c.example_number(&DigitSequence::parse("44").unwrap()).unwrap();
    assert_eq!(example, number("44", "7400123456"));
    assert_eq!(c.match_number(&example), MatchResult::Matched);
    assert_eq!(c.line_type.identify(&example), Some(LineType::Mobile));
}

// =============================================================================
// Typed View Tests
// =============================================================================

#[test]
fn test_classify_and_identify() {
    let c = simple();
    let mobile = number("44", "7400123456");

    assert_eq!(c.line_type.classify(&mobile), HashSet::from([LineType::Mobile]));
    assert_eq!(c.line_type.identify(&mobile), Some(LineType::Mobile));
    assert_eq!(
        c.tariff.identify(&number("44", "9098790000")),
        Some(Tariff::Premium)
    );
    assert_eq!(
        c.tariff.identify(&number("44", "8001111111")),
        Some(Tariff::TollFree)
    );
}

#[test]
fn test_unclassified_numbers() {
    let c = simple();
    for n in [
        number("44", "1234567890"),
        number("44", "74001"),
        number("44", "740012345678"),
        number("1", "2015550123"),
    ] {
        assert!(c.line_type.classify(&n).is_empty(), "{}", n);
        assert_eq!(c.line_type.identify(&n), None, "{}", n);
        assert!(c.region.classify(&n).is_empty(), "{}", n);
    }
}

#[test]
fn test_multi_valued_region() {
    let c = simple();
    assert_eq!(
        c.region.classify(&number("44", "7781123456")),
        strings(&["GB", "JE"])
    );
}

#[test]
fn test_region_matcher() {
    let c = simple();
    // A GB and a JE number sharing a prefix.
    assert_eq!(
        c.region.match_values(&number("44", "7700112345"), &["GB".to_string()]),
        MatchResult::Matched
    );
    assert_eq!(
        c.region.match_values(&number("44", "7700312345"), &["JE".to_string()]),
        MatchResult::Matched
    );
    let prefix = number("44", "7700");
    assert_eq!(
        c.region.match_values(&prefix, &["GB".to_string()]),
        MatchResult::PartialMatch
    );
    assert_eq!(
        c.region.match_values(&prefix, &["JE".to_string()]),
        MatchResult::PartialMatch
    );
    assert_eq!(c.region.possible_values(&prefix), strings(&["GB", "JE"]));
}

#[test]
fn test_possible_values_narrow_as_digits_are_entered() {
    let c = simple();
    assert_eq!(
        c.line_type.possible_values(&number("44", "")),
        HashSet::from([
            LineType::FixedLine,
            LineType::Mobile,
            LineType::TollFree,
            LineType::Voip
        ])
    );
    assert_eq!(
        c.line_type.possible_values(&number("44", "7")),
        HashSet::from([LineType::Mobile])
    );
    assert!(c.line_type.possible_values(&number("44", "1")).is_empty());
}

#[test]
fn test_match_values_merges_as_union() {
    let c = simple();
    let mobile = number("44", "7400123456");
    let prefix = number("44", "740");

    assert_eq!(
        c.line_type.match_values(&mobile, &[LineType::Mobile]),
        MatchResult::Matched
    );
    assert_eq!(
        c.line_type.match_values(&prefix, &[LineType::FixedLine]),
        MatchResult::Invalid
    );
    assert_eq!(
        c.line_type.match_values(&prefix, &[LineType::Mobile]),
        MatchResult::PartialMatch
    );
    assert_eq!(
        c.line_type.match_values(&prefix, &[LineType::FixedLine, LineType::Mobile]),
        MatchResult::PartialMatch
    );
    assert_eq!(c.line_type.match_values(&prefix, &[]), MatchResult::Invalid);
}

#[test]
fn test_combined_match_is_best_of_individual_matches() {
    let c = simple();
    let values = [
        LineType::FixedLine,
        LineType::Mobile,
        LineType::TollFree,
        LineType::Voip,
    ];
    for nn in ["", "2", "208", "2087438000", "20874380001", "77", "5612345678", "999"] {
        let n = number("44", nn);
        for a in values {
            for b in values {
                let combined = c.line_type.match_values(&n, &[a, b]);
                let best = c
                    .line_type
                    .match_values(&n, &[a])
                    .min(c.line_type.match_values(&n, &[b]));
                assert_eq!(combined, best, "{} {:?} {:?}", n, a, b);
            }
        }
    }
}

#[test]
fn test_views_agree_on_every_fixture_number() {
    let c = simple();
    let raw = TableClassifier::load(SIMPLE_JSON, &[simple_schema()]).unwrap();

    for n in all_numbers(&raw) {
        let classified = c.line_type.classify(&n);
        assert_eq!(classified.len(), 1, "{}", n);
        assert_eq!(
            c.line_type.identify(&n).map(|v| HashSet::from([v])),
            Some(classified.clone()),
            "{}",
            n
        );
        assert_eq!(c.line_type.possible_values(&n), classified, "{}", n);
        assert_eq!(c.region.possible_values(&n), c.region.classify(&n), "{}", n);
    }
}

// =============================================================================
// Construction Failures
// =============================================================================

#[test]
fn test_schema_mismatch() {
    let newer = SchemaVersion::of("goui.net/phonenumbers/examples/simple", 2);
    let err = ClassifierBase::load::<TableClassifier>(SIMPLE_JSON, newer, &[]).unwrap_err();
    assert!(matches!(err, ClassifierError::SchemaMismatch { .. }));
}

#[test]
fn test_incomplete_enum_fails_fast() {
    let base = ClassifierBase::load::<TableClassifier>(SIMPLE_JSON, simple_schema(), &[]).unwrap();
    let factory = base.for_values("TYPE", Converter::<PartialLineType>::from_named_enum().unwrap());

    match factory.classifier() {
        Err(ClassifierError::DomainCoverage { attribute, unmapped }) => {
            assert_eq!(attribute, "TYPE");
            assert_eq!(unmapped, vec!["TOLL_FREE".to_string(), "VOIP".to_string()]);
        }
        Err(other) => panic!("Expected DomainCoverage, got {:?}", other),
        Ok(_) => panic!("Expected DomainCoverage, got a classifier"),
    }
}

#[test]
fn test_capability_gates() {
    let base = ClassifierBase::load::<TableClassifier>(SIMPLE_JSON, simple_schema(), &[]).unwrap();

    let tariff = base.for_values("TARIFF", Converter::<Tariff>::from_string_enum().unwrap());
    let err = tariff.matcher().err().unwrap();
    assert!(err.is_capability_failure());
    assert!(matches!(err, ClassifierError::PartialMatchingUnsupported { .. }));

    let region = base.for_strings("REGION");
    let err = region.single_valued_classifier().err().unwrap();
    assert!(matches!(err, ClassifierError::NotSingleValued { attribute } if attribute == "REGION"));
    assert!(region.classifier().is_ok());
}

#[test]
fn test_converter_round_trips_engine_domain() {
    let raw = TableClassifier::load(SIMPLE_JSON, &[simple_schema()]).unwrap();
    let converter = Converter::<LineType>::from_named_enum().unwrap();
    let domain = raw.possible_values("TYPE");
    converter.ensure_values("TYPE", &domain).unwrap();

    for d in &domain {
        assert_eq!(&converter.to_raw(&converter.from_raw(d).unwrap()), d);
    }
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_shared_across_threads() {
    let c = simple();
    let numbers = [
        (number("44", "2087438000"), LineType::FixedLine),
        (number("44", "7400123456"), LineType::Mobile),
        (number("44", "8001111111"), LineType::TollFree),
        (number("41", "446681800"), LineType::FixedLine),
    ];

    std::thread::scope(|s| {
        for (n, expected) in &numbers {
            let c = &c;
            s.spawn(move || {
                for _ in 0..100 {
                    assert_eq!(c.line_type.identify(n), Some(*expected));
                }
            });
        }
    });
}
