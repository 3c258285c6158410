//! Phone number value types
//!
//! These are deliberately minimal: a phone number is held as its calling
//! code and national number, both plain digit sequences. Parsing user
//! text and formatting are handled elsewhere.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ClassifierError, Result};

/// Longest digit sequence accepted (the E.164 limit plus headroom for excess digits)
pub const MAX_DIGITS: usize = 19;

/// A sequence of ASCII decimal digits, possibly empty
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DigitSequence(String);

impl DigitSequence {
    /// Parse a digit sequence, rejecting anything but `0-9`
    pub fn parse(digits: &str) -> Result<Self> {
        if digits.len() > MAX_DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ClassifierError::InvalidDigits(digits.to_string()));
        }
        Ok(Self(digits.to_string()))
    }

    /// The empty sequence
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this sequence starts with `prefix`
    pub fn starts_with(&self, prefix: &DigitSequence) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl fmt::Display for DigitSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DigitSequence {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DigitSequence {
    type Error = ClassifierError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<DigitSequence> for String {
    fn from(d: DigitSequence) -> Self {
        d.0
    }
}

/// Whether the digits form a plausible country calling code (1 to 3 digits)
pub fn is_calling_code(digits: &DigitSequence) -> bool {
    (1..=3).contains(&digits.len())
}

/// An E.164 phone number split into calling code and national number
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "NumberParts", into = "NumberParts")]
pub struct PhoneNumber {
    calling_code: DigitSequence,
    national_number: DigitSequence,
}

impl PhoneNumber {
    pub fn new(calling_code: DigitSequence, national_number: DigitSequence) -> Self {
        Self {
            calling_code,
            national_number,
        }
    }

    /// Build from the two digit strings, e.g. `("44", "2087438000")`
    pub fn from_parts(calling_code: &str, national_number: &str) -> Result<Self> {
        NumberParts {
            calling_code: DigitSequence::parse(calling_code)?,
            national_number: DigitSequence::parse(national_number)?,
        }
        .try_into()
    }

    pub fn calling_code(&self) -> &DigitSequence {
        &self.calling_code
    }

    pub fn national_number(&self) -> &DigitSequence {
        &self.national_number
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}{}", self.calling_code, self.national_number)
    }
}

/// Unchecked serialized form of [`PhoneNumber`]
#[derive(Serialize, Deserialize)]
struct NumberParts {
    calling_code: DigitSequence,
    national_number: DigitSequence,
}

impl TryFrom<NumberParts> for PhoneNumber {
    type Error = ClassifierError;

    fn try_from(parts: NumberParts) -> Result<Self> {
        if !is_calling_code(&parts.calling_code) {
            return Err(ClassifierError::InvalidDigits(format!(
                "calling code must have 1 to 3 digits: {}",
                parts.calling_code
            )));
        }
        Ok(Self::new(parts.calling_code, parts.national_number))
    }
}

impl From<PhoneNumber> for NumberParts {
    fn from(n: PhoneNumber) -> Self {
        Self {
            calling_code: n.calling_code,
            national_number: n.national_number,
        }
    }
}
