//! Value Converters
//!
//! A [`Converter`] maps between an engine's raw attribute values (e.g.
//! `"FIXED_LINE"`) and a typed value (e.g. `LineType::FixedLine`). Enum
//! converters are explicit registration tables built once from the enum's
//! variant list, with the reverse lookup derived from the same table.
//!
//! Two enum conventions are supported:
//!
//! - [`NamedValue`]: the raw value is the variant name in
//!   `UPPER_SNAKE_CASE` (`FixedLine` ⇄ `"FIXED_LINE"`).
//! - [`StringValue`]: the raw value is a string declared by the enum.
//!
//! The identity converter maps raw strings to themselves.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::Hash;

use crate::error::{ClassifierError, Result};

// =============================================================================
// Value Traits
// =============================================================================

/// An enum whose raw values are derived from its variant names
///
/// ```
/// use phonenumber_classifier::NamedValue;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum LineType { FixedLine, Mobile }
///
/// impl NamedValue for LineType {
///     const VARIANTS: &'static [Self] = &[LineType::FixedLine, LineType::Mobile];
///
///     fn name(&self) -> &'static str {
///         match self {
///             LineType::FixedLine => "FixedLine",
///             LineType::Mobile => "Mobile",
///         }
///     }
/// }
/// ```
pub trait NamedValue: Sized + Clone + Eq + Hash + 'static {
    /// Every variant, exactly once
    const VARIANTS: &'static [Self];

    /// The variant's identifier
    fn name(&self) -> &'static str;
}

/// An enum whose variants declare their raw values directly
pub trait StringValue: Sized + Clone + Eq + Hash + 'static {
    /// Every variant, exactly once
    const VARIANTS: &'static [Self];

    /// The raw value, which should already be `UPPER_SNAKE_CASE`
    fn raw_value(&self) -> &'static str;
}

// =============================================================================
// Converter
// =============================================================================

enum Lookup<V> {
    /// Registration table from raw value to typed value
    Table(HashMap<String, V>),
    /// Every raw string is representable
    Total(fn(&str) -> V),
}

/// Bidirectional mapping between raw attribute values and typed values
pub struct Converter<V> {
    kind: &'static str,
    render: fn(&V) -> String,
    lookup: Lookup<V>,
}

impl<V: Clone + Eq + Hash> Converter<V> {
    fn from_table(kind: &'static str, render: fn(&V) -> String, variants: &[V]) -> Result<Self> {
        let mut table = HashMap::with_capacity(variants.len());
        for value in variants {
            let raw = render(value);
            if table.insert(raw.clone(), value.clone()).is_some() {
                return Err(ClassifierError::DuplicateValue { raw });
            }
        }
        Ok(Self {
            kind,
            render,
            lookup: Lookup::Table(table),
        })
    }

    /// Converter for an enum named after its raw values (after case conversion).
    ///
    /// Fails if two variants convert to the same raw value.
    pub fn from_named_enum() -> Result<Self>
    where
        V: NamedValue,
    {
        Self::from_table("named enum", render_named::<V>, V::VARIANTS)
    }

    /// Converter for an enum which declares its raw values.
    ///
    /// Fails if two variants declare the same raw value.
    pub fn from_string_enum() -> Result<Self>
    where
        V: StringValue,
    {
        Self::from_table("string enum", render_string::<V>, V::VARIANTS)
    }

    /// Convert a raw value to its typed value
    pub fn from_raw(&self, raw: &str) -> Result<V> {
        match &self.lookup {
            Lookup::Table(table) => table
                .get(raw)
                .cloned()
                .ok_or_else(|| ClassifierError::UnknownValue(raw.to_string())),
            Lookup::Total(parse) => Ok(parse(raw)),
        }
    }

    /// Convert a typed value to its raw value
    pub fn to_raw(&self, value: &V) -> String {
        (self.render)(value)
    }

    /// Whether `raw` has a typed counterpart
    pub fn accepts(&self, raw: &str) -> bool {
        match &self.lookup {
            Lookup::Table(table) => table.contains_key(raw),
            Lookup::Total(_) => true,
        }
    }

    /// Ensure every raw value in `domain` has a typed counterpart.
    ///
    /// On failure the error lists every unrepresentable value; the caller
    /// supplies the attribute name for diagnostics.
    pub fn ensure_values<'a>(
        &self,
        attribute: &str,
        domain: impl IntoIterator<Item = &'a String>,
    ) -> Result<()> {
        let unmapped: BTreeSet<&String> = domain.into_iter().filter(|raw| !self.accepts(raw)).collect();
        if unmapped.is_empty() {
            Ok(())
        } else {
            Err(ClassifierError::DomainCoverage {
                attribute: attribute.to_string(),
                unmapped: unmapped.into_iter().cloned().collect(),
            })
        }
    }
}

impl Converter<String> {
    /// The identity converter, for string keyed classifiers
    pub fn identity() -> Self {
        Self {
            kind: "identity",
            render: String::clone,
            lookup: Lookup::Total(str::to_string),
        }
    }
}

impl<V: Clone> Clone for Converter<V> {
    fn clone(&self) -> Self {
        let lookup = match &self.lookup {
            Lookup::Table(table) => Lookup::Table(table.clone()),
            Lookup::Total(parse) => Lookup::Total(*parse),
        };
        Self {
            kind: self.kind,
            render: self.render,
            lookup,
        }
    }
}

impl<V> fmt::Debug for Converter<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("Converter");
        s.field("kind", &self.kind);
        if let Lookup::Table(table) = &self.lookup {
            let mut raw: Vec<&String> = table.keys().collect();
            raw.sort();
            s.field("values", &raw);
        }
        s.finish()
    }
}

fn render_named<V: NamedValue>(value: &V) -> String {
    to_upper_snake_case(value.name())
}

fn render_string<V: StringValue>(value: &V) -> String {
    value.raw_value().to_string()
}

// =============================================================================
// Case Conversion
// =============================================================================

/// Convert an identifier to `UPPER_SNAKE_CASE`
///
/// Word boundaries are a lower-case letter or digit followed by an
/// upper-case letter (`FixedLine` → `FIXED_LINE`), the last capital of an
/// acronym run (`VoIPService` → `VO_IP_SERVICE`), and any existing `_`, `-`
/// or space. Already upper-snake input is returned unchanged.
pub fn to_upper_snake_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            continue;
        }
        if c.is_ascii_uppercase() && i > 0 && !result.ends_with('_') {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                result.push('_');
            }
        }
        result.push(c.to_ascii_uppercase());
    }

    result
}
