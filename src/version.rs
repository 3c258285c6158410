//! Metadata schema versioning

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClassifierError;

/// A metadata schema version
///
/// Metadata is built against a namespaced schema (e.g.
/// `"goui.net/phonenumbers/simple"`) with an integer version that only ever
/// grows as the schema gains attributes. The textual form is
/// `namespace@version`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Schema namespace, unique per metadata layout
    pub namespace: String,
    /// Monotonic version within the namespace
    pub version: u32,
}

impl SchemaVersion {
    /// Create a new schema version
    pub fn of(namespace: impl Into<String>, version: u32) -> Self {
        Self {
            namespace: namespace.into(),
            version,
        }
    }

    /// Parse from `namespace@version`
    pub fn parse(s: &str) -> Result<Self, ClassifierError> {
        let (namespace, version) = s
            .rsplit_once('@')
            .ok_or_else(|| ClassifierError::InvalidVersion(s.to_string()))?;
        if namespace.is_empty() {
            return Err(ClassifierError::InvalidVersion(s.to_string()));
        }
        let version = version
            .parse::<u32>()
            .map_err(|_| ClassifierError::InvalidVersion(s.to_string()))?;
        Ok(Self::of(namespace, version))
    }

    /// Check if metadata at this version can be used where `accepted` is required
    ///
    /// Later versions of a schema only add data, so any version at or above
    /// the accepted one in the same namespace satisfies it.
    pub fn satisfies(&self, accepted: &SchemaVersion) -> bool {
        self.namespace == accepted.namespace && self.version >= accepted.version
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.namespace, self.version)
    }
}

impl FromStr for SchemaVersion {
    type Err = ClassifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
