//! Concept keys and policy identifiers
//!
//! A concept key is a `name:version` tuple. Comparisons are case-sensitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Key parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid concept key {0}, expected name:version")]
    Malformed(String),
}

/// A `name:version` identifier tuple
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConceptKey {
    pub name: String,
    pub version: String,
}

impl ConceptKey {
    /// Create a key from name and version
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }
}

impl fmt::Display for ConceptKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.version)
    }
}

impl FromStr for ConceptKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Names may themselves contain dots but never colons; the last colon
        // separates name from version.
        match s.rsplit_once(':') {
            Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                Ok(Self::new(name, version))
            }
            _ => Err(KeyError::Malformed(s.to_string())),
        }
    }
}

/// A policy identifier used in PDP group filters
///
/// A `None` version matches any stored version of the named policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToscaPolicyIdentifier {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ToscaPolicyIdentifier {
    /// Identifier matching one exact version
    pub fn exact(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Identifier matching any version of the named policy
    pub fn any_version(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Whether a stored key satisfies this identifier
    pub fn matches(&self, key: &ConceptKey) -> bool {
        self.name == key.name
            && self
                .version
                .as_ref()
                .map_or(true, |version| version == &key.version)
    }
}
