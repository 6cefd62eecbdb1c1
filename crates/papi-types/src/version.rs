//! Policy version handling
//!
//! A policy version is an ordered triple of non-negative integers rendered
//! as `MAJOR.MINOR.PATCH`. Legacy guard policies carry a bare integer
//! version that canonicalizes to `N.0.0` for deployment lookups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Message surfaced when a legacy version string is not a bare integer
pub const INVALID_LEGACY_VERSION: &str = "legacy policy version is not an integer";

/// Version parsing errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VersionError {
    /// Not of the `MAJOR.MINOR.PATCH` form
    #[error("invalid policy version {0}, expected MAJOR.MINOR.PATCH")]
    Malformed(String),

    /// Legacy version string that is not a bare integer
    #[error("{INVALID_LEGACY_VERSION}")]
    LegacyNotInteger,
}

/// A three-part dotted numeric policy version
///
/// Ordering is lexicographic by component; field order matters for the
/// derived `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PolicyVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl PolicyVersion {
    /// Create a version from its components
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Canonicalize a legacy bare-integer version string to `(N, 0, 0)`
    pub fn from_legacy(text: &str) -> Result<Self, VersionError> {
        let major = text
            .parse::<u32>()
            .map_err(|_| VersionError::LegacyNotInteger)?;
        Ok(Self::new(major, 0, 0))
    }
}

impl fmt::Display for PolicyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for PolicyVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('.');
        let mut component = || {
            parts
                .next()
                .and_then(|p| p.parse::<u32>().ok())
                .ok_or_else(|| VersionError::Malformed(s.to_string()))
        };
        let version = Self::new(component()?, component()?, component()?);
        if parts.next().is_some() {
            return Err(VersionError::Malformed(s.to_string()));
        }
        Ok(version)
    }
}
