//! Release version parsing and patch bumping
//!
//! Deploy versions are strict `major.minor.patch` triples. Pre-release and
//! build suffixes are rejected rather than carried along, because the deploy
//! pipeline compares and rewrites them byte-for-byte.

use std::fmt;

use crate::error::DevflowError;

/// A release version (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Parse a version string like "1.2.3"
    pub fn parse(s: &str) -> Result<Self, DevflowError> {
        let invalid = || DevflowError::InvalidVersionFormat {
            version: s.to_string(),
        };

        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(invalid());
        }

        let mut numbers = [0u64; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            *slot = part.parse::<u64>().map_err(|_| invalid())?;
        }

        Ok(Version {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers[2],
        })
    }

    /// Next patch release; never rolls over into minor.
    /// `None` when the patch number is already at its maximum.
    pub fn bump_patch(&self) -> Option<Self> {
        Some(Version {
            patch: self.patch.checked_add(1)?,
            ..*self
        })
    }
}

/// Increment the patch component of a version string
pub fn increment_patch(version: &str) -> Result<String, DevflowError> {
    Version::parse(version)?
        .bump_patch()
        .map(|v| v.to_string())
        .ok_or_else(|| DevflowError::InvalidVersionFormat {
            version: version.to_string(),
        })
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
