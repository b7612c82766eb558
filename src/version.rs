//! Component-wise numeric version comparison.
//!
//! Kiro releases are versioned with dotted numeric strings ("0.7.34").
//! Comparing these lexically orders "0.7.9" after "0.7.10", so
//! [`ReleaseVersion`] parses every dot-separated component as a number and
//! compares component by component. A missing trailing component counts as
//! zero, making "1.2" equal to "1.2.0".

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::InstallerError;

/// A dotted numeric version, ordered component-wise.
///
/// The original string is retained for display so "1.2" round-trips as
/// "1.2" rather than being normalized to "1.2.0".
#[derive(Debug, Clone)]
pub struct ReleaseVersion {
    components: Vec<u64>,
    raw: String,
}

impl ReleaseVersion {
    /// Numeric components of the version, in order.
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    /// The version string as originally parsed.
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for ReleaseVersion {
    type Err = InstallerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InstallerError::InvalidVersion {
                input: s.to_string(),
            });
        }

        let components = trimmed
            .split('.')
            .map(|part| part.parse::<u64>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| InstallerError::InvalidVersion {
                input: s.to_string(),
            })?;

        Ok(Self {
            components,
            raw: trimmed.to_string(),
        })
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Ord for ReleaseVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                unequal => return unequal,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for ReleaseVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ReleaseVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ReleaseVersion {}
