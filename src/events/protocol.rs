use std::str::FromStr;

use crate::foundation::error::{StitchError, StitchResult};

/// Upstream protocol version as an ordered dotted triple.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ProtocolVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component; zero when omitted.
    pub patch: u32,
}

impl ProtocolVersion {
    /// Build a version from its components.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Captures only run for versions strictly between 1.13.1 and 1.20.5.
    pub fn is_supported(self) -> bool {
        self > Self::new(1, 13, 1) && self < Self::new(1, 20, 5)
    }
}

impl FromStr for ProtocolVersion {
    type Err = StitchError;

    fn from_str(s: &str) -> StitchResult<Self> {
        let mut parts = s.split('.');
        let mut component = |name: &str| -> StitchResult<u32> {
            match parts.next() {
                None => Ok(0),
                Some(raw) => raw.parse().map_err(|_| {
                    StitchError::payload(format!("invalid {name} component in version {s:?}"))
                }),
            }
        };
        let major = component("major")?;
        let minor = component("minor")?;
        let patch = component("patch")?;
        if parts.next().is_some() {
            return Err(StitchError::payload(format!(
                "too many components in version {s:?}"
            )));
        }
        Ok(Self::new(major, minor, patch))
    }
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version-dependent metadata indices for the attached item and its
/// rotation, resolved once per session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MetadataKeys {
    /// Index of the attached-item metadata entry.
    pub item: u32,
    /// Index of the rotation metadata entry.
    pub rotation: u32,
}

impl MetadataKeys {
    /// Resolve the metadata indices for a protocol version.
    pub fn for_version(version: ProtocolVersion) -> Self {
        if version <= ProtocolVersion::new(1, 13, 2) {
            Self {
                item: 6,
                rotation: 7,
            }
        } else if version <= ProtocolVersion::new(1, 16, 5) {
            Self {
                item: 7,
                rotation: 8,
            }
        } else {
            Self {
                item: 8,
                rotation: 9,
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/events/protocol.rs"]
mod tests;
