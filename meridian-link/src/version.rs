//! Protocol version.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::error::LinkError;

/// Protocol version carried on the wire as a single `f32`, e.g. `0.6`.
///
/// The integer part of the float is the major version, the first decimal digit is the minor version. Peers with
/// different major versions cannot talk to each other. A different minor version is accepted with a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LinkVersion {
    major: u16,
    minor: u16,
}

impl LinkVersion {
    /// Version written by this implementation.
    pub const CURRENT: LinkVersion = LinkVersion::new(0, 6);

    /// Creates a version. Minor versions above 9 cannot be represented on the wire.
    pub const fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Major version.
    pub fn major(&self) -> u16 {
        self.major
    }

    /// Minor version.
    pub fn minor(&self) -> u16 {
        self.minor
    }

    /// Decodes the wire float.
    pub fn from_f32(value: f32) -> Result<Self, LinkError> {
        if !value.is_finite() || value < 0.0 || value >= u16::MAX as f32 {
            return Err(LinkError::malformed(format!("invalid version number {value}")));
        }

        let major = value.trunc();
        let minor = ((value - major) * 10.0).round();
        let (major, minor) = if minor >= 10.0 {
            (major as u16 + 1, 0)
        } else {
            (major as u16, minor as u16)
        };

        Ok(Self { major, minor })
    }

    /// Encodes the version as the wire float.
    pub fn to_f32(&self) -> f32 {
        self.major as f32 + self.minor as f32 / 10.0
    }

    /// Checks that a version received from a peer can be decoded by an implementation expecting `self`.
    pub fn check_compatible(&self, received: LinkVersion) -> Result<(), LinkError> {
        if self.major != received.major {
            return Err(LinkError::IncompatibleVersion {
                expected: *self,
                actual: received,
            });
        }

        if self.minor != received.minor {
            log::warn!("Link protocol version mismatch: expected {self}, received {received}");
        }

        Ok(())
    }
}

impl Default for LinkVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl Display for LinkVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
