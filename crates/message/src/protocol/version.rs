//! HTTP protocol versions a [`Message`](crate::protocol::Message) may carry.

use std::fmt;
use std::str::FromStr;

use http::Version;
use serde::Serialize;

use crate::protocol::ValidationError;

/// A known HTTP protocol version.
///
/// Only the version number is represented ("1.0", "1.1"), never the `HTTP/`
/// prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum ProtocolVersion {
    #[serde(rename = "1.0")]
    Http10,
    #[default]
    #[serde(rename = "1.1")]
    Http11,
}

impl ProtocolVersion {
    /// Every version accepted by validation.
    pub const KNOWN: [ProtocolVersion; 2] = [ProtocolVersion::Http10, ProtocolVersion::Http11];

    /// The version number, e.g. `"1.1"`.
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProtocolVersion::Http10 => "1.0",
            ProtocolVersion::Http11 => "1.1",
        }
    }
}

impl FromStr for ProtocolVersion {
    type Err = ValidationError;

    fn from_str(str: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .find(|version| version.as_str() == str)
            .ok_or_else(|| ValidationError::unknown_version(str))
    }
}

impl TryFrom<&str> for ProtocolVersion {
    type Error = ValidationError;

    fn try_from(str: &str) -> Result<Self, Self::Error> {
        str.parse()
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ProtocolVersion> for Version {
    fn from(version: ProtocolVersion) -> Self {
        match version {
            ProtocolVersion::Http10 => Version::HTTP_10,
            ProtocolVersion::Http11 => Version::HTTP_11,
        }
    }
}

impl TryFrom<Version> for ProtocolVersion {
    type Error = ValidationError;

    fn try_from(version: Version) -> Result<Self, Self::Error> {
        match version {
            Version::HTTP_10 => Ok(ProtocolVersion::Http10),
            Version::HTTP_11 => Ok(ProtocolVersion::Http11),
            // http/0.9, http2 and http3 are not message versions we model
            v => Err(ValidationError::unknown_version(format!("{v:?}"))),
        }
    }
}
