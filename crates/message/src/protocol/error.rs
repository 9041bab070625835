use thiserror::Error;

use crate::stream::StreamError;

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("validation error: {source}")]
    Validation {
        #[from]
        source: ValidationError,
    },

    #[error("stream error: {source}")]
    Stream {
        #[from]
        source: StreamError,
    },
}

/// Rejected construction or update input.
///
/// Raised synchronously by constructors and `with_*` operations; the same bad
/// input always yields the same error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{version} is not a known http version")]
    UnknownVersion { version: String },

    #[error("http version must be a string")]
    NonStringVersion,

    #[error("message must be an object")]
    NotAnObject,

    #[error("the headers provided were not a mapping")]
    HeadersNotAMapping,

    #[error("header names must not be empty")]
    EmptyHeaderName,

    #[error("invalid header name {name:?}: {reason}")]
    InvalidHeaderName { name: String, reason: String },

    #[error("invalid value for header {name:?}: {reason}")]
    InvalidHeaderValue { name: String, reason: String },

    #[error("values of header {name:?} must be a string or an array of strings")]
    NonStringHeaderValue { name: String },

    #[error("body provided is not a stream")]
    NotAStream,
}

impl ValidationError {
    pub fn unknown_version<S: ToString>(version: S) -> Self {
        Self::UnknownVersion { version: version.to_string() }
    }

    pub fn invalid_header_name<N: ToString, S: ToString>(name: N, reason: S) -> Self {
        Self::InvalidHeaderName { name: name.to_string(), reason: reason.to_string() }
    }

    pub fn invalid_header_value<N: ToString, S: ToString>(name: N, reason: S) -> Self {
        Self::InvalidHeaderValue { name: name.to_string(), reason: reason.to_string() }
    }

    pub fn non_string_header_value<N: ToString>(name: N) -> Self {
        Self::NonStringHeaderValue { name: name.to_string() }
    }
}
