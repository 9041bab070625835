use http::HeaderMap;
use tracing::trace;
use triomphe::Arc;

use crate::protocol::{Body, HeaderValues, Headers, ProtocolVersion, ValidationError};

/// An immutable HTTP message: protocol version, headers and a body stream.
///
/// This is the part requests and responses have in common. A `Message` never
/// changes after construction; every `with_*` operation returns a new message
/// and leaves the receiver as it was. Derived messages share the receiver's
/// [`Body`] unless a new one is supplied, and share its header set when the
/// headers are not touched.
///
/// The body stream is the one mutable part: writing through
/// [`Body::lock`] is visible through every message holding that body.
///
/// # Header names
///
/// Lookups are case-insensitive. Names are stored lower-cased, so
/// [`Message::headers`] yields `accept` for a header set as `Accept`.
#[derive(Debug, Clone, Default)]
pub struct Message {
    protocol_version: ProtocolVersion,
    headers: Arc<Headers>,
    body: Body,
}

impl Message {
    /// Creates a message, validating `version` against [`ProtocolVersion::KNOWN`].
    ///
    /// A missing body defaults to a fresh empty stream.
    pub fn new(version: &str, headers: Headers, body: Option<Body>) -> Result<Self, ValidationError> {
        let protocol_version = version.parse()?;
        Ok(Self::from_parts(protocol_version, headers, body.unwrap_or_default()))
    }

    /// Creates a message from already validated parts.
    pub fn from_parts(protocol_version: ProtocolVersion, headers: Headers, body: Body) -> Self {
        Self { protocol_version, headers: Arc::new(headers), body }
    }

    /// Builds a derived message, overriding whichever parts changed.
    fn derive(&self, protocol_version: ProtocolVersion, headers: Arc<Headers>, body: Body) -> Self {
        trace!(version = %protocol_version, header_count = headers.len(), "derive message");
        Self { protocol_version, headers, body }
    }

    #[inline]
    pub fn protocol_version(&self) -> ProtocolVersion {
        self.protocol_version
    }

    /// Returns a message with the given protocol version, same headers and body.
    pub fn with_protocol_version(&self, version: &str) -> Result<Self, ValidationError> {
        let protocol_version = version.parse()?;
        Ok(self.derive(protocol_version, Arc::clone(&self.headers), self.body.clone()))
    }

    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Checks for a header by case-insensitive name.
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains(name)
    }

    /// The values of a header by case-insensitive name, empty if absent.
    pub fn header(&self, name: &str) -> &[String] {
        self.headers.get(name).map(HeaderValues::as_slice).unwrap_or_default()
    }

    /// The values of a header joined with a comma, empty if absent.
    ///
    /// Not every header can be represented by comma concatenation; use
    /// [`Message::header`] and pick a delimiter for those.
    pub fn header_line(&self, name: &str) -> String {
        self.headers.get(name).map(HeaderValues::line).unwrap_or_default()
    }

    /// Returns a message whose headers consist of `name: value` only.
    ///
    /// Every other header of the receiver is dropped. Use
    /// [`Message::with_added_header`] to set one header and keep the rest.
    pub fn with_header(&self, name: &str, value: impl Into<HeaderValues>) -> Result<Self, ValidationError> {
        let mut headers = Headers::new();
        headers.insert(name, value)?;
        Ok(self.derive(self.protocol_version, Arc::new(headers), self.body.clone()))
    }

    /// Returns a message with `name` set to `value`, keeping the other headers.
    ///
    /// A new header is added after the existing ones. An existing header has
    /// its values replaced wholesale, not extended; use
    /// [`Message::with_appended_header`] to extend them.
    pub fn with_added_header(&self, name: &str, value: impl Into<HeaderValues>) -> Result<Self, ValidationError> {
        let mut headers = Headers::clone(&self.headers);
        headers.insert(name, value)?;
        Ok(self.derive(self.protocol_version, Arc::new(headers), self.body.clone()))
    }

    /// Returns a message with `value` appended to the existing values of `name`.
    ///
    /// Adds the header if it is absent.
    pub fn with_appended_header(&self, name: &str, value: impl Into<HeaderValues>) -> Result<Self, ValidationError> {
        let mut headers = Headers::clone(&self.headers);
        headers.append(name, value)?;
        Ok(self.derive(self.protocol_version, Arc::new(headers), self.body.clone()))
    }

    /// Returns a message without the header `name`.
    ///
    /// When the header is absent the result is a copy of the receiver sharing
    /// its headers and body.
    pub fn without_header(&self, name: &str) -> Self {
        if !self.has_header(name) {
            return self.clone();
        }

        let mut headers = Headers::clone(&self.headers);
        headers.remove(name);
        self.derive(self.protocol_version, Arc::new(headers), self.body.clone())
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Returns a message with a new body, same version and headers.
    pub fn with_body(&self, body: impl Into<Body>) -> Self {
        self.derive(self.protocol_version, Arc::clone(&self.headers), body.into())
    }

    /// Expands the headers into an [`http::HeaderMap`] for `http` based layers.
    pub fn to_header_map(&self) -> Result<HeaderMap, ValidationError> {
        self.headers.to_header_map()
    }

    /// Returns true if both messages share the same header set allocation.
    pub(crate) fn shares_headers(&self, other: &Message) -> bool {
        Arc::ptr_eq(&self.headers, &other.headers)
    }
}

/// Messages are equal when version and headers match and both hold the same
/// body stream.
impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.protocol_version == other.protocol_version
            && (self.shares_headers(other) || self.headers == other.headers)
            && self.body.ptr_eq(&other.body)
    }
}

impl Eq for Message {}
