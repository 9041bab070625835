//! Untyped construction from `serde_json::Value`.
//!
//! Typed constructors make most malformed input unrepresentable. Input that
//! arrives untyped (configuration, fixtures, foreign callers) is checked here
//! against the same rules, with a dedicated [`ValidationError`] for each shape
//! violation:
//!
//! - a version that is not a string, or not a known version
//! - headers that are not an object
//! - a header value that is neither a string nor an array of strings
//! - a body that is not a string
//!
//! A message object has the keys `protocol_version` (default `"1.1"`),
//! `headers` (default none) and `body` (default an empty stream).

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::protocol::{Body, HeaderValues, Headers, Message, ProtocolVersion, ValidationError};

impl TryFrom<&Value> for ProtocolVersion {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(version) => version.parse(),
            _ => Err(ValidationError::NonStringVersion),
        }
    }
}

/// Reads the values of header `name`: a string, or an array of strings.
fn header_values(name: &str, value: &Value) -> Result<HeaderValues, ValidationError> {
    match value {
        Value::String(value) => Ok(HeaderValues::from(value.as_str())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_owned).ok_or_else(|| ValidationError::non_string_header_value(name)))
            .collect::<Result<Vec<_>, _>>()
            .map(HeaderValues::from),
        _ => Err(ValidationError::non_string_header_value(name)),
    }
}

impl TryFrom<&Value> for Headers {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Object(map) = value else {
            return Err(ValidationError::HeadersNotAMapping);
        };

        let mut headers = Headers::new();
        for (name, value) in map {
            headers.insert(name, header_values(name, value)?)?;
        }
        Ok(headers)
    }
}

fn body_from_value(value: &Value) -> Result<Body, ValidationError> {
    match value {
        Value::Null => Ok(Body::empty()),
        Value::String(content) => Ok(Body::from(content.as_str())),
        _ => Err(ValidationError::NotAStream),
    }
}

impl TryFrom<&Value> for Message {
    type Error = ValidationError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Object(fields) = value else {
            return Err(ValidationError::NotAnObject);
        };

        let protocol_version = match fields.get("protocol_version") {
            Some(version) => ProtocolVersion::try_from(version)?,
            None => ProtocolVersion::default(),
        };

        let headers = match fields.get("headers") {
            Some(Value::Null) | None => Headers::new(),
            Some(headers) => Headers::try_from(headers)?,
        };

        let body = fields.get("body").map_or_else(|| Ok(Body::empty()), body_from_value)?;

        Ok(Message::from_parts(protocol_version, headers, body))
    }
}

impl TryFrom<Value> for Message {
    type Error = ValidationError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Message::try_from(&value)
    }
}

/// Serializes to the object shape accepted by `TryFrom<&Value>`, rendering
/// the body the way `Display` does.
impl Serialize for Message {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Message", 3)?;
        state.serialize_field("protocol_version", &self.protocol_version())?;
        state.serialize_field("headers", self.headers())?;
        state.serialize_field("body", &self.body().to_string())?;
        state.end()
    }
}
