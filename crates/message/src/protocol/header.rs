//! Case-insensitive header storage.
//!
//! [`Headers`] maps a lower-cased header name to its ordered [`HeaderValues`].
//! Names are normalized on the way in and on lookup, so `Accept`, `accept` and
//! `ACCEPT` all address the same entry. The casing a caller used is not kept:
//! iteration always yields the lower-cased name.
//!
//! Names must be valid RFC 7230 tokens and values valid field values (no CR,
//! LF or other control bytes); both checks go through the `http` crate's
//! [`HeaderName`] and [`HeaderValue`] parsers.

use std::borrow::Cow;
use std::slice;

use http::{HeaderMap, HeaderName, HeaderValue};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::warn;

use crate::ensure;
use crate::protocol::ValidationError;

/// Separator used by [`HeaderValues::line`].
pub const HEADER_LINE_SEPARATOR: &str = ",";

/// The ordered values of one header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HeaderValues(Vec<String>);

impl HeaderValues {
    #[inline]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Appends every value of `other` after the existing ones.
    pub fn extend(&mut self, other: HeaderValues) {
        self.0.extend(other.0);
    }

    /// All values joined with [`HEADER_LINE_SEPARATOR`].
    pub fn line(&self) -> String {
        self.0.join(HEADER_LINE_SEPARATOR)
    }
}

impl From<&str> for HeaderValues {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for HeaderValues {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<Vec<String>> for HeaderValues {
    fn from(values: Vec<String>) -> Self {
        Self(values)
    }
}

impl From<Vec<&str>> for HeaderValues {
    fn from(values: Vec<&str>) -> Self {
        Self(values.into_iter().map(str::to_owned).collect())
    }
}

impl From<&[&str]> for HeaderValues {
    fn from(values: &[&str]) -> Self {
        Self(values.iter().copied().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for HeaderValues {
    fn from(values: [&str; N]) -> Self {
        Self(values.into_iter().map(str::to_owned).collect())
    }
}

impl<'a> IntoIterator for &'a HeaderValues {
    type Item = &'a String;
    type IntoIter = slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Header multimap keyed by lower-cased name, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Headers {
    entries: IndexMap<String, HeaderValues>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds headers from `(name, values)` pairs, validating each one.
    ///
    /// A later pair with the same case-insensitive name replaces an earlier one.
    pub fn try_from_iter<I, N, V>(iter: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: Into<HeaderValues>,
    {
        let mut headers = Self::new();
        for (name, values) in iter {
            headers.insert(name.as_ref(), values)?;
        }
        Ok(headers)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sets `name` to `values`, replacing any existing values for that name.
    ///
    /// A new name is appended at the end; an existing one keeps its position.
    /// Returns the values that were replaced.
    pub fn insert(&mut self, name: &str, values: impl Into<HeaderValues>) -> Result<Option<HeaderValues>, ValidationError> {
        let (name, values) = validate(name, values.into())?;
        Ok(self.entries.insert(name, values))
    }

    /// Appends `values` after any existing values for `name`.
    pub fn append(&mut self, name: &str, values: impl Into<HeaderValues>) -> Result<(), ValidationError> {
        let (name, values) = validate(name, values.into())?;
        self.entries.entry(name).or_default().extend(values);
        Ok(())
    }

    /// Removes `name`, keeping the order of the remaining headers.
    pub fn remove(&mut self, name: &str) -> Option<HeaderValues> {
        self.entries.shift_remove(&*normalize(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&*normalize(name))
    }

    pub fn get(&self, name: &str) -> Option<&HeaderValues> {
        self.entries.get(&*normalize(name))
    }

    /// Iterates `(lower-cased name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderValues)> {
        self.entries.iter().map(|(name, values)| (name.as_str(), values))
    }

    /// Expands the headers into an [`http::HeaderMap`], one entry per value.
    pub fn to_header_map(&self) -> Result<HeaderMap, ValidationError> {
        let mut map = HeaderMap::with_capacity(self.entries.len());
        for (name, values) in &self.entries {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ValidationError::invalid_header_name(name, e))?;
            for value in values {
                let header_value =
                    HeaderValue::from_str(value).map_err(|e| ValidationError::invalid_header_value(name, e))?;
                map.append(header_name.clone(), header_value);
            }
        }
        Ok(map)
    }
}

impl TryFrom<&HeaderMap> for Headers {
    type Error = ValidationError;

    fn try_from(map: &HeaderMap) -> Result<Self, Self::Error> {
        let mut headers = Self::new();
        for (name, value) in map {
            let value = value.to_str().map_err(|e| ValidationError::invalid_header_value(name, e))?;
            headers.append(name.as_str(), value)?;
        }
        Ok(headers)
    }
}

/// Lower-cases `name` for lookup, borrowing when it is already lower-case.
fn normalize(name: &str) -> Cow<'_, str> {
    if name.bytes().any(|b| b.is_ascii_uppercase()) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Checks a header name and its values, returning the normalized name.
fn validate(name: &str, values: HeaderValues) -> Result<(String, HeaderValues), ValidationError> {
    ensure!(!name.is_empty(), ValidationError::EmptyHeaderName);

    let normalized = normalize(name).into_owned();
    if let Err(e) = HeaderName::from_bytes(normalized.as_bytes()) {
        warn!(header_name = name, cause = %e, "rejected header name");
        return Err(ValidationError::invalid_header_name(name, e));
    }

    for value in &values {
        if let Err(e) = HeaderValue::from_str(value) {
            warn!(header_name = name, cause = %e, "rejected header value");
            return Err(ValidationError::invalid_header_value(name, e));
        }
    }

    Ok((normalized, values))
}

#[cfg(test)]
mod tests {
    use http::header;

    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let headers = Headers::try_from_iter([("Accept", "application/json")]).unwrap();

        assert!(headers.contains("Accept"));
        assert!(headers.contains("accept"));
        assert!(headers.contains("ACCEPT"));
        assert_eq!(headers.get("aCCePT").unwrap().as_slice(), ["application/json"]);
        assert_eq!(headers.iter().map(|(name, _)| name).collect::<Vec<_>>(), ["accept"]);
    }

    #[test]
    fn insert_keeps_position() {
        let mut headers = Headers::try_from_iter([("a", "1"), ("b", "2"), ("c", "3")]).unwrap();

        let replaced = headers.insert("B", ["x", "y"]).unwrap();
        assert_eq!(replaced, Some(HeaderValues::from("2")));

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(headers.get("b").unwrap().line(), "x,y");
    }

    #[test]
    fn append_extends_values() {
        let mut headers = Headers::new();
        headers.append("Vary", "accept").unwrap();
        headers.append("vary", ["origin", "cookie"]).unwrap();

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("VARY").unwrap().line(), "accept,origin,cookie");
    }

    #[test]
    fn remove_keeps_order() {
        let mut headers = Headers::try_from_iter([("a", "1"), ("b", "2"), ("c", "3")]).unwrap();

        assert_eq!(headers.remove("A"), Some(HeaderValues::from("1")));
        assert_eq!(headers.remove("a"), None);

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b", "c"]);
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(Headers::new().insert("", "v"), Err(ValidationError::EmptyHeaderName));

        for name in ["bad name", "colon:", "new\nline", "tab\t", "ümlaut", "(x)"] {
            let err = Headers::new().insert(name, "v").unwrap_err();
            assert!(matches!(err, ValidationError::InvalidHeaderName { .. }), "{name:?} should be rejected");
        }
    }

    #[test]
    fn rejects_bad_values() {
        let err = Headers::new().insert("x-test", ["ok", "bad\r\ninjected: 1"]).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHeaderValue { ref name, .. } if name == "x-test"));

        let err = Headers::new().append("x-test", "nul\0").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHeaderValue { .. }));
    }

    #[test]
    fn empty_values_allowed() {
        let mut headers = Headers::new();
        headers.insert("x-empty", Vec::<String>::new()).unwrap();

        assert!(headers.contains("x-empty"));
        assert_eq!(headers.get("x-empty").unwrap().line(), "");
    }

    #[test]
    fn header_map_round_trip() {
        let mut map = HeaderMap::new();
        map.append(header::ACCEPT, HeaderValue::from_static("text/html"));
        map.append(header::ACCEPT, HeaderValue::from_static("application/json"));
        map.insert(header::HOST, HeaderValue::from_static("127.0.0.1:8080"));

        let headers = Headers::try_from(&map).unwrap();
        assert_eq!(headers.get("Accept").unwrap().line(), "text/html,application/json");
        assert_eq!(headers.get("host").unwrap().line(), "127.0.0.1:8080");

        let expanded = headers.to_header_map().unwrap();
        assert_eq!(expanded, map);
    }

    #[test]
    fn header_map_rejects_opaque_values() {
        let mut map = HeaderMap::new();
        map.insert("x-binary", HeaderValue::from_bytes(b"\xfa\xfb").unwrap());

        let err = Headers::try_from(&map).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidHeaderValue { .. }));
    }
}
