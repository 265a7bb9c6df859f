//! Raw request header extraction.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::request::Parts;
use derive_more::{Deref, IntoIterator};

/// Ordered request headers exactly as received.
///
/// Preserves arrival order and duplicate header names, unlike a map lookup.
/// Values that are not valid UTF-8 are rendered lossily so the extractor
/// stays infallible.
#[must_use]
#[derive(Debug, Clone, Default, Deref, IntoIterator)]
pub struct RawHeaders(pub Vec<(String, String)>);

impl RawHeaders {
    /// Collects the ordered name/value pairs from a header map.
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let pairs = headers
            .iter()
            .map(|(name, value)| {
                let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
                (name.as_str().to_owned(), value)
            })
            .collect();

        Self(pairs)
    }

    /// Returns the inner pairs.
    #[inline]
    pub fn into_inner(self) -> Vec<(String, String)> {
        self.0
    }
}

impl<S> FromRequestParts<S> for RawHeaders
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_header_map(&parts.headers))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn preserves_order_and_duplicates() {
        let mut headers = HeaderMap::new();
        headers.append("x-first", HeaderValue::from_static("1"));
        headers.append("x-second", HeaderValue::from_static("2"));
        headers.append("x-first", HeaderValue::from_static("3"));

        let raw = RawHeaders::from_header_map(&headers);
        let names: Vec<&str> = raw.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(raw.len(), 3);
        assert_eq!(names.iter().filter(|n| **n == "x-first").count(), 2);
        assert!(names.contains(&"x-second"));
    }

    #[test]
    fn lossy_values_do_not_fail() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-binary",
            HeaderValue::from_bytes(&[0xff, 0xfe, b'a']).unwrap(),
        );

        let raw = RawHeaders::from_header_map(&headers);
        assert_eq!(raw.len(), 1);
        assert!(raw.0[0].1.ends_with('a'));
    }
}
