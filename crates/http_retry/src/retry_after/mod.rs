// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Server supplied retry delays.
//!
//! A retryable response may tell the client how long to back off. Two sources are
//! consulted, in order:
//!
//! 1. A header configured on the policy through [`RetryAfterHeader`], whose integer
//!    value is read in the configured [`TimeUnit`].
//! 2. The well-known headers, see [`delay_from_headers`].
//!
//! Values that are negative, not numeric or describe a moment in the past are
//! treated as if the header were absent.

use std::time::{Duration, SystemTime};

use http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};

use crate::{ConfigError, TimeUnit};

mod rfc1123;

pub use rfc1123::parse_rfc1123;

/// Integer milliseconds.
const RETRY_AFTER_MS: HeaderName = HeaderName::from_static("retry-after-ms");

/// Integer milliseconds, Azure flavor.
const X_MS_RETRY_AFTER_MS: HeaderName = HeaderName::from_static("x-ms-retry-after-ms");

/// A response header that carries the retry delay as an integer in a known unit.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use http::HeaderMap;
/// use http_retry::{RetryAfterHeader, TimeUnit};
///
/// let header = RetryAfterHeader::new("Retry-After", TimeUnit::Seconds)?;
///
/// let mut headers = HeaderMap::new();
/// headers.insert("retry-after", "2".parse()?);
///
/// assert_eq!(header.delay_from(&headers), Some(Duration::from_secs(2)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryAfterHeader {
    name: HeaderName,
    unit: TimeUnit,
}

impl RetryAfterHeader {
    /// Creates a binding between a header name and the unit of its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidHeaderName`] if `name` is not a valid header name.
    pub fn new(name: impl AsRef<str>, unit: TimeUnit) -> Result<Self, ConfigError> {
        let name = name.as_ref();
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|_invalid| ConfigError::InvalidHeaderName(name.to_string()))?;

        Ok(Self { name, unit })
    }

    /// Creates a binding from an already validated header name.
    #[must_use]
    pub fn from_header_name(name: HeaderName, unit: TimeUnit) -> Self {
        Self { name, unit }
    }

    /// The header name, lowercased.
    #[must_use]
    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    /// The unit of the header value.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Reads the delay from `headers`.
    ///
    /// Returns `None` if the header is missing, empty, not an integer or negative.
    #[must_use]
    pub fn delay_from(&self, headers: &HeaderMap) -> Option<Duration> {
        headers
            .get(&self.name)
            .and_then(parse_integer)
            .map(|amount| self.unit.to_duration(amount))
    }
}

/// Reads the retry delay from the well-known headers.
///
/// The headers are consulted in this order and the first usable one wins:
///
/// 1. `retry-after-ms`: integer milliseconds
/// 2. `x-ms-retry-after-ms`: integer milliseconds
/// 3. `Retry-After`: integer seconds, or an HTTP date measured from `now`
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use http::HeaderMap;
/// use http_retry::delay_from_headers;
///
/// let now = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_772);
///
/// let mut headers = HeaderMap::new();
/// headers.insert("retry-after", "Sun, 06 Nov 1994 08:49:37 GMT".parse()?);
/// assert_eq!(delay_from_headers(&headers, now), Some(Duration::from_secs(5)));
///
/// headers.insert("x-ms-retry-after-ms", "250".parse()?);
/// assert_eq!(delay_from_headers(&headers, now), Some(Duration::from_millis(250)));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[must_use]
pub fn delay_from_headers(headers: &HeaderMap, now: SystemTime) -> Option<Duration> {
    [RETRY_AFTER_MS, X_MS_RETRY_AFTER_MS]
        .iter()
        .find_map(|name| headers.get(name).and_then(parse_integer))
        .map(Duration::from_millis)
        .or_else(|| headers.get(RETRY_AFTER).and_then(|value| parse_retry_after(value, now)))
}

/// `Retry-After` is either delay-seconds or an HTTP date.
fn parse_retry_after(value: &HeaderValue, now: SystemTime) -> Option<Duration> {
    if let Some(seconds) = parse_integer(value) {
        return Some(Duration::from_secs(seconds));
    }

    let date = parse_rfc1123(value.to_str().ok()?.trim())?;
    date.duration_since(now).ok()
}

fn parse_integer(value: &HeaderValue) -> Option<u64> {
    let value = value.to_str().ok()?.trim();
    if value.is_empty() {
        return None;
    }

    let amount: i64 = value.parse().ok()?;
    u64::try_from(amount).ok()
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        pairs
            .iter()
            .map(|&(name, value)| (HeaderName::from_static(name), HeaderValue::from_static(value)))
            .collect()
    }

    fn at(secs: u64) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
    }

    #[rstest]
    #[case("2", Some(2))]
    #[case(" 7 ", Some(7))]
    #[case("0", Some(0))]
    #[case("-1", None)]
    #[case("", None)]
    #[case("1.5", None)]
    #[case("soon", None)]
    fn configured_header(#[case] value: &'static str, #[case] expected_secs: Option<u64>) {
        let header = RetryAfterHeader::new("Retry-After", TimeUnit::Seconds).unwrap();

        assert_eq!(
            header.delay_from(&headers(&[("retry-after", value)])),
            expected_secs.map(Duration::from_secs)
        );
    }

    #[test]
    fn configured_header_missing() {
        let header = RetryAfterHeader::new("x-throttle-ms", TimeUnit::Milliseconds).unwrap();

        assert_eq!(header.delay_from(&HeaderMap::new()), None);
        assert_eq!(
            header.delay_from(&headers(&[("x-throttle-ms", "1500")])),
            Some(Duration::from_millis(1500))
        );
    }

    #[test]
    fn header_name_is_validated() {
        assert_eq!(
            RetryAfterHeader::new("bad header", TimeUnit::Seconds),
            Err(ConfigError::InvalidHeaderName("bad header".to_string()))
        );

        let header = RetryAfterHeader::new("X-Throttle", TimeUnit::Minutes).unwrap();
        assert_eq!(header.name().as_str(), "x-throttle");
        assert_eq!(header.unit(), TimeUnit::Minutes);
    }

    #[test]
    fn from_header_name() {
        let header = RetryAfterHeader::from_header_name(RETRY_AFTER, TimeUnit::Seconds);
        assert_eq!(header.name(), &RETRY_AFTER);
    }

    #[test]
    fn well_known_precedence() {
        let now = at(0);

        let all = headers(&[("retry-after-ms", "100"), ("x-ms-retry-after-ms", "200"), ("retry-after", "3")]);
        assert_eq!(delay_from_headers(&all, now), Some(Duration::from_millis(100)));

        let azure = headers(&[("x-ms-retry-after-ms", "200"), ("retry-after", "3")]);
        assert_eq!(delay_from_headers(&azure, now), Some(Duration::from_millis(200)));

        let standard = headers(&[("retry-after", "3")]);
        assert_eq!(delay_from_headers(&standard, now), Some(Duration::from_secs(3)));
    }

    #[test]
    fn unusable_header_falls_through() {
        let mixed = headers(&[("retry-after-ms", "-5"), ("x-ms-retry-after-ms", "abc"), ("retry-after", "4")]);

        assert_eq!(delay_from_headers(&mixed, at(0)), Some(Duration::from_secs(4)));
    }

    #[test]
    fn retry_after_date_in_future() {
        let map = headers(&[("retry-after", "Sun, 06 Nov 1994 08:49:37 GMT")]);

        assert_eq!(delay_from_headers(&map, at(784_111_772)), Some(Duration::from_secs(5)));
        assert_eq!(delay_from_headers(&map, at(784_111_777)), Some(Duration::ZERO));
    }

    #[test]
    fn retry_after_date_in_past_is_ignored() {
        let map = headers(&[("retry-after", "Sun, 06 Nov 1994 08:49:37 GMT")]);

        assert_eq!(delay_from_headers(&map, at(784_111_778)), None);
    }

    #[test]
    fn no_headers() {
        assert_eq!(delay_from_headers(&HeaderMap::new(), at(0)), None);
        assert_eq!(delay_from_headers(&headers(&[("retry-after", "garbage")]), at(0)), None);
    }
}
