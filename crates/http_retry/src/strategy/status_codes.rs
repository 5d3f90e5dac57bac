// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use http::StatusCode;

use crate::ConfigError;

const DEFAULT_CODES: [StatusCode; 6] = [
    StatusCode::REQUEST_TIMEOUT,
    StatusCode::TOO_MANY_REQUESTS,
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// The set of HTTP status codes a strategy treats as transient.
///
/// The default set is `408, 429, 500, 502, 503, 504`. Status codes such as
/// `501 Not Implemented` or `505 HTTP Version Not Supported` describe permanent
/// conditions and are deliberately left out.
///
/// # Examples
///
/// ```
/// use http::StatusCode;
/// use http_retry::RetryableStatusCodes;
///
/// let codes = RetryableStatusCodes::new([StatusCode::TOO_MANY_REQUESTS, StatusCode::SERVICE_UNAVAILABLE]);
///
/// assert!(codes.contains(StatusCode::TOO_MANY_REQUESTS));
/// assert!(!codes.contains(StatusCode::INTERNAL_SERVER_ERROR));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetryableStatusCodes(Vec<StatusCode>);

impl RetryableStatusCodes {
    /// Creates a set from the given status codes. Duplicates are removed.
    #[must_use]
    pub fn new(codes: impl IntoIterator<Item = StatusCode>) -> Self {
        let mut codes: Vec<_> = codes.into_iter().collect();
        codes.sort_unstable();
        codes.dedup();
        Self(codes)
    }

    /// Creates a set from raw numeric status codes.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStatusCode`] for a value outside `100..=999`.
    pub fn from_u16s(codes: impl IntoIterator<Item = u16>) -> Result<Self, ConfigError> {
        let codes = codes
            .into_iter()
            .map(|code| StatusCode::from_u16(code).map_err(|_invalid| ConfigError::InvalidStatusCode(code)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(codes))
    }

    /// Creates an empty set; no status code is retried.
    #[must_use]
    pub fn none() -> Self {
        Self(Vec::new())
    }

    /// Returns true if `status` is in the set.
    #[must_use]
    pub fn contains(&self, status: StatusCode) -> bool {
        self.0.binary_search(&status).is_ok()
    }

    /// Iterates over the codes in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = StatusCode> + '_ {
        self.0.iter().copied()
    }
}

impl Default for RetryableStatusCodes {
    fn default() -> Self {
        Self::new(DEFAULT_CODES)
    }
}

impl FromIterator<StatusCode> for RetryableStatusCodes {
    fn from_iter<T: IntoIterator<Item = StatusCode>>(iter: T) -> Self {
        Self::new(iter)
    }
}
