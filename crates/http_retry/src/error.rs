// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use thiserror::Error;

/// An invalid retry configuration.
///
/// Configuration errors are reported when a strategy, header binding or options
/// object is constructed. They are never produced while a request is in flight and
/// are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The base delay of an exponential backoff was zero.
    #[error("base delay must be greater than zero")]
    InvalidBaseDelay,

    /// The base delay of an exponential backoff was larger than its maximum delay.
    #[error("base delay ({base_delay:?}) must not exceed max delay ({max_delay:?})")]
    BaseDelayExceedsMaxDelay {
        /// The configured base delay.
        base_delay: Duration,
        /// The configured maximum delay.
        max_delay: Duration,
    },

    /// Only one of the retry-after header name and its time unit was provided.
    #[error("retry-after header name and time unit must be provided together")]
    RetryAfterPairMismatch,

    /// The retry-after header name is not a valid HTTP header name.
    #[error("invalid retry-after header name: {0:?}")]
    InvalidHeaderName(String),

    /// A retryable status code is outside the valid `100..=999` range.
    #[error("invalid status code: {0}")]
    InvalidStatusCode(u16),
}

/// The terminal error of a retried call.
///
/// Carries the error of the final attempt together with the errors of every
/// earlier attempt, oldest first. The earlier errors are kept for diagnosis only;
/// [`source`][std::error::Error::source] reports the final error.
///
/// # Examples
///
/// ```
/// use std::io;
///
/// use http_retry::RetryError;
///
/// # fn example(error: RetryError<io::Error>) {
/// eprintln!("gave up after {} attempts: {}", error.attempts(), error.error());
/// for earlier in error.suppressed() {
///     eprintln!("  earlier failure: {earlier}");
/// }
/// # }
/// ```
#[derive(Debug, Error)]
#[error("request failed after {attempts} attempt(s): {source}")]
pub struct RetryError<E> {
    source: E,
    suppressed: Vec<E>,
    attempts: u32,
}

impl<E> RetryError<E> {
    pub(crate) fn new(source: E, suppressed: Vec<E>, attempts: u32) -> Self {
        Self {
            source,
            suppressed,
            attempts,
        }
    }

    /// Returns the error of the final attempt.
    #[must_use]
    pub fn error(&self) -> &E {
        &self.source
    }

    /// Returns the errors of the attempts before the final one, oldest first.
    #[must_use]
    pub fn suppressed(&self) -> &[E] {
        &self.suppressed
    }

    /// Returns the total number of attempts that were made.
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Discards the suppressed errors and returns the final one.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.source
    }

    /// Splits into the final error and the suppressed errors.
    #[must_use]
    pub fn into_parts(self) -> (E, Vec<E>) {
        (self.source, self.suppressed)
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::error::Error as _;
    use std::io;

    use super::*;

    #[test]
    fn config_error_messages() {
        assert_eq!(ConfigError::InvalidBaseDelay.to_string(), "base delay must be greater than zero");
        assert_eq!(
            ConfigError::BaseDelayExceedsMaxDelay {
                base_delay: Duration::from_secs(2),
                max_delay: Duration::from_secs(1),
            }
            .to_string(),
            "base delay (2s) must not exceed max delay (1s)"
        );
        assert_eq!(
            ConfigError::InvalidHeaderName("bad header".to_string()).to_string(),
            "invalid retry-after header name: \"bad header\""
        );
    }

    #[test]
    fn retry_error_exposes_chain() {
        let error = RetryError::new(
            io::Error::new(io::ErrorKind::TimedOut, "third"),
            vec![
                io::Error::new(io::ErrorKind::TimedOut, "first"),
                io::Error::new(io::ErrorKind::TimedOut, "second"),
            ],
            3,
        );

        assert_eq!(error.attempts(), 3);
        assert_eq!(error.error().to_string(), "third");
        assert_eq!(error.suppressed().len(), 2);
        assert_eq!(error.suppressed()[0].to_string(), "first");
        assert_eq!(error.to_string(), "request failed after 3 attempt(s): third");
        assert_eq!(error.source().map(ToString::to_string), Some("third".to_string()));

        let (last, earlier) = error.into_parts();
        assert_eq!(last.kind(), io::ErrorKind::TimedOut);
        assert_eq!(earlier.len(), 2);
    }

    #[test]
    fn static_assertions() {
        static_assertions::assert_impl_all!(RetryError<io::Error>: Send, Sync, std::error::Error);
        static_assertions::assert_impl_all!(ConfigError: Send, Sync, Clone, std::error::Error);
    }
}
