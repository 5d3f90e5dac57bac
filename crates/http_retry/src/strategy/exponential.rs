// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use http::StatusCode;

use super::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES, RetryStrategy, RetryableStatusCodes, secs_to_duration_saturating,
};
use crate::ConfigError;
use crate::rnd::Rnd;

/// Half-width of the jitter band applied to the base delay.
///
/// The jittered base lies in `[0.95 * base, 1.05 * base)`.
const JITTER_FACTOR: f64 = 0.05;

const EXPONENTIAL_FACTOR: f64 = 2.0;

/// Jittered, truncated exponential backoff.
///
/// For `calculate_retry_delay(n)` the delay is
///
/// ```text
/// min(2^n * base_delay * U(1 - 0.05, 1 + 0.05), max_delay)
/// ```
///
/// The retry policy passes the zero-based index of the attempt that just failed, so the
/// first retry waits roughly `base_delay`.
///
/// Jitter is drawn independently on every call from a thread-local generator. It only
/// spreads clients apart in time and has no cryptographic meaning.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use http_retry::{ExponentialBackoff, RetryStrategy};
///
/// let backoff = ExponentialBackoff::new(5, Duration::from_millis(100), Duration::from_secs(2))?;
///
/// let delay = backoff.calculate_retry_delay(3);
/// assert!(delay >= Duration::from_millis(760) && delay <= Duration::from_millis(840));
/// assert_eq!(backoff.calculate_retry_delay(30), Duration::from_secs(2));
/// # Ok::<(), http_retry::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
    retryable_status_codes: RetryableStatusCodes,
    rnd: Rnd,
}

impl ExponentialBackoff {
    /// Creates an exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseDelay`] if `base_delay` is zero and
    /// [`ConfigError::BaseDelayExceedsMaxDelay`] if `base_delay > max_delay`.
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Result<Self, ConfigError> {
        if base_delay.is_zero() {
            return Err(ConfigError::InvalidBaseDelay);
        }

        if base_delay > max_delay {
            return Err(ConfigError::BaseDelayExceedsMaxDelay { base_delay, max_delay });
        }

        Ok(Self {
            max_retries,
            base_delay,
            max_delay,
            retryable_status_codes: RetryableStatusCodes::default(),
            rnd: Rnd::default(),
        })
    }

    /// Replaces the set of status codes that trigger a retry.
    #[must_use]
    pub fn retryable_status_codes(mut self, codes: RetryableStatusCodes) -> Self {
        self.retryable_status_codes = codes;
        self
    }

    /// The delay the schedule starts from.
    #[must_use]
    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// The upper bound of any single delay.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    #[cfg(test)]
    fn with_rnd(mut self, rnd: Rnd) -> Self {
        self.rnd = rnd;
        self
    }
}

impl Default for ExponentialBackoff {
    /// Three retries starting at 800ms, capped at 8s.
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
            max_delay: DEFAULT_MAX_DELAY,
            retryable_status_codes: RetryableStatusCodes::default(),
            rnd: Rnd::default(),
        }
    }
}

impl RetryStrategy for ExponentialBackoff {
    fn calculate_retry_delay(&self, attempts_made: u32) -> Duration {
        let jittered = apply_jitter(self.base_delay, &self.rnd);
        let factor = EXPONENTIAL_FACTOR.powi(i32::try_from(attempts_made).unwrap_or(i32::MAX));
        let delay = secs_to_duration_saturating(jittered.as_secs_f64() * factor);

        delay.min(self.max_delay)
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn should_retry(&self, status: StatusCode) -> bool {
        self.retryable_status_codes.contains(status)
    }
}

/// Scales `delay` by a uniform factor in `[1 - JITTER_FACTOR, 1 + JITTER_FACTOR)`.
#[inline]
fn apply_jitter(delay: Duration, rnd: &Rnd) -> Duration {
    let factor = (2.0 * JITTER_FACTOR).mul_add(rnd.next_f64(), 1.0 - JITTER_FACTOR);
    secs_to_duration_saturating(delay.as_secs_f64() * factor)
}
