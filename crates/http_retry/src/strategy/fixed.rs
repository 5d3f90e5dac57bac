// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

use http::StatusCode;

use super::{RetryStrategy, RetryableStatusCodes};

/// Waits the same amount of time before every retry.
///
/// A zero delay is allowed and retries immediately.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use http_retry::{FixedDelay, RetryStrategy};
///
/// let fixed = FixedDelay::new(2, Duration::from_millis(250));
///
/// assert_eq!(fixed.calculate_retry_delay(0), Duration::from_millis(250));
/// assert_eq!(fixed.calculate_retry_delay(9), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct FixedDelay {
    max_retries: u32,
    delay: Duration,
    retryable_status_codes: RetryableStatusCodes,
}

impl FixedDelay {
    /// Creates a fixed delay strategy.
    #[must_use]
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            retryable_status_codes: RetryableStatusCodes::default(),
        }
    }

    /// Replaces the set of status codes that trigger a retry.
    #[must_use]
    pub fn retryable_status_codes(mut self, codes: RetryableStatusCodes) -> Self {
        self.retryable_status_codes = codes;
        self
    }

    /// The delay applied before every retry.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl RetryStrategy for FixedDelay {
    fn calculate_retry_delay(&self, _attempts_made: u32) -> Duration {
        self.delay
    }

    fn max_retries(&self) -> u32 {
        self.max_retries
    }

    fn should_retry(&self, status: StatusCode) -> bool {
        self.retryable_status_codes.contains(status)
    }
}
