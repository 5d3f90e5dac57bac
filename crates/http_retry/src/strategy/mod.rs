// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Retry strategies decide whether a response is worth retrying and how long to wait.
//!
//! Two strategies are provided:
//!
//! - [`ExponentialBackoff`]: jittered, truncated exponential backoff (the default)
//! - [`FixedDelay`]: the same delay before every retry
//!
//! Custom strategies implement [`RetryStrategy`]. A strategy instance is shared by every
//! request that flows through a policy, so implementations must be immutable after
//! construction and safe to call from many tasks at once.

use std::fmt::Debug;
use std::time::Duration;

use http::StatusCode;

mod constants;
mod exponential;
mod fixed;
mod status_codes;

pub use exponential::ExponentialBackoff;
pub use fixed::FixedDelay;
pub use status_codes::RetryableStatusCodes;

pub(crate) use constants::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES};

/// Decides retry eligibility and the delay between attempts.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use http::StatusCode;
/// use http_retry::RetryStrategy;
///
/// /// Retries only throttled requests, waiting one more second each time.
/// #[derive(Debug)]
/// struct ThrottleOnly;
///
/// impl RetryStrategy for ThrottleOnly {
///     fn calculate_retry_delay(&self, attempts_made: u32) -> Duration {
///         Duration::from_secs(u64::from(attempts_made) + 1)
///     }
///
///     fn max_retries(&self) -> u32 {
///         5
///     }
///
///     fn should_retry(&self, status: StatusCode) -> bool {
///         status == StatusCode::TOO_MANY_REQUESTS
///     }
/// }
///
/// assert!(ThrottleOnly.should_retry(StatusCode::TOO_MANY_REQUESTS));
/// assert_eq!(ThrottleOnly.calculate_retry_delay(1), Duration::from_secs(2));
/// ```
pub trait RetryStrategy: Debug + Send + Sync {
    /// Computes the delay before the next attempt, given how many attempts were already made.
    ///
    /// Implementations must not have side effects.
    fn calculate_retry_delay(&self, attempts_made: u32) -> Duration;

    /// The maximum number of retries, not counting the initial attempt.
    fn max_retries(&self) -> u32;

    /// Returns true if a response with `status` should be retried.
    ///
    /// The default accepts the codes in [`RetryableStatusCodes::default`].
    fn should_retry(&self, status: StatusCode) -> bool {
        RetryableStatusCodes::default().contains(status)
    }
}

impl<S: RetryStrategy + ?Sized> RetryStrategy for std::sync::Arc<S> {
    fn calculate_retry_delay(&self, attempts_made: u32) -> Duration {
        (**self).calculate_retry_delay(attempts_made)
    }

    fn max_retries(&self) -> u32 {
        (**self).max_retries()
    }

    fn should_retry(&self, status: StatusCode) -> bool {
        (**self).should_retry(status)
    }
}

/// Converts fractional seconds into a duration, clamping to zero and saturating at `Duration::MAX`.
pub(crate) fn secs_to_duration_saturating(secs: f64) -> Duration {
    if secs <= 0.0 {
        return Duration::ZERO;
    }

    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}
