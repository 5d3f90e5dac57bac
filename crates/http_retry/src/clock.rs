// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::{Duration, SystemTime};

/// Source of wall-clock time and backoff timers for the retry policy.
///
/// The wall clock is consulted when a `Retry-After` header carries an HTTP date; the
/// timer suspends the retry loop between attempts without occupying a thread.
///
/// Timers are driven by the Tokio time driver. Under a paused Tokio runtime
/// (`#[tokio::test(start_paused = true)]`) waits complete as soon as the runtime is
/// idle, which keeps tests that exercise long backoffs fast.
///
/// # Examples
///
/// ```
/// use std::time::{Duration, SystemTime};
///
/// use http_retry::Clock;
///
/// let at = SystemTime::UNIX_EPOCH + Duration::from_secs(784_111_777);
/// let clock = Clock::new_frozen_at(at);
///
/// assert_eq!(clock.system_time(), at);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Clock(WallClock);

#[derive(Debug, Clone, Copy, Default)]
enum WallClock {
    #[default]
    System,
    Frozen(SystemTime),
}

impl Clock {
    /// Creates a clock that reads the system time and uses Tokio timers.
    #[must_use]
    pub fn new_tokio() -> Self {
        Self(WallClock::System)
    }

    /// Creates a clock whose wall-clock time is fixed at `time`.
    ///
    /// Timers still run on Tokio; only [`Clock::system_time`] is frozen.
    #[must_use]
    pub fn new_frozen_at(time: impl Into<SystemTime>) -> Self {
        Self(WallClock::Frozen(time.into()))
    }

    /// Returns the current wall-clock time.
    #[must_use]
    pub fn system_time(&self) -> SystemTime {
        match self.0 {
            WallClock::System => SystemTime::now(),
            WallClock::Frozen(time) => time,
        }
    }

    /// Suspends the current task for `duration`.
    ///
    /// Dropping the returned future abandons the wait.
    pub async fn delay(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        tokio::time::sleep(duration).await;
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frozen_clock_does_not_move() {
        let at = SystemTime::UNIX_EPOCH + Duration::from_secs(1000);
        let clock = Clock::new_frozen_at(at);

        assert_eq!(clock.system_time(), at);
        assert_eq!(clock.clone().system_time(), at);
    }

    #[test]
    fn system_clock_is_after_epoch() {
        let clock = Clock::new_tokio();
        assert!(clock.system_time() > SystemTime::UNIX_EPOCH);
    }

    #[tokio::test(start_paused = true)]
    async fn delay_advances_virtual_time() {
        let clock = Clock::default();
        let start = tokio::time::Instant::now();

        clock.delay(Duration::from_secs(30)).await;

        assert_eq!(start.elapsed(), Duration::from_secs(30));
    }

    #[tokio::test(start_paused = true)]
    async fn zero_delay_completes_immediately() {
        let clock = Clock::default();
        let start = tokio::time::Instant::now();

        clock.delay(Duration::ZERO).await;

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
