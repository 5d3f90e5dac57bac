// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;

use http::Request;

use super::{EnableIf, OnRetry, OnRetryArgs, RetryPolicy, RetryShared, ShouldRetryError};
use crate::{Attempt, Clock, ExponentialBackoff, RetryAfterHeader, RetryStrategy};

/// Builder for [`RetryPolicy`].
///
/// Created by [`RetryPolicy::builder`]. Every setting has a default, so `build` can be
/// called right away:
///
/// - strategy: [`ExponentialBackoff::default`] (3 retries, 800ms base, 8s cap)
/// - retry-after header: none, only the well-known headers are consulted
/// - clock: [`Clock::new_tokio`]
/// - errors: never retried
/// - enabled for every request
#[derive(Debug)]
pub struct RetryPolicyBuilder<B, E> {
    name: Cow<'static, str>,
    strategy: Arc<dyn RetryStrategy>,
    retry_after: Option<RetryAfterHeader>,
    clock: Clock,
    should_retry_error: ShouldRetryError<E>,
    on_retry: Option<OnRetry>,
    enable_if: EnableIf<B>,
}

impl<B, E> RetryPolicyBuilder<B, E> {
    pub(super) fn new(name: Cow<'static, str>) -> Self {
        Self {
            name,
            strategy: Arc::new(ExponentialBackoff::default()),
            retry_after: None,
            clock: Clock::default(),
            should_retry_error: ShouldRetryError::never(),
            on_retry: None,
            enable_if: EnableIf::always(),
        }
    }

    /// Sets the strategy that decides retry eligibility and delays.
    ///
    /// **Default**: [`ExponentialBackoff::default`]
    #[must_use]
    pub fn strategy(mut self, strategy: impl RetryStrategy + 'static) -> Self {
        self.strategy = Arc::new(strategy);
        self
    }

    /// Sets a strategy that is shared with other policies.
    #[must_use]
    pub fn shared_strategy(mut self, strategy: Arc<dyn RetryStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    /// Reads the retry delay from a custom response header before anything else.
    ///
    /// When the header is absent or unusable the well-known headers and then the
    /// strategy are consulted as usual.
    ///
    /// **Default**: none
    #[must_use]
    pub fn retry_after_header(mut self, header: RetryAfterHeader) -> Self {
        self.retry_after = Some(header);
        self
    }

    /// Sets the clock used for HTTP-date arithmetic and for waiting between attempts.
    #[must_use]
    pub fn clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Decides which errors returned by the next stage are worth another attempt.
    ///
    /// The predicate receives the error and the attempt that produced it. Errors it
    /// rejects end the call immediately.
    ///
    /// **Default**: no error is retried
    #[must_use]
    pub fn retry_error_if(mut self, predicate: impl Fn(&E, Attempt) -> bool + Send + Sync + 'static) -> Self {
        self.should_retry_error = ShouldRetryError::new(predicate);
        self
    }

    /// Retries every error returned by the next stage.
    #[must_use]
    pub fn retry_errors(mut self) -> Self {
        self.should_retry_error = ShouldRetryError::always();
        self
    }

    /// Configures a callback invoked before each wait.
    ///
    /// The callback only observes; it cannot change whether or when the retry happens.
    ///
    /// **Default**: none
    #[must_use]
    pub fn on_retry(mut self, on_retry: impl Fn(OnRetryArgs) + Send + Sync + 'static) -> Self {
        self.on_retry = Some(OnRetry::new(on_retry));
        self
    }

    /// Enables retries only for requests matching `is_enabled`.
    ///
    /// Other requests are sent once and their outcome returned as-is.
    /// This call replaces any previous condition.
    #[must_use]
    pub fn enable_if(mut self, is_enabled: impl Fn(&Request<B>) -> bool + Send + Sync + 'static) -> Self {
        self.enable_if = EnableIf::new(is_enabled);
        self
    }

    /// Enables retries for every request. This is the default.
    #[must_use]
    pub fn enable_always(mut self) -> Self {
        self.enable_if = EnableIf::always();
        self
    }

    /// Disables retries; every request is sent exactly once.
    #[must_use]
    pub fn disable(mut self) -> Self {
        self.enable_if = EnableIf::never();
        self
    }

    /// Builds the policy.
    #[must_use]
    pub fn build(self) -> RetryPolicy<B, E> {
        RetryPolicy {
            shared: Arc::new(RetryShared {
                name: self.name,
                strategy: self.strategy,
                retry_after: self.retry_after,
                clock: self.clock,
                should_retry_error: self.should_retry_error,
                on_retry: self.on_retry,
                enable_if: self.enable_if,
            }),
        }
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::*;
    use crate::{FixedDelay, TimeUnit};

    #[test]
    fn defaults() {
        let policy = RetryPolicy::<(), io::Error>::builder("defaults").build();

        assert_eq!(policy.name(), "defaults");
        assert_eq!(policy.shared.strategy.max_retries(), 3);
        assert!(policy.shared.retry_after.is_none());
        assert!(policy.shared.on_retry.is_none());
        assert!(!policy.shared.should_retry_error.call(&io::Error::other("x"), Attempt::default()));
        assert!(policy.shared.enable_if.call(&Request::new(())));
    }

    #[test]
    fn setters() {
        let header = RetryAfterHeader::new("x-wait", TimeUnit::Seconds).unwrap();
        let policy = RetryPolicy::<(), io::Error>::builder("custom")
            .strategy(FixedDelay::new(7, Duration::from_millis(5)))
            .retry_after_header(header.clone())
            .retry_errors()
            .on_retry(|_args| {})
            .disable()
            .build();

        assert_eq!(policy.shared.strategy.max_retries(), 7);
        assert_eq!(policy.shared.retry_after, Some(header));
        assert!(policy.shared.on_retry.is_some());
        assert!(policy.shared.should_retry_error.call(&io::Error::other("x"), Attempt::default()));
        assert!(!policy.shared.enable_if.call(&Request::new(())));
    }

    #[test]
    fn enable_if_replaces_previous_condition() {
        let builder = RetryPolicy::<&'static str, io::Error>::builder("cond")
            .disable()
            .enable_if(|request| request.method() == http::Method::GET);

        let policy = builder.build();
        assert!(policy.shared.enable_if.call(&Request::new("")));

        let policy = RetryPolicy::<&'static str, io::Error>::builder("cond").disable().enable_always().build();
        assert!(policy.shared.enable_if.call(&Request::new("")));
    }

    #[test]
    fn shared_strategy() {
        let strategy: Arc<dyn RetryStrategy> = Arc::new(FixedDelay::new(1, Duration::ZERO));

        let first = RetryPolicy::<(), io::Error>::builder("a").shared_strategy(Arc::clone(&strategy)).build();
        let second = RetryPolicy::<(), io::Error>::builder("b").shared_strategy(Arc::clone(&strategy)).build();

        assert_eq!(Arc::strong_count(&strategy), 3);
        assert_eq!(first.shared.strategy.max_retries(), second.shared.strategy.max_retries());
    }

    #[test]
    fn retry_error_if_receives_attempt() {
        let policy = RetryPolicy::<(), io::Error>::builder("pred")
            .retry_error_if(|error, attempt| error.kind() == io::ErrorKind::TimedOut && attempt.index() < 2)
            .build();

        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        assert!(policy.shared.should_retry_error.call(&timed_out, Attempt::new(1, false)));
        assert!(!policy.shared.should_retry_error.call(&timed_out, Attempt::new(2, false)));
        assert!(!policy.shared.should_retry_error.call(&io::Error::other("x"), Attempt::new(0, false)));
    }
}
