// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use http::{HeaderMap, Request, Response};

use super::*;
use crate::retry_after::delay_from_headers;
use crate::{Attempt, Clock, Next, RetryAfterHeader, RetryError, RetryStrategy, copy_request};

/// Retries HTTP requests sent through the rest of a pipeline.
///
/// Each call to [`process`][RetryPolicy::process] sends a fresh copy of the request to
/// the [`Next`] stage, inspects the outcome and decides whether to try again:
///
/// - A response whose status the strategy deems retryable is dropped and the request
///   sent again after a delay. The delay comes from a retry-after header when the
///   response carries one, otherwise from the strategy.
/// - An error accepted by the configured error predicate is kept and the request sent
///   again after the strategy's delay.
/// - Anything else ends the call.
///
/// Once the strategy's retry budget is spent the last response is returned as-is, or
/// the last error is returned together with every earlier error.
///
/// The policy is cheap to clone and may be shared by any number of concurrent calls.
/// Dropping the future returned by `process` cancels the call, including a pending wait.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use http::{Request, Response, StatusCode};
/// use http_retry::{Attempt, Execute, FixedDelay, RetryPolicy};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let policy = RetryPolicy::<String, std::io::Error>::builder("storage")
///     .strategy(FixedDelay::new(3, Duration::from_millis(10)))
///     .build();
///
/// let next = Execute::new(|_request: Request<String>, attempt: Attempt| async move {
///     let status = if attempt.index() < 2 { StatusCode::SERVICE_UNAVAILABLE } else { StatusCode::OK };
///     Ok(Response::builder().status(status).body(String::new()).unwrap())
/// });
///
/// let response = policy.process(&Request::new("payload".to_string()), &next).await?;
/// assert_eq!(response.status(), StatusCode::OK);
/// # Ok(())
/// # }
/// ```
pub struct RetryPolicy<B, E> {
    pub(crate) shared: Arc<RetryShared<B, E>>,
}

/// Configuration shared by every clone of a [`RetryPolicy`].
pub(crate) struct RetryShared<B, E> {
    pub(crate) name: Cow<'static, str>,
    pub(crate) strategy: Arc<dyn RetryStrategy>,
    pub(crate) retry_after: Option<RetryAfterHeader>,
    pub(crate) clock: Clock,
    pub(crate) should_retry_error: ShouldRetryError<E>,
    pub(crate) on_retry: Option<OnRetry>,
    pub(crate) enable_if: EnableIf<B>,
}

impl<B, E> Clone for RetryPolicy<B, E> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B, E> Debug for RetryPolicy<B, E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("name", &self.shared.name)
            .field("strategy", &self.shared.strategy)
            .field("retry_after", &self.shared.retry_after)
            .finish_non_exhaustive()
    }
}

impl<B, E> RetryPolicy<B, E> {
    /// Starts configuring a policy. `name` identifies it in logs.
    pub fn builder(name: impl Into<Cow<'static, str>>) -> RetryPolicyBuilder<B, E> {
        RetryPolicyBuilder::new(name.into())
    }

    /// The name given to [`builder`][Self::builder].
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Sends `request` through `next`, retrying as configured.
    ///
    /// `request` is a template: it is never mutated and every attempt receives its own
    /// copy made with [`copy_request`].
    ///
    /// # Errors
    ///
    /// Returns [`RetryError`] when the final attempt produced an error. It carries the
    /// errors of all earlier attempts as [`suppressed`][RetryError::suppressed].
    #[cfg_attr(test, mutants::skip)] // Mutating the enable_if check causes infinite loops
    pub async fn process<N>(&self, request: &Request<B>, next: &N) -> Result<Response<N::Body>, RetryError<E>>
    where
        B: Clone,
        E: Display,
        N: Next<B, Error = E>,
    {
        if !self.shared.enable_if.call(request) {
            return next
                .send(copy_request(request), Attempt::new(0, true))
                .await
                .map_err(|error| RetryError::new(error, Vec::new(), 1));
        }

        let max_retries = self.shared.strategy.max_retries();
        let mut attempt = Attempt::first(max_retries);
        let mut suppressed = Vec::new();

        loop {
            let outcome = next.send(copy_request(request), attempt).await;

            match self.shared.evaluate_attempt(outcome, attempt, max_retries) {
                ControlFlow::Continue(state) => {
                    suppressed.extend(state.error);
                    self.shared.clock.delay(state.delay).await;
                    attempt = state.attempt;
                }
                ControlFlow::Break(Ok(response)) => return Ok(response),
                ControlFlow::Break(Err(error)) => return Err(RetryError::new(error, suppressed, attempt.count())),
            }
        }
    }
}

impl<B, E: Display> RetryShared<B, E> {
    fn evaluate_attempt<R>(
        &self,
        outcome: Result<Response<R>, E>,
        attempt: Attempt,
        max_retries: u32,
    ) -> ControlFlow<Result<Response<R>, E>, ContinueRetry<E>> {
        match outcome {
            Ok(response) => self.evaluate_response(response, attempt, max_retries),
            Err(error) => self.evaluate_error(error, attempt, max_retries),
        }
    }

    /// The response is consumed on `Continue`, releasing it before the wait.
    fn evaluate_response<R>(
        &self,
        response: Response<R>,
        attempt: Attempt,
        max_retries: u32,
    ) -> ControlFlow<Result<Response<R>, E>, ContinueRetry<E>> {
        let status = response.status();
        if !self.strategy.should_retry(status) {
            return ControlFlow::Break(Ok(response));
        }

        let reason = RetryReason::Status(status);
        let Some(next_attempt) = attempt.increment(max_retries) else {
            self.emit_exhausted(attempt, &reason);
            return ControlFlow::Break(Ok(response));
        };

        let (delay, source) = self.resolve_delay(response.headers(), attempt);
        self.emit_retry(attempt, delay, source, &reason);
        self.invoke_on_retry(attempt, delay, source, reason);

        ControlFlow::Continue(ContinueRetry {
            attempt: next_attempt,
            delay,
            error: None,
        })
    }

    fn evaluate_error<R>(&self, error: E, attempt: Attempt, max_retries: u32) -> ControlFlow<Result<Response<R>, E>, ContinueRetry<E>> {
        if !self.should_retry_error.call(&error, attempt) {
            return ControlFlow::Break(Err(error));
        }

        let reason = RetryReason::Error(error.to_string());
        let Some(next_attempt) = attempt.increment(max_retries) else {
            self.emit_exhausted(attempt, &reason);
            return ControlFlow::Break(Err(error));
        };

        let delay = self.strategy.calculate_retry_delay(attempt.index());
        self.emit_retry(attempt, delay, DelaySource::Strategy, &reason);
        self.invoke_on_retry(attempt, delay, DelaySource::Strategy, reason);

        ControlFlow::Continue(ContinueRetry {
            attempt: next_attempt,
            delay,
            error: Some(error),
        })
    }

    /// Configured header first, then the well-known headers, then the strategy.
    fn resolve_delay(&self, headers: &HeaderMap, attempt: Attempt) -> (Duration, DelaySource) {
        self.retry_after
            .as_ref()
            .and_then(|header| header.delay_from(headers))
            .or_else(|| delay_from_headers(headers, self.clock.system_time()))
            .map_or_else(
                || (self.strategy.calculate_retry_delay(attempt.index()), DelaySource::Strategy),
                |delay| (delay, DelaySource::Header),
            )
    }

    fn invoke_on_retry(&self, attempt: Attempt, delay: Duration, source: DelaySource, reason: RetryReason) {
        if let Some(on_retry) = &self.on_retry {
            on_retry.call(OnRetryArgs {
                attempt,
                delay,
                source,
                reason,
            });
        }
    }

    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(unused_variables, clippy::unused_self, reason = "unused when logs feature not used")
    )]
    fn emit_retry(&self, attempt: Attempt, delay: Duration, source: DelaySource, reason: &RetryReason) {
        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: telemetry::RETRY_EVENT,
            tracing::Level::WARN,
            retry.policy = %self.name,
            retry.attempt.index = attempt.index(),
            retry.attempt.is_last = attempt.is_last(),
            retry.delay = delay.as_secs_f32(),
            retry.delay.source = source.as_str(),
            retry.reason = %reason,
        );
    }

    #[cfg_attr(
        not(any(feature = "logs", test)),
        expect(unused_variables, clippy::unused_self, reason = "unused when logs feature not used")
    )]
    fn emit_exhausted(&self, attempt: Attempt, reason: &RetryReason) {
        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: telemetry::EXHAUSTED_EVENT,
            tracing::Level::WARN,
            retry.policy = %self.name,
            retry.attempt.index = attempt.index(),
            retry.attempts = attempt.count(),
            retry.reason = %reason,
        );
    }
}

/// State carried into the next iteration of the retry loop.
struct ContinueRetry<E> {
    attempt: Attempt,
    delay: Duration,
    error: Option<E>,
}
