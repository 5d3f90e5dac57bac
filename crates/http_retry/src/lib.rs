// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Retry policy for HTTP pipelines.
//!
//! Transient failures are a fact of life for clients of remote services: a throttled
//! request (`429`), an overloaded gateway (`503`) or a dropped connection usually
//! succeeds when tried again a little later. This crate provides the policy that sits in
//! front of the rest of an HTTP pipeline and makes those additional attempts.
//!
//! # Core Types
//!
//! - [`RetryPolicy`]: the orchestrator. Sends a copy of the request per attempt through
//!   a [`Next`] stage and decides, per outcome, whether to try again.
//! - [`RetryStrategy`]: decides which status codes are retryable, how many retries are
//!   allowed and how long to wait. [`ExponentialBackoff`] (the default) and
//!   [`FixedDelay`] are provided.
//! - [`RetryAfterHeader`]: binds a custom response header to a [`TimeUnit`] so servers
//!   can dictate the delay. The well-known `retry-after-ms`, `x-ms-retry-after-ms` and
//!   `Retry-After` headers are always honored.
//! - [`RetryOptions`]: plain-data configuration, deserializable with the `serde` feature.
//!
//! # Quick Start
//!
//! ```rust
//! use std::time::Duration;
//!
//! use http::{Request, Response, StatusCode};
//! use http_retry::{Attempt, Execute, ExponentialBackoff, RetryPolicy};
//!
//! # #[tokio::main(flavor = "current_thread", start_paused = true)]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let policy = RetryPolicy::<String, std::io::Error>::builder("my_service")
//!     .strategy(ExponentialBackoff::new(4, Duration::from_millis(200), Duration::from_secs(5))?)
//!     .retry_error_if(|error, _attempt| error.kind() == std::io::ErrorKind::TimedOut)
//!     .on_retry(|args| println!("retrying after {:?}: {}", args.delay(), args.reason()))
//!     .build();
//!
//! // The rest of the pipeline; usually the transport.
//! let next = Execute::new(|request: Request<String>, attempt: Attempt| async move {
//!     let status = if attempt.is_first() { StatusCode::TOO_MANY_REQUESTS } else { StatusCode::OK };
//!     Ok(Response::builder().status(status).body(request.into_body()).unwrap())
//! });
//!
//! let response = policy.process(&Request::new("hello".to_string()), &next).await?;
//! assert_eq!(response.status(), StatusCode::OK);
//! # Ok(())
//! # }
//! ```
//!
//! # Delays
//!
//! After a retryable response the delay is taken from, in order:
//!
//! 1. the custom header configured with [`RetryPolicyBuilder::retry_after_header`],
//! 2. the well-known headers, see [`delay_from_headers`],
//! 3. the strategy's [`calculate_retry_delay`][RetryStrategy::calculate_retry_delay].
//!
//! Retried errors always use the strategy's delay.
//!
//! # Errors
//!
//! Errors from the [`Next`] stage are not retried unless a predicate is configured with
//! [`retry_error_if`][RetryPolicyBuilder::retry_error_if] or
//! [`retry_errors`][RetryPolicyBuilder::retry_errors]. When the call finally fails,
//! [`RetryError`] carries the last error and the errors of all earlier attempts.
//!
//! # Cancellation
//!
//! Waits use Tokio timers and never block a thread. Dropping the future returned by
//! [`RetryPolicy::process`] cancels the call, including a pending wait.
//!
//! # Features
//!
//! - `logs`: emits `tracing` events `http_retry.retry` and `http_retry.exhausted`.
//! - `serde`: `Serialize`/`Deserialize` for [`RetryOptions`] and [`TimeUnit`].

mod attempt;
mod clock;
mod error;
mod next;
mod options;
mod request;
mod retry;
mod retry_after;
mod rnd;
mod strategy;
mod time_unit;
mod utils;

#[cfg(test)]
mod testing;

pub use attempt::Attempt;
pub use clock::Clock;
pub use error::{ConfigError, RetryError};
pub use next::{Execute, Next};
pub use options::{RetryOptions, StrategyOptions};
pub use request::copy_request;
pub use retry::{DelaySource, OnRetryArgs, RetryPolicy, RetryPolicyBuilder, RetryReason};
pub use retry_after::{RetryAfterHeader, delay_from_headers, parse_rfc1123};
pub use strategy::{ExponentialBackoff, FixedDelay, RetryStrategy, RetryableStatusCodes};
pub use time_unit::TimeUnit;
