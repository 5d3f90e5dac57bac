// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The retry orchestrator.
//!
//! [`RetryPolicy`] sits in front of the rest of an HTTP pipeline and turns transient
//! failures into additional attempts. One call to `process` moves through these states:
//!
//! ```text
//! send copy ─► response, status not retryable ─────────────► return response
//!     ▲      ├► response, retryable, budget left ─► wait ─┐
//!     │      ├► response, retryable, budget spent ─────────► return response
//!     │      ├► error, predicate accepts, budget left ─► wait ─┤
//!     │      └► error otherwise ─────────────────────────────► return RetryError
//!     └───────────────────────────────────────────────────────┘
//! ```
//!
//! Attempts are strictly sequential and the only suspension point between them is the
//! backoff wait.

mod args;
mod builder;
mod callbacks;
mod policy;
#[cfg(any(feature = "logs", test))]
mod telemetry;

pub use args::{DelaySource, OnRetryArgs, RetryReason};
pub use builder::RetryPolicyBuilder;
pub(crate) use callbacks::{EnableIf, OnRetry, ShouldRetryError};
pub use policy::RetryPolicy;
pub(crate) use policy::RetryShared;
