// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::{self, Display, Formatter};
use std::time::Duration;

use http::StatusCode;

use crate::Attempt;

/// Where the delay before a retry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DelaySource {
    /// A retry-after header on the response.
    Header,
    /// The policy's [`RetryStrategy`][crate::RetryStrategy].
    Strategy,
}

impl DelaySource {
    /// Short lowercase label, as used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Strategy => "strategy",
        }
    }
}

impl Display for DelaySource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What made an attempt eligible for a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RetryReason {
    /// The response carried a retryable status code.
    Status(StatusCode),
    /// No response was obtained; holds the rendered error.
    Error(String),
}

impl Display for RetryReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "status {status}"),
            Self::Error(message) => write!(f, "error: {message}"),
        }
    }
}

/// Arguments for the [`on_retry`][crate::RetryPolicyBuilder::on_retry] callback.
///
/// Describes the attempt that just failed and the wait that precedes the next one.
#[derive(Debug, Clone)]
pub struct OnRetryArgs {
    pub(super) attempt: Attempt,
    pub(super) delay: Duration,
    pub(super) source: DelaySource,
    pub(super) reason: RetryReason,
}

impl OnRetryArgs {
    /// Returns the attempt that failed.
    #[must_use]
    pub fn attempt(&self) -> Attempt {
        self.attempt
    }

    /// Returns the delay before the next attempt.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Returns where the delay came from.
    #[must_use]
    pub fn source(&self) -> DelaySource {
        self.source
    }

    /// Returns what triggered the retry.
    #[must_use]
    pub fn reason(&self) -> &RetryReason {
        &self.reason
    }
}
