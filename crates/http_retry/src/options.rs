// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use crate::strategy::{DEFAULT_BASE_DELAY, DEFAULT_MAX_DELAY, DEFAULT_MAX_RETRIES};
use crate::{
    ConfigError, ExponentialBackoff, FixedDelay, RetryAfterHeader, RetryPolicy, RetryPolicyBuilder, RetryStrategy, RetryableStatusCodes,
    TimeUnit,
};

/// A plain-data description of a retry policy, suitable for configuration files.
///
/// Durations are expressed in milliseconds. Every field has a default, so an empty
/// object describes the default policy.
///
/// With the `serde` feature the type can be deserialized, for example from JSON:
///
/// ```json
/// {
///     "strategy": { "type": "exponential", "base_delay_ms": 800, "max_delay_ms": 8000 },
///     "max_retries": 3,
///     "retryable_status_codes": [408, 429, 500, 502, 503, 504],
///     "retry_after_header": "retry-after",
///     "retry_after_time_unit": "seconds"
/// }
/// ```
///
/// # Examples
///
/// ```
/// use http_retry::{RetryOptions, StrategyOptions};
///
/// let mut options = RetryOptions::default();
/// options.strategy = StrategyOptions::Fixed { delay_ms: 100 };
/// options.max_retries = 5;
///
/// let policy = options.build::<Vec<u8>, std::io::Error>("uploads")?;
/// assert_eq!(policy.name(), "uploads");
/// # Ok::<(), http_retry::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(any(feature = "serde", test), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(feature = "serde", test), serde(default))]
#[non_exhaustive]
pub struct RetryOptions {
    /// How delays are computed.
    pub strategy: StrategyOptions,
    /// Retries after the initial attempt.
    pub max_retries: u32,
    /// Status codes that trigger a retry.
    pub retryable_status_codes: Vec<u16>,
    /// Custom header carrying the retry delay. Requires `retry_after_time_unit`.
    pub retry_after_header: Option<String>,
    /// Unit of `retry_after_header`. Requires `retry_after_header`.
    pub retry_after_time_unit: Option<TimeUnit>,
}

/// Strategy selection within [`RetryOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(any(feature = "serde", test), derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(any(feature = "serde", test), serde(tag = "type", rename_all = "snake_case"))]
#[non_exhaustive]
pub enum StrategyOptions {
    /// [`FixedDelay`].
    Fixed {
        /// Delay before every retry.
        delay_ms: u64,
    },
    /// [`ExponentialBackoff`].
    Exponential {
        /// Delay the schedule starts from. Must be positive.
        base_delay_ms: u64,
        /// Cap for any single delay. Must not be below `base_delay_ms`.
        max_delay_ms: u64,
    },
}

impl Default for StrategyOptions {
    fn default() -> Self {
        Self::Exponential {
            base_delay_ms: duration_to_millis(DEFAULT_BASE_DELAY),
            max_delay_ms: duration_to_millis(DEFAULT_MAX_DELAY),
        }
    }
}

impl Default for RetryOptions {
    fn default() -> Self {
        Self {
            strategy: StrategyOptions::default(),
            max_retries: DEFAULT_MAX_RETRIES,
            retryable_status_codes: RetryableStatusCodes::default().iter().map(|status| status.as_u16()).collect(),
            retry_after_header: None,
            retry_after_time_unit: None,
        }
    }
}

impl RetryOptions {
    /// Creates the strategy these options describe.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for invalid exponential delays or status codes.
    pub fn build_strategy(&self) -> Result<Arc<dyn RetryStrategy>, ConfigError> {
        let codes = RetryableStatusCodes::from_u16s(self.retryable_status_codes.iter().copied())?;

        Ok(match self.strategy {
            StrategyOptions::Fixed { delay_ms } => {
                Arc::new(FixedDelay::new(self.max_retries, Duration::from_millis(delay_ms)).retryable_status_codes(codes))
            }
            StrategyOptions::Exponential {
                base_delay_ms,
                max_delay_ms,
            } => Arc::new(
                ExponentialBackoff::new(
                    self.max_retries,
                    Duration::from_millis(base_delay_ms),
                    Duration::from_millis(max_delay_ms),
                )?
                .retryable_status_codes(codes),
            ),
        })
    }

    /// Creates the custom retry-after header binding, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RetryAfterPairMismatch`] if only one of the header name and
    /// the time unit is set, and [`ConfigError::InvalidHeaderName`] for a malformed name.
    pub fn build_retry_after(&self) -> Result<Option<RetryAfterHeader>, ConfigError> {
        match (&self.retry_after_header, self.retry_after_time_unit) {
            (Some(name), Some(unit)) => RetryAfterHeader::new(name, unit).map(Some),
            (None, None) => Ok(None),
            _ => Err(ConfigError::RetryAfterPairMismatch),
        }
    }

    /// Validates the options and returns a pre-configured builder.
    ///
    /// Settings that are not plain data, such as the error predicate or callbacks, can
    /// be added on the returned builder.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the options are invalid.
    pub fn builder<B, E>(&self, name: impl Into<Cow<'static, str>>) -> Result<RetryPolicyBuilder<B, E>, ConfigError> {
        let mut builder = RetryPolicy::builder(name).shared_strategy(self.build_strategy()?);

        if let Some(header) = self.build_retry_after()? {
            builder = builder.retry_after_header(header);
        }

        Ok(builder)
    }

    /// Validates the options and builds the policy.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the options are invalid.
    pub fn build<B, E>(&self, name: impl Into<Cow<'static, str>>) -> Result<RetryPolicy<B, E>, ConfigError> {
        self.builder(name).map(RetryPolicyBuilder::build)
    }
}

fn duration_to_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::io;

    use http::StatusCode;

    use super::*;

    #[test]
    fn defaults_match_builder_defaults() {
        let options = RetryOptions::default();

        assert_eq!(
            options.strategy,
            StrategyOptions::Exponential {
                base_delay_ms: 800,
                max_delay_ms: 8000
            }
        );
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.retryable_status_codes, vec![408, 429, 500, 502, 503, 504]);

        let strategy = options.build_strategy().unwrap();
        assert_eq!(strategy.max_retries(), 3);
        assert!(strategy.calculate_retry_delay(0) <= Duration::from_millis(840));
    }

    #[test]
    fn deserialize_empty_object() {
        let options: RetryOptions = serde_json::from_str("{}").unwrap();

        assert_eq!(options, RetryOptions::default());
    }

    #[test]
    fn deserialize_full() {
        let json = r#"{
            "strategy": { "type": "fixed", "delay_ms": 250 },
            "max_retries": 2,
            "retryable_status_codes": [429],
            "retry_after_header": "x-ms-throttle",
            "retry_after_time_unit": "milliseconds"
        }"#;

        let options: RetryOptions = serde_json::from_str(json).unwrap();

        assert_eq!(options.strategy, StrategyOptions::Fixed { delay_ms: 250 });
        assert_eq!(options.max_retries, 2);

        let strategy = options.build_strategy().unwrap();
        assert_eq!(strategy.calculate_retry_delay(5), Duration::from_millis(250));
        assert!(strategy.should_retry(StatusCode::TOO_MANY_REQUESTS));
        assert!(!strategy.should_retry(StatusCode::SERVICE_UNAVAILABLE));

        let header = options.build_retry_after().unwrap().unwrap();
        assert_eq!(header.name().as_str(), "x-ms-throttle");
        assert_eq!(header.unit(), TimeUnit::Milliseconds);
    }

    #[test]
    fn serialize_round_trips_strategy_tag() {
        let json = serde_json::to_value(StrategyOptions::Fixed { delay_ms: 5 }).unwrap();

        assert_eq!(json, serde_json::json!({ "type": "fixed", "delay_ms": 5 }));
    }

    #[test]
    fn header_without_unit_is_rejected() {
        let options = RetryOptions {
            retry_after_header: Some("retry-after".to_string()),
            ..RetryOptions::default()
        };

        assert_eq!(options.build_retry_after(), Err(ConfigError::RetryAfterPairMismatch));
        assert_eq!(
            options.build::<(), io::Error>("p").unwrap_err(),
            ConfigError::RetryAfterPairMismatch
        );
    }

    #[test]
    fn unit_without_header_is_rejected() {
        let options = RetryOptions {
            retry_after_time_unit: Some(TimeUnit::Seconds),
            ..RetryOptions::default()
        };

        assert_eq!(options.build_retry_after(), Err(ConfigError::RetryAfterPairMismatch));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let options = RetryOptions {
            strategy: StrategyOptions::Exponential {
                base_delay_ms: 0,
                max_delay_ms: 10,
            },
            ..RetryOptions::default()
        };
        assert_eq!(options.build_strategy().unwrap_err(), ConfigError::InvalidBaseDelay);

        let options = RetryOptions {
            retryable_status_codes: vec![1000],
            ..RetryOptions::default()
        };
        assert_eq!(options.build_strategy().unwrap_err(), ConfigError::InvalidStatusCode(1000));

        let options = RetryOptions {
            retry_after_header: Some("not valid".to_string()),
            retry_after_time_unit: Some(TimeUnit::Seconds),
            ..RetryOptions::default()
        };
        assert_eq!(
            options.build_retry_after(),
            Err(ConfigError::InvalidHeaderName("not valid".to_string()))
        );
    }

    #[test]
    fn builder_applies_header() {
        let options = RetryOptions {
            retry_after_header: Some("x-wait".to_string()),
            retry_after_time_unit: Some(TimeUnit::Seconds),
            ..RetryOptions::default()
        };

        let policy = options.builder::<(), io::Error>("p").unwrap().retry_errors().build();

        assert_eq!(policy.shared.retry_after.as_ref().map(|h| h.name().as_str()), Some("x-wait"));
    }
}
