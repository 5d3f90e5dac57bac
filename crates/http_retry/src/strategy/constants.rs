// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::time::Duration;

/// Default maximum retry attempts: 3 (4 attempts in total).
pub(crate) const DEFAULT_MAX_RETRIES: u32 = 3;

/// Base delay for the exponential backoff schedule.
///
/// With doubling this yields roughly 0.8s, 1.6s and 3.2s for the default three retries.
pub(crate) const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(800);

/// Upper bound for any single computed backoff delay.
pub(crate) const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(8);
