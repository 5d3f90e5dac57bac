// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// Event emitted before waiting for the next attempt.
pub(super) const RETRY_EVENT: &str = "http_retry.retry";

/// Event emitted when an attempt qualified for a retry but the budget was spent.
pub(super) const EXHAUSTED_EVENT: &str = "http_retry.exhausted";

