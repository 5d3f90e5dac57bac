// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt::Display;

/// A single attempt of a logical HTTP call.
///
/// The retry policy creates a fresh `Attempt` for every send and hands it to the
/// next pipeline stage together with the request copy. The value is immutable; the
/// policy never stores the attempt count in shared request state.
///
/// The default attempt has:
/// - `index`: 0 (first attempt, 0-based indexing)
/// - `is_last`: true (no retries are allowed after it)
///
/// # Examples
///
/// ```
/// use http_retry::Attempt;
///
/// let attempt = Attempt::new(0, false);
/// assert!(attempt.is_first());
/// assert!(!attempt.is_last());
/// assert_eq!(attempt.index(), 0);
///
/// let last_attempt = Attempt::new(3, true);
/// assert!(!last_attempt.is_first());
/// assert!(last_attempt.is_last());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attempt {
    index: u32,
    is_last: bool,
}

impl Default for Attempt {
    fn default() -> Self {
        Self::new(0, true)
    }
}

impl Attempt {
    /// Creates a new attempt with the given index.
    #[must_use]
    pub fn new(index: u32, is_last: bool) -> Self {
        Self { index, is_last }
    }

    /// Returns true if this is the initial attempt (index 0).
    #[must_use]
    pub fn is_first(self) -> bool {
        self.index == 0
    }

    /// Returns true if no retry will follow this attempt, whatever its outcome.
    #[must_use]
    pub fn is_last(self) -> bool {
        self.is_last
    }

    /// Returns the attempt index (0-based). Equals the number of attempts made before this one.
    #[must_use]
    pub fn index(self) -> u32 {
        self.index
    }

    /// Returns the total number of attempts made once this attempt completes.
    #[must_use]
    pub fn count(self) -> u32 {
        self.index.saturating_add(1)
    }

    pub(crate) fn first(max_retries: u32) -> Self {
        Self::new(0, max_retries == 0)
    }

    /// Moves to the next attempt, or `None` when the retry budget is spent.
    pub(crate) fn increment(self, max_retries: u32) -> Option<Self> {
        if self.index >= max_retries {
            return None;
        }

        let next = self.index + 1;
        Some(Self::new(next, next == max_retries))
    }
}

impl Display for Attempt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.index.fmt(f)
    }
}
