//! Exponential backoff for crash submission.

use std::time::Duration;

/// Status code the server answers a stored crash with.
pub const HTTP_CREATED: u16 = 201;

/// What the transport does after a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitDecision {
    /// The crash was stored.
    Done,
    /// Sleep for the given delay, then post again.
    RetryAfter(Duration),
    /// Give up and report the response as an error.
    Fail,
}

/// Backoff policy for transient server errors.
///
/// The first retry waits `initial_delay`, each further retry doubles it, and
/// no retry is made once the delay would exceed `max_delay`. With the
/// defaults that is six retries and just over two minutes of waiting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    initial_delay: Duration,
    max_delay: Duration,
    retryable_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(64),
            retryable_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// A policy with custom delays and the default retryable statuses.
    #[must_use]
    pub fn new(initial_delay: Duration, max_delay: Duration) -> Self {
        Self {
            initial_delay,
            max_delay,
            ..Self::default()
        }
    }

    /// Replace the set of statuses considered transient.
    #[must_use]
    pub fn with_retryable_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retryable_statuses = statuses.into();
        self
    }

    /// Delay before the first retry.
    #[must_use]
    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Longest delay a retry may wait.
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        self.max_delay
    }

    /// Whether `status` indicates a transient server error.
    #[must_use]
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `attempt` (zero-based), or `None` once the
    /// policy is exhausted.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Option<Duration> {
        if self.initial_delay.is_zero() {
            return None;
        }
        let factor = 1u32.checked_shl(attempt)?;
        let delay = self.initial_delay.checked_mul(factor)?;
        (delay <= self.max_delay).then_some(delay)
    }

    /// Every delay the policy will wait, in order.
    pub fn schedule(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..).map_while(move |attempt| self.delay_for_attempt(attempt))
    }

    /// Sum of [`schedule()`](Self::schedule).
    #[must_use]
    pub fn total_wait(&self) -> Duration {
        self.schedule().sum()
    }

    /// Decide what to do with `status` received on retry number `attempt`
    /// (zero for the first post).
    #[must_use]
    pub fn decide(&self, status: u16, attempt: u32) -> SubmitDecision {
        if status == HTTP_CREATED {
            return SubmitDecision::Done;
        }
        if !self.is_retryable(status) {
            tracing::debug!(status, "non-retryable submission status");
            return SubmitDecision::Fail;
        }
        match self.delay_for_attempt(attempt) {
            Some(delay) => {
                tracing::debug!(status, attempt, ?delay, "retrying submission");
                SubmitDecision::RetryAfter(delay)
            }
            None => {
                tracing::debug!(status, attempt, "submission retries exhausted");
                SubmitDecision::Fail
            }
        }
    }
}
