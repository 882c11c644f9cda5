use std::time::Duration;

use crate::config::RetryConfig;

use super::classify::{classify, ErrorKind};
use super::error::FetchError;

/// What to do after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    NoRetry,
    RetryAfter(Duration),
}

/// Exponential backoff for transient fetch failures, built from the `[retry]` table.
///
/// Without a `[retry]` table no policy is built and nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request, the first included.
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

/// Doubling stops growing after this many retries.
const MAX_DOUBLINGS: u32 = 8;

impl RetryPolicy {
    pub fn from_config(cfg: &RetryConfig) -> Self {
        let max_delay = Duration::from_secs(cfg.max_delay_secs);
        let base_delay = Duration::try_from_secs_f64(cfg.base_delay_secs.max(0.0))
            .unwrap_or(max_delay)
            .min(max_delay);
        Self {
            max_attempts: cfg.max_attempts.max(1),
            base_delay,
            max_delay,
        }
    }

    /// Decides whether the request that failed on `attempt` (1-based) with `err` runs again.
    pub fn decide(&self, attempt: u32, err: &FetchError) -> RetryDecision {
        if attempt >= self.max_attempts {
            return RetryDecision::NoRetry;
        }
        match classify(err) {
            ErrorKind::Other => RetryDecision::NoRetry,
            ErrorKind::Timeout
            | ErrorKind::Connection
            | ErrorKind::Throttled
            | ErrorKind::Http5xx(_) => RetryDecision::RetryAfter(self.backoff(attempt)),
        }
    }

    /// `base * 2^(attempt-1)`, capped at `max_delay`.
    fn backoff(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1).min(MAX_DOUBLINGS);
        self.base_delay
            .saturating_mul(1 << doublings)
            .min(self.max_delay)
    }
}
