use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::errors::LlmError;

const DEFAULT_MAX_ATTEMPTS: u32 = 5;
const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

/// Bounded exponential backoff for rate-limited calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first call included.
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn backoff(&self) -> Backoff {
        Backoff {
            max_attempts: self.max_attempts.max(1),
            attempt: 1,
            delay: self.initial_delay,
        }
    }
}

/// Attempt counter plus the delay to use before the next attempt.
#[derive(Debug, Clone)]
pub struct Backoff {
    max_attempts: u32,
    attempt: u32,
    delay: Duration,
}

impl Backoff {
    /// 1-based number of the attempt currently in flight.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Advances to the next attempt and returns how long to wait first.
    /// `None` once the current attempt was the last one.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let delay = self.delay;
        self.attempt += 1;
        self.delay = delay.saturating_mul(2);
        Some(delay)
    }
}

/// Sleeps for `delay` unless `cancel` fires first.
pub async fn sleep_or_cancel(
    delay: Duration,
    cancel: Option<&CancellationToken>,
) -> Result<(), LlmError> {
    match cancel {
        Some(token) => {
            tokio::select! {
                _ = token.cancelled() => Err(LlmError::Cancelled),
                _ = tokio::time::sleep(delay) => Ok(()),
            }
        }
        None => {
            tokio::time::sleep(delay).await;
            Ok(())
        }
    }
}
