//! Fixed-delay retry combinator.
//!
//! The policy is plain data: how many attempts, how long to wait between
//! them, and which failures are worth another try. No backoff, no jitter.

use std::thread;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Maximum number of attempts, including the first one.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay between attempts (seconds).
pub const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

/// Retry every failure kind.
pub fn retry_always(_: &ClientError) -> bool {
    true
}

/// Retry only connection-level failures and non-success statuses.
pub fn retry_transport(err: &ClientError) -> bool {
    err.is_transport()
}

/// Bounded retry with a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
    pub retry_on: fn(&ClientError) -> bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
            retry_on: retry_always,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts,
            delay,
            retry_on: retry_always,
        }
    }

    pub fn with_predicate(mut self, retry_on: fn(&ClientError) -> bool) -> Self {
        self.retry_on = retry_on;
        self
    }

    /// Run `op` until it succeeds, the predicate declines a failure, or the
    /// attempts run out.
    ///
    /// Sleeps `delay` between attempts, never after the last one. A
    /// non-retryable failure is returned as is; exhaustion is reported as
    /// `ClientError::RetriesExhausted`.
    pub fn run<T, F>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Result<T>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            if attempt > 1 && !self.delay.is_zero() {
                tracing::debug!(
                    attempt,
                    delay_ms = self.delay.as_millis() as u64,
                    "Retrying after delay"
                );
                thread::sleep(self.delay);
            }

            match op(attempt) {
                Ok(value) => return Ok(value),
                Err(e) if !(self.retry_on)(&e) => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    return Err(ClientError::RetriesExhausted {
                        attempts: max_attempts,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        attempt,
                        max_attempts,
                        "Attempt failed, will retry"
                    );
                }
            }

            attempt += 1;
        }
    }
}
