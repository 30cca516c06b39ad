//! Bounded busy-retry wrapper for write operations.
//!
//! # Responsibility
//! - Re-run a whole write unit when SQLite reports busy/locked contention.
//! - Leave every other failure untouched on first occurrence.
//!
//! # Invariants
//! - `max_attempts` counts the first try; there is never an extra attempt.
//! - The delay before retry `n` is `base_delay * n` (linear backoff).
//! - Exhaustion surfaces the last error unchanged.
//! - No queueing or cross-operation ordering beyond SQLite's own locks.

use super::DbError;
use log::{error, info, warn};
use std::time::{Duration, Instant};

const DEFAULT_MAX_ATTEMPTS: u32 = 3;
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(100);
const DEFAULT_SLOW_THRESHOLD: Duration = Duration::from_millis(100);

/// Classifies errors as transient lock contention.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for DbError {
    fn is_transient(&self) -> bool {
        self.is_busy()
    }
}

impl Transient for rusqlite::Error {
    fn is_transient(&self) -> bool {
        matches!(
            self.sqlite_error_code(),
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked)
        )
    }
}

/// Retry budget and observability thresholds for store writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Successful operations slower than this are logged.
    pub slow_threshold: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            slow_threshold: DEFAULT_SLOW_THRESHOLD,
        }
    }
}

impl RetryPolicy {
    /// Delay slept after failed attempt number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Runs `operation` with thread sleeps between busy retries.
    ///
    /// `label` names the operation in log events.
    pub fn run<T, E, F>(&self, label: &str, operation: F) -> Result<T, E>
    where
        E: Transient + std::fmt::Display,
        F: FnMut() -> Result<T, E>,
    {
        self.run_with_sleep(label, std::thread::sleep, operation)
    }

    /// Same as [`RetryPolicy::run`] with an injectable sleep function.
    pub fn run_with_sleep<T, E, F, S>(
        &self,
        label: &str,
        mut sleep: S,
        mut operation: F,
    ) -> Result<T, E>
    where
        E: Transient + std::fmt::Display,
        F: FnMut() -> Result<T, E>,
        S: FnMut(Duration),
    {
        let max_attempts = self.max_attempts.max(1);
        let started_at = Instant::now();
        let mut attempt = 0;

        loop {
            attempt += 1;
            match operation() {
                Ok(value) => {
                    let elapsed = started_at.elapsed();
                    if elapsed > self.slow_threshold {
                        warn!(
                            "event=db_slow_op module=db status=slow op={} duration_ms={} attempts={}",
                            label,
                            elapsed.as_millis(),
                            attempt
                        );
                    }
                    return Ok(value);
                }
                Err(err) if err.is_transient() && attempt < max_attempts => {
                    let delay = self.delay_for(attempt);
                    info!(
                        "event=db_retry module=db status=retry op={} attempt={}/{} delay_ms={}",
                        label,
                        attempt,
                        max_attempts,
                        delay.as_millis()
                    );
                    sleep(delay);
                }
                Err(err) => {
                    if err.is_transient() {
                        error!(
                            "event=db_retry_exhausted module=db status=error op={} attempts={} error={}",
                            label, attempt, err
                        );
                    } else {
                        error!(
                            "event=db_write module=db status=error op={} attempts={} error={}",
                            label, attempt, err
                        );
                    }
                    return Err(err);
                }
            }
        }
    }
}
