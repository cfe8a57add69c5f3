//! Retry observation and logging
//!
//! The `RetryObserver` trait receives callbacks as the executor drives an
//! operation through its attempts. `TracingObserver` logs them with the
//! `tracing` crate; `StatsObserver` counts them for tests and metrics.

use std::fmt::Display;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

/// Observer for retry attempt events
///
/// Implement this to hook logging, metrics collection, or debugging into the
/// retry loop. All attempt numbers are 1-indexed.
pub trait RetryObserver: Send + Sync {
    /// An attempt is about to start
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32);

    /// An attempt failed with a transient error and will be retried after `delay`
    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration);

    /// The operation succeeded on `attempt`
    fn on_success(&self, attempt: u32, total_duration: Duration);

    /// The attempt budget is exhausted; `final_error` is surfaced to the caller
    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display);

    /// The classifier deemed `error` permanent; no retry will happen
    fn on_permanent(&self, attempt: u32, error: &dyn Display) {
        let _ = (attempt, error);
    }

    /// The execution was cancelled externally
    fn on_cancelled(&self, attempts: u32) {
        let _ = attempts;
    }
}

/// An observer that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl RetryObserver for NoOpObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {}

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display, _delay: Duration) {}

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {}

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {}
}

/// Logs retry events with the `tracing` crate
///
/// Attempt starts log at DEBUG, retried failures at WARN, success after a
/// retry at INFO, exhaustion at ERROR.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    /// Name of the operation being retried, for log context
    operation: String,
}

impl TracingObserver {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("retry")
    }
}

impl RetryObserver for TracingObserver {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        tracing::debug!(
            operation = %self.operation,
            attempt = attempt,
            max_attempts = max_attempts,
            "starting attempt"
        );
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            delay_ms = delay.as_millis() as u64,
            "attempt failed, will retry"
        );
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        if attempt > 1 {
            tracing::info!(
                operation = %self.operation,
                attempt = attempt,
                total_duration_ms = total_duration.as_millis() as u64,
                "succeeded after retry"
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                duration_ms = total_duration.as_millis() as u64,
                "succeeded on first attempt"
            );
        }
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        tracing::error!(
            operation = %self.operation,
            attempts = attempts,
            error = %final_error,
            "attempt budget exhausted"
        );
    }

    fn on_permanent(&self, attempt: u32, error: &dyn Display) {
        tracing::warn!(
            operation = %self.operation,
            attempt = attempt,
            error = %error,
            "permanent failure, not retrying"
        );
    }

    fn on_cancelled(&self, attempts: u32) {
        tracing::warn!(
            operation = %self.operation,
            attempts = attempts,
            "execution cancelled"
        );
    }
}

/// Counts retry events with atomic counters
///
/// Useful for tests and metrics collection.
#[derive(Debug, Default)]
pub struct StatsObserver {
    attempt_starts: AtomicU32,
    failures: AtomicU32,
    successes: AtomicU32,
    exhaustions: AtomicU32,
    permanents: AtomicU32,
    cancellations: AtomicU32,
}

impl StatsObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempt_starts(&self) -> u32 {
        self.attempt_starts.load(Ordering::SeqCst)
    }

    pub fn failures(&self) -> u32 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn successes(&self) -> u32 {
        self.successes.load(Ordering::SeqCst)
    }

    pub fn exhaustions(&self) -> u32 {
        self.exhaustions.load(Ordering::SeqCst)
    }

    pub fn permanents(&self) -> u32 {
        self.permanents.load(Ordering::SeqCst)
    }

    pub fn cancellations(&self) -> u32 {
        self.cancellations.load(Ordering::SeqCst)
    }
}

impl RetryObserver for StatsObserver {
    fn on_attempt_start(&self, _attempt: u32, _max_attempts: u32) {
        self.attempt_starts.fetch_add(1, Ordering::SeqCst);
    }

    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn Display, _delay: Duration) {
        self.failures.fetch_add(1, Ordering::SeqCst);
    }

    fn on_success(&self, _attempt: u32, _total_duration: Duration) {
        self.successes.fetch_add(1, Ordering::SeqCst);
    }

    fn on_exhausted(&self, _attempts: u32, _final_error: &dyn Display) {
        self.exhaustions.fetch_add(1, Ordering::SeqCst);
    }

    fn on_permanent(&self, _attempt: u32, _error: &dyn Display) {
        self.permanents.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cancelled(&self, _attempts: u32) {
        self.cancellations.fetch_add(1, Ordering::SeqCst);
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for std::sync::Arc<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_permanent(&self, attempt: u32, error: &dyn Display) {
        (**self).on_permanent(attempt, error)
    }

    fn on_cancelled(&self, attempts: u32) {
        (**self).on_cancelled(attempts)
    }
}

impl<T: RetryObserver + ?Sized> RetryObserver for Box<T> {
    fn on_attempt_start(&self, attempt: u32, max_attempts: u32) {
        (**self).on_attempt_start(attempt, max_attempts)
    }

    fn on_attempt_failed(&self, attempt: u32, error: &dyn Display, delay: Duration) {
        (**self).on_attempt_failed(attempt, error, delay)
    }

    fn on_success(&self, attempt: u32, total_duration: Duration) {
        (**self).on_success(attempt, total_duration)
    }

    fn on_exhausted(&self, attempts: u32, final_error: &dyn Display) {
        (**self).on_exhausted(attempts, final_error)
    }

    fn on_permanent(&self, attempt: u32, error: &dyn Display) {
        (**self).on_permanent(attempt, error)
    }

    fn on_cancelled(&self, attempts: u32) {
        (**self).on_cancelled(attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::Arc;

    #[test]
    fn noop_observer_accepts_all_events() {
        let observer = NoOpObserver;
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_attempt_failed(1, &error, Duration::from_millis(100));
        observer.on_success(2, Duration::from_millis(500));
        observer.on_exhausted(3, &error);
        observer.on_permanent(1, &error);
        observer.on_cancelled(2);
    }

    #[test]
    fn stats_observer_counts_events() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_attempt_start(2, 3);
        observer.on_attempt_failed(1, &error, Duration::from_millis(100));
        observer.on_success(2, Duration::from_millis(500));

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.successes(), 1);
        assert_eq!(observer.exhaustions(), 0);
    }

    #[test]
    fn stats_observer_counts_exhaustion() {
        let observer = StatsObserver::new();
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 2);
        observer.on_attempt_failed(1, &error, Duration::from_millis(100));
        observer.on_attempt_start(2, 2);
        observer.on_exhausted(2, &error);

        assert_eq!(observer.attempt_starts(), 2);
        assert_eq!(observer.failures(), 1);
        assert_eq!(observer.exhaustions(), 1);
    }

    #[test]
    fn tracing_observer_keeps_operation_name() {
        let observer = TracingObserver::new("fetch-customer");
        assert_eq!(observer.operation(), "fetch-customer");

        let default_observer = TracingObserver::default();
        assert_eq!(default_observer.operation(), "retry");
    }

    #[test]
    fn arc_observer_delegates() {
        let observer = Arc::new(StatsObserver::new());
        let error = io::Error::other("test");

        observer.on_attempt_start(1, 3);
        observer.on_attempt_failed(1, &error, Duration::from_millis(100));

        assert_eq!(observer.attempt_starts(), 1);
        assert_eq!(observer.failures(), 1);
    }
}
