//! Retry execution engine
//!
//! Drives one operation through attempt/wait/retry iterations to a single
//! terminal outcome. The executor is immutable once built; every `execute`
//! call owns its own attempt counter and timing state, so a shared executor
//! can serve concurrent calls without coordination.

use std::fmt::Display;
use std::future::Future;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::classify::{AlwaysTransient, TransientClassifier};
use crate::error::ExecutionError;
use crate::observer::{NoOpObserver, RetryObserver};
use crate::policy::{compute_delay, RetryPolicy};

/// Execute an async operation with retry logic based on a policy
///
/// Convenience for simple scenarios: every failure is treated as transient
/// and nothing is observed. For more control, use `RetryExecutorBuilder`.
///
/// # Example
///
/// ```rust,no_run
/// use steadfast_core::{retry_with_policy, RetryPolicy};
///
/// async fn example() {
///     let policy = RetryPolicy::default();
///
///     let result = retry_with_policy(&policy, || async {
///         Ok::<_, std::io::Error>("success")
///     })
///     .await;
/// }
/// ```
pub async fn retry_with_policy<F, Fut, T, E>(
    policy: &RetryPolicy,
    op: F,
) -> Result<T, ExecutionError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    RetryExecutorBuilder::new()
        .with_policy(policy.clone())
        .build()
        .execute(op)
        .await
}

/// Builder for a `RetryExecutor`
///
/// # Example
///
/// ```rust
/// use steadfast_core::{RetryExecutorBuilder, RetryPolicy, StatusClassifier, TracingObserver};
///
/// let executor = RetryExecutorBuilder::new()
///     .with_policy(RetryPolicy::default())
///     .with_classifier(StatusClassifier::default_http())
///     .with_observer(TracingObserver::new("fetch"))
///     .with_jitter(false)
///     .build();
/// ```
pub struct RetryExecutorBuilder<C = AlwaysTransient, O = NoOpObserver> {
    policy: RetryPolicy,
    classifier: C,
    observer: O,
    jitter: bool,
    cancel: Option<CancellationToken>,
}

impl Default for RetryExecutorBuilder<AlwaysTransient, NoOpObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryExecutorBuilder<AlwaysTransient, NoOpObserver> {
    pub fn new() -> Self {
        Self {
            policy: RetryPolicy::default(),
            classifier: AlwaysTransient,
            observer: NoOpObserver,
            jitter: true,
            cancel: None,
        }
    }
}

impl<C, O> RetryExecutorBuilder<C, O> {
    /// Set the retry policy
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the transient-error classifier
    ///
    /// The classifier decides which failures are retried. The default treats
    /// every failure as transient.
    pub fn with_classifier<C2>(self, classifier: C2) -> RetryExecutorBuilder<C2, O> {
        RetryExecutorBuilder {
            policy: self.policy,
            classifier,
            observer: self.observer,
            jitter: self.jitter,
            cancel: self.cancel,
        }
    }

    /// Set the observer receiving callbacks during execution
    pub fn with_observer<O2>(self, observer: O2) -> RetryExecutorBuilder<C, O2> {
        RetryExecutorBuilder {
            policy: self.policy,
            classifier: self.classifier,
            observer,
            jitter: self.jitter,
            cancel: self.cancel,
        }
    }

    /// Enable or disable jitter on inter-attempt delays
    ///
    /// Jitter spreads out contending callers. Enabled by default; disable it
    /// when delay timing must be exact.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Attach a cancellation token
    ///
    /// The token is checked before each attempt and during each inter-attempt
    /// wait; once cancelled, no further attempt starts.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn build(self) -> RetryExecutor<C, O> {
        RetryExecutor {
            policy: self.policy,
            classifier: self.classifier,
            observer: self.observer,
            jitter: self.jitter,
            cancel: self.cancel,
        }
    }
}

/// A retry executor with configurable policy, classifier, and observer
///
/// Use `RetryExecutorBuilder` to create one.
pub struct RetryExecutor<C, O> {
    policy: RetryPolicy,
    classifier: C,
    observer: O,
    jitter: bool,
    cancel: Option<CancellationToken>,
}

impl<C, O> RetryExecutor<C, O>
where
    O: RetryObserver,
{
    /// Execute an operation, retrying transient failures per the policy
    ///
    /// Returns the operation's value on the first success. On a permanent
    /// failure, or when the attempt budget runs out, returns
    /// `ExecutionError::Failed` carrying the final attempt's error unchanged.
    /// A cancelled execution resolves to `ExecutionError::Cancelled` without
    /// starting another attempt.
    pub async fn execute<F, Fut, T, E>(&self, mut op: F) -> Result<T, ExecutionError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
        C: TransientClassifier<E>,
    {
        // A policy always buys at least one attempt
        let max_attempts = self.policy.max_attempts.max(1);
        let start = Instant::now();
        let mut total_wait = Duration::ZERO;
        let mut attempt: u32 = 1;

        loop {
            if let Some(token) = &self.cancel {
                if token.is_cancelled() {
                    self.observer.on_cancelled(attempt - 1);
                    return Err(ExecutionError::cancelled(attempt - 1, None));
                }
            }

            self.observer.on_attempt_start(attempt, max_attempts);

            match op().await {
                Ok(value) => {
                    self.observer.on_success(attempt, start.elapsed());
                    return Ok(value);
                }
                Err(err) => {
                    if !self.classifier.is_transient(&err) {
                        self.observer.on_permanent(attempt, &err);
                        return Err(ExecutionError::failed(attempt, err, total_wait));
                    }

                    if attempt >= max_attempts {
                        self.observer.on_exhausted(attempt, &err);
                        return Err(ExecutionError::failed(attempt, err, total_wait));
                    }

                    // Only reached for attempts that will be retried, so the
                    // attempt number stays within the policy's budget
                    let delay = compute_delay(&self.policy, attempt, self.jitter);
                    self.observer.on_attempt_failed(attempt, &err, delay);

                    if !delay.is_zero() {
                        match &self.cancel {
                            Some(token) => {
                                tokio::select! {
                                    _ = token.cancelled() => {
                                        self.observer.on_cancelled(attempt);
                                        return Err(ExecutionError::cancelled(attempt, Some(err)));
                                    }
                                    _ = tokio::time::sleep(delay) => {}
                                }
                            }
                            None => tokio::time::sleep(delay).await,
                        }
                        total_wait += delay;
                    }

                    attempt += 1;
                }
            }
        }
    }
}
