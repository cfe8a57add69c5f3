//! Retry policy configuration and delay calculation
//!
//! A `RetryPolicy` is immutable configuration: it fixes the attempt budget
//! and the backoff schedule, and is safe to share across concurrent
//! executions.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first invocation
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff schedule between attempts
    #[serde(default)]
    pub backoff: Backoff,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_delay")]
    pub initial_delay_ms: u64,

    /// Added to the delay on each further retry (incremental backoff)
    #[serde(default = "default_increment")]
    pub increment_ms: u64,

    /// Multiplier applied per attempt (exponential backoff)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Upper bound on any single delay, in milliseconds
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff: Backoff::default(),
            initial_delay_ms: default_initial_delay(),
            increment_ms: default_increment(),
            backoff_multiplier: default_backoff_multiplier(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt and never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            backoff: Backoff::None,
            ..Self::default()
        }
    }

    /// An incremental policy: wait `initial + increment × (n − 1)` before
    /// retry `n`, for up to `max_attempts` attempts
    pub fn incremental(max_attempts: u32, initial: Duration, increment: Duration) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Incremental,
            initial_delay_ms: initial.as_millis() as u64,
            increment_ms: increment.as_millis() as u64,
            ..Self::default()
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}
fn default_initial_delay() -> u64 {
    1000
}
fn default_increment() -> u64 {
    1000
}
fn default_backoff_multiplier() -> f64 {
    2.0
}
fn default_max_delay() -> u64 {
    30000
}

/// Backoff schedule between retry attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Backoff {
    /// Retry immediately, without waiting
    None,

    /// Constant delay between retries
    Fixed,

    /// Delay grows by a fixed increment per attempt (default)
    #[default]
    Incremental,

    /// Delay grows by a multiplier per attempt
    Exponential,
}

/// Calculate the delay to wait after the given attempt failed
///
/// `attempt` is 1-indexed. The executor only calls this for attempts that
/// will be retried, so `attempt` is always within the policy's budget.
/// The result is capped at `max_delay_ms`; with `jitter` enabled, up to 25%
/// random variation is added on top of the capped value.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use steadfast_core::{compute_delay, RetryPolicy};
///
/// let policy = RetryPolicy::incremental(
///     5,
///     Duration::from_secs(1),
///     Duration::from_secs(1),
/// );
///
/// assert_eq!(compute_delay(&policy, 1, false), Duration::from_secs(1));
/// assert_eq!(compute_delay(&policy, 2, false), Duration::from_secs(2));
/// ```
pub fn compute_delay(policy: &RetryPolicy, attempt: u32, jitter: bool) -> Duration {
    // Attempt is 1-indexed, but we want 0-indexed for calculations
    let attempt_index = u64::from(attempt.saturating_sub(1));

    let base_delay_ms = match policy.backoff {
        Backoff::None => 0,

        Backoff::Fixed => policy.initial_delay_ms,

        Backoff::Incremental => policy
            .initial_delay_ms
            .saturating_add(policy.increment_ms.saturating_mul(attempt_index)),

        Backoff::Exponential => {
            let multiplier = policy.backoff_multiplier.powf(attempt_index as f64);
            (policy.initial_delay_ms as f64 * multiplier) as u64
        }
    };

    let capped_delay_ms = base_delay_ms.min(policy.max_delay_ms);

    // Jitter adds up to 25% random variation to spread out contending callers
    let final_delay_ms = if jitter && capped_delay_ms > 0 {
        let jitter_range = capped_delay_ms / 4;
        capped_delay_ms + rand::rng().random_range(0..=jitter_range)
    } else {
        capped_delay_ms
    };

    Duration::from_millis(final_delay_ms)
}
