//! # steadfast-core
//!
//! Policy-driven retry engine for calling unreliable remote dependencies:
//! - Configurable backoff schedules: none, fixed, incremental, exponential
//! - Pluggable transient-error classification
//! - An executor that drives attempt/wait/retry to a single terminal outcome
//! - Observable retry attempts via the `RetryObserver` trait
//! - Cooperative cancellation via `tokio_util::sync::CancellationToken`
//!
//! # Example
//!
//! ```rust,no_run
//! use steadfast_core::{retry_with_policy, ExecutionError, RetryPolicy};
//!
//! async fn example() -> Result<String, ExecutionError<std::io::Error>> {
//!     let policy = RetryPolicy::default();
//!
//!     retry_with_policy(&policy, || async {
//!         // Your fallible operation here
//!         Ok("success".to_string())
//!     })
//!     .await
//! }
//! ```

pub mod classify;
pub mod error;
pub mod executor;
pub mod observer;
pub mod policy;

pub use classify::{
    AlwaysTransient, ClosureClassifier, HasStatusCode, NeverTransient, StatusClassifier,
    TransientClassifier,
};
pub use error::ExecutionError;
pub use executor::{retry_with_policy, RetryExecutor, RetryExecutorBuilder};
pub use observer::{NoOpObserver, RetryObserver, StatsObserver, TracingObserver};
pub use policy::{compute_delay, Backoff, RetryPolicy};
