//! Terminal outcome error for retried executions
//!
//! A retried caller and an unretried caller see the same error for the final
//! failure: `Failed` carries the last operation error unmodified, whether the
//! classifier stopped the loop or the attempt budget ran out. Cancellation is
//! a distinct terminal outcome, never conflated with failure.

use std::error::Error;
use std::fmt;
use std::time::Duration;

/// Terminal error of a retried execution
///
/// Generic over `E`, the error type of the operation being retried.
#[derive(Debug)]
pub enum ExecutionError<E> {
    /// The operation failed and will not be retried further
    ///
    /// Produced both when the classifier deems a failure permanent and when
    /// the attempt budget is exhausted; `source` is the original error from
    /// the final attempt, with its category preserved.
    Failed {
        /// Number of attempts made
        attempts: u32,
        /// The error from the final attempt
        source: E,
        /// Total time spent waiting between attempts
        total_wait: Duration,
    },

    /// The execution was cancelled before reaching a success or final failure
    Cancelled {
        /// Number of attempts made before cancellation
        attempts: u32,
        /// The last error observed, if any attempt had completed
        last_error: Option<E>,
    },
}

impl<E> ExecutionError<E> {
    pub fn failed(attempts: u32, source: E, total_wait: Duration) -> Self {
        ExecutionError::Failed {
            attempts,
            source,
            total_wait,
        }
    }

    pub fn cancelled(attempts: u32, last_error: Option<E>) -> Self {
        ExecutionError::Cancelled {
            attempts,
            last_error,
        }
    }

    /// Number of attempts made before this outcome
    pub fn attempts(&self) -> u32 {
        match self {
            ExecutionError::Failed { attempts, .. } => *attempts,
            ExecutionError::Cancelled { attempts, .. } => *attempts,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, ExecutionError::Failed { .. })
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ExecutionError::Cancelled { .. })
    }

    /// The underlying operation error, consuming this error
    pub fn into_source(self) -> Option<E> {
        match self {
            ExecutionError::Failed { source, .. } => Some(source),
            ExecutionError::Cancelled { last_error, .. } => last_error,
        }
    }

    /// A reference to the underlying operation error
    pub fn source_ref(&self) -> Option<&E> {
        match self {
            ExecutionError::Failed { source, .. } => Some(source),
            ExecutionError::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }

    /// Map the operation error type
    pub fn map_source<F, E2>(self, f: F) -> ExecutionError<E2>
    where
        F: FnOnce(E) -> E2,
    {
        match self {
            ExecutionError::Failed {
                attempts,
                source,
                total_wait,
            } => ExecutionError::Failed {
                attempts,
                source: f(source),
                total_wait,
            },
            ExecutionError::Cancelled {
                attempts,
                last_error,
            } => ExecutionError::Cancelled {
                attempts,
                last_error: last_error.map(f),
            },
        }
    }
}

impl<E: fmt::Display> fmt::Display for ExecutionError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Failed {
                attempts,
                source,
                total_wait,
            } => {
                write!(
                    f,
                    "failed after {} attempt(s), {:.2}s spent waiting: {}",
                    attempts,
                    total_wait.as_secs_f64(),
                    source
                )
            }
            ExecutionError::Cancelled {
                attempts,
                last_error,
            } => {
                if let Some(err) = last_error {
                    write!(f, "cancelled after {} attempt(s): {}", attempts, err)
                } else {
                    write!(f, "cancelled after {} attempt(s)", attempts)
                }
            }
        }
    }
}

impl<E: Error + 'static> Error for ExecutionError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ExecutionError::Failed { source, .. } => Some(source),
            ExecutionError::Cancelled {
                last_error: Some(err),
                ..
            } => Some(err),
            ExecutionError::Cancelled {
                last_error: None, ..
            } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn failed_error_reports_attempts() {
        let err: ExecutionError<io::Error> = ExecutionError::failed(
            3,
            io::Error::new(io::ErrorKind::TimedOut, "timeout"),
            Duration::from_secs(5),
        );

        assert!(err.is_failed());
        assert!(!err.is_cancelled());
        assert_eq!(err.attempts(), 3);
    }

    #[test]
    fn cancelled_error_reports_attempts() {
        let err: ExecutionError<io::Error> = ExecutionError::cancelled(2, None);

        assert!(err.is_cancelled());
        assert!(!err.is_failed());
        assert_eq!(err.attempts(), 2);
        assert!(err.source_ref().is_none());
    }

    #[test]
    fn into_source_returns_the_original_error() {
        let err: ExecutionError<String> =
            ExecutionError::failed(3, "original error".to_string(), Duration::from_secs(1));

        assert_eq!(err.into_source(), Some("original error".to_string()));
    }

    #[test]
    fn map_source_preserves_metadata() {
        let err: ExecutionError<i32> = ExecutionError::failed(3, 42, Duration::from_secs(1));

        let mapped = err.map_source(|n| format!("error code: {}", n));
        match mapped {
            ExecutionError::Failed {
                attempts, source, ..
            } => {
                assert_eq!(attempts, 3);
                assert_eq!(source, "error code: 42");
            }
            ExecutionError::Cancelled { .. } => panic!("expected Failed"),
        }
    }

    #[test]
    fn display_includes_attempts_and_source() {
        let err: ExecutionError<io::Error> = ExecutionError::failed(
            3,
            io::Error::new(io::ErrorKind::TimedOut, "connection timeout"),
            Duration::from_secs(5),
        );

        let display = format!("{}", err);
        assert!(display.contains("3 attempt(s)"));
        assert!(display.contains("connection timeout"));
    }

    #[test]
    fn std_error_source_points_at_operation_error() {
        let err: ExecutionError<io::Error> = ExecutionError::failed(
            1,
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
            Duration::ZERO,
        );

        let source = Error::source(&err).unwrap();
        assert!(source.to_string().contains("refused"));
    }
}
