//! Transient-error classification
//!
//! A classifier decides whether a failure is transient (worth retrying) or
//! permanent (surfaced to the caller immediately). Classifiers are pure
//! predicates: same failure in, same answer out, no side effects.

use std::sync::Arc;

/// Decides whether a failure is transient and should be retried
///
/// # Example
///
/// ```rust
/// use steadfast_core::TransientClassifier;
/// use std::io::{Error, ErrorKind};
///
/// struct IoClassifier;
///
/// impl TransientClassifier<Error> for IoClassifier {
///     fn is_transient(&self, error: &Error) -> bool {
///         !matches!(
///             error.kind(),
///             ErrorKind::NotFound | ErrorKind::PermissionDenied | ErrorKind::InvalidInput
///         )
///     }
/// }
/// ```
pub trait TransientClassifier<E: ?Sized>: Send + Sync {
    /// Return true if the operation should be retried for this failure
    fn is_transient(&self, error: &E) -> bool;
}

/// Treats every failure as transient
///
/// This is the reference policy: a completed-but-unsuccessful outcome is as
/// retry-eligible as a connection-level error. Substitute
/// [`StatusClassifier`] when definite client errors should not be retried.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysTransient;

impl<E: ?Sized> TransientClassifier<E> for AlwaysTransient {
    fn is_transient(&self, _error: &E) -> bool {
        true
    }
}

/// Treats every failure as permanent, disabling retries
#[derive(Debug, Clone, Copy)]
pub struct NeverTransient;

impl<E: ?Sized> TransientClassifier<E> for NeverTransient {
    fn is_transient(&self, _error: &E) -> bool {
        false
    }
}

/// Classifies failures with a closure
pub struct ClosureClassifier<F> {
    classify: F,
}

impl<F> ClosureClassifier<F> {
    pub fn new(classify: F) -> Self {
        Self { classify }
    }
}

impl<E, F> TransientClassifier<E> for ClosureClassifier<F>
where
    F: Fn(&E) -> bool + Send + Sync,
{
    fn is_transient(&self, error: &E) -> bool {
        (self.classify)(error)
    }
}

/// A failure that may carry an HTTP status code
pub trait HasStatusCode {
    /// The HTTP status code, if the operation got far enough to receive one
    fn status_code(&self) -> Option<u16>;
}

/// Classifies by HTTP status code
///
/// Failures without a status code (transport-level faults) are treated as
/// transient.
#[derive(Debug, Clone)]
pub struct StatusClassifier {
    transient_codes: Vec<u16>,
}

impl StatusClassifier {
    /// Retry the usual transient statuses: 408, 425, 429, 500, 502, 503, 504
    pub fn default_http() -> Self {
        Self {
            transient_codes: vec![408, 425, 429, 500, 502, 503, 504],
        }
    }

    /// Retry only the given status codes
    pub fn with_codes(codes: Vec<u16>) -> Self {
        Self {
            transient_codes: codes,
        }
    }

    pub fn is_transient_code(&self, code: u16) -> bool {
        self.transient_codes.contains(&code)
    }
}

impl<E: HasStatusCode> TransientClassifier<E> for StatusClassifier {
    fn is_transient(&self, error: &E) -> bool {
        match error.status_code() {
            Some(code) => self.is_transient_code(code),
            // No status means the request never completed
            None => true,
        }
    }
}

impl<E, T: TransientClassifier<E> + ?Sized> TransientClassifier<E> for Arc<T> {
    fn is_transient(&self, error: &E) -> bool {
        (**self).is_transient(error)
    }
}

impl<E, T: TransientClassifier<E> + ?Sized> TransientClassifier<E> for Box<T> {
    fn is_transient(&self, error: &E) -> bool {
        (**self).is_transient(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn always_transient_retries_everything() {
        let classifier = AlwaysTransient;
        let error = io::Error::new(io::ErrorKind::NotFound, "not found");

        assert!(classifier.is_transient(&error));
    }

    #[test]
    fn never_transient_retries_nothing() {
        let classifier = NeverTransient;
        let error = io::Error::new(io::ErrorKind::TimedOut, "timeout");

        assert!(!classifier.is_transient(&error));
    }

    #[test]
    fn closure_classifier_applies_predicate() {
        let classifier = ClosureClassifier::new(|err: &io::Error| {
            matches!(
                err.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
            )
        });

        let timeout = io::Error::new(io::ErrorKind::TimedOut, "timeout");
        let not_found = io::Error::new(io::ErrorKind::NotFound, "not found");

        assert!(classifier.is_transient(&timeout));
        assert!(!classifier.is_transient(&not_found));
    }

    #[test]
    fn status_classifier_defaults() {
        let classifier = StatusClassifier::default_http();

        assert!(classifier.is_transient_code(408));
        assert!(classifier.is_transient_code(429));
        assert!(classifier.is_transient_code(500));
        assert!(classifier.is_transient_code(503));

        assert!(!classifier.is_transient_code(400));
        assert!(!classifier.is_transient_code(401));
        assert!(!classifier.is_transient_code(404));
    }

    struct FakeHttpError(Option<u16>);

    impl HasStatusCode for FakeHttpError {
        fn status_code(&self) -> Option<u16> {
            self.0
        }
    }

    #[test]
    fn status_classifier_treats_missing_status_as_transient() {
        let classifier = StatusClassifier::default_http();

        assert!(classifier.is_transient(&FakeHttpError(None)));
        assert!(classifier.is_transient(&FakeHttpError(Some(502))));
        assert!(!classifier.is_transient(&FakeHttpError(Some(404))));
    }

    #[test]
    fn classification_is_stable_for_the_same_failure() {
        let classifier = StatusClassifier::default_http();
        let error = FakeHttpError(Some(500));

        let first = classifier.is_transient(&error);
        for _ in 0..10 {
            assert_eq!(classifier.is_transient(&error), first);
        }
    }

    #[test]
    fn arc_classifier_delegates() {
        let classifier: Arc<dyn TransientClassifier<io::Error>> = Arc::new(NeverTransient);
        let error = io::Error::new(io::ErrorKind::TimedOut, "timeout");

        assert!(!classifier.is_transient(&error));
    }
}
