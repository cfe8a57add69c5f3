//! Failure taxonomy for HTTP operations
//!
//! Failures are signaled as values, never panics: a request either could not
//! complete (`Transport`), completed with a non-success status (`Status`), or
//! returned a body that would not decode (`Decode`).

use steadfast_core::HasStatusCode;
use thiserror::Error;

/// A failed HTTP operation
#[derive(Debug, Error)]
pub enum HttpFailure {
    /// The request could not complete: connection refused, DNS failure,
    /// timeout at the transport layer
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request completed but the response status does not indicate
    /// success; the body is kept so callers can inspect the error payload
    #[error("response status does not indicate success: {status}")]
    Status {
        /// HTTP status code of the response
        status: u16,
        /// Response body as received
        body: String,
    },

    /// The response body could not be decoded into the expected shape
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl HttpFailure {
    pub fn is_transport(&self) -> bool {
        matches!(self, HttpFailure::Transport(_))
    }

    pub fn is_status(&self) -> bool {
        matches!(self, HttpFailure::Status { .. })
    }

    /// The HTTP status code, if the request got far enough to receive one
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpFailure::Status { status, .. } => Some(*status),
            HttpFailure::Transport(err) => err.status().map(|s| s.as_u16()),
            HttpFailure::Decode(_) => None,
        }
    }

    /// The response body, for completed-but-unsuccessful outcomes
    pub fn body(&self) -> Option<&str> {
        match self {
            HttpFailure::Status { body, .. } => Some(body),
            _ => None,
        }
    }
}

impl HasStatusCode for HttpFailure {
    fn status_code(&self) -> Option<u16> {
        self.status()
    }
}
