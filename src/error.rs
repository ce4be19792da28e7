//! Domain error types for the test run reporter.
//!
//! Uses thiserror for ergonomic error handling with automatic Display
//! implementations. Mapping never fails; the only fallible path is
//! delivery.

/// Delivery failure surfaced by the transport client once retries are
/// exhausted (or immediately, for terminal failures).
///
/// Preserves whether a response was received (and its status) or the
/// request never reached the server at all, so callers can log and classify
/// meaningfully.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// A response was received with a non-2xx status
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never completed (connection refused, DNS failure,
    /// reset, timeout)
    #[error("request failed: {0}")]
    Network(String),

    /// The HTTP client could not be constructed from the configuration
    #[error("invalid client configuration: {0}")]
    InvalidClient(String),
}

impl DeliveryError {
    /// The HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Network(_) | Self::InvalidClient(_) => None,
        }
    }

    /// Whether another attempt is worthwhile: no response at all, or a
    /// server-class (5xx) status. Client-class (4xx) statuses are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => (500..600).contains(status),
            Self::InvalidClient(_) => false,
        }
    }
}

impl From<reqwest::Error> for DeliveryError {
    fn from(err: reqwest::Error) -> Self {
        DeliveryError::Network(err.to_string())
    }
}

/// Convenience type alias for delivery results.
pub type DeliveryResult<T> = Result<T, DeliveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        assert!(DeliveryError::Network("connection refused".to_string()).is_retryable());
    }

    #[test]
    fn test_server_errors_are_retryable() {
        for status in [500, 502, 503, 599] {
            let err = DeliveryError::Status {
                status,
                body: String::new(),
            };
            assert!(err.is_retryable(), "status {} should be retryable", status);
        }
    }

    #[test]
    fn test_client_errors_are_terminal() {
        for status in [400, 404, 422, 499] {
            let err = DeliveryError::Status {
                status,
                body: String::new(),
            };
            assert!(!err.is_retryable(), "status {} should be terminal", status);
        }
    }

    #[test]
    fn test_status_accessor() {
        let err = DeliveryError::Status {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(DeliveryError::Network("reset".to_string()).status(), None);
    }
}
