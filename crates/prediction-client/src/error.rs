//! Error types for the prediction and dashboard HTTP clients.

use sales_forecast_core::ServiceError;
use thiserror::Error;

/// Errors that can occur when talking to the external services.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Service answered with a non-success status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body or reason.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimit {
        /// Seconds to wait before retry.
        retry_after_secs: u64,
    },

    /// Body could not be decoded as JSON of the expected shape.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Body decoded but violates the contract (negative sales, unknown status, ...).
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }

    /// Creates a rate limit error.
    pub fn rate_limit(retry_after_secs: u64) -> Self {
        Self::RateLimit { retry_after_secs }
    }

    /// Creates an invalid payload error.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload(message.into())
    }

    /// Returns true if the error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. }
        )
    }

    /// Returns true if the error indicates the request should be retried later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout(_) | Self::RateLimit { .. } => true,
            Self::Api { status_code, .. } => *status_code >= 500,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<ClientError> for ServiceError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Network(msg) | ClientError::Configuration(msg) => Self::Network(msg),
            ClientError::Timeout(msg) => Self::Timeout(msg),
            ClientError::Api {
                status_code,
                message,
            } => Self::Api {
                status_code,
                message,
            },
            ClientError::RateLimit { retry_after_secs } => Self::RateLimit { retry_after_secs },
            ClientError::Serialization(msg) | ClientError::InvalidPayload(msg) => {
                Self::Malformed(msg)
            }
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_construction() {
        let err = ClientError::api(400, "bad request");
        assert!(matches!(
            err,
            ClientError::Api {
                status_code: 400,
                ..
            }
        ));
        assert!(err.to_string().contains("400"));
        assert!(err.to_string().contains("bad request"));
    }

    #[test]
    fn test_network_error_is_retryable() {
        let err = ClientError::Network("connection refused".to_string());
        assert!(err.is_retryable());
        assert!(err.is_transient());
    }

    #[test]
    fn test_server_error_is_transient() {
        let err = ClientError::api(500, "internal server error");
        assert!(!err.is_retryable());
        assert!(err.is_transient());
    }

    #[test]
    fn test_invalid_payload_is_not_transient() {
        let err = ClientError::invalid_payload("negative sales");
        assert!(!err.is_retryable());
        assert!(!err.is_transient());
    }

    #[test]
    fn test_payload_errors_map_to_malformed() {
        assert_eq!(
            ServiceError::from(ClientError::invalid_payload("negative sales")),
            ServiceError::Malformed("negative sales".to_string())
        );
        assert!(matches!(
            ServiceError::from(ClientError::Serialization("eof".to_string())),
            ServiceError::Malformed(_)
        ));
    }

    #[test]
    fn test_transport_errors_keep_their_kind() {
        assert!(matches!(
            ServiceError::from(ClientError::Timeout("30s".to_string())),
            ServiceError::Timeout(_)
        ));
        assert!(matches!(
            ServiceError::from(ClientError::rate_limit(5)),
            ServiceError::RateLimit {
                retry_after_secs: 5
            }
        ));
        assert!(matches!(
            ServiceError::from(ClientError::api(503, "unavailable")),
            ServiceError::Api {
                status_code: 503,
                ..
            }
        ));
    }
}
