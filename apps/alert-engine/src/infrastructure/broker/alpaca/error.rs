//! Alpaca-specific error types.

use thiserror::Error;

use crate::application::ports::BrokerError;

/// Errors from the Alpaca adapter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AlpacaError {
    /// API returned a client error we do not categorize further.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code from the API.
        code: String,
        /// Error message from the API.
        message: String,
    },

    /// API returned a 5xx status.
    #[error("Alpaca unavailable ({status}): {message}")]
    Unavailable {
        /// HTTP status.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Order was rejected.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,

    /// Rate limited.
    #[error("Rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Suggested retry delay in seconds.
        retry_after_secs: u64,
    },

    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    JsonParse(String),

    /// Order not found.
    #[error("Order not found: {order_id}")]
    OrderNotFound {
        /// The order ID that was not found.
        order_id: String,
    },
}

impl From<AlpacaError> for BrokerError {
    fn from(err: AlpacaError) -> Self {
        match err {
            AlpacaError::Network(message) => Self::ConnectionError { message },
            AlpacaError::Unavailable { status, message } => Self::ConnectionError {
                message: format!("{status}: {message}"),
            },
            AlpacaError::AuthenticationFailed => Self::ConnectionError {
                message: "Authentication failed".to_string(),
            },
            AlpacaError::Api { code, message } => Self::OrderRejected {
                reason: format!("{code}: {message}"),
            },
            AlpacaError::OrderRejected(reason) => Self::OrderRejected { reason },
            AlpacaError::RateLimited { .. } => Self::RateLimited,
            AlpacaError::JsonParse(message) => Self::Unknown { message },
            AlpacaError::OrderNotFound { order_id } => Self::OrderNotFound { order_id },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_error_is_connection_error() {
        let err = AlpacaError::Network("connection refused".to_string());
        let broker_err: BrokerError = err.into();
        assert!(matches!(broker_err, BrokerError::ConnectionError { .. }));
    }

    #[test]
    fn auth_failure_is_connection_error() {
        let broker_err: BrokerError = AlpacaError::AuthenticationFailed.into();
        assert!(broker_err.is_connectivity());
    }

    #[test]
    fn unavailable_is_connection_error() {
        let broker_err: BrokerError = AlpacaError::Unavailable {
            status: 503,
            message: "maintenance".to_string(),
        }
        .into();
        assert_eq!(
            broker_err,
            BrokerError::ConnectionError {
                message: "503: maintenance".to_string()
            }
        );
    }

    #[test]
    fn rate_limited_maps_through() {
        let err = AlpacaError::RateLimited {
            retry_after_secs: 60,
        };
        let broker_err: BrokerError = err.into();
        assert!(matches!(broker_err, BrokerError::RateLimited));
    }

    #[test]
    fn api_error_is_rejection() {
        let broker_err: BrokerError = AlpacaError::Api {
            code: "40010001".to_string(),
            message: "invalid symbol".to_string(),
        }
        .into();
        assert_eq!(
            broker_err,
            BrokerError::OrderRejected {
                reason: "40010001: invalid symbol".to_string()
            }
        );
    }

    #[test]
    fn parse_error_is_unknown() {
        let broker_err: BrokerError = AlpacaError::JsonParse("eof".to_string()).into();
        assert!(matches!(broker_err, BrokerError::Unknown { .. }));
    }

    #[test]
    fn order_not_found_maps_through() {
        let err = AlpacaError::OrderNotFound {
            order_id: "abc123".to_string(),
        };
        let broker_err: BrokerError = err.into();
        assert!(matches!(broker_err, BrokerError::OrderNotFound { .. }));
    }
}
