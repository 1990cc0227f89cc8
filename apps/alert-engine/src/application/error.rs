//! Pipeline error model.
//!
//! Every failure leaving a use case is a [`PipelineError`]. Its
//! [`ErrorCode`] decides the wire code and whether the caller or the server
//! is at fault.
//!
//! | Code | Status | Fault |
//! |------|--------|-------|
//! | `INVALID_PAYLOAD` | 400 | caller |
//! | `VALIDATION_ERROR` | 400 | caller |
//! | `BROKER_CONNECTION_FAILED` | 500 | server |
//! | `BROKER_REQUEST_FAILED` | 500 | server |
//! | `SERVER_ERROR` | 500 | server |

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ports::BrokerError;
use crate::domain::alert::ValidationError;

/// Wire error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Body missing or not JSON.
    InvalidPayload,
    /// Alert failed validation.
    ValidationError,
    /// Broker unreachable.
    BrokerConnectionFailed,
    /// Broker rejected a call.
    BrokerRequestFailed,
    /// Anything else.
    ServerError,
}

impl ErrorCode {
    /// Wire string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidPayload => "INVALID_PAYLOAD",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BrokerConnectionFailed => "BROKER_CONNECTION_FAILED",
            Self::BrokerRequestFailed => "BROKER_REQUEST_FAILED",
            Self::ServerError => "SERVER_ERROR",
        }
    }

    /// HTTP status code.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidPayload | Self::ValidationError => 400,
            Self::BrokerConnectionFailed | Self::BrokerRequestFailed | Self::ServerError => 500,
        }
    }

    /// True when the caller must change the request.
    #[must_use]
    pub const fn is_client_fault(&self) -> bool {
        matches!(self, Self::InvalidPayload | Self::ValidationError)
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.reason())
    }
}

/// Failure of a pipeline or reconciliation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The alert is malformed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The broker could not be reached.
    #[error("Failed to connect to broker: {message}")]
    BrokerUnavailable {
        /// Error details.
        message: String,
    },

    /// The broker rejected a specific call.
    #[error("Broker request failed: {0}")]
    BrokerRequest(BrokerError),

    /// Anything else. Detail is logged, never returned.
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl PipelineError {
    /// Broker probe returned false.
    #[must_use]
    pub fn broker_unreachable() -> Self {
        Self::BrokerUnavailable {
            message: "broker did not respond".to_string(),
        }
    }

    /// Wire code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::ValidationError,
            Self::BrokerUnavailable { .. } => ErrorCode::BrokerConnectionFailed,
            Self::BrokerRequest(_) => ErrorCode::BrokerRequestFailed,
            Self::Unexpected(_) => ErrorCode::ServerError,
        }
    }

    /// Message safe to return to the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Unexpected(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<BrokerError> for PipelineError {
    fn from(err: BrokerError) -> Self {
        match err {
            BrokerError::ConnectionError { message } => Self::BrokerUnavailable { message },
            BrokerError::Unknown { message } => Self::Unexpected(message),
            other => Self::BrokerRequest(other),
        }
    }
}
