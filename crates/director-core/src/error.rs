//! Error types for Director operations.
//!
//! Every failure the client can produce falls into one of five kinds:
//! configuration, connection, malformed payload, service-reported error and
//! not-implemented. Each kind maps to exactly one variant (connection failures
//! are split into "could not reach" and "reached, but not 200").

use serde::Serialize;
use thiserror::Error;

/// Main error type for Director operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid constructor input or accessor parameter
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The service could not be reached at all
    #[error("Couldn't connect to url: {0}")]
    ConnectionFailed(String),

    /// The service answered with a status other than 200
    #[error("Endpoint could not be reached: {endpoint} (status {status})")]
    UnexpectedStatus {
        /// HTTP status code returned by the service
        status: u16,
        /// Endpoint that was requested, without the query string
        endpoint: String,
    },

    /// The response body was not valid JSON, even after sanitization
    #[error("Received malformed JSON: {0}")]
    MalformedPayload(String),

    /// The service parsed the request but reported `stat != "ok"`
    #[error("Director error: {0}")]
    ServiceError(String),

    /// Extension point that is intentionally left unimplemented
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

/// Specialized result type for Director operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Structured error response for serialization.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            Self::ServiceError(_) => "SERVICE_ERROR",
            Self::NotImplemented(_) => "NOT_IMPLEMENTED",
        }
    }

    /// Returns true for failures below the envelope: the request never
    /// produced a body worth decoding.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::UnexpectedStatus { .. }
        )
    }

    /// Returns the message reported by the service, if this is a service error.
    #[must_use]
    pub fn service_message(&self) -> Option<&str> {
        match self {
            Self::ServiceError(message) => Some(message),
            _ => None,
        }
    }

    /// Converts the error into an `ErrorResponse`.
    #[must_use]
    pub fn into_error_response(self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
        }
    }

    /// Returns true if this error should be logged as a serious error.
    #[must_use]
    pub const fn should_log(&self) -> bool {
        matches!(self, Self::ConfigError(_) | Self::MalformedPayload(_))
    }
}

// Conversions from external error types
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::MalformedPayload(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(format!("Invalid configuration: {err}"))
    }
}
