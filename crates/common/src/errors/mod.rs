//! Error types for the ChatFlow backend
//!
//! Provides the error taxonomy shared by every handler:
//! - Distinct error kinds for the authorization-relevant failure modes
//! - HTTP status code mapping
//! - Structured error responses with static, non-leaking messages
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing or rejected bearer token
    Unauthenticated,
    /// Widget request from a domain outside the allow-list
    Forbidden,
    /// Resource missing, owned by someone else, or inactive widget target.
    /// Deliberately a single code so tenants cannot be enumerated.
    NotFound,
    /// Missing required header or malformed input
    BadRequest,
    /// The external store, identity, or blob service failed
    StoreFailure,
}

/// Application error types
///
/// Every variant carries the message sent to the caller, except
/// `StoreFailure`, whose message is internal diagnostic context: the wire
/// response for it is a fixed string and the detail only reaches the logs.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Unauthenticated: {message}")]
    Unauthenticated { message: String },

    #[error("Forbidden: {message}")]
    Forbidden { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Store failure: {message}")]
    StoreFailure { message: String },
}

impl AppError {
    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Unauthenticated { .. } => ErrorCode::Unauthenticated,
            AppError::Forbidden { .. } => ErrorCode::Forbidden,
            AppError::NotFound { .. } => ErrorCode::NotFound,
            AppError::BadRequest { .. } => ErrorCode::BadRequest,
            AppError::StoreFailure { .. } => ErrorCode::StoreFailure,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::StoreFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message relayed to the caller.
    ///
    /// Collaborator failures are replaced by a fixed string; their detail
    /// never leaves the server.
    pub fn client_message(&self) -> &str {
        match self {
            AppError::Unauthenticated { message }
            | AppError::Forbidden { message }
            | AppError::NotFound { message }
            | AppError::BadRequest { message } => message,
            AppError::StoreFailure { .. } => {
                "An internal error occurred while contacting the data store."
            }
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

/// Conversion for transport-level failures talking to the platform.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::StoreFailure {
            message: format!("platform request failed: {err}"),
        }
    }
}

/// Structured error response for the API
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetails,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: ErrorCode,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        if self.is_server_error() {
            tracing::error!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Server error"
            );
        } else {
            tracing::warn!(
                error = %self,
                code = ?code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let body = ErrorResponse {
            error: ErrorDetails {
                code,
                message: self.client_message().to_string(),
            },
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let err = AppError::NotFound {
            message: "Chatbot not found or you do not have permission to access it.".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

        let err = AppError::Unauthenticated {
            message: "Authentication token is missing".into(),
        };
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert!(!err.is_server_error());
    }

    #[test]
    fn test_store_failure_detail_is_not_relayed() {
        let err = AppError::StoreFailure {
            message: "postgrest returned 500: relation \"chatbots\" does not exist".into(),
        };
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.is_server_error());
        assert!(!err.client_message().contains("chatbots"));
    }

    #[test]
    fn test_client_errors_relay_their_message() {
        let err = AppError::Forbidden {
            message: "This chatbot is not authorized for this domain.".into(),
        };
        assert_eq!(
            err.client_message(),
            "This chatbot is not authorized for this domain."
        );
    }
}
