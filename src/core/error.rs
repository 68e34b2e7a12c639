//! Typed error handling for the configuration API
//!
//! Every request-level failure is an [`ApiError`]. Each variant knows its HTTP
//! status and a stable error code, and renders as
//! `{"code": "...", "message": "..."}`.
//!
//! Per-object failures inside batch operations are *not* errors: they are
//! reported as [`OperationOutcome`](crate::core::outcome::OperationOutcome)s
//! alongside the successes.
//!
//! # Example
//!
//! ```rust,ignore
//! let definition = catalog.definition_for("hots")?; // ApiError::UnknownEndpoint
//!
//! match result {
//!     Err(ApiError::UnknownAttribute { attribute, .. }) => {
//!         println!("no such attribute: {}", attribute);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//!     Ok(_) => {}
//! }
//! ```

use axum::Json;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

/// Realm announced in the Basic authentication challenge
pub const AUTH_REALM: &str = "Login Required";

/// Message returned for unexpected failures, never the underlying detail
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong.";

/// The request-level error type of the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or invalid credentials
    #[error("authentication required")]
    Unauthorized,

    /// The requested object type is not exposed
    #[error("unknown endpoint: {endpoint}")]
    UnknownEndpoint { endpoint: String },

    /// A filter names an attribute the object type does not have
    #[error("unknown attribute: {attribute}")]
    UnknownAttribute { endpoint: String, attribute: String },

    /// The key attribute value contains an illegal character
    #[error("illegal character '{character}' in {attribute} value: {value}")]
    InvalidKeyValue {
        attribute: String,
        value: String,
        character: char,
    },

    /// Malformed request (body, query arguments, control action)
    #[error("{message}")]
    BadRequest { message: String },

    /// The object store failed to read or write
    #[error("object store failure: {message}")]
    PersistenceFailure { message: String },

    /// A control action could not be executed
    #[error("unable to execute action {action}: {message}")]
    ExecutionFailure { action: String, message: String },

    /// Unexpected failure; the message is logged but never returned
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::UnknownEndpoint { .. } => StatusCode::NOT_FOUND,
            ApiError::UnknownAttribute { .. } => StatusCode::NOT_FOUND,
            ApiError::InvalidKeyValue { .. } => StatusCode::BAD_REQUEST,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::PersistenceFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::ExecutionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::UnknownEndpoint { .. } => "UNKNOWN_ENDPOINT",
            ApiError::UnknownAttribute { .. } => "UNKNOWN_ATTRIBUTE",
            ApiError::InvalidKeyValue { .. } => "INVALID_KEY_VALUE",
            ApiError::BadRequest { .. } => "BAD_REQUEST",
            ApiError::PersistenceFailure { .. } => "PERSISTENCE_FAILURE",
            ApiError::ExecutionFailure { .. } => "EXECUTION_FAILURE",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    ///
    /// Internal errors are replaced by a generic message.
    pub fn to_response(&self) -> ErrorResponse {
        let message = match self {
            ApiError::Internal(_) => INTERNAL_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };

        ErrorResponse {
            code: self.error_code().to_string(),
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Internal server error: {}", detail);
        }

        let status = self.status_code();
        let mut response = (status, Json(self.to_response())).into_response();

        if status == StatusCode::UNAUTHORIZED {
            let challenge = format!("Basic realm=\"{}\"", AUTH_REALM);
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::BadRequest {
            message: format!("invalid JSON: {}", err),
        }
    }
}

/// A specialized Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
