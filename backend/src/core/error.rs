//! Error type system for Roster
//!
//! This module provides the crate-wide error type with:
//! - Classification by failure domain
//! - HTTP status code mapping
//! - JSON error bodies carrying a trace ID

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Main error type for the Roster service
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    // System-level errors
    #[error("System initialization failed: {0}")]
    InitializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),

    #[error("Database unavailable: {0}")]
    DatabaseUnavailable(String),

    // API-related errors
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Task error: {0}")]
    TaskError(String),
}

impl RosterError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RosterError::InvalidRequest(_) | RosterError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }

            RosterError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,

            RosterError::NotFound(_) => StatusCode::NOT_FOUND,

            RosterError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,

            RosterError::Timeout(_) => StatusCode::REQUEST_TIMEOUT,

            RosterError::DatabaseUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,

            RosterError::InitializationError(_)
            | RosterError::DatabaseError(_)
            | RosterError::TaskError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name for API responses
    pub fn error_type(&self) -> &'static str {
        match self {
            RosterError::InitializationError(_) => "InitializationError",
            RosterError::DatabaseError(_) => "DatabaseError",
            RosterError::DatabaseUnavailable(_) => "DatabaseUnavailable",
            RosterError::InvalidRequest(_) => "InvalidRequest",
            RosterError::ValidationError(_) => "ValidationError",
            RosterError::AuthenticationError(_) => "AuthenticationError",
            RosterError::NotFound(_) => "NotFound",
            RosterError::MethodNotAllowed(_) => "MethodNotAllowed",
            RosterError::Timeout(_) => "Timeout",
            RosterError::TaskError(_) => "TaskError",
        }
    }

    /// Whether the message may be shown to API clients verbatim.
    ///
    /// Server-side failures are logged in full but answered with a generic
    /// message so schema and path details do not leak.
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Returns true when this error comes from a UNIQUE constraint violation
    pub fn is_unique_violation(&self) -> bool {
        match self {
            RosterError::DatabaseError(rusqlite::Error::SqliteFailure(err, _)) => {
                err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            }
            _ => false,
        }
    }
}

impl From<JsonRejection> for RosterError {
    fn from(rejection: JsonRejection) -> Self {
        RosterError::InvalidRequest(rejection.body_text())
    }
}

/// Error response structure for API endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique trace ID for this error
    pub trace_id: String,
}

impl ErrorResponse {
    /// Create a new error response with a generated trace ID
    pub fn new(error: String, message: String) -> Self {
        Self {
            error,
            message,
            trace_id: Uuid::new_v4().to_string(),
        }
    }

    /// Replace the generated trace ID with the one assigned to the request
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = trace_id.into();
        self
    }

    /// Create an error response from a RosterError
    pub fn from_error(error: &RosterError) -> Self {
        let message = if error.is_client_error() {
            error.to_string()
        } else {
            "Internal server error".to_string()
        };
        Self::new(error.error_type().to_string(), message)
    }
}

impl fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} (trace_id: {})", self.error, self.message, self.trace_id)
    }
}

impl IntoResponse for RosterError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();
        let error_response = ErrorResponse::from_error(&self);

        // trace_id comes from the enclosing request span
        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        // Kept on the response so middleware can restamp the request's trace ID
        let mut response = (status_code, Json(error_response.clone())).into_response();
        response.extensions_mut().insert(error_response);
        response
    }
}

/// Result type alias for operations that can fail with RosterError
pub type Result<T> = std::result::Result<T, RosterError>;
