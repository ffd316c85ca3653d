//! Error Types for the Course Review API
//!
//! This module defines error handling for the API layer, including:
//! - ApiError struct carried through handlers
//! - ErrorCode enum for categorizing errors
//! - IntoResponse implementation for Axum HTTP responses
//!
//! Every error is rendered as a JSON object with a single `error` string.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use coursereview_core::{BackendError, ConfigError, RevalidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fallback when the auth API rejects a token without saying why.
pub const USER_NOT_FOUND: &str = "User not found";

// ============================================================================
// ERROR CODE ENUM
// ============================================================================

/// Error codes for API responses.
///
/// Each error code maps to a specific HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // ========================================================================
    // Client Errors (4xx)
    // ========================================================================
    /// HTTP method not accepted by the endpoint
    MethodNotAllowed,

    /// Request lacks authentication credentials
    MissingAuthorization,

    /// Credentials did not resolve to a user
    Unauthorized,

    /// Request contains invalid input data
    InvalidInput,

    /// Required field is missing from request
    MissingField,

    // ========================================================================
    // Server Errors (5xx)
    // ========================================================================
    /// Internal server error
    InternalError,

    /// Backend rejected or failed a data operation
    BackendError,

    /// Write succeeded but the revalidation call failed
    RevalidationFailed,

    /// A dependency needed to serve requests is unreachable
    ServiceUnavailable,
}

impl ErrorCode {
    /// Get the HTTP status code for this error code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            ErrorCode::MissingAuthorization | ErrorCode::Unauthorized => {
                StatusCode::UNAUTHORIZED
            }

            ErrorCode::InvalidInput | ErrorCode::MissingField => StatusCode::BAD_REQUEST,

            ErrorCode::InternalError
            | ErrorCode::BackendError
            | ErrorCode::RevalidationFailed => StatusCode::INTERNAL_SERVER_ERROR,

            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Get a default message for this error code.
    pub fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::MethodNotAllowed => "Update attempt not allowed",
            ErrorCode::MissingAuthorization => "No authorization header provided",
            ErrorCode::Unauthorized => USER_NOT_FOUND,
            ErrorCode::InvalidInput => "Invalid input data",
            ErrorCode::MissingField => "Required field is missing",
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::BackendError => "Backend operation failed",
            ErrorCode::RevalidationFailed => "Error revalidating",
            ErrorCode::ServiceUnavailable => "Service unavailable",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

// ============================================================================
// API ERROR STRUCT
// ============================================================================

/// Error returned by handlers.
///
/// The code picks the status; only the message reaches the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    /// Error code categorizing the error
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Wire format of every error response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// Create a new API error with the given code and message.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Create a new API error with the given code, using the default message.
    pub fn from_code(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.default_message().to_string(),
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        self.code.status_code()
    }

    // ========================================================================
    // Convenience constructors for common errors
    // ========================================================================

    /// 405 with the fixed update-endpoint message.
    pub fn method_not_allowed() -> Self {
        Self::from_code(ErrorCode::MethodNotAllowed)
    }

    /// 401 for a request without an `Authorization` header.
    pub fn missing_authorization() -> Self {
        Self::from_code(ErrorCode::MissingAuthorization)
    }

    /// Create an Unauthorized error.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Create a MissingField error.
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingField,
            format!("Required field '{}' is missing", field),
        )
    }

    /// Create an InternalError.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Create a BackendError.
    pub fn backend_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::BackendError, message)
    }

    /// Create a RevalidationFailed error.
    pub fn revalidation_failed(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RevalidationFailed, message)
    }

    /// Create a ServiceUnavailable error.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// ============================================================================
// AXUM INTEGRATION
// ============================================================================

/// Render as `(status, {"error": message})`.
///
/// ```ignore
/// async fn handler() -> Result<Json<Response>, ApiError> {
///     Err(ApiError::unauthorized("Invalid credentials"))
/// }
/// ```
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            error: self.message,
        });
        (status, body).into_response()
    }
}

// ============================================================================
// CONVERSIONS FROM DOMAIN ERRORS
// ============================================================================

/// Auth rejections become 401; everything else from the backend is a 500
/// carrying the backend's own message.
impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match &err {
            BackendError::Auth { message, .. } => {
                ApiError::unauthorized(message.as_deref().unwrap_or(USER_NOT_FOUND))
            }
            _ => {
                tracing::error!(error = %err, "Backend operation failed");
                ApiError::backend_error(err.to_string())
            }
        }
    }
}

impl From<RevalidationError> for ApiError {
    fn from(err: RevalidationError) -> Self {
        ApiError::revalidation_failed(err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::internal_error(err.to_string())
    }
}

/// Convert from serde_json::Error to ApiError.
impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_input(format!("Invalid request body: {}", err))
    }
}

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Result type alias for API operations.
pub type ApiResult<T> = Result<T, ApiError>;
