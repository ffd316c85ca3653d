//! Error types for course review operations

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required configuration field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Errors reported by the hosted backend (auth and data APIs).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    /// The auth API refused to resolve a token.
    ///
    /// `message` is whatever the auth API put in its error body, if anything.
    #[error("Authentication rejected with status {status}: {}", .message.as_deref().unwrap_or("<no message>"))]
    Auth { status: u16, message: Option<String> },

    /// The data API rejected a query or mutation.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The backend answered with a body we could not decode.
    #[error("Invalid response from backend: {reason}")]
    InvalidResponse { reason: String },

    /// The request never completed (connect, TLS, timeout).
    #[error("{0}")]
    Transport(String),
}

impl BackendError {
    /// Message suitable for surfacing to the caller.
    ///
    /// `Rejected` and `Transport` surface the backend's own text; `Auth`
    /// surfaces the auth API message when one was given.
    pub fn caller_message(&self) -> Option<&str> {
        match self {
            BackendError::Auth { message, .. } => message.as_deref(),
            BackendError::Rejected { message, .. } => Some(message),
            BackendError::InvalidResponse { reason } => Some(reason),
            BackendError::Transport(message) => Some(message),
        }
    }
}

/// Errors from the on-demand revalidation call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RevalidationError {
    /// The revalidation endpoint answered with a non-2xx status.
    #[error("Error revalidating")]
    Status { status: u16 },

    /// The revalidation endpoint could not be reached.
    #[error("{0}")]
    Transport(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_displays_backend_message() {
        let err = BackendError::Rejected {
            status: 404,
            message: "row not found".to_string(),
        };
        assert_eq!(err.to_string(), "row not found");
        assert_eq!(err.caller_message(), Some("row not found"));
    }

    #[test]
    fn test_auth_without_message() {
        let err = BackendError::Auth {
            status: 401,
            message: None,
        };
        assert_eq!(err.caller_message(), None);
        assert!(err.to_string().contains("401"));
    }

    #[test]
    fn test_revalidation_status_message() {
        let err = RevalidationError::Status { status: 503 };
        assert_eq!(err.to_string(), "Error revalidating");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingRequired {
            field: "SUPABASE_URL".to_string(),
        };
        assert!(err.to_string().contains("SUPABASE_URL"));
    }
}
