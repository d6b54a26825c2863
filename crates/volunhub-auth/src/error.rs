//! Authentication error types
//!
//! Errors are designed to be:
//! - Informative for logging/debugging
//! - Safe for external exposure (no sensitive data leakage)
//! - Convertible to HTTP status codes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    // =========================================================================
    // Validation Errors
    // =========================================================================
    /// A required field was missing or empty
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The email is already registered
    #[error("Email is already registered")]
    EmailTaken,

    /// Password does not meet requirements
    #[error("Password does not meet requirements: {0}")]
    WeakPassword(String),

    // =========================================================================
    // Credential Errors
    // =========================================================================
    /// Invalid credentials. Deliberately generic: unknown email and wrong
    /// password are indistinguishable to the caller.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// One-time code did not match the stored digest
    #[error("Invalid one-time code")]
    InvalidOtp,

    /// One-time code is missing or past its expiry; a new one must be
    /// requested
    #[error("One-time code expired or missing")]
    OtpExpired,

    // =========================================================================
    // Token Errors
    // =========================================================================
    /// Session token is invalid (malformed, wrong signature, etc.)
    #[error("Invalid session token")]
    InvalidToken,

    /// Session token has expired
    #[error("Session token has expired")]
    TokenExpired,

    /// No authentication was provided on a protected route
    #[error("Authentication required")]
    Unauthenticated,

    // =========================================================================
    // User State Errors
    // =========================================================================
    /// User not found
    #[error("User not found")]
    UserNotFound,

    // =========================================================================
    // Internal Errors
    // =========================================================================
    /// Password hashing failed
    #[error("Password hashing failed")]
    PasswordHashingFailed,

    /// Mail dispatch failed
    #[error("Mail dispatch failed: {0}")]
    Mail(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error (never exposed to clients)
    #[error("Internal error")]
    Internal(String),
}

impl AuthError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            // 400 Bad Request
            Self::MissingField(_) | Self::EmailTaken | Self::WeakPassword(_) => 400,

            // 401 Unauthorized
            Self::InvalidCredentials
            | Self::InvalidOtp
            | Self::OtpExpired
            | Self::InvalidToken
            | Self::TokenExpired
            | Self::Unauthenticated => 401,

            // 404 Not Found
            Self::UserNotFound => 404,

            // 502 Bad Gateway
            Self::Mail(_) => 502,

            // 500 Internal Server Error
            Self::PasswordHashingFailed | Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Get a stable error code for the client (safe to expose)
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::WeakPassword(_) => "WEAK_PASSWORD",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOtp => "INVALID_OTP",
            Self::OtpExpired => "OTP_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::Mail(_) => "EMAIL_DELIVERY_FAILED",
            Self::PasswordHashingFailed | Self::Database(_) | Self::Internal(_) => {
                "INTERNAL_ERROR"
            }
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Get safe message for client (doesn't leak internal details)
    pub fn client_message(&self) -> String {
        match self {
            Self::Database(_) | Self::Internal(_) | Self::PasswordHashingFailed => {
                "An internal error occurred".to_string()
            }
            Self::Mail(_) => "Failed to send email".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Error response for API clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (machine-readable)
    pub code: String,
    /// Error message (human-readable)
    pub message: String,
}

impl From<&AuthError> for ErrorResponse {
    fn from(error: &AuthError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.client_message(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            _ => Self::InvalidToken,
        }
    }
}

impl From<volunhub_db::DbError> for AuthError {
    fn from(err: volunhub_db::DbError) -> Self {
        use volunhub_db::DbError;
        match err {
            DbError::Duplicate(_) => Self::EmailTaken,
            DbError::NotFound(_) => Self::UserNotFound,
            other => Self::Database(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(AuthError::EmailTaken.status_code(), 400);
        assert_eq!(AuthError::InvalidCredentials.status_code(), 401);
        assert_eq!(AuthError::OtpExpired.status_code(), 401);
        assert_eq!(AuthError::UserNotFound.status_code(), 404);
        assert_eq!(AuthError::Mail("boom".to_string()).status_code(), 502);
        assert_eq!(AuthError::Database("x".to_string()).status_code(), 500);
    }

    #[test]
    fn test_expired_code_distinct_from_mismatch() {
        // Clients re-request on OTP_EXPIRED but may retry on INVALID_OTP.
        assert_ne!(
            AuthError::OtpExpired.error_code(),
            AuthError::InvalidOtp.error_code()
        );
    }

    #[test]
    fn test_client_message_hides_internal_details() {
        let err = AuthError::Database("connection string with password".to_string());
        assert!(!err.client_message().contains("password"));
        assert_eq!(err.client_message(), "An internal error occurred");
    }

    #[test]
    fn test_db_duplicate_maps_to_email_taken() {
        let err: AuthError = volunhub_db::DbError::Duplicate("users.email".to_string()).into();
        assert!(matches!(err, AuthError::EmailTaken));
    }
}
