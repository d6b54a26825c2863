//! API error handling
//!
//! Errors from the auth and storage layers surface as structured JSON
//! (`{code, message}`) with the status the auth layer maps them to.
//! Internal detail never reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use volunhub_auth::error::ErrorResponse;
use volunhub_auth::AuthError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl From<volunhub_db::DbError> for ApiError {
    fn from(err: volunhub_db::DbError) -> Self {
        Self::Auth(AuthError::from(err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let Self::Auth(err) = self;

        if err.is_server_error() {
            tracing::error!(error = %err, "Request failed");
        }

        let status =
            StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let body = ErrorResponse::from(&err);

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_mapping() {
        let response = ApiError::Auth(AuthError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = ApiError::Auth(AuthError::EmailTaken).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::Auth(AuthError::UserNotFound).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_db_error_conversion() {
        let err: ApiError = volunhub_db::DbError::Duplicate("email".to_string()).into();
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
