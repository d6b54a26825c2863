//! Session middleware for Axum
//!
//! Extracts the session credential from the request's cookie store,
//! validates it, and attaches the authenticated identity to the request
//! context. The middleware itself never rejects a request: protected
//! routes enforce authentication through the [`RequireAuth`] extractor,
//! while the non-failing auth probe reads [`OptionalUser`]. A cookie that
//! was present but failed validation leaves a rejection marker so
//! enforcement can distinguish a bad token from a missing one.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::Response,
};
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::{AuthError, ErrorResponse};
use crate::jwt::TokenService;
use crate::types::AuthenticatedUser;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "vh_session";

/// Marker recorded in request extensions when a session cookie was
/// presented but failed validation.
#[derive(Debug, Clone, Copy)]
pub struct SessionRejected;

/// Session-validating middleware layer
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<TokenService>,
}

impl AuthLayer {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            tokens: self.tokens.clone(),
        }
    }
}

/// Session-validating middleware service
#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    tokens: Arc<TokenService>,
}

impl<S> Service<Request> for AuthMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + Clone + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let tokens = self.tokens.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (mut parts, body) = req.into_parts();

            if let Some(token) = extract_session_token(&parts.headers) {
                match tokens.verify(&token) {
                    Ok(claims) => {
                        parts.extensions.insert(AuthenticatedUser::from(claims));
                    }
                    Err(err) => {
                        tracing::debug!(error = %err, "Session cookie failed validation");
                        parts.extensions.insert(SessionRejected);
                    }
                }
            }

            inner.call(Request::from_parts(parts, body)).await
        })
    }
}

/// Extract the session token from the request's cookies.
pub fn extract_session_token(headers: &axum::http::HeaderMap) -> Option<String> {
    let cookie_header = headers.get("Cookie")?;
    let cookies = cookie_header.to_str().ok()?;

    for cookie in cookies.split(';') {
        let cookie = cookie.trim();
        if let Some(value) = cookie.strip_prefix(SESSION_COOKIE) {
            if let Some(value) = value.strip_prefix('=') {
                return Some(value.to_string());
            }
        }
    }

    None
}

/// Create an error response for authentication failures
pub fn auth_error_response(error: AuthError) -> Response {
    let status =
        StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let response = ErrorResponse::from(&error);

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .body(Body::from(
            serde_json::to_string(&response).unwrap_or_default(),
        ))
        .unwrap_or_else(|_| Response::new(Body::empty()))
}

// =============================================================================
// Axum Extractors
// =============================================================================

/// Extractor for the authenticated identity (optional).
///
/// Never rejects: `None` covers both a missing cookie and one that failed
/// validation, which is what the auth-check probe needs.
pub struct OptionalUser(pub Option<AuthenticatedUser>);

#[async_trait]
impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            parts.extensions.get::<AuthenticatedUser>().cloned(),
        ))
    }
}

/// Extractor for the required authenticated identity.
///
/// Rejects with 401: `INVALID_TOKEN` when a cookie was presented but
/// failed validation, `UNAUTHENTICATED` when none was presented.
pub struct RequireAuth(pub AuthenticatedUser);

#[async_trait]
impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>().cloned() {
            return Ok(RequireAuth(user));
        }

        if parts.extensions.get::<SessionRejected>().is_some() {
            Err(auth_error_response(AuthError::InvalidToken))
        } else {
            Err(auth_error_response(AuthError::Unauthenticated))
        }
    }
}
