//! VolunHub REST API
//!
//! REST surface for the VolunHub volunteer-management platform.
//!
//! # API Structure
//!
//! ```text
//! /api/auth
//! ├── POST /register           - create an account
//! ├── POST /login              - password login
//! ├── POST /logout             - clear the session cookie
//! ├── POST /request-otp-login  - email a login code
//! ├── POST /verify-otp-login   - redeem a login code
//! ├── POST /forget-password    - email a reset code
//! ├── POST /reset-password     - redeem a reset code
//! ├── GET  /check-auth         - non-failing session probe
//! └── GET|PUT /profile         - own profile
//! /health                      - liveness + store probe
//! ```
//!
//! Requests and responses are JSON; the session credential travels in an
//! HttpOnly cookie set by the auth handlers.

pub mod cookie;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

use axum::Router;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// API configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Enable CORS for the browser frontend
    pub enable_cors: bool,
    /// Allowed origins. Credentials are always sent, so wildcard origins
    /// are not accepted here.
    pub cors_origins: Vec<String>,
    /// Enable request tracing
    pub enable_tracing: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["http://localhost:5173".to_string()],
            enable_tracing: true,
        }
    }
}

/// Create the main API router with all middleware
pub fn create_router(state: Arc<AppState>, config: ApiConfig) -> Router {
    let auth_layer = state.auth.layer();

    let mut router = Router::new()
        .nest("/api/auth", routes::auth_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .with_state(state)
        .layer(auth_layer);

    if config.enable_tracing {
        router = router.layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        );
    }

    if config.enable_cors {
        // The SPA sends the session cookie, so origins must be listed
        // explicitly and credentials allowed.
        let cors = CorsLayer::new()
            .allow_origin(
                config
                    .cors_origins
                    .iter()
                    .filter_map(|o| o.parse().ok())
                    .collect::<Vec<_>>(),
            )
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([axum::http::header::CONTENT_TYPE])
            .allow_credentials(true);
        router = router.layer(cors);
    }

    router
}

/// Create a minimal router for testing
pub fn create_test_router(state: Arc<AppState>) -> Router {
    let auth_layer = state.auth.layer();

    Router::new()
        .nest("/api/auth", routes::auth_routes())
        .route("/health", axum::routing::get(handlers::health::health_check))
        .with_state(state)
        .layer(auth_layer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.enable_cors);
        assert!(config.enable_tracing);
        assert!(!config.cors_origins.is_empty());
    }
}
