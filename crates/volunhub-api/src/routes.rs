//! API routes

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::handlers;
use crate::state::AppState;

/// Authentication and profile routes, mounted under `/api/auth`.
pub fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/request-otp-login", post(handlers::auth::request_otp_login))
        .route("/verify-otp-login", post(handlers::auth::verify_otp_login))
        .route("/forget-password", post(handlers::auth::forgot_password))
        .route("/reset-password", post(handlers::auth::reset_password))
        .route("/check-auth", get(handlers::auth::check_auth))
        .route("/profile", get(handlers::auth::get_profile))
        .route("/profile", put(handlers::auth::update_profile))
}
