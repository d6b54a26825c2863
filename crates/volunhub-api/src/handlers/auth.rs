//! Authentication handlers
//!
//! One handler per auth-flow operation. Handlers stay thin: they parse the
//! body, call the orchestrator, and translate the outcome into a response
//! plus cookie mutations. Session enforcement happens in the extractors,
//! not here.

use axum::{
    extract::State,
    http::{header::SET_COOKIE, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use volunhub_auth::{OptionalUser, RequireAuth};

use crate::cookie::{clear_session_cookie, session_cookie};
use crate::dto::{
    AckResponse, AuthResponse, CheckAuthResponse, EmailRequest, LoginRequest, RegisterRequest,
    ResetPasswordRequest, VerifyOtpRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = state.auth.register(request.into()).await?;

    let cookie = session_cookie(
        &token,
        state.auth.tokens.lifetime_secs(),
        state.secure_cookies,
    );

    Ok((
        StatusCode::CREATED,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Registration successful".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = state.auth.login(&request.email, &request.password).await?;

    let cookie = session_cookie(
        &token,
        state.auth.tokens.lifetime_secs(),
        state.secure_cookies,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "Login successful".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Stateless: clearing the cookie is all there is to do.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    RequireAuth(_user): RequireAuth,
) -> impl IntoResponse {
    let cookie = clear_session_cookie(state.secure_cookies);

    (
        [(SET_COOKIE, cookie)],
        Json(AckResponse::new("Logged out successfully")),
    )
}

/// POST /api/auth/request-otp-login
pub async fn request_otp_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmailRequest>,
) -> ApiResult<Json<AckResponse>> {
    state.auth.request_otp_login(&request.email).await?;

    // Generic acknowledgement; the code travels only by email.
    Ok(Json(AckResponse::new("OTP sent to email")))
}

/// POST /api/auth/verify-otp-login
pub async fn verify_otp_login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<VerifyOtpRequest>,
) -> ApiResult<impl IntoResponse> {
    let (user, token) = state
        .auth
        .verify_otp_login(&request.email, &request.otp)
        .await?;

    let cookie = session_cookie(
        &token,
        state.auth.tokens.lifetime_secs(),
        state.secure_cookies,
    );

    Ok((
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            message: "OTP login successful".to_string(),
            user,
        }),
    ))
}

/// POST /api/auth/forget-password
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<EmailRequest>,
) -> ApiResult<Json<AckResponse>> {
    state.auth.forgot_password(&request.email).await?;

    Ok(Json(AckResponse::new("Reset OTP sent to email")))
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResetPasswordRequest>,
) -> ApiResult<Json<AckResponse>> {
    state
        .auth
        .reset_password(&request.email, &request.otp, &request.new_password)
        .await?;

    Ok(Json(AckResponse::new("Password reset successfully")))
}

/// GET /api/auth/check-auth
///
/// Non-failing probe: missing, garbage, and expired tokens all come back
/// as `{authenticated: false}` with a 200.
pub async fn check_auth(OptionalUser(user): OptionalUser) -> Json<CheckAuthResponse> {
    Json(CheckAuthResponse {
        authenticated: user.is_some(),
        user,
    })
}

/// GET /api/auth/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
) -> ApiResult<Json<volunhub_auth::PublicProfile>> {
    let profile = state.auth.profile(&user.user_id).await?;
    Ok(Json(profile))
}

/// PUT /api/auth/profile
///
/// Only the authenticated identity can mutate its own record.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    RequireAuth(user): RequireAuth,
    Json(update): Json<volunhub_auth::ProfileUpdate>,
) -> ApiResult<Json<AuthResponse>> {
    let profile = state.auth.update_profile(&user.user_id, update).await?;

    Ok(Json(AuthResponse {
        message: "Profile updated successfully".to_string(),
        user: profile,
    }))
}
