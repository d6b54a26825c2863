//! Request and response bodies
//!
//! Field names mirror the frontend's JSON wire format.

use serde::{Deserialize, Serialize};
use volunhub_auth::{AuthenticatedUser, PublicProfile, RegisterInput};
use volunhub_db::UserRole;

/// Registration request: required credentials plus optional profile fields.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub role: Option<UserRole>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub availability: Option<String>,
    pub skills: Option<String>,
    pub motivation: Option<String>,
    pub hobbies: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        RegisterInput {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
            phone: req.phone,
            dob: req.dob,
            address: req.address,
            availability: req.availability,
            skills: req.skills,
            motivation: req.motivation,
            hobbies: req.hobbies,
            interests: req.interests,
        }
    }
}

/// Password login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Request carrying only an email (OTP login / forgot password)
#[derive(Debug, Deserialize)]
pub struct EmailRequest {
    #[serde(default)]
    pub email: String,
}

/// OTP verification request
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
}

/// Password reset request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub new_password: String,
}

/// Generic acknowledgement
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub message: String,
}

impl AckResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Profile plus a human-readable outcome message
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub user: PublicProfile,
}

/// Non-failing session probe result
#[derive(Debug, Serialize)]
pub struct CheckAuthResponse {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthenticatedUser>,
}
