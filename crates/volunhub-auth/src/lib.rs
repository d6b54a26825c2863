//! VolunHub Authentication Layer
//!
//! Credential and one-time-passcode authentication for the VolunHub
//! platform:
//!
//! - **Password Security**: Argon2id hashing with configurable parameters
//! - **Session Tokens**: signed, stateless JWTs carried in a cookie
//! - **Email OTP**: single-use 6-digit codes for passwordless login and
//!   password reset, stored as digests with a 10-minute expiry
//! - **Session Middleware**: cookie extraction and identity propagation
//!   for protected routes
//!
//! # Architecture
//!
//! ```text
//! Request → AuthMiddleware → Handler
//!                │
//!                ▼
//!          TokenService ──► AuthenticatedUser (request extension)
//!
//! Handler ──► AuthService ──► UserStore / EmailSender / TokenService
//! ```
//!
//! Session validity is entirely determined by the token's signature and
//! embedded expiry. There is no revocation list: a token issued before a
//! credential change stays valid until it expires.

pub mod config;
pub mod error;
pub mod jwt;
pub mod mail;
pub mod middleware;
pub mod otp;
pub mod password;
pub mod service;
pub mod types;

pub use config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use jwt::TokenService;
pub use mail::{EmailMessage, EmailSender, HttpEmailSender, LogEmailSender};
pub use middleware::{AuthLayer, AuthMiddleware, OptionalUser, RequireAuth, SESSION_COOKIE};
pub use otp::OtpPurpose;
pub use password::PasswordService;
pub use service::{AuthService, RegisterInput};
pub use types::{AuthenticatedUser, ProfileUpdate, PublicProfile, SessionClaims};

#[cfg(any(test, feature = "mock"))]
pub use mail::CapturingEmailSender;
