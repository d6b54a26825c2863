//! Authentication configuration
//!
//! Centralized configuration for all authentication components. The
//! signing secret and mail credentials are injected here at construction
//! time; business logic never reads the process environment directly.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Session token configuration
    pub jwt: JwtConfig,
    /// Password hashing configuration
    pub password: PasswordConfig,
    /// One-time-code configuration
    pub otp: OtpConfig,
    /// Outbound mail configuration
    pub mail: MailConfig,
}

/// Session token configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens (should be at least 256 bits)
    pub secret: String,
    /// Session token lifetime
    #[serde(with = "humantime_serde")]
    pub token_lifetime: Duration,
    /// Token issuer claim
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set in production
            token_lifetime: Duration::from_secs(7 * 24 * 60 * 60), // 7 days
            issuer: "volunhub".to_string(),
        }
    }
}

/// Password hashing configuration (Argon2id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordConfig {
    /// Memory cost in KiB
    pub memory_cost: u32,
    /// Time cost (iterations)
    pub time_cost: u32,
    /// Parallelism factor
    pub parallelism: u32,
    /// Output hash length in bytes
    pub hash_length: u32,
    /// Minimum password length
    pub min_password_length: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            // OWASP recommended values for Argon2id
            memory_cost: 19456, // 19 MiB
            time_cost: 2,
            parallelism: 1,
            hash_length: 32,
            min_password_length: 6,
        }
    }
}

/// One-time-code configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OtpConfig {
    /// How long an issued code stays valid
    #[serde(with = "humantime_serde")]
    pub expiry: Duration,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            expiry: Duration::from_secs(10 * 60), // 10 minutes
        }
    }
}

/// Outbound mail configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Sender address shown to recipients
    pub from_address: String,
    /// HTTP mail API endpoint. When unset, mail is logged instead of sent.
    pub api_url: Option<String>,
    /// Bearer token for the mail API
    pub api_token: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from_address: "no-reply@volunhub.org".to_string(),
            api_url: None,
            api_token: None,
        }
    }
}

impl AuthConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.jwt.secret.is_empty() {
            errors.push("JWT secret must be set".to_string());
        } else if self.jwt.secret.len() < 32 {
            errors.push("JWT secret should be at least 256 bits (32 bytes)".to_string());
        }

        if self.jwt.token_lifetime.is_zero() {
            errors.push("Session token lifetime must be non-zero".to_string());
        }

        if self.otp.expiry.is_zero() {
            errors.push("OTP expiry must be non-zero".to_string());
        }

        if self.mail.api_url.is_some() && self.mail.api_token.is_none() {
            errors.push("Mail API URL is set but the API token is missing".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
