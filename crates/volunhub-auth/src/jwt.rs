//! Session Token Service
//!
//! Signed, stateless session tokens: a fixed 7-day validity window
//! embedded in the token itself, verified purely from the signature and
//! claims. There is no revocation mechanism; a token issued before a
//! credential change stays valid until its embedded expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use volunhub_db::UserRole;

use crate::config::JwtConfig;
use crate::error::{AuthError, AuthResult};
use crate::types::SessionClaims;

/// Token issuer/verifier for session credentials
#[derive(Clone)]
pub struct TokenService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenService {
    /// Create a new token service. The signing secret is an explicit
    /// construction input, not read from the environment.
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a session token embedding identity and role.
    pub fn issue(&self, user_id: &str, email: &str, role: UserRole) -> AuthResult<String> {
        let now = Utc::now();
        let exp = now
            + Duration::from_std(self.config.token_lifetime)
                .map_err(|e| AuthError::Internal(e.to_string()))?;

        let claims = SessionClaims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            iss: self.config.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))?;

        Ok(token)
    }

    /// Verify a session token and return the embedded claims.
    ///
    /// Pure function of the token and the secret: signature, expiry, and
    /// issuer are checked; nothing is looked up server-side.
    pub fn verify(&self, token: &str) -> AuthResult<SessionClaims> {
        let mut validation = Validation::default();
        validation.set_issuer(&[&self.config.issuer]);
        validation.validate_exp = true;

        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }

    /// Token lifetime in whole seconds (used for cookie Max-Age).
    pub fn lifetime_secs(&self) -> u64 {
        self.config.token_lifetime.as_secs()
    }
}
