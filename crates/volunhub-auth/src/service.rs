//! Auth flow orchestrator
//!
//! Sequences register / login / OTP-login / forgot-password /
//! reset-password / profile operations over the user store, the password
//! hasher, the one-time-code capability, the mail sender, and the token
//! service. Each operation runs to completion within a single request;
//! the store's per-document write is the unit of atomicity.

use std::sync::Arc;

use tracing::info;
use volunhub_db::{UserRecord, UserRole, UserStore};

use crate::config::AuthConfig;
use crate::error::{AuthError, AuthResult};
use crate::jwt::TokenService;
use crate::mail::{otp_email, EmailSender};
use crate::middleware::AuthLayer;
use crate::otp::{self, OtpPurpose};
use crate::password::PasswordService;
use crate::types::{ProfileUpdate, PublicProfile};

/// Registration input: required credentials plus optional profile fields.
#[derive(Debug, Clone, Default)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
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

/// Main authentication service combining all auth flows
pub struct AuthService {
    pub password: PasswordService,
    pub tokens: TokenService,
    store: Arc<dyn UserStore>,
    mailer: Arc<dyn EmailSender>,
    config: AuthConfig,
}

impl AuthService {
    /// Create a new auth service. The store and the mail sender are
    /// explicit collaborators; secrets arrive inside `config`.
    pub fn new(
        store: Arc<dyn UserStore>,
        mailer: Arc<dyn EmailSender>,
        config: AuthConfig,
    ) -> Self {
        let password = PasswordService::new(config.password.clone());
        let tokens = TokenService::new(config.jwt.clone());

        Self {
            password,
            tokens,
            store,
            mailer,
            config,
        }
    }

    /// Create a session-validating layer for the Axum router.
    pub fn layer(&self) -> AuthLayer {
        AuthLayer::new(Arc::new(self.tokens.clone()))
    }

    /// Register a new user. Fails if the email is already present; on
    /// success returns the public profile and a session token.
    pub async fn register(&self, input: RegisterInput) -> AuthResult<(PublicProfile, String)> {
        if input.name.trim().is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        if input.email.trim().is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        if input.password.is_empty() {
            return Err(AuthError::MissingField("password"));
        }

        if self.store.find_by_email(&input.email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = self.password.hash_password(&input.password)?;

        let mut user = UserRecord::new(
            input.name,
            input.email,
            password_hash,
            input.role.unwrap_or_default(),
        );
        user.phone = input.phone;
        user.dob = input.dob;
        user.address = input.address;
        user.availability = input.availability;
        user.skills = input.skills;
        user.motivation = input.motivation;
        user.hobbies = input.hobbies.unwrap_or_default();
        user.interests = input.interests.unwrap_or_default();

        // The unique index closes the race between the lookup above and
        // this insert.
        let user = self.store.create(user).await?;

        let token = self.tokens.issue(&user.id, &user.email, user.role)?;

        info!(user_id = %user.id, "New user registered");

        Ok((PublicProfile::from(&user), token))
    }

    /// Log in with email and password. Unknown email and wrong password
    /// are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<(PublicProfile, String)> {
        let user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.password.verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.id, &user.email, user.role)?;

        info!(user_id = %user.id, "User logged in");

        Ok((PublicProfile::from(&user), token))
    }

    /// Request an OTP login code for `email`.
    pub async fn request_otp_login(&self, email: &str) -> AuthResult<()> {
        self.issue_and_send(email, OtpPurpose::Login).await
    }

    /// Request a password-reset code for `email`.
    pub async fn forgot_password(&self, email: &str) -> AuthResult<()> {
        self.issue_and_send(email, OtpPurpose::PasswordReset).await
    }

    /// Issue a one-time code for the given purpose and dispatch it.
    ///
    /// The digest and expiry are persisted before dispatch; a send failure
    /// propagates without rolling the record back, leaving the pending
    /// code to lapse at its expiry.
    async fn issue_and_send(&self, email: &str, purpose: OtpPurpose) -> AuthResult<()> {
        let mut user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let code = otp::issue_code(&mut user, purpose, self.config.otp.expiry);
        user.touch();
        self.store.save(&user).await?;

        let message = otp_email(&user.email, purpose, &code, self.config.otp.expiry);
        self.mailer.send(&message).await?;

        info!(user_id = %user.id, purpose = ?purpose, "One-time code issued");

        Ok(())
    }

    /// Verify an OTP login code. Single-use: both OTP fields are cleared
    /// before the session token is issued.
    pub async fn verify_otp_login(
        &self,
        email: &str,
        code: &str,
    ) -> AuthResult<(PublicProfile, String)> {
        let mut user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        otp::verify_and_consume(&mut user, OtpPurpose::Login, code)?;
        user.touch();
        self.store.save(&user).await?;

        let token = self.tokens.issue(&user.id, &user.email, user.role)?;

        info!(user_id = %user.id, "OTP login verified");

        Ok((PublicProfile::from(&user), token))
    }

    /// Reset the password with a previously requested reset code. Does not
    /// log the user in.
    pub async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_password: &str,
    ) -> AuthResult<()> {
        let mut user = self
            .store
            .find_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        otp::verify_and_consume(&mut user, OtpPurpose::PasswordReset, code)?;

        user.password_hash = self.password.hash_password(new_password)?;
        user.touch();
        self.store.save(&user).await?;

        info!(user_id = %user.id, "Password reset");

        Ok(())
    }

    /// Fetch the public profile of the authenticated user.
    pub async fn profile(&self, user_id: &str) -> AuthResult<PublicProfile> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(PublicProfile::from(&user))
    }

    /// Update the authenticated user's own record.
    ///
    /// Replace-if-non-empty semantics: empty incoming values leave stored
    /// fields untouched, so this endpoint cannot clear a field.
    pub async fn update_profile(
        &self,
        user_id: &str,
        update: ProfileUpdate,
    ) -> AuthResult<PublicProfile> {
        let mut user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if let Some(name) = non_empty(update.name) {
            user.name = name;
        }
        if let Some(email) = non_empty(update.email) {
            if email != user.email {
                if self.store.find_by_email(&email).await?.is_some() {
                    return Err(AuthError::EmailTaken);
                }
                user.email = email;
            }
        }
        if let Some(phone) = non_empty(update.phone) {
            user.phone = Some(phone);
        }
        if let Some(dob) = non_empty(update.dob) {
            user.dob = Some(dob);
        }
        if let Some(address) = non_empty(update.address) {
            user.address = Some(address);
        }
        if let Some(availability) = non_empty(update.availability) {
            user.availability = Some(availability);
        }
        if let Some(skills) = non_empty(update.skills) {
            user.skills = Some(skills);
        }
        if let Some(motivation) = non_empty(update.motivation) {
            user.motivation = Some(motivation);
        }
        if let Some(hobbies) = update.hobbies {
            if !hobbies.is_empty() {
                user.hobbies = hobbies;
            }
        }
        if let Some(interests) = update.interests {
            if !interests.is_empty() {
                user.interests = interests;
            }
        }
        if let Some(password) = update.password {
            if !password.is_empty() {
                user.password_hash = self.password.hash_password(&password)?;
            }
        }

        user.touch();
        self.store.save(&user).await?;

        info!(user_id = %user.id, "Profile updated");

        Ok(PublicProfile::from(&user))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthConfig, PasswordConfig};
    use crate::mail::CapturingEmailSender;
    use chrono::{Duration, Utc};
    use volunhub_db::MemoryUserStore;

    fn test_config() -> AuthConfig {
        let mut config = AuthConfig::default();
        config.jwt.secret = "test-secret-key-for-session-tokens-32b!".to_string();
        config.password = PasswordConfig {
            memory_cost: 4096,
            time_cost: 1,
            parallelism: 1,
            hash_length: 32,
            min_password_length: 6,
        };
        config
    }

    struct Harness {
        service: AuthService,
        store: MemoryUserStore,
        mailer: CapturingEmailSender,
    }

    fn harness() -> Harness {
        let store = MemoryUserStore::new();
        let mailer = CapturingEmailSender::new();
        let service = AuthService::new(
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            test_config(),
        );
        Harness {
            service,
            store,
            mailer,
        }
    }

    fn alice() -> RegisterInput {
        RegisterInput {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "secret1".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_register_issues_token_and_profile() {
        let h = harness();
        let (profile, token) = h.service.register(alice()).await.unwrap();

        assert_eq!(profile.email, "alice@example.com");
        assert_eq!(profile.role, UserRole::Volunteer);

        let claims = h.service.tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, profile.id);
    }

    #[tokio::test]
    async fn test_duplicate_registration_leaves_original_untouched() {
        let h = harness();
        let (original, _) = h.service.register(alice()).await.unwrap();

        let mut second = alice();
        second.name = "Impostor".to_string();
        let err = h.service.register(second).await.unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));

        let stored = h.store.find_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Alice");
        assert_eq!(h.store.len().await, 1);
    }

    #[tokio::test]
    async fn test_register_requires_fields() {
        let h = harness();

        let mut input = alice();
        input.email = String::new();
        assert!(matches!(
            h.service.register(input).await,
            Err(AuthError::MissingField("email"))
        ));

        let mut input = alice();
        input.name = "  ".to_string();
        assert!(matches!(
            h.service.register(input).await,
            Err(AuthError::MissingField("name"))
        ));
    }

    #[tokio::test]
    async fn test_login_success_and_failure() {
        let h = harness();
        let (profile, _) = h.service.register(alice()).await.unwrap();

        let (logged_in, token) = h.service.login("alice@example.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, profile.id);
        let claims = h.service.tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, profile.id);

        let err = h.service.login("alice@example.com", "wrong").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));

        // Unknown email is indistinguishable from a wrong password
        let err = h.service.login("nobody@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_otp_round_trip_single_use() {
        let h = harness();
        h.service.register(alice()).await.unwrap();

        h.service.request_otp_login("alice@example.com").await.unwrap();

        // Digest and expiry were persisted, never the plaintext code
        let stored = h
            .store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        let code = h.mailer.last_code().unwrap();
        assert!(stored.otp_hash.is_some());
        assert_ne!(stored.otp_hash.as_deref(), Some(code.as_str()));
        assert!(stored.otp_expires_at.unwrap() > Utc::now());

        let (profile, token) = h
            .service
            .verify_otp_login("alice@example.com", &code)
            .await
            .unwrap();
        assert_eq!(profile.email, "alice@example.com");
        assert!(h.service.tokens.verify(&token).is_ok());

        // Fields were cleared; replaying the code fails
        let err = h
            .service
            .verify_otp_login("alice@example.com", &code)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[tokio::test]
    async fn test_otp_expiry_checked_lazily() {
        let h = harness();
        h.service.register(alice()).await.unwrap();
        h.service.request_otp_login("alice@example.com").await.unwrap();
        let code = h.mailer.last_code().unwrap();

        // Push the clock past the window by rewriting the stored expiry
        let mut stored = h
            .store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        stored.otp_expires_at = Some(Utc::now() - Duration::seconds(1));
        h.store.save(&stored).await.unwrap();

        let err = h
            .service
            .verify_otp_login("alice@example.com", &code)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[tokio::test]
    async fn test_otp_mismatch_allows_retry() {
        let h = harness();
        h.service.register(alice()).await.unwrap();
        h.service.request_otp_login("alice@example.com").await.unwrap();
        let code = h.mailer.last_code().unwrap();

        let wrong = if code == "000000" { "000001" } else { "000000" };
        let err = h
            .service
            .verify_otp_login("alice@example.com", wrong)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));

        // Pending code survives a mismatch
        h.service
            .verify_otp_login("alice@example.com", &code)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_otp_request_unknown_email() {
        let h = harness();
        let err = h
            .service
            .request_otp_login("nobody@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
        assert!(h.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn test_otp_record_written_even_if_send_fails() {
        let h = harness();
        h.service.register(alice()).await.unwrap();

        h.mailer.fail_next(true);
        let err = h
            .service
            .request_otp_login("alice@example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Mail(_)));

        // Documented dangling-code window: the digest is persisted
        let stored = h
            .store
            .find_by_email("alice@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(stored.otp_hash.is_some());
    }

    #[tokio::test]
    async fn test_reset_password_round_trip() {
        let h = harness();
        h.service.register(alice()).await.unwrap();

        h.service.forgot_password("alice@example.com").await.unwrap();
        let code = h.mailer.last_code().unwrap();

        h.service
            .reset_password("alice@example.com", &code, "newpass9")
            .await
            .unwrap();

        // Old password no longer verifies; the new one does
        assert!(matches!(
            h.service.login("alice@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
        h.service.login("alice@example.com", "newpass9").await.unwrap();

        // Reset code was single-use
        let err = h
            .service
            .reset_password("alice@example.com", &code, "another9")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[tokio::test]
    async fn test_login_and_reset_codes_are_independent() {
        let h = harness();
        h.service.register(alice()).await.unwrap();

        h.service.request_otp_login("alice@example.com").await.unwrap();
        let login_code = h.mailer.last_code().unwrap();
        h.service.forgot_password("alice@example.com").await.unwrap();
        let reset_code = h.mailer.last_code().unwrap();

        // A reset code does not verify the login flow
        if login_code != reset_code {
            let err = h
                .service
                .verify_otp_login("alice@example.com", &reset_code)
                .await
                .unwrap_err();
            assert!(matches!(err, AuthError::InvalidOtp));
        }

        h.service
            .verify_otp_login("alice@example.com", &login_code)
            .await
            .unwrap();
        h.service
            .reset_password("alice@example.com", &reset_code, "newpass9")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_profile_replace_if_non_empty() {
        let h = harness();
        let (profile, _) = h.service.register(alice()).await.unwrap();

        let updated = h
            .service
            .update_profile(
                &profile.id,
                ProfileUpdate {
                    phone: Some("555-0100".to_string()),
                    skills: Some("first aid".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));

        // Empty values never overwrite
        let updated = h
            .service
            .update_profile(
                &profile.id,
                ProfileUpdate {
                    name: Some(String::new()),
                    phone: Some(String::new()),
                    skills: Some("".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Alice");
        assert_eq!(updated.phone.as_deref(), Some("555-0100"));
        assert_eq!(updated.skills.as_deref(), Some("first aid"));
    }

    #[tokio::test]
    async fn test_update_profile_password_rehash() {
        let h = harness();
        let (profile, _) = h.service.register(alice()).await.unwrap();

        h.service
            .update_profile(
                &profile.id,
                ProfileUpdate {
                    password: Some("changed7".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        h.service.login("alice@example.com", "changed7").await.unwrap();
        assert!(matches!(
            h.service.login("alice@example.com", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_update_profile_email_conflict() {
        let h = harness();
        let (profile, _) = h.service.register(alice()).await.unwrap();
        let mut bob = alice();
        bob.email = "bob@example.com".to_string();
        h.service.register(bob).await.unwrap();

        let err = h
            .service
            .update_profile(
                &profile.id,
                ProfileUpdate {
                    email: Some("bob@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn test_stale_token_survives_password_change() {
        // No revocation: a token issued before a credential change stays
        // valid until its embedded expiry.
        let h = harness();
        let (profile, token) = h.service.register(alice()).await.unwrap();

        h.service
            .update_profile(
                &profile.id,
                ProfileUpdate {
                    password: Some("changed7".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(h.service.tokens.verify(&token).is_ok());
    }
}
