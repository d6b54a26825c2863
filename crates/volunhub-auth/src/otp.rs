//! One-time codes
//!
//! A single generic capability used by both the OTP-login and the
//! password-reset flows; [`OtpPurpose`] selects which field pair of the
//! credential record the code lives in. Codes are 6-digit numbers drawn
//! uniformly from [100000, 999999], stored only as SHA-256 digests next to
//! an expiry timestamp, and consumed on first successful verification.
//! Staleness is checked lazily at verification time; there is no cleanup
//! job.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use volunhub_db::UserRecord;

use crate::error::{AuthError, AuthResult};

/// Inclusive bounds of the generated code range.
const CODE_MIN: u32 = 100_000;
const CODE_MAX: u32 = 999_999;

/// Which one-time-code slot of the credential record a flow operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    /// Passwordless login
    Login,
    /// Password reset (independent expiry clock)
    PasswordReset,
}

impl OtpPurpose {
    /// Read the (digest, expiry) pair for this purpose.
    pub fn fields(self, user: &UserRecord) -> (Option<&str>, Option<DateTime<Utc>>) {
        match self {
            Self::Login => (user.otp_hash.as_deref(), user.otp_expires_at),
            Self::PasswordReset => (user.reset_otp_hash.as_deref(), user.reset_otp_expires_at),
        }
    }

    fn fields_mut(
        self,
        user: &mut UserRecord,
    ) -> (&mut Option<String>, &mut Option<DateTime<Utc>>) {
        match self {
            Self::Login => (&mut user.otp_hash, &mut user.otp_expires_at),
            Self::PasswordReset => (&mut user.reset_otp_hash, &mut user.reset_otp_expires_at),
        }
    }
}

/// Generate a random 6-digit code.
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX).to_string()
}

/// SHA-256 hex digest of a code. Codes are never stored or compared in
/// plaintext.
pub fn digest(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Constant-time comparison of a candidate code against a stored digest.
pub fn matches(stored_digest: &str, candidate: &str) -> bool {
    let candidate_digest = digest(candidate);
    stored_digest
        .as_bytes()
        .ct_eq(candidate_digest.as_bytes())
        .into()
}

/// Issue a fresh code for `purpose`: overwrite the slot with the digest
/// and an expiry of now + `ttl`, returning the plaintext code for
/// delivery. Re-issuing replaces any pending code.
pub fn issue_code(user: &mut UserRecord, purpose: OtpPurpose, ttl: std::time::Duration) -> String {
    let code = generate_code();
    let expires_at = Utc::now() + Duration::from_std(ttl).unwrap_or(Duration::zero());

    let (hash_slot, expiry_slot) = purpose.fields_mut(user);
    *hash_slot = Some(digest(&code));
    *expiry_slot = Some(expires_at);

    code
}

/// Verify a candidate code against the slot for `purpose` and consume it.
///
/// A missing digest, missing expiry, or past expiry fails with
/// `OtpExpired`; a digest mismatch fails with `InvalidOtp` and leaves the
/// slot intact so the caller may retry until expiry. On success both
/// fields are cleared (single-use).
pub fn verify_and_consume(
    user: &mut UserRecord,
    purpose: OtpPurpose,
    candidate: &str,
) -> AuthResult<()> {
    let (stored, expires_at) = purpose.fields(user);

    let stored = match (stored, expires_at) {
        (Some(stored), Some(expires_at)) if Utc::now() <= expires_at => stored.to_string(),
        _ => return Err(AuthError::OtpExpired),
    };

    if !matches(&stored, candidate) {
        return Err(AuthError::InvalidOtp);
    }

    let (hash_slot, expiry_slot) = purpose.fields_mut(user);
    *hash_slot = None;
    *expiry_slot = None;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration as StdDuration;
    use volunhub_db::UserRole;

    fn user() -> UserRecord {
        UserRecord::new(
            "Alice".to_string(),
            "alice@example.com".to_string(),
            "$argon2id$fake".to_string(),
            UserRole::Volunteer,
        )
    }

    #[test]
    fn test_code_in_range() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().unwrap();
            assert!((CODE_MIN..=CODE_MAX).contains(&n));
        }
    }

    #[test]
    fn test_digest_is_deterministic_and_opaque() {
        let d = digest("123456");
        assert_eq!(d, digest("123456"));
        assert_eq!(d.len(), 64);
        assert_ne!(d, "123456");
    }

    #[test]
    fn test_matches() {
        let stored = digest("123456");
        assert!(matches(&stored, "123456"));
        assert!(!matches(&stored, "654321"));
    }

    #[test]
    fn test_issue_sets_only_requested_slot() {
        let mut user = user();
        let code = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));

        assert_eq!(user.otp_hash.as_deref(), Some(digest(&code).as_str()));
        assert!(user.otp_expires_at.is_some());
        assert!(user.reset_otp_hash.is_none());
        assert!(user.reset_otp_expires_at.is_none());
    }

    #[test]
    fn test_round_trip_consumes_code() {
        let mut user = user();
        let code = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));

        verify_and_consume(&mut user, OtpPurpose::Login, &code).unwrap();
        assert!(user.otp_hash.is_none());
        assert!(user.otp_expires_at.is_none());

        // Second use of the same code: slot is empty now
        let err = verify_and_consume(&mut user, OtpPurpose::Login, &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[test]
    fn test_mismatch_retains_pending_code() {
        let mut user = user();
        let code = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));

        let err = verify_and_consume(&mut user, OtpPurpose::Login, "000000").unwrap_err();
        assert!(matches!(err, AuthError::InvalidOtp));
        assert!(user.otp_hash.is_some());

        // Retry with the right code still succeeds
        verify_and_consume(&mut user, OtpPurpose::Login, &code).unwrap();
    }

    #[test]
    fn test_expired_code_rejected() {
        let mut user = user();
        let code = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));
        user.otp_expires_at = Some(Utc::now() - Duration::seconds(1));

        let err = verify_and_consume(&mut user, OtpPurpose::Login, &code).unwrap_err();
        assert!(matches!(err, AuthError::OtpExpired));
    }

    #[test]
    fn test_purposes_are_independent() {
        let mut user = user();
        let login_code = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));
        let reset_code = issue_code(
            &mut user,
            OtpPurpose::PasswordReset,
            StdDuration::from_secs(600),
        );

        // Consuming the reset code leaves the login code pending
        verify_and_consume(&mut user, OtpPurpose::PasswordReset, &reset_code).unwrap();
        assert!(user.otp_hash.is_some());

        verify_and_consume(&mut user, OtpPurpose::Login, &login_code).unwrap();
        assert!(user.otp_hash.is_none());
    }

    #[test]
    fn test_reissue_replaces_pending_code() {
        let mut user = user();
        let first = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));
        let second = issue_code(&mut user, OtpPurpose::Login, StdDuration::from_secs(600));

        if first != second {
            let err = verify_and_consume(&mut user, OtpPurpose::Login, &first).unwrap_err();
            assert!(matches!(err, AuthError::InvalidOtp));
        }
        verify_and_consume(&mut user, OtpPurpose::Login, &second).unwrap();
    }
}
