//! Credential record model
//!
//! The stored representation of a user's login and profile state. One
//! document per user in the `users` collection; `email` is unique.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Regular volunteer
    #[default]
    Volunteer,
    /// Event organizer
    Organizer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Volunteer => write!(f, "volunteer"),
            Self::Organizer => write!(f, "organizer"),
        }
    }
}

/// A credential record: login credentials, profile attributes, and
/// transient one-time-code state.
///
/// `password_hash` and the `*_otp_*` fields never leave the server; client
/// responses are built from a separate projection. A stored OTP digest
/// whose paired expiry has passed is meaningless and must be treated as
/// absent by verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    /// Document id (UUID v4, stored as string)
    #[serde(rename = "_id")]
    pub id: String,
    /// Unique email, stored case-sensitively
    pub email: String,
    /// Argon2id hash of the password (PHC string)
    pub password_hash: String,
    /// Role, defaults to volunteer
    pub role: UserRole,

    // Profile attributes
    pub name: String,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub availability: Option<String>,
    pub skills: Option<String>,
    pub motivation: Option<String>,
    pub hobbies: Vec<String>,
    pub interests: Vec<String>,

    // Transient one-time-code state for OTP login
    pub otp_hash: Option<String>,
    pub otp_expires_at: Option<DateTime<Utc>>,

    // Transient one-time-code state for password reset (independent clock)
    pub reset_otp_hash: Option<String>,
    pub reset_otp_expires_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserRecord {
    /// Create a fresh record with no pending one-time codes.
    pub fn new(name: String, email: String, password_hash: String, role: UserRole) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role,
            name,
            phone: None,
            dob: None,
            address: None,
            availability: None,
            skills: None,
            motivation: None,
            hobbies: Vec::new(),
            interests: Vec::new(),
            otp_hash: None,
            otp_expires_at: None,
            reset_otp_hash: None,
            reset_otp_expires_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the record as modified.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
