//! Core authentication types
//!
//! Shared types used across the authentication components.

use serde::{Deserialize, Serialize};
use volunhub_db::{UserRecord, UserRole};

/// Session token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issuer
    pub iss: String,
}

/// Authenticated identity extracted from a validated session token and
/// attached to the request context by the session middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// User ID
    pub user_id: String,
    /// User email
    pub email: String,
    /// User role
    pub role: UserRole,
}

impl AuthenticatedUser {
    pub fn is_organizer(&self) -> bool {
        self.role == UserRole::Organizer
    }
}

impl From<SessionClaims> for AuthenticatedUser {
    fn from(claims: SessionClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

/// Public-safe projection of a credential record. Never carries the
/// password hash or one-time-code state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skills: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motivation: Option<String>,
    pub hobbies: Vec<String>,
    pub interests: Vec<String>,
}

impl From<&UserRecord> for PublicProfile {
    fn from(user: &UserRecord) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            phone: user.phone.clone(),
            dob: user.dob.clone(),
            address: user.address.clone(),
            availability: user.availability.clone(),
            skills: user.skills.clone(),
            motivation: user.motivation.clone(),
            hobbies: user.hobbies.clone(),
            interests: user.interests.clone(),
        }
    }
}

/// Partial profile update.
///
/// Follows "replace if non-empty" semantics: empty strings and absent
/// fields leave the stored value untouched, so a field cannot be cleared
/// through this type. A provided password is re-hashed before storage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub availability: Option<String>,
    pub skills: Option<String>,
    pub motivation: Option<String>,
    pub hobbies: Option<Vec<String>>,
    pub interests: Option<Vec<String>>,
}
