//! User store
//!
//! The document-store surface the rest of the platform programs against:
//! create, find-by-email, find-by-id, and whole-document save. The Mongo
//! implementation is the production path; the in-memory implementation
//! (feature `mock`) exists so the auth flows are testable without a
//! database process.

mod mongo;

#[cfg(any(test, feature = "mock"))]
mod memory;

use async_trait::async_trait;

use crate::error::DbResult;
use crate::models::UserRecord;

pub use mongo::MongoUserStore;

#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryUserStore;

/// Persistence operations for credential records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new record. Fails with `DbError::Duplicate` if the email is
    /// already registered.
    async fn create(&self, user: UserRecord) -> DbResult<UserRecord>;

    /// Look up a record by its exact email.
    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>>;

    /// Look up a record by its id.
    async fn find_by_id(&self, id: &str) -> DbResult<Option<UserRecord>>;

    /// Replace the stored document with `user`. Fails with
    /// `DbError::NotFound` if the record no longer exists.
    async fn save(&self, user: &UserRecord) -> DbResult<()>;
}
