//! In-memory user store for tests

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{DbError, DbResult};
use crate::models::UserRecord;
use crate::store::UserStore;

/// In-memory user store keyed by record id.
///
/// Mirrors the Mongo store's contract, including the unique-email
/// constraint, so flow tests exercise the same error paths.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: UserRecord) -> DbResult<UserRecord> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(DbError::Duplicate(format!(
                "Email {} already exists",
                user.email
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn save(&self, user: &UserRecord) -> DbResult<()> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(DbError::NotFound(format!("User {} not found", user.id)));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(())
    }
}
