//! MongoDB-backed user store

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::error::{DbError, DbResult};
use crate::models::UserRecord;
use crate::store::UserStore;
use crate::USERS_COLLECTION;

/// User store over a MongoDB collection.
#[derive(Clone)]
pub struct MongoUserStore {
    db: Database,
}

impl MongoUserStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self) -> Collection<UserRecord> {
        self.db.collection(USERS_COLLECTION)
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    async fn create(&self, user: UserRecord) -> DbResult<UserRecord> {
        self.collection()
            .insert_one(&user)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::Duplicate(_) => {
                    DbError::Duplicate(format!("Email {} already exists", user.email))
                }
                other => other,
            })?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> DbResult<Option<UserRecord>> {
        let user = self
            .collection()
            .find_one(doc! { "email": email })
            .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> DbResult<Option<UserRecord>> {
        let user = self.collection().find_one(doc! { "_id": id }).await?;

        Ok(user)
    }

    async fn save(&self, user: &UserRecord) -> DbResult<()> {
        let result = self
            .collection()
            .replace_one(doc! { "_id": &user.id }, user)
            .await?;

        if result.matched_count == 0 {
            return Err(DbError::NotFound(format!("User {} not found", user.id)));
        }

        Ok(())
    }
}
