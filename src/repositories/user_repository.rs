use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Collection};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::User,
    repositories::{ensure_unique_index, map_insert_error},
};

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> AppResult<User>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>>;
    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;
    /// Users ordered by username; `ids` restricts the result when given.
    async fn find_paginated(
        &self,
        ids: Option<&[String]>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::USERS);
        Self { collection }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        self.collection
            .insert_one(&user)
            .await
            .map_err(|e| {
                map_insert_error(e, |field| match field {
                    Some("username") => {
                        format!("There is already an account with username '{}'", user.username)
                    }
                    _ => format!("User with id '{}' already exists", user.id),
                })
            })?;
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let user = self.collection.find_one(doc! { "id": id }).await?;
        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let user = self
            .collection
            .find_one(doc! { "username": username })
            .await?;
        Ok(user)
    }

    async fn find_paginated(
        &self,
        ids: Option<&[String]>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let filter = match ids {
            Some(ids) => doc! { "id": { "$in": ids.to_vec() } },
            None => doc! {},
        };

        let total = self.collection.count_documents(filter.clone()).await? as i64;

        let find_options = FindOptions::builder()
            .sort(doc! { "username": 1 })
            .skip(Some(offset.max(0) as u64))
            .limit(Some(limit))
            .build();

        let cursor = self.collection.find(filter).with_options(find_options).await?;
        let users: Vec<User> = cursor.try_collect().await?;

        Ok((users, total))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        ensure_unique_index(&self.collection, "id").await?;
        ensure_unique_index(&self.collection, "username").await?;
        log::info!("Successfully created indexes for users collection");
        Ok(())
    }
}
