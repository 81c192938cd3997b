use async_trait::async_trait;
use mongodb::{bson::doc, Collection};

use crate::{
    db::{collections, Database},
    errors::{AppError, AppResult},
    models::domain::Image,
    repositories::{ensure_unique_index, map_insert_error},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageRepository: Send + Sync {
    async fn create(&self, image: Image) -> AppResult<Image>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Image>>;
    async fn update(&self, image: Image) -> AppResult<Image>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn count(&self) -> AppResult<u64>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoImageRepository {
    collection: Collection<Image>,
}

impl MongoImageRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::IMAGES);
        Self { collection }
    }
}

#[async_trait]
impl ImageRepository for MongoImageRepository {
    async fn create(&self, image: Image) -> AppResult<Image> {
        self.collection
            .insert_one(&image)
            .await
            .map_err(|e| map_insert_error(e, |_| format!("Image with id '{}' already exists", image.id)))?;
        Ok(image)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Image>> {
        let image = self.collection.find_one(doc! { "id": id }).await?;
        Ok(image)
    }

    async fn update(&self, image: Image) -> AppResult<Image> {
        let result = self
            .collection
            .replace_one(doc! { "id": &image.id }, &image)
            .await?;

        if result.matched_count == 0 {
            return Err(AppError::NotFound(format!(
                "Image with id '{}' not found",
                image.id
            )));
        }

        Ok(image)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!("Image with id '{}' not found", id)));
        }

        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        ensure_unique_index(&self.collection, "id").await?;
        log::info!("Successfully created indexes for images collection");
        Ok(())
    }
}
