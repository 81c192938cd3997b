use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{bson::doc, options::FindOptions, Collection, IndexModel};

use crate::{
    db::{collections, Database},
    errors::AppResult,
    models::domain::Question,
    repositories::{ensure_unique_index, map_insert_error},
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>>;
    async fn count(&self) -> AppResult<u64>;
    /// Removes every question of a quiz and returns the removed records.
    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>>;
    async fn ensure_indexes(&self) -> AppResult<()>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.collection(collections::QUESTIONS);
        Self { collection }
    }
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        self.collection
            .insert_one(&question)
            .await
            .map_err(|e| {
                map_insert_error(e, |_| format!("Question with id '{}' already exists", question.id))
            })?;
        Ok(question)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "quiz_id": quiz_id })
            .with_options(find_options)
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn count(&self) -> AppResult<u64> {
        let count = self.collection.count_documents(doc! {}).await?;
        Ok(count)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let questions = self.find_by_quiz(quiz_id).await?;
        self.collection
            .delete_many(doc! { "quiz_id": quiz_id })
            .await?;
        Ok(questions)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        ensure_unique_index(&self.collection, "id").await?;

        let quiz_index = IndexModel::builder().keys(doc! { "quiz_id": 1 }).build();
        self.collection.create_index(quiz_index).await?;

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}
