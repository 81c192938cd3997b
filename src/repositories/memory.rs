//! Process-local repositories backed by `RwLock<HashMap>`, used for local
//! development (`DATABASE_BACKEND=memory`) and tests.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Image, Question, Quiz, User},
    repositories::{ImageRepository, QuestionRepository, QuizRepository, UserRepository},
};

fn page<T: Clone>(items: &[T], offset: i64, limit: i64) -> Vec<T> {
    let start = offset.max(0) as usize;
    if start >= items.len() {
        return vec![];
    }
    let end = (start + limit.max(0) as usize).min(items.len());
    items[start..end].to_vec()
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.username == user.username) {
            return Err(AppError::AlreadyExists(format!(
                "There is already an account with username '{}'",
                user.username
            )));
        }
        if users.contains_key(&user.id) {
            return Err(AppError::AlreadyExists(format!(
                "User with id '{}' already exists",
                user.id
            )));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn find_paginated(
        &self,
        ids: Option<&[String]>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<User>, i64)> {
        let users = self.users.read().await;
        let mut items: Vec<User> = users
            .values()
            .filter(|u| ids.map(|ids| ids.contains(&u.id)).unwrap_or(true))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.username.cmp(&b.username));

        Ok((page(&items, offset, limit), items.len() as i64))
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: Arc<RwLock<HashMap<String, Quiz>>>,
}

impl InMemoryQuizRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizRepository for InMemoryQuizRepository {
    async fn create(&self, quiz: Quiz) -> AppResult<Quiz> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.contains_key(&quiz.id) {
            return Err(AppError::AlreadyExists(format!(
                "Quiz with id '{}' already exists",
                quiz.id
            )));
        }

        quizzes.insert(quiz.id.clone(), quiz.clone());
        Ok(quiz)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Quiz>> {
        let quizzes = self.quizzes.read().await;
        Ok(quizzes.get(id).cloned())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut quizzes = self.quizzes.write().await;
        if quizzes.remove(id).is_none() {
            return Err(AppError::NotFound(format!("Quiz with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: Arc<RwLock<HashMap<String, Question>>>,
}

impl InMemoryQuestionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!(
                "Question with id '{}' already exists",
                question.id
            )));
        }

        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        let mut items: Vec<Question> = questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        items.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn count(&self) -> AppResult<u64> {
        let questions = self.questions.read().await;
        Ok(questions.len() as u64)
    }

    async fn delete_by_quiz(&self, quiz_id: &str) -> AppResult<Vec<Question>> {
        let mut questions = self.questions.write().await;
        let ids: Vec<String> = questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .map(|q| q.id.clone())
            .collect();

        Ok(ids.iter().filter_map(|id| questions.remove(id)).collect())
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryImageRepository {
    images: Arc<RwLock<HashMap<String, Image>>>,
}

impl InMemoryImageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ImageRepository for InMemoryImageRepository {
    async fn create(&self, image: Image) -> AppResult<Image> {
        let mut images = self.images.write().await;
        if images.contains_key(&image.id) {
            return Err(AppError::AlreadyExists(format!(
                "Image with id '{}' already exists",
                image.id
            )));
        }

        images.insert(image.id.clone(), image.clone());
        Ok(image)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Image>> {
        let images = self.images.read().await;
        Ok(images.get(id).cloned())
    }

    async fn update(&self, image: Image) -> AppResult<Image> {
        let mut images = self.images.write().await;
        if !images.contains_key(&image.id) {
            return Err(AppError::NotFound(format!(
                "Image with id '{}' not found",
                image.id
            )));
        }

        images.insert(image.id.clone(), image.clone());
        Ok(image)
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let mut images = self.images.write().await;
        if images.remove(id).is_none() {
            return Err(AppError::NotFound(format!("Image with id '{}' not found", id)));
        }
        Ok(())
    }

    async fn count(&self) -> AppResult<u64> {
        let images = self.images.read().await;
        Ok(images.len() as u64)
    }

    async fn ensure_indexes(&self) -> AppResult<()> {
        Ok(())
    }
}
