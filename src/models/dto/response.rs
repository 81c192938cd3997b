use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    config::Config,
    models::domain::{Image, Question, QuestionType, Quiz, User, UserRole},
};

/// Read view of an [`Image`]. Storage internals (file name, checksum, owner)
/// stay out of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageDto {
    pub id: String,
    pub url: Option<String>,
    pub original_name: Option<String>,
    pub mime_type: Option<String>,
    pub size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ImageDto {
    pub fn from_image(image: Image, config: &Config) -> Self {
        let (url, original_name, mime_type, size) = match image.file {
            Some(file) => (
                Some(config.upload_url(&file.file_name)),
                file.original_name,
                Some(file.mime_type),
                Some(file.size),
            ),
            None => (None, None, None, None),
        };

        ImageDto {
            id: image.id,
            url,
            original_name,
            mime_type,
            size,
            created_at: image.created_at,
            updated_at: image.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedQuestionResponse {
    pub id: String,
    pub image_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QuestionDto {
    pub id: String,
    pub quiz_id: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub image_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<Question> for QuestionDto {
    fn from(question: Question) -> Self {
        QuestionDto {
            id: question.id,
            quiz_id: question.quiz_id,
            text: question.text,
            question_type: question.question_type,
            image_id: question.image_id,
            created_at: question.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_by_user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_at: Option<DateTime<Utc>>,
}

impl From<Quiz> for QuizDto {
    fn from(quiz: Quiz) -> Self {
        QuizDto {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            created_by_user_id: quiz.created_by_user_id,
            created_at: quiz.created_at,
            modified_at: quiz.modified_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub roles: Vec<UserRole>,
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            roles: user.roles(),
            id: user.id,
            username: user.username,
            provider: user.provider,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T: Serialize> {
    pub items: Vec<T>,
    pub total: i64,
    pub offset: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}
