use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{is_authorized, Action, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::Quiz,
        dto::{
            request::CreateQuizRequest,
            response::{MessageResponse, QuizDto},
        },
    },
    repositories::{QuestionRepository, QuizRepository},
    services::ImageService,
};

pub struct QuizService {
    repository: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    images: Arc<ImageService>,
}

impl QuizService {
    pub fn new(
        repository: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        images: Arc<ImageService>,
    ) -> Self {
        Self {
            repository,
            questions,
            images,
        }
    }

    async fn find_quiz(&self, id: &str) -> AppResult<Quiz> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", id)))
    }

    pub async fn get_quiz(&self, id: &str) -> AppResult<QuizDto> {
        Ok(self.find_quiz(id).await?.into())
    }

    pub async fn create_quiz(
        &self,
        mut request: CreateQuizRequest,
        actor: &Claims,
    ) -> AppResult<QuizDto> {
        request.title = request.title.trim().to_string();
        request.validate()?;

        let description = request
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        let quiz = Quiz::new(&request.title, description, &actor.sub);
        let quiz = self.repository.create(quiz).await?;

        log::info!("User {} created quiz {}", actor.sub, quiz.id);
        Ok(quiz.into())
    }

    /// Deletes a quiz with its questions and their images. Only the quiz
    /// creator may do this.
    pub async fn delete_quiz(&self, id: &str, actor: &Claims) -> AppResult<MessageResponse> {
        let quiz = self.find_quiz(id).await?;

        if !is_authorized(Action::Delete, &quiz, actor) {
            return Err(AppError::Forbidden(
                "You must be the quiz author to delete it".to_string(),
            ));
        }

        let questions = self.questions.delete_by_quiz(&quiz.id).await?;
        for question in &questions {
            match self.images.remove_image(&question.image_id).await {
                Ok(()) | Err(AppError::NotFound(_)) => {}
                Err(err) => log::warn!(
                    "Failed to remove image {} of question {}: {}",
                    question.image_id,
                    question.id,
                    err
                ),
            }
        }

        self.repository.delete(&quiz.id).await?;

        log::info!(
            "User {} deleted quiz {} with {} question(s)",
            actor.sub,
            quiz.id,
            questions.len()
        );
        Ok(MessageResponse {
            message: format!("Quiz '{}' deleted successfully", quiz.id),
        })
    }
}
