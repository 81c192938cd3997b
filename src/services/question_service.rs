use std::sync::Arc;

use validator::Validate;

use crate::{
    auth::{is_authorized, Action, Claims},
    errors::{AppError, AppResult},
    models::{
        domain::{Image, Question, QuestionType, Quiz},
        dto::{
            request::CreateQuestionRequest,
            response::{CreatedQuestionResponse, QuestionDto},
        },
    },
    repositories::{ImageRepository, QuestionRepository, QuizRepository},
};

pub const CREATE_DENIED: &str = "You must be the quiz author to create a question related to it";

pub struct QuestionService {
    quizzes: Arc<dyn QuizRepository>,
    questions: Arc<dyn QuestionRepository>,
    images: Arc<dyn ImageRepository>,
}

impl QuestionService {
    pub fn new(
        quizzes: Arc<dyn QuizRepository>,
        questions: Arc<dyn QuestionRepository>,
        images: Arc<dyn ImageRepository>,
    ) -> Self {
        Self {
            quizzes,
            questions,
            images,
        }
    }

    async fn find_quiz(&self, quiz_id: &str) -> AppResult<Quiz> {
        self.quizzes
            .find_by_id(quiz_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Quiz with id '{}' not found", quiz_id)))
    }

    /// Resolves `quiz_id` and checks that `actor` may add questions to it.
    /// Runs before the request payload is looked at.
    pub async fn authorize_creation(&self, quiz_id: &str, actor: &Claims) -> AppResult<Quiz> {
        let quiz = self.find_quiz(quiz_id).await?;

        if !is_authorized(Action::Create, &quiz, actor) {
            return Err(AppError::Forbidden(CREATE_DENIED.to_string()));
        }
        Ok(quiz)
    }

    /// Creates a multiple choice question in `quiz_id` together with an
    /// empty image owned by the caller.
    ///
    /// The quiz is resolved before the caller is authorized, and the payload
    /// is only validated once the caller is known to be the quiz author.
    /// Either both records end up persisted or neither does.
    pub async fn create_question(
        &self,
        quiz_id: &str,
        request: CreateQuestionRequest,
        actor: &Claims,
    ) -> AppResult<CreatedQuestionResponse> {
        let quiz = self.authorize_creation(quiz_id, actor).await?;
        self.create_in_quiz(&quiz, request, actor).await
    }

    /// Same as [`create_question`](Self::create_question) for a quiz that was
    /// already resolved through [`authorize_creation`](Self::authorize_creation).
    pub async fn create_in_quiz(
        &self,
        quiz: &Quiz,
        mut request: CreateQuestionRequest,
        actor: &Claims,
    ) -> AppResult<CreatedQuestionResponse> {
        if !is_authorized(Action::Create, quiz, actor) {
            return Err(AppError::Forbidden(CREATE_DENIED.to_string()));
        }

        request.text = request.text.trim().to_string();
        request.validate()?;

        let image = self
            .images
            .create(Image::new_placeholder(&actor.sub))
            .await?;

        let question = Question::new(
            &quiz.id,
            &request.text,
            QuestionType::MultipleChoice,
            &image.id,
        );

        let question = match self.questions.create(question).await {
            Ok(question) => question,
            Err(err) => {
                log::warn!(
                    "Question insert failed for quiz {}, removing image {}",
                    quiz.id,
                    image.id
                );
                if let Err(cleanup) = self.images.delete(&image.id).await {
                    log::error!("Failed to remove orphan image {}: {}", image.id, cleanup);
                }
                return Err(err);
            }
        };

        log::info!(
            "User {} created question {} in quiz {}",
            actor.sub,
            question.id,
            quiz.id
        );

        Ok(CreatedQuestionResponse {
            id: question.id,
            image_id: question.image_id,
        })
    }

    pub async fn list_questions(&self, quiz_id: &str) -> AppResult<Vec<QuestionDto>> {
        let quiz = self.find_quiz(quiz_id).await?;
        let questions = self.questions.find_by_quiz(&quiz.id).await?;
        Ok(questions.into_iter().map(QuestionDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::domain::User,
        repositories::{
            question_repository::MockQuestionRepository, InMemoryImageRepository,
            InMemoryQuestionRepository, InMemoryQuizRepository,
        },
    };

    struct Fixture {
        service: QuestionService,
        quizzes: Arc<InMemoryQuizRepository>,
        questions: Arc<InMemoryQuestionRepository>,
        images: Arc<InMemoryImageRepository>,
    }

    fn fixture() -> Fixture {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let questions = Arc::new(InMemoryQuestionRepository::new());
        let images = Arc::new(InMemoryImageRepository::new());
        let service = QuestionService::new(quizzes.clone(), questions.clone(), images.clone());
        Fixture {
            service,
            quizzes,
            questions,
            images,
        }
    }

    fn request(text: &str) -> CreateQuestionRequest {
        CreateQuestionRequest {
            text: text.to_string(),
        }
    }

    async fn quiz_by(quizzes: &InMemoryQuizRepository, author: &Claims) -> Quiz {
        quizzes
            .create(Quiz::new("Rust", None, &author.sub))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn creator_gets_question_and_owned_image() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));
        let quiz = quiz_by(&f.quizzes, &author).await;

        let created = f
            .service
            .create_question(&quiz.id, request("What is a borrow?"), &author)
            .await
            .unwrap();

        assert_eq!(f.images.count().await.unwrap(), 1);
        let image = f.images.find_by_id(&created.image_id).await.unwrap().unwrap();
        assert_eq!(image.created_by_user_id, author.sub);
        assert!(!image.is_bound());

        let questions = f.service.list_questions(&quiz.id).await.unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].id, created.id);
        assert_eq!(questions[0].image_id, created.image_id);
        assert_eq!(questions[0].question_type, QuestionType::MultipleChoice);
    }

    #[tokio::test]
    async fn non_creator_is_forbidden_and_nothing_is_built() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));
        let other = Claims::for_user(&User::test_user("other"));
        let quiz = quiz_by(&f.quizzes, &author).await;

        let result = f
            .service
            .create_question(&quiz.id, request("Sneaky?"), &other)
            .await;

        match result {
            Err(AppError::Forbidden(msg)) => assert_eq!(msg, CREATE_DENIED),
            other => panic!("Expected Forbidden, got {:?}", other),
        }
        assert_eq!(f.images.count().await.unwrap(), 0);
        assert_eq!(f.questions.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn non_creator_with_invalid_payload_is_still_forbidden() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));
        let other = Claims::for_user(&User::test_user("other"));
        let quiz = quiz_by(&f.quizzes, &author).await;

        let result = f.service.create_question(&quiz.id, request("  "), &other).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn unknown_quiz_is_not_found_and_creates_no_image() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));

        let result = f
            .service
            .create_question("3f1c1d54-57a3-4a57-9d4e-000000000000", request("Q?"), &author)
            .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert_eq!(f.images.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn blank_text_is_unprocessable() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));
        let quiz = quiz_by(&f.quizzes, &author).await;

        let result = f.service.create_question(&quiz.id, request("   "), &author).await;

        match result {
            Err(AppError::Unprocessable(violations)) => {
                assert!(violations.iter().all(|v| v.field == "text"))
            }
            other => panic!("Expected Unprocessable, got {:?}", other),
        }
        assert_eq!(f.images.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn failed_question_insert_removes_image() {
        let quizzes = Arc::new(InMemoryQuizRepository::new());
        let images = Arc::new(InMemoryImageRepository::new());
        let mut questions = MockQuestionRepository::new();
        questions
            .expect_create()
            .times(1)
            .returning(|_| Err(AppError::DatabaseError("write conflict".to_string())));

        let service = QuestionService::new(quizzes.clone(), Arc::new(questions), images.clone());
        let author = Claims::for_user(&User::test_user("author"));
        let quiz = quiz_by(&quizzes, &author).await;

        let result = service.create_question(&quiz.id, request("Q?"), &author).await;

        assert!(matches!(result, Err(AppError::DatabaseError(_))));
        assert_eq!(images.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn authorize_creation_checks_quiz_then_author() {
        let f = fixture();
        let author = Claims::for_user(&User::test_user("author"));
        let other = Claims::for_user(&User::test_user("other"));
        let quiz = quiz_by(&f.quizzes, &author).await;

        let missing = f.service.authorize_creation("missing", &other).await;
        assert!(matches!(missing, Err(AppError::NotFound(_))));

        let denied = f.service.authorize_creation(&quiz.id, &other).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));

        let resolved = f.service.authorize_creation(&quiz.id, &author).await.unwrap();
        assert_eq!(resolved.id, quiz.id);

        let denied = f.service.create_in_quiz(&resolved, request("Q?"), &other).await;
        assert!(matches!(denied, Err(AppError::Forbidden(_))));
        assert_eq!(f.images.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn listing_questions_of_unknown_quiz_is_not_found() {
        let f = fixture();
        let result = f.service.list_questions("missing").await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
