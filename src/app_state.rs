use std::sync::Arc;

use crate::{
    config::{Config, DatabaseBackend},
    db::Database,
    errors::AppResult,
    repositories::{
        ImageRepository, InMemoryImageRepository, InMemoryQuestionRepository,
        InMemoryQuizRepository, InMemoryUserRepository, MongoImageRepository,
        MongoQuestionRepository, MongoQuizRepository, MongoUserRepository, QuestionRepository,
        QuizRepository, UserRepository,
    },
    services::{
        FileStorage, ImageService, LocalFileStorage, QuestionService, QuizService, UserService,
    },
};

/// One handle per collection, shared by every service that touches it.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub quizzes: Arc<dyn QuizRepository>,
    pub questions: Arc<dyn QuestionRepository>,
    pub images: Arc<dyn ImageRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Self {
            users: Arc::new(MongoUserRepository::new(db)),
            quizzes: Arc::new(MongoQuizRepository::new(db)),
            questions: Arc::new(MongoQuestionRepository::new(db)),
            images: Arc::new(MongoImageRepository::new(db)),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            quizzes: Arc::new(InMemoryQuizRepository::new()),
            questions: Arc::new(InMemoryQuestionRepository::new()),
            images: Arc::new(InMemoryImageRepository::new()),
        }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        self.users.ensure_indexes().await?;
        self.quizzes.ensure_indexes().await?;
        self.questions.ensure_indexes().await?;
        self.images.ensure_indexes().await?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub quiz_service: Arc<QuizService>,
    pub question_service: Arc<QuestionService>,
    pub image_service: Arc<ImageService>,
    pub config: Arc<Config>,
    /// `None` when running on the in-memory backend.
    pub db: Option<Database>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let (repositories, db) = match config.database_backend {
            DatabaseBackend::Mongo => {
                let db = Database::connect(&config).await?;
                (Repositories::mongo(&db), Some(db))
            }
            DatabaseBackend::Memory => {
                log::warn!("Using in-memory repositories, data will not survive a restart");
                (Repositories::in_memory(), None)
            }
        };
        repositories.ensure_indexes().await?;

        let storage = Arc::new(LocalFileStorage::new(&config.upload_dir).await?);

        Ok(Self::from_parts(config, repositories, storage, db))
    }

    pub fn from_parts(
        config: Config,
        repositories: Repositories,
        storage: Arc<dyn FileStorage>,
        db: Option<Database>,
    ) -> Self {
        let config = Arc::new(config);

        let image_service = Arc::new(ImageService::new(
            repositories.images.clone(),
            storage,
            config.clone(),
        ));
        let question_service = Arc::new(QuestionService::new(
            repositories.quizzes.clone(),
            repositories.questions.clone(),
            repositories.images.clone(),
        ));
        let quiz_service = Arc::new(QuizService::new(
            repositories.quizzes.clone(),
            repositories.questions.clone(),
            image_service.clone(),
        ));
        let user_service = Arc::new(UserService::new(repositories.users));

        Self {
            user_service,
            quiz_service,
            question_service,
            image_service,
            config,
            db,
        }
    }
}
