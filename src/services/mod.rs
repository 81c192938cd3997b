pub mod file_storage;
pub mod image_service;
pub mod image_validator;
pub mod question_service;
pub mod quiz_service;
pub mod user_service;

pub use file_storage::{FileStorage, LocalFileStorage};
pub use image_service::ImageService;
pub use image_validator::{ImageValidator, UploadedFile};
pub use question_service::QuestionService;
pub use quiz_service::QuizService;
pub use user_service::UserService;
