pub mod image;
pub mod question;
pub mod quiz;
pub mod user;

pub use image::{Image, ImageFile};
pub use question::{Question, QuestionType};
pub use quiz::Quiz;
pub use user::{User, UserRole};
